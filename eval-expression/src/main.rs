// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod cli;
mod sheet;

use std::fmt::Display;

use anyhow::{bail, Context};
use cli::{Command, OutputType};
use expression::{Evaluated, Evaluator, Expression, Number};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    let options = cli::options().run();

    tracing_subscriber::fmt()
        .with_max_level(options.verbosity_level)
        .with_writer(std::io::stderr)
        .init();

    let mut evaluator = Evaluator::new();

    match options.command {
        Command::Eval {
            value,
            index,
            count,
            seed,
            output_type,
            ramp,
            expression,
        } => {
            if let Some(seed) = seed {
                evaluator.set_random_state(seed);
            }
            let indices = if ramp { 0..count.max(1) } else { index..index.saturating_add(1) };
            let request = EvalRequest {
                source: &expression,
                value,
                indices,
                count,
            };
            match output_type {
                OutputType::F32 => eval::<f32>(&mut evaluator, request),
                OutputType::F64 => eval::<f64>(&mut evaluator, request),
                OutputType::I32 => eval::<i32>(&mut evaluator, request),
                OutputType::I64 => eval::<i64>(&mut evaluator, request),
                OutputType::U64 => eval::<u64>(&mut evaluator, request),
            }
        }

        Command::Explain { expression } => {
            let compiled = Expression::compile(&expression);
            println!("postfix: {compiled}");
            println!("has variables: {}", compiled.has_variables());
            Ok(())
        }

        Command::Sheet {
            instances,
            seed,
            json,
            sheet_path,
        } => {
            if let Some(seed) = seed {
                evaluator.set_random_state(seed);
            }
            let sheet = sheet::read(&sheet_path)
                .with_context(|| format!("Could not read {}", sheet_path.display()))?;
            let samples = sheet::sample(&sheet, &mut evaluator, instances);
            info!(
                "Evaluated {} parameters from {}.",
                samples.parameters.len(),
                sheet_path.display(),
            );

            if json {
                let output = serde_json::to_string_pretty(&samples.parameters)
                    .context("Failed to serialize the results")?;
                println!("{output}");
            } else {
                for parameter in &samples.parameters {
                    if parameter.constant {
                        println!("{} = {}", parameter.name, parameter.values[0]);
                    } else {
                        for (i, value) in parameter.values.iter().enumerate() {
                            println!("{}[{i}] = {value}", parameter.name);
                        }
                    }
                }
            }

            if !samples.invalid.is_empty() {
                bail!(
                    "Invalid expressions for parameters: {}",
                    samples.invalid.join(", "),
                );
            }
            Ok(())
        }
    }
}

struct EvalRequest<'a> {
    source: &'a str,
    value: f64,
    indices: std::ops::Range<u32>,
    count: u32,
}

fn eval<T: Number + Display>(
    evaluator: &mut Evaluator,
    request: EvalRequest<'_>,
) -> anyhow::Result<()> {
    let EvalRequest {
        source,
        value,
        indices,
        count,
    } = request;

    match evaluator.try_evaluate::<T>(source) {
        Evaluated::Constant(result) => println!("{result}"),
        Evaluated::Deferred(expression) => {
            debug!("Expression has variables, evaluating as \"{expression}\".");
            for index in indices {
                let result = evaluator
                    .evaluate(&expression, T::from_f64(value), index, count)
                    .with_context(|| {
                        format!("Failed to evaluate {source:?} (x = {value}, # = {index})")
                    })?;
                println!("{result}");
            }
        }
        Evaluated::Invalid => bail!("{source:?} is not a valid expression"),
    }

    Ok(())
}
