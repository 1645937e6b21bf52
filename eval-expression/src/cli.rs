// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{path::PathBuf, str::FromStr};

use bpaf::{batteries::verbose_by_slice, construct, long, positional, OptionParser, Parser};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Options {
    pub verbosity_level: LevelFilter,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Eval {
        value: f64,
        index: u32,
        count: u32,
        seed: Option<u64>,
        output_type: OutputType,
        ramp: bool,
        expression: String,
    },
    Explain {
        expression: String,
    },
    Sheet {
        instances: u32,
        seed: Option<u64>,
        json: bool,
        sheet_path: PathBuf,
    },
}

/// The numeric type results are narrowed to before printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    F32,
    F64,
    I32,
    I64,
    U64,
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f32" | "float" => Ok(OutputType::F32),
            "f64" | "double" => Ok(OutputType::F64),
            "i32" | "int" => Ok(OutputType::I32),
            "i64" | "long" => Ok(OutputType::I64),
            "u64" | "ulong" => Ok(OutputType::U64),
            _ => Err(format!(
                "unknown type {s:?}, expected one of f32, f64, i32, i64, u64"
            )),
        }
    }
}

pub fn options() -> OptionParser<Options> {
    let verbosity_level = verbose_by_slice(
        3,
        [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ],
    );

    let eval = eval_command().command("eval").help("Evaluates an expression");
    let explain = explain_command()
        .command("explain")
        .help("Prints the compiled form of an expression");
    let sheet = sheet_command()
        .command("sheet")
        .help("Evaluates every parameter of a parameter sheet");
    let command = construct!([eval, explain, sheet]);

    construct!(Options {
        verbosity_level,
        command
    })
    .to_options()
    .descr("Compiles and evaluates parameter expressions")
}

fn seed() -> impl Parser<Option<u64>> {
    long("seed")
        .help("Seeds the random number generator used by R(a,b)")
        .argument::<u64>("SEED")
        .optional()
}

fn eval_command() -> OptionParser<Command> {
    let value = long("value")
        .short('x')
        .help("The value of the variables x, v and f (use --value=-1 for negatives)")
        .argument::<f64>("VALUE")
        .fallback(0.0);
    let index = long("index")
        .short('i')
        .help("The value of the variable #")
        .argument::<u32>("INDEX")
        .fallback(0);
    let count = long("count")
        .short('n')
        .help("The amount of evaluations, used by L(a,b)")
        .argument::<u32>("COUNT")
        .fallback(1);
    let seed = seed();
    let output_type = long("as")
        .help("Narrows the result to one of: f32, f64, i32, i64, u64")
        .argument::<OutputType>("TYPE")
        .fallback(OutputType::F64);
    let ramp = long("ramp")
        .help("Evaluates once for each index from 0 to COUNT-1 instead of just INDEX")
        .switch();
    let expression = expression();

    construct!(Command::Eval {
        value,
        index,
        count,
        seed,
        output_type,
        ramp,
        expression
    })
    .to_options()
    .descr("Evaluates an expression and prints the result")
}

fn explain_command() -> OptionParser<Command> {
    let expression = expression();
    construct!(Command::Explain { expression })
        .to_options()
        .descr("Prints the postfix program an expression compiles into")
}

fn sheet_command() -> OptionParser<Command> {
    let instances = long("instances")
        .short('n')
        .help("How many times to evaluate parameters which have variables")
        .argument::<u32>("COUNT")
        .fallback(1);
    let seed = seed();
    let json = long("json").help("Prints the results as JSON").switch();
    let sheet_path = positional::<PathBuf>("FILE")
        .help("The parameter sheet to evaluate")
        .complete_shell(bpaf::ShellComp::File {
            mask: Some("*.json"),
        });

    construct!(Command::Sheet {
        instances,
        seed,
        json,
        sheet_path
    })
    .to_options()
    .descr("Evaluates the parameters of a parameter sheet")
}

fn expression() -> impl Parser<String> {
    positional::<String>("EXPR")
        .help("The expression, put a -- before it if it starts with a minus sign")
}
