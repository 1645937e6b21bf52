// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use expression::{Evaluated, Evaluator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A file listing named parameter expressions, e.g. the tweakables of a
/// particle system.
///
/// Has enum variants for breaking changes in the format of the file, but
/// [`read`] always returns the newest variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sheet_version", rename_all = "snake_case")]
pub enum ParameterSheet {
    V1 { parameters: Vec<Parameter> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub expression: String,
    /// The value of the variables `x`, `v` and `f` in the expression.
    #[serde(default)]
    pub value: f64,
}

/// The values of one parameter. Constant parameters have exactly one value,
/// others have one for each instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledParameter {
    pub name: String,
    pub constant: bool,
    pub values: Vec<f64>,
}

#[derive(Debug, Default)]
pub struct Samples {
    pub parameters: Vec<SampledParameter>,
    /// Names of the parameters whose expressions failed to evaluate.
    pub invalid: Vec<String>,
}

pub fn read(sheet: &Path) -> anyhow::Result<ParameterSheet> {
    let sheet = fs::read_to_string(sheet).context("Failed to open the parameter sheet")?;
    parse(&sheet)
}

pub fn parse(sheet: &str) -> anyhow::Result<ParameterSheet> {
    let sheet = serde_json::from_str(sheet).context("Failed to parse the parameter sheet")?;

    // NOTE: When there's new versions of ParameterSheet, convert to the newest
    // here (sample assumes it)

    Ok(sheet)
}

/// Evaluates each parameter of the sheet, `instances` times if the parameter
/// has variables, index going from 0 to `instances - 1`.
pub fn sample(sheet: &ParameterSheet, evaluator: &mut Evaluator, instances: u32) -> Samples {
    let ParameterSheet::V1 { parameters } = sheet;
    let mut samples = Samples::default();

    for parameter in parameters {
        let values = match evaluator.try_evaluate::<f64>(&parameter.expression) {
            Evaluated::Constant(value) => Some((true, vec![value])),
            Evaluated::Deferred(expression) => {
                debug!(
                    "Evaluating {} (\"{}\") for {} instances.",
                    parameter.name, expression, instances,
                );
                (0..instances.max(1))
                    .map(|index| evaluator.evaluate(&expression, parameter.value, index, instances))
                    .collect::<Option<Vec<f64>>>()
                    .map(|values| (false, values))
            }
            Evaluated::Invalid => None,
        };

        if let Some((constant, values)) = values {
            samples.parameters.push(SampledParameter {
                name: parameter.name.clone(),
                constant,
                values,
            });
        } else {
            warn!(
                "Parameter {} has an invalid expression: {:?}",
                parameter.name, parameter.expression,
            );
            samples.invalid.push(parameter.name.clone());
        }
    }

    samples
}
