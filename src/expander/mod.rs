//! Expansion of configuration payloads into individual parameter variants.

use crate::discovery::{ConfigurationSnapshot, ConfigurationSource};
use crate::error::ExpansionError;
use crate::graph::TargetRef;
use serde_json::Value;
use tracing::debug;

mod range;

pub use range::{RANGE_TOLERANCE, RangeSpec, expand_range, number_to_value};

/// The parsed value of one configuration key.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSpec {
    /// Explicit values, used verbatim.
    DiscreteList(Vec<Value>),
    Range(RangeSpec),
}

impl ParameterSpec {
    /// Classifies a JSON value. Arrays are discrete lists, objects are ranges,
    /// anything else is not a parameter specification and yields `Ok(None)`.
    pub fn from_json(value: &Value) -> Result<Option<Self>, crate::error::RangeError> {
        match value {
            Value::Array(items) => Ok(Some(ParameterSpec::DiscreteList(items.clone()))),
            Value::Object(object) => {
                RangeSpec::from_json(object).map(|r| Some(ParameterSpec::Range(r)))
            }
            _ => Ok(None),
        }
    }
}

/// One concrete value for one parameter of one target node.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEntry {
    pub target: TargetRef,
    pub parameter: String,
    pub value: Value,
}

/// Expands every configuration in the snapshot, in snapshot order.
///
/// Fails on the first malformed payload or invalid range; nothing is returned
/// for the configurations that did parse.
pub fn expand(snapshot: &ConfigurationSnapshot) -> Result<Vec<VariantEntry>, ExpansionError> {
    let mut entries = Vec::new();
    for source in &snapshot.sources {
        entries.extend(expand_source(source)?);
    }
    Ok(entries)
}

/// Expands a single configuration payload.
pub fn expand_source(source: &ConfigurationSource) -> Result<Vec<VariantEntry>, ExpansionError> {
    let node = source.target.id;
    let parsed: Value =
        serde_json::from_str(&source.raw_json).map_err(|e| ExpansionError::ConfigurationParse {
            node,
            message: e.to_string(),
        })?;

    let Value::Object(parameters) = parsed else {
        return Err(ExpansionError::ConfigurationParse {
            node,
            message: "configuration must be a JSON object".to_string(),
        });
    };

    let mut entries = Vec::new();
    for (parameter, value) in &parameters {
        let spec = ParameterSpec::from_json(value).map_err(|source| {
            ExpansionError::InvalidRange {
                node,
                parameter: parameter.clone(),
                source,
            }
        })?;

        let values: Vec<Value> = match spec {
            Some(ParameterSpec::DiscreteList(items)) => items,
            Some(ParameterSpec::Range(range)) => expand_range(&range)
                .map_err(|source| ExpansionError::InvalidRange {
                    node,
                    parameter: parameter.clone(),
                    source,
                })?
                .into_iter()
                .map(number_to_value)
                .collect(),
            None => {
                debug!(node = %node, parameter = %parameter, "Ignoring non-list, non-range value");
                continue;
            }
        };

        entries.extend(values.into_iter().map(|value| VariantEntry {
            target: source.target.clone(),
            parameter: parameter.clone(),
            value,
        }));
    }

    debug!(node = %node, variants = entries.len(), "Expanded configuration");
    Ok(entries)
}
