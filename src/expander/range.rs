use crate::error::RangeError;
use serde_json::{Map, Value};

/// Slack, in units of `step`, allowed when deciding whether `max` is reached.
///
/// Spans such as `0.0..=0.3` by `0.1` divide to `2.9999999999999996`; the
/// tolerance keeps the final `0.3` step in.
pub const RANGE_TOLERANCE: f64 = 1e-9;

// Largest value count a `Vec<f64>` can be allocated for.
const MAX_VALUES: f64 = (isize::MAX as usize / std::mem::size_of::<f64>()) as f64;

/// A numeric sweep from `min` to `max` (inclusive) in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RangeSpec {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Reads `min`, `max` and `step` from a JSON object. Any missing or
    /// non-numeric field is a `RangeError::NotNumeric`.
    pub fn from_json(object: &Map<String, Value>) -> Result<Self, RangeError> {
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_f64)
                .ok_or(RangeError::NotNumeric)
        };
        Ok(Self {
            min: field("min")?,
            max: field("max")?,
            step: field("step")?,
        })
    }
}

/// Expands a range into its values: `min + k * step` for every `k` that stays
/// within `max` (up to [`RANGE_TOLERANCE`]).
pub fn expand_range(spec: &RangeSpec) -> Result<Vec<f64>, RangeError> {
    let RangeSpec { min, max, step } = *spec;

    if !(min.is_finite() && max.is_finite() && step.is_finite()) {
        return Err(RangeError::NotNumeric);
    }
    if min > max {
        return Err(RangeError::Inverted { min, max });
    }
    if step <= 0.0 {
        return Err(RangeError::NonPositiveStep { step });
    }

    let count = ((max - min) / step + RANGE_TOLERANCE).floor() + 1.0;
    if !count.is_finite() || count > MAX_VALUES {
        return Err(RangeError::Unrepresentable { count });
    }

    let count = count as usize;
    Ok((0..count).map(|k| min + k as f64 * step).collect())
}

/// Converts a range value into JSON, keeping whole numbers integral.
pub fn number_to_value(number: f64) -> Value {
    const I64_BOUND: f64 = 9_007_199_254_740_992.0; // 2^53
    if number.fract() == 0.0 && number.abs() <= I64_BOUND {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}
