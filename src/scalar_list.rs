// src/scalar_list.rs
//
// A swept scalar (temperature or field intensity) as written in a system
// file: a single number, an explicit list, or a {start, final, step} range.
// The shape is resolved once into a plain `ScalarList`; nothing downstream
// sees the variant.

use serde::{Deserialize, Serialize};

use crate::error::{LlgError, Result};

/// Relative slack when deciding whether `final` lands on a step boundary.
const RANGE_SNAP_TOL: f64 = 1e-9;

/// Upper bound on the number of values a range may expand to.
pub const MAX_RANGE_LEN: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarSpec {
    Value(f64),
    List(Vec<f64>),
    Range {
        start: f64,
        #[serde(rename = "final")]
        final_: f64,
        step: f64,
    },
}

impl ScalarSpec {
    pub fn resolve(&self) -> Result<ScalarList> {
        match self {
            Self::Value(v) => Ok(ScalarList(vec![*v])),
            Self::List(values) => Ok(ScalarList(values.clone())),
            Self::Range {
                start,
                final_,
                step,
            } => ScalarList::range(*start, *final_, *step),
        }
    }
}

impl From<f64> for ScalarSpec {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl From<Vec<f64>> for ScalarSpec {
    fn from(v: Vec<f64>) -> Self {
        Self::List(v)
    }
}

/// Resolved sequence of sweep values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScalarList(Vec<f64>);

impl ScalarList {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// `arange(start, final + step, step)` with the step sign forced to
    /// `sign(final - start)`; only the magnitude of `step` is used.
    ///
    /// `final` is included when it sits on a step boundary (up to rounding).
    /// Otherwise the last value is the first one past `final`, as arange does.
    /// A degenerate range (`start == final`) yields `[start]`.
    pub fn range(start: f64, final_: f64, step: f64) -> Result<Self> {
        let invalid = |message: &str| LlgError::InvalidRange {
            start,
            final_,
            step,
            message: message.to_string(),
        };

        if !(start.is_finite() && final_.is_finite() && step.is_finite()) {
            return Err(invalid("start, final and step must be finite"));
        }
        if start == final_ {
            return Ok(Self(vec![start]));
        }
        if step == 0.0 {
            return Err(invalid("step must be non-zero"));
        }

        let step = (final_ - start).signum() * step.abs();
        let ratio = (final_ - start) / step;
        let snapped = if (ratio - ratio.round()).abs() <= RANGE_SNAP_TOL * ratio.abs().max(1.0) {
            ratio.round()
        } else {
            ratio
        };
        if !snapped.is_finite() || snapped.ceil() >= MAX_RANGE_LEN as f64 {
            return Err(invalid(&format!("range would exceed {MAX_RANGE_LEN} values")));
        }
        let n = snapped.ceil() as usize + 1;

        Ok(Self((0..n).map(|i| start + i as f64 * step).collect()))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for ScalarList {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

impl<'a> IntoIterator for &'a ScalarList {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
