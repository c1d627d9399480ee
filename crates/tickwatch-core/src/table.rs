//! One-shot normalization of the upstream table shape.
//!
//! The chart endpoint is not shape-stable: indicator columns usually arrive
//! as flat arrays, but sometimes carry a second tag level keyed by symbol,
//! and individual cells occasionally show up wrapped in a `{ "raw": … }`
//! object or as a one-element bundle. All of that is resolved here, once, at
//! ingestion; the rest of the crate only ever sees plain `f64` values.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Numeric-coercion failures. Reportable, never a silent default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected a scalar, found a bundle of {len} values")]
    AmbiguousBundle { len: usize },
    #[error("wrapped value carries no number")]
    EmptyWrapper,
}

/// A per-field column as it appears on the wire: flat, or tagged a second
/// time by symbol.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldColumn {
    Flat(Vec<Option<CellValue>>),
    Nested(BTreeMap<String, Vec<Option<CellValue>>>),
}

impl FieldColumn {
    /// Drop the inner tag level, if present.
    ///
    /// A nested column keeps its first tagged series (in practice the only
    /// one, since requests are single-symbol); the tag itself is discarded.
    /// Flattening a flat column is the identity, so the two shapes are
    /// indistinguishable downstream.
    pub fn flatten(self) -> Vec<Option<CellValue>> {
        match self {
            Self::Flat(cells) => cells,
            Self::Nested(tagged) => tagged.into_values().next().unwrap_or_default(),
        }
    }
}

/// A single numeric cell: a plain number, a `{ "raw": … }` wrapper, or a
/// bundle left over from a tagged column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Num(f64),
    Wrapped { raw: Option<f64> },
    Bundle(Vec<f64>),
}

impl CellValue {
    /// Explicit scalar unwrap. A one-element bundle coerces; anything else
    /// is a [`ShapeError`].
    pub fn into_scalar(self) -> Result<f64, ShapeError> {
        match self {
            Self::Num(value) => Ok(value),
            Self::Wrapped { raw: Some(value) } => Ok(value),
            Self::Wrapped { raw: None } => Err(ShapeError::EmptyWrapper),
            Self::Bundle(values) if values.len() == 1 => Ok(values[0]),
            Self::Bundle(values) => Err(ShapeError::AmbiguousBundle { len: values.len() }),
        }
    }
}
