pub mod extent;
pub mod wkt;

pub use extent::ExtentBox;
pub use wkt::{LineString, Point, parse_linestring};

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Geometry text that does not match the simple 2D grammar the exporter
/// understands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("not a 2D LINESTRING: {wkt}")]
    NotLineString { wkt: String },

    #[error("missing closing parenthesis: {wkt}")]
    MissingClosingParen { wkt: String },

    #[error("nested parentheses are not supported: {wkt}")]
    NestedParens { wkt: String },

    #[error("expected 2 ordinates in coordinate pair {pair:?}, found {found}")]
    BadDimension { pair: String, found: usize },

    #[error("invalid ordinate: {value:?}")]
    InvalidOrdinate { value: String },

    #[error("line has {count} point(s), at least 2 are required")]
    TooFewPoints { count: usize },

    #[error("malformed bounding box: {text}")]
    MalformedBox { text: String },
}

/// Shorten geometry text for error messages.
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 64;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}

/// A coordinate value together with the text it was read from.
///
/// Comparisons use the numeric value. Display writes the source text
/// unchanged, so coordinates reach the output with every digit the
/// database stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordinate {
    value: f64,
    text: String,
}

impl Ordinate {
    pub fn parse(text: &str) -> Result<Self, GeometryError> {
        let value = text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| GeometryError::InvalidOrdinate {
                value: text.to_string(),
            })?;
        Ok(Ordinate {
            value,
            text: text.to_string(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Ordinate {
    fn from(value: f64) -> Self {
        Ordinate {
            value,
            text: value.to_string(),
        }
    }
}

impl fmt::Display for Ordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Ordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}
