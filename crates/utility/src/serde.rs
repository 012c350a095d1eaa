use std::{fmt, num::ParseFloatError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A number that may arrive either as a JSON number or as a numeric string,
/// as html forms tend to send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("expected a number, got an empty string")]
    Empty,
    #[error("expected a number, got {0:?}")]
    NotANumber(String, #[source] ParseFloatError),
    #[error("expected a finite number, got {0}")]
    NotFinite(f64),
}

impl LenientNumber {
    pub fn coerce(&self) -> Result<f64, CoercionError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(CoercionError::Empty);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|why| CoercionError::NotANumber(text.clone(), why))?
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CoercionError::NotFinite(value))
        }
    }
}

impl From<f64> for LenientNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LenientNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for LenientNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}
