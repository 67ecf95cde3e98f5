//! Structured error types shared across the Ising crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`IsingError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (site ids, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the Ising engine.
///
/// Apart from [`IsingError::Execution`], every variant is a caller contract
/// violation detected at the boundary of the operation that received the bad
/// input. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum IsingError {
    /// Non-positive or otherwise unsupported site count.
    #[error("invalid size: {0}")]
    InvalidSize(ErrorInfo),
    /// Mismatched lengths or out-of-bounds counts.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(ErrorInfo),
    /// A spin entry, coupling or field outside its admissible domain.
    #[error("invalid value: {0}")]
    InvalidValue(ErrorInfo),
    /// Integer index or site id outside its valid range.
    #[error("index out of range: {0}")]
    IndexOutOfRange(ErrorInfo),
    /// Adjacency data that is not symmetric.
    #[error("asymmetric coupling: {0}")]
    AsymmetricCoupling(ErrorInfo),
    /// Non-positive or non-finite temperature.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(ErrorInfo),
    /// Run configuration decoding or validation errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Worker pools or other execution resources could not be provisioned.
    #[error("execution error: {0}")]
    Execution(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl IsingError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            IsingError::InvalidSize(info)
            | IsingError::DimensionMismatch(info)
            | IsingError::InvalidValue(info)
            | IsingError::IndexOutOfRange(info)
            | IsingError::AsymmetricCoupling(info)
            | IsingError::InvalidTemperature(info)
            | IsingError::Config(info)
            | IsingError::Execution(info) => info,
        }
    }
}

/// Rejects temperatures that are not strictly positive and finite.
pub fn check_temperature(temperature: f64) -> Result<(), IsingError> {
    if temperature.is_finite() && temperature > 0.0 {
        return Ok(());
    }
    Err(IsingError::InvalidTemperature(
        ErrorInfo::new("non-positive-temperature", "temperature must be positive and finite")
            .with_context("temperature", temperature),
    ))
}
