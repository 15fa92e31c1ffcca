//! Unified error types for agri-forecast.
//!
//! Scoring itself is total and never fails. Errors come from the fitted
//! price models, from model artifacts and record files on disk, and from
//! configuration and validation input.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for agri-forecast operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ForecastError {
    /// Errors raised by a prediction model
    #[error("Model operation failed: {context}")]
    Model {
        context: String,
        #[source]
        source: ModelErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    /// JSON encoding or decoding errors
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Specific model error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelErrorKind {
    #[error("No model available for '{key}' - train it before predicting")]
    NoModel { key: String },

    #[error("Insufficient training data: {got} point(s), need at least {need}")]
    InsufficientData { got: usize, need: usize },

    #[error("Model artifact unreadable: {0}")]
    ArtifactUnreadable(String),

    #[error("Unknown hazard type: {0}")]
    UnknownHazard(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for agri-forecast operations
pub type Result<T> = std::result::Result<T, ForecastError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ForecastError {
    /// Create a model error with context
    pub fn model(context: impl Into<String>, source: ModelErrorKind) -> Self {
        Self::Model {
            context: context.into(),
            source,
        }
    }

    /// Create a model error for a key that has no fitted parameters
    pub fn no_model(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::model(
            format!("price forecast for {key}"),
            ModelErrorKind::NoModel { key },
        )
    }

    /// Create a model error for a training set that is too small
    pub fn insufficient_data(got: usize, need: usize) -> Self {
        Self::model(
            "fitting regression",
            ModelErrorKind::InsufficientData { got, need },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error means a model must be trained first
    #[must_use]
    pub const fn is_missing_model(&self) -> bool {
        matches!(
            self,
            Self::Model {
                source: ModelErrorKind::NoModel { .. },
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outermost first, so a failure deep inside artifact
/// loading reads as `"building service: loading flood artifact: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ForecastError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: ForecastError, new_ctx: &str) -> ForecastError {
    match err {
        ForecastError::Model {
            context: existing,
            source,
        } => ForecastError::Model {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ForecastError::Io {
            path,
            message,
            source,
        } => ForecastError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ForecastError::Config(msg) => ForecastError::Config(chain_context(new_ctx, &msg)),
        ForecastError::Validation(msg) => ForecastError::Validation(chain_context(new_ctx, &msg)),
        ForecastError::Serialization(msg) => {
            ForecastError::Serialization(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a validation error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ForecastError::Validation(context.into()))
    }
}
