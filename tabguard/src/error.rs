//! Error types for the tabguard data validation library.
//!
//! This module provides a comprehensive error handling strategy using `thiserror`
//! for automatic error trait implementations. All errors in the tabguard library
//! are represented by the `GuardError` enum.

use thiserror::Error;

/// The main error type for the tabguard library.
///
/// This enum represents all possible errors that can occur while loading
/// validation documents, constructing statements, and running validations
/// or profiling.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A statement spec carried parameters the statement does not declare.
    ///
    /// Raised at statement construction time, before any data is touched.
    #[error(
        "Invalid parameters passed to '{statement}' statement: {parameters:?}. \
         The valid parameters are: {valid:?}"
    )]
    UnexpectedParameters {
        /// Name of the statement the spec targeted
        statement: String,
        /// The offending parameter keys
        parameters: Vec<String>,
        /// The parameters the statement declares
        valid: Vec<String>,
    },

    /// A validation document referenced a statement type that is not registered.
    #[error("Unknown statement type '{name}'")]
    UnknownStatement {
        /// The unregistered statement name
        name: String,
    },

    /// A statement descriptor could not be registered.
    #[error("Cannot register statement '{name}': {reason}")]
    StatementRegistration {
        /// The rejected statement name
        name: String,
        /// Why the registration was rejected
        reason: String,
    },

    /// A statement was declared under a scope kind it cannot evaluate.
    #[error("Statement '{statement}' cannot run against scope '{scope}': {reason}")]
    ScopeMismatch {
        /// Name of the statement
        statement: String,
        /// Display form of the offending scope
        scope: String,
        /// Why the scope does not apply
        reason: String,
    },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error when a required column is not found in the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// A registered statement has no reporting implementation.
    ///
    /// Evaluation requires a report, so the engine surfaces this as a hard
    /// failure for the statement that raised it.
    #[error("Statement '{statement}' does not implement reporting")]
    ReportNotImplemented { statement: String },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
///
/// This is the standard `Result` type used throughout the tabguard library.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new unexpected-parameters error.
    pub fn unexpected_parameters(
        statement: impl Into<String>,
        parameters: Vec<String>,
        valid: Vec<String>,
    ) -> Self {
        Self::UnexpectedParameters {
            statement: statement.into(),
            parameters,
            valid,
        }
    }

    /// Creates a new unknown-statement error.
    pub fn unknown_statement(name: impl Into<String>) -> Self {
        Self::UnknownStatement { name: name.into() }
    }

    /// Creates a new registration error.
    pub fn statement_registration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StatementRegistration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new column-not-found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            match base_error {
                GuardError::Internal(inner) => GuardError::Internal(format!("{}: {}", msg, inner)),
                other => GuardError::Internal(format!("{}: {}", msg, other)),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            let base_error = e.into();
            match base_error {
                GuardError::Internal(inner) => GuardError::Internal(format!("{}: {}", msg, inner)),
                other => GuardError::Internal(format!("{}: {}", msg, other)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_parameters_error() {
        let err = GuardError::unexpected_parameters(
            "not_null",
            vec!["tolerance".to_string()],
            vec!["threshold".to_string()],
        );
        let message = err.to_string();
        assert!(message.contains("not_null"));
        assert!(message.contains("tolerance"));
        assert!(message.contains("threshold"));
    }

    #[test]
    fn test_unknown_statement_error() {
        let err = GuardError::unknown_statement("no_such_rule");
        assert_eq!(err.to_string(), "Unknown statement type 'no_such_rule'");
    }

    #[test]
    fn test_column_not_found() {
        let err = GuardError::column_not_found("user_id");
        assert_eq!(err.to_string(), "Column 'user_id' not found in dataset");
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(GuardError::Internal("Something went wrong".to_string()))
        }

        let result = failing_operation().context("During data validation");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("During data validation"));
    }
}
