//! Logging utilities and configuration for tabguard.
//!
//! This module provides utilities for performance-sensitive logging configuration
//! and helpers for initializing structured logging with the `tracing` crate.

use tracing::Level;

/// Logging configuration for tabguard.
///
/// This configuration allows fine-grained control over logging behavior
/// to ensure minimal performance impact in production environments.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for tabguard components
    pub base_level: Level,
    /// Whether to log per-statement evaluation details
    pub log_statement_details: bool,
    /// Whether to log data source operations
    pub log_data_operations: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_statement_details: false,
            log_data_operations: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_statement_details: true,
            log_data_operations: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_statement_details: false,
            log_data_operations: false,
            max_field_length: 128,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Truncates a string to the maximum field length if needed.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        value.to_string()
    } else {
        let truncated = &value[..max_length];
        format!("{truncated}...(truncated)")
    }
}

/// Utilities for setting up structured logging.
pub mod setup {
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    use crate::error::{GuardError, Result};

    /// Configuration for tabguard's logging setup.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }
    }

    /// Initializes the global tracing subscriber from the given configuration.
    ///
    /// Respects `RUST_LOG` when set; falls back to the configured level
    /// otherwise. Fails if a global subscriber is already installed.
    pub fn init_logging(config: &LoggingConfig) -> Result<()> {
        let filter = match &config.env_filter {
            Some(custom) => EnvFilter::new(custom),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.level.to_string())),
        };

        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        let result = if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        };

        result.map_err(|e| {
            GuardError::Configuration(format!("Failed to initialize logging: {e}"))
        })
    }
}
