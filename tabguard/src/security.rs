//! Security utilities for the tabguard data validation library.
//!
//! Column and table names coming out of validation documents are interpolated
//! into SQL aggregate queries, so they are validated and escaped here before
//! any query is built.

use crate::error::{GuardError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// SQL identifier validation and escaping utilities.
pub struct SqlSecurity;

impl SqlSecurity {
    /// Validates and escapes a SQL identifier (table name or column name).
    ///
    /// # Arguments
    /// * `identifier` - The identifier to validate and escape
    ///
    /// # Returns
    /// * `Ok(String)` - The safely escaped identifier ready for SQL use
    /// * `Err(GuardError)` - If the identifier is invalid or potentially malicious
    ///
    /// # Examples
    /// ```rust
    /// use tabguard::security::SqlSecurity;
    ///
    /// assert!(SqlSecurity::escape_identifier("customer_id").is_ok());
    /// assert!(SqlSecurity::escape_identifier("id; DROP TABLE users--").is_err());
    /// ```
    pub fn escape_identifier(identifier: &str) -> Result<String> {
        Self::validate_identifier(identifier)?;

        // Quote the identifier so reserved words stay usable as column names
        let escaped = identifier.replace('"', "\"\"");
        Ok(format!("\"{escaped}\""))
    }

    /// Validates a SQL identifier without escaping it.
    pub fn validate_identifier(identifier: &str) -> Result<()> {
        if identifier.is_empty() || identifier.trim().is_empty() {
            return Err(GuardError::SecurityError(
                "SQL identifier cannot be empty or whitespace-only".to_string(),
            ));
        }

        // Length cap keeps hostile documents from building huge queries
        if identifier.len() > 128 {
            return Err(GuardError::SecurityError(
                "SQL identifier too long (max 128 characters)".to_string(),
            ));
        }

        if identifier.contains('\0') {
            return Err(GuardError::SecurityError(
                "SQL identifier cannot contain null bytes".to_string(),
            ));
        }

        static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
            // Must start with a letter or underscore; this pattern is a
            // compile-time constant and known to be valid
            #[allow(clippy::expect_used)]
            Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")
                .expect("Hard-coded regex pattern should be valid")
        });

        if !IDENTIFIER_REGEX.is_match(identifier) {
            return Err(GuardError::SecurityError(format!(
                "Invalid SQL identifier format: '{identifier}'. Identifiers must start with \
                 a letter or underscore and contain only letters, numbers, and underscores"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(SqlSecurity::validate_identifier("customer_id").is_ok());
        assert!(SqlSecurity::validate_identifier("_private").is_ok());
        assert!(SqlSecurity::validate_identifier("table1").is_ok());
        assert!(SqlSecurity::validate_identifier("UPPER_CASE").is_ok());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(SqlSecurity::validate_identifier("").is_err());
        assert!(SqlSecurity::validate_identifier("   ").is_err());
        assert!(SqlSecurity::validate_identifier("1starts_with_digit").is_err());
        assert!(SqlSecurity::validate_identifier("has space").is_err());
        assert!(SqlSecurity::validate_identifier("id; DROP TABLE users--").is_err());
        assert!(SqlSecurity::validate_identifier("quoted\"name").is_err());
        assert!(SqlSecurity::validate_identifier(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_escape_wraps_in_quotes() {
        assert_eq!(
            SqlSecurity::escape_identifier("order").unwrap(),
            "\"order\""
        );
    }
}
