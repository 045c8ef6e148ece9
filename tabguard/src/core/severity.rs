//! Statement severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity attached to a statement in a validation document.
///
/// Severity is metadata carried through evaluation untouched: the engine
/// never branches on it, and result consumers use it to decide between
/// aborting a pipeline and logging a warning. Levels are ordered:
/// Critical > Warning > Info.
///
/// # Examples
///
/// ```rust
/// use tabguard::core::Severity;
///
/// assert!(Severity::Critical > Severity::Warning);
/// assert!(Severity::Warning.is_at_least(Severity::Info));
/// assert_eq!(Severity::default(), Severity::Critical);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational level - failures worth recording but not acting on
    Info = 0,
    /// Warning level - failures that should be reviewed
    Warning = 1,
    /// Critical level - failures that must be addressed
    #[default]
    Critical = 2,
}

impl Severity {
    /// Returns the string representation of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Checks if this severity is at least as severe as another.
    pub fn is_at_least(&self, other: Severity) -> bool {
        *self >= other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Critical > Severity::Info);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_severity_serde() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");

        let severity: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(severity, Severity::Warning);
    }
}
