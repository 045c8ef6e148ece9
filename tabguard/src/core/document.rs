//! Validation document model.
//!
//! A validation document is the declarative description of everything that
//! should hold for a dataset: an ordered list of items, each pairing a scope
//! (one column, or a list of columns for table-wide rules) with the
//! statements to evaluate against that scope. Documents are plain serde
//! types; their JSON field names and nesting are the wire contract, whether
//! a document was written by hand or produced by the
//! [`Profiler`](crate::profiler::Profiler).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::Severity;

/// The data slice a statement is evaluated against.
///
/// A plain string selects a single column; a list of column names selects a
/// table-wide slice in declared column order, used for cross-column
/// statements such as row counts.
///
/// # Examples
///
/// ```rust
/// use tabguard::core::Scope;
///
/// let single: Scope = serde_json::from_str("\"user_id\"").unwrap();
/// assert_eq!(single, Scope::Column("user_id".to_string()));
///
/// let table: Scope = serde_json::from_str("[\"a\", \"b\"]").unwrap();
/// assert!(table.is_table());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    /// A single-column slice
    Column(String),
    /// A table-wide slice over the listed columns, in declared order
    Table(Vec<String>),
}

impl Scope {
    /// Returns the column names selected by this scope, in declared order.
    pub fn columns(&self) -> Vec<String> {
        match self {
            Scope::Column(name) => vec![name.clone()],
            Scope::Table(names) => names.clone(),
        }
    }

    /// Returns true for the table-wide (column list) form.
    pub fn is_table(&self) -> bool {
        matches!(self, Scope::Table(_))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Column(name) => write!(f, "{name}"),
            Scope::Table(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Scope::Column(name.to_string())
    }
}

impl From<Vec<String>> for Scope {
    fn from(names: Vec<String>) -> Self {
        Scope::Table(names)
    }
}

/// One statement entry in a validation document.
///
/// `type` routes to a registered statement; `severity` and `location` are
/// metadata carried through to the outcome; every other key is a
/// statement-specific parameter, validated against the statement's declared
/// parameter list at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSpec {
    /// Registry key of the statement to run
    #[serde(rename = "type")]
    pub statement_type: String,
    /// Severity attached to the outcome; consumers decide abort-vs-warn
    #[serde(default)]
    pub severity: Severity,
    /// Optional free-form location metadata (e.g. a document path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Statement-specific parameters
    #[serde(flatten)]
    pub parameters: Map<String, Value>,
}

impl StatementSpec {
    /// Creates a spec for the given statement type with default severity
    /// and no parameters.
    pub fn new(statement_type: impl Into<String>) -> Self {
        Self {
            statement_type: statement_type.into(),
            severity: Severity::default(),
            location: None,
            parameters: Map::new(),
        }
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the location metadata.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a statement-specific parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// One scoped group of statements in a validation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The data slice the statements run against
    pub scope: Scope,
    /// Statements evaluated against the scope, in declared order
    pub statements: Vec<StatementSpec>,
}

impl Item {
    /// Creates an item for the given scope with no statements.
    pub fn new(scope: impl Into<Scope>) -> Self {
        Self {
            scope: scope.into(),
            statements: Vec::new(),
        }
    }

    /// Adds a statement to the item.
    pub fn with_statement(mut self, statement: StatementSpec) -> Self {
        self.statements.push(statement);
        self
    }
}

/// A complete validation document.
///
/// Immutable once loaded for a validation run; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDocument {
    /// Document name, used to label validation reports
    pub name: String,
    /// Free-form description; the profiler stamps its generator version here
    pub description: String,
    /// Scoped statement groups, evaluated in declared order
    pub items: Vec<Item>,
}

impl ValidationDocument {
    /// Creates an empty document with the given name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items: Vec::new(),
        }
    }

    /// Adds an item to the document.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}
