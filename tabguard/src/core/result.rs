//! Evaluation outcome and report types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Scope, Severity};

/// Statistics produced by a statement over one scoped data slice.
///
/// The schema is statement-specific and opaque to the engine; a report is
/// always serializable so it can stand as evidence for the pass/fail
/// decision derived from it.
pub type Report = Map<String, Value>;

/// The outcome of running one statement against one scope.
///
/// `detail` is the report the statement computed; `result` is the pass/fail
/// decision derived from that report and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The report backing the decision
    pub detail: Report,
    /// Whether the statement passed
    pub result: bool,
}

/// One entry in a validation report: a statement, where it ran, and how it
/// went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementOutcome {
    /// The scope the statement ran against
    pub scope: Scope,
    /// The statement type name
    pub statement: String,
    /// Severity carried over from the statement spec
    pub severity: Severity,
    /// Report and pass/fail decision
    pub evaluation: Evaluation,
}

/// Aggregate counters for a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Total number of statements evaluated
    pub total_statements: usize,
    /// Number of statements that passed
    pub passed_statements: usize,
    /// Number of statements that failed
    pub failed_statements: usize,
    /// Wall time for the whole run in milliseconds
    pub execution_time_ms: u64,
}

impl ValidationMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of evaluated statements that passed.
    pub fn success_rate(&self) -> f64 {
        if self.total_statements == 0 {
            100.0
        } else {
            self.passed_statements as f64 / self.total_statements as f64 * 100.0
        }
    }
}

/// The full result of validating a document against a dataset.
///
/// Outcomes preserve the document's item order and, within an item, the
/// declared statement order. The engine records severities but never acts
/// on them; use [`failures`](Self::failures) and
/// [`max_failed_severity`](Self::max_failed_severity) to implement an
/// abort-vs-warn policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Name of the validated document
    pub document: String,
    /// Per-statement outcomes in document order
    pub outcomes: Vec<StatementOutcome>,
    /// Aggregate counters
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    /// True when every evaluated statement passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.evaluation.result)
    }

    /// The outcomes whose statements failed, in document order.
    pub fn failures(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| !o.evaluation.result)
    }

    /// The highest severity among failed statements, if any failed.
    pub fn max_failed_severity(&self) -> Option<Severity> {
        self.failures().map(|o| o.severity).max()
    }
}
