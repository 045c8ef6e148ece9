//! Statement framework and built-in statement implementations.
//!
//! A statement is the polymorphic unit of validation logic. Each concrete
//! statement implements the [`Statement`] trait: an async [`report`]
//! computing statistics over a scoped data slice, and a pure
//! [`result`] classifying a previously produced report as pass or fail.
//! The two are tied together by [`evaluate`], a module-level function
//! rather than a trait method, so implementations cannot reorder the
//! protocol: the report is computed exactly once, the decision sees only
//! the report (never the raw data), and both travel together in the
//! returned [`Evaluation`] as serializable evidence.
//!
//! Statement types are discovered through a [`StatementRegistry`] of
//! [`StatementDescriptor`]s; the descriptor also carries the statement's
//! declared parameter list, its `table_only` applicability flag, and an
//! optional profiling hook used for reverse rule inference.
//!
//! [`report`]: Statement::report
//! [`result`]: Statement::result

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::core::{Evaluation, Report, StatementSpec};
use crate::error::{GuardError, Result};
use crate::sources::ScopedData;

mod not_null;
mod registry;
mod row_count;
mod unique;

pub use not_null::NotNullStatement;
pub use registry::{
    ProfileFn, StatementDescriptor, StatementFactory, StatementRegistry, RESERVED_STATEMENT_NAME,
};
pub use row_count::RowCountStatement;
pub use unique::UniqueStatement;

/// Parameters every statement spec may carry regardless of type.
pub const BASE_PARAMETERS: &[&str] = &["type", "severity", "location"];

/// A validation rule that can be evaluated against a scoped data slice.
///
/// Implementations are stateless beyond their validated options: an
/// instance is constructed for a single evaluation, used once, and
/// discarded.
///
/// # Examples
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use tabguard::core::Report;
/// use tabguard::error::Result;
/// use tabguard::sources::ScopedData;
/// use tabguard::statements::{report_u64, Statement};
///
/// #[derive(Debug)]
/// struct MinRows {
///     min: u64,
/// }
///
/// #[async_trait]
/// impl Statement for MinRows {
///     fn name(&self) -> &str {
///         "min_rows"
///     }
///
///     async fn report(&self, data: &ScopedData) -> Result<Report> {
///         let mut report = Report::new();
///         report.insert("rows".to_string(), data.row_count().await?.into());
///         Ok(report)
///     }
///
///     fn result(&self, report: &Report) -> Result<bool> {
///         Ok(report_u64(report, "rows")? >= self.min)
///     }
/// }
/// ```
#[async_trait]
pub trait Statement: Debug + Send + Sync {
    /// Returns the statement type name.
    fn name(&self) -> &str;

    /// Computes statistics over the scoped data slice.
    ///
    /// The report must contain everything [`result`](Self::result) needs;
    /// the slice itself is never shown to the decision. Must not mutate
    /// the data.
    async fn report(&self, data: &ScopedData) -> Result<Report>;

    /// Classifies a previously produced report as pass (`true`) or fail
    /// (`false`).
    ///
    /// Must be a pure function of the report: the same report map always
    /// yields the same decision. A malformed report (a missing statistic)
    /// is an error, not a failure.
    fn result(&self, report: &Report) -> Result<bool>;
}

/// The outcome of asking a statement to infer a rule from a data slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    /// A plausible statement spec inferred from the observed data
    Statement(StatementSpec),
    /// The statement cannot infer a rule for this scope; callers skip it
    Unsupported,
}

/// Runs the fixed report-then-result protocol for one statement.
///
/// Calls [`Statement::report`] exactly once, feeds the produced report to
/// [`Statement::result`] exactly once, and wraps both into an
/// [`Evaluation`]. Living outside the trait, this ordering cannot be
/// overridden by statement implementations.
#[instrument(skip(statement, data), fields(statement.name = %statement.name()))]
pub async fn evaluate(statement: &dyn Statement, data: &ScopedData) -> Result<Evaluation> {
    let detail = statement.report(data).await?;
    let result = statement.result(&detail)?;
    debug!(
        statement.name = %statement.name(),
        statement.result = result,
        "Evaluated statement"
    );
    Ok(Evaluation { detail, result })
}

/// Checks that every parameter in a spec is declared by the statement.
///
/// Valid keys are the statement's `expected` list plus the
/// [`BASE_PARAMETERS`] routing keys; anything else fails with an error
/// naming the offending keys and the statement's valid parameter list.
/// Runs before any data is touched.
pub fn validate_parameters(
    statement: &str,
    expected: &[&str],
    parameters: &Map<String, Value>,
) -> Result<()> {
    let unexpected: Vec<String> = parameters
        .keys()
        .filter(|key| {
            !expected.contains(&key.as_str()) && !BASE_PARAMETERS.contains(&key.as_str())
        })
        .cloned()
        .collect();

    if unexpected.is_empty() {
        Ok(())
    } else {
        Err(GuardError::unexpected_parameters(
            statement,
            unexpected,
            expected.iter().map(|s| s.to_string()).collect(),
        ))
    }
}

/// Reads an unsigned integer statistic out of a report.
pub fn report_u64(report: &Report, key: &str) -> Result<u64> {
    report
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            GuardError::Internal(format!("Report is missing integer statistic '{key}'"))
        })
}

/// Reads a floating-point statistic out of a report.
pub fn report_f64(report: &Report, key: &str) -> Result<f64> {
    report
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            GuardError::Internal(format!("Report is missing numeric statistic '{key}'"))
        })
}
