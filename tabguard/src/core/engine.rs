//! Validation engine for running documents against datasets.

use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::core::{Scope, StatementOutcome, ValidationDocument, ValidationMetrics, ValidationReport};
use crate::error::{GuardError, Result};
use crate::sources::TableSource;
use crate::statements::{self, StatementDescriptor, StatementRegistry};

/// Runs validation documents against a data source.
///
/// For each item the engine selects the scoped data slice, resolves every
/// statement spec through the registry, builds a fresh statement instance,
/// and runs the fixed report-then-result protocol. Statements are evaluated
/// independently: one failure never blocks the rest unless
/// [`with_fail_fast`](Self::with_fail_fast) opts in. Configuration errors
/// (unknown statement type, unexpected parameters, scope mismatches,
/// unknown columns) abort the run before any further data access.
///
/// Severity is carried into each outcome but never acted on here;
/// consumers of the [`ValidationReport`] decide abort-vs-warn policy.
///
/// # Examples
///
/// ```rust,ignore
/// let engine = ValidationEngine::new();
/// let report = engine.validate(&document, &source).await?;
/// if !report.passed() {
///     for failure in report.failures() {
///         eprintln!("{} failed on {}", failure.statement, failure.scope);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct ValidationEngine {
    registry: StatementRegistry,
    fail_fast: bool,
}

impl ValidationEngine {
    /// Creates an engine with the built-in statement registry.
    pub fn new() -> Self {
        Self::with_registry(StatementRegistry::builtins())
    }

    /// Creates an engine with a caller-provided registry.
    pub fn with_registry(registry: StatementRegistry) -> Self {
        Self {
            registry,
            fail_fast: false,
        }
    }

    /// Stops the run after the first failed statement when enabled.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Returns the statement registry.
    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Returns the statement registry for registering custom statements.
    pub fn registry_mut(&mut self) -> &mut StatementRegistry {
        &mut self.registry
    }

    /// Validates a document against a data source.
    ///
    /// Returns per-statement outcomes preserving the document's item order
    /// and, within an item, the declared statement order.
    #[instrument(skip(self, document, source), fields(
        document.name = %document.name,
        document.items = document.items.len()
    ))]
    pub async fn validate(
        &self,
        document: &ValidationDocument,
        source: &TableSource,
    ) -> Result<ValidationReport> {
        info!(
            document.name = %document.name,
            document.items = document.items.len(),
            "Starting validation run"
        );
        let start_time = Instant::now();

        let mut outcomes = Vec::new();
        let mut metrics = ValidationMetrics::new();

        'items: for item in &document.items {
            let slice = source.select(&item.scope)?;
            debug!(
                scope = %item.scope,
                statements = item.statements.len(),
                "Validating item"
            );

            for spec in &item.statements {
                let descriptor = self.registry.lookup(&spec.statement_type)?;
                check_scope(descriptor, &item.scope)?;
                let statement = descriptor.build(spec)?;
                let evaluation = statements::evaluate(statement.as_ref(), &slice).await?;

                metrics.total_statements += 1;
                if evaluation.result {
                    metrics.passed_statements += 1;
                    debug!(
                        statement.name = %spec.statement_type,
                        scope = %item.scope,
                        "Statement passed"
                    );
                } else {
                    metrics.failed_statements += 1;
                    warn!(
                        statement.name = %spec.statement_type,
                        scope = %item.scope,
                        statement.severity = %spec.severity,
                        "Statement failed"
                    );
                }

                let failed = !evaluation.result;
                outcomes.push(StatementOutcome {
                    scope: item.scope.clone(),
                    statement: spec.statement_type.clone(),
                    severity: spec.severity,
                    evaluation,
                });

                if failed && self.fail_fast {
                    warn!(
                        document.name = %document.name,
                        "Stopping validation run after first failure"
                    );
                    break 'items;
                }
            }
        }

        metrics.execution_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            document.name = %document.name,
            metrics.passed = metrics.passed_statements,
            metrics.failed = metrics.failed_statements,
            metrics.total = metrics.total_statements,
            metrics.duration_ms = metrics.execution_time_ms,
            metrics.success_rate = %format!("{:.2}%", metrics.success_rate()),
            "Validation run completed"
        );

        Ok(ValidationReport {
            document: document.name.clone(),
            outcomes,
            metrics,
        })
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_scope(descriptor: &StatementDescriptor, scope: &Scope) -> Result<()> {
    match (descriptor.table_only(), scope) {
        (true, Scope::Column(_)) => Err(GuardError::ScopeMismatch {
            statement: descriptor.name().to_string(),
            scope: scope.to_string(),
            reason: "statement is table-wide and requires a column-list scope".to_string(),
        }),
        (false, Scope::Table(_)) => Err(GuardError::ScopeMismatch {
            statement: descriptor.name().to_string(),
            scope: scope.to_string(),
            reason: "statement is per-column and requires a single-column scope".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    use crate::core::{Item, StatementSpec};

    fn test_source() -> TableSource {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, true)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Int64Array::from(vec![Some(1), Some(2), Some(3)]))],
        )
        .unwrap();
        TableSource::from_batches("data", schema, vec![batch]).unwrap()
    }

    #[tokio::test]
    async fn test_validate_single_statement() {
        let document = ValidationDocument::new("doc", "test")
            .with_item(Item::new("a").with_statement(StatementSpec::new("not_null")));

        let report = ValidationEngine::new()
            .validate(&document, &test_source())
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].evaluation.result);
        assert_eq!(report.metrics.total_statements, 1);
        assert_eq!(report.metrics.passed_statements, 1);
    }

    #[tokio::test]
    async fn test_unknown_statement_type_is_fatal() {
        let document = ValidationDocument::new("doc", "test")
            .with_item(Item::new("a").with_statement(StatementSpec::new("no_such_rule")));

        let err = ValidationEngine::new()
            .validate(&document, &test_source())
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::UnknownStatement { name } if name == "no_such_rule"));
    }

    #[tokio::test]
    async fn test_table_only_statement_rejects_column_scope() {
        let document = ValidationDocument::new("doc", "test")
            .with_item(Item::new("a").with_statement(StatementSpec::new("row_count")));

        let err = ValidationEngine::new()
            .validate(&document, &test_source())
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::ScopeMismatch { statement, .. } if statement == "row_count"));
    }

    #[tokio::test]
    async fn test_column_statement_rejects_table_scope() {
        let document = ValidationDocument::new("doc", "test").with_item(
            Item::new(vec!["a".to_string()]).with_statement(StatementSpec::new("not_null")),
        );

        let err = ValidationEngine::new()
            .validate(&document, &test_source())
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::ScopeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_fail_fast_stops_after_first_failure() {
        let document = ValidationDocument::new("doc", "test").with_item(
            Item::new("a")
                .with_statement(StatementSpec::new("not_null").with_parameter("threshold", 1.0))
                .with_statement(StatementSpec::new("unique")),
        );

        // Inject a duplicate-free column with a null so not_null fails first
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, true)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Int64Array::from(vec![Some(1), None, Some(3)]))],
        )
        .unwrap();
        let source = TableSource::from_batches("data", schema, vec![batch]).unwrap();

        let report = ValidationEngine::new()
            .with_fail_fast(true)
            .validate(&document, &source)
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert!(!report.outcomes[0].evaluation.result);
        assert_eq!(report.metrics.failed_statements, 1);
    }
}
