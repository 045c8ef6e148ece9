//! Integration tests for the validation engine.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use tabguard::core::{
    Item, Report, Scope, Severity, StatementSpec, ValidationDocument, ValidationEngine,
};
use tabguard::error::{GuardError, Result};
use tabguard::sources::{ScopedData, TableSource};
use tabguard::statements::{report_u64, Statement, StatementDescriptor};

/// Builds a single-batch source from named nullable Int64 columns.
fn source_from(columns: Vec<(&str, Vec<Option<i64>>)>) -> TableSource {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Int64, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(Int64Array::from(values)) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
    TableSource::from_batches("data", schema, vec![batch]).unwrap()
}

#[tokio::test]
async fn validates_not_null_from_json_document() {
    let document: ValidationDocument = serde_json::from_str(
        r#"{
            "name": "doc",
            "description": "hand written",
            "items": [
                {
                    "scope": "a",
                    "statements": [
                        {"type": "not_null", "severity": "critical"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let source = source_from(vec![("a", vec![Some(1), Some(2), Some(3)])]);
    let report = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.statement, "not_null");
    assert_eq!(outcome.scope, Scope::Column("a".to_string()));
    assert_eq!(outcome.severity, Severity::Critical);
    assert!(outcome.evaluation.result);
    assert!(report.passed());
}

#[tokio::test]
async fn injected_null_fails_not_null_but_not_row_count() {
    let document = ValidationDocument::new("doc", "test")
        .with_item(
            Item::new(vec!["a".to_string()]).with_statement(
                StatementSpec::new("row_count")
                    .with_parameter("min", 3)
                    .with_parameter("max", 3),
            ),
        )
        .with_item(Item::new("a").with_statement(StatementSpec::new("not_null")));

    let source = source_from(vec![("a", vec![Some(1), None, Some(3)])]);
    let report = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    // The null does not disturb the table-wide row count
    assert_eq!(report.outcomes[0].statement, "row_count");
    assert!(report.outcomes[0].evaluation.result);
    // But it fails the per-column completeness rule
    assert_eq!(report.outcomes[1].statement, "not_null");
    assert!(!report.outcomes[1].evaluation.result);

    assert!(!report.passed());
    assert_eq!(report.max_failed_severity(), Some(Severity::Critical));
    assert_eq!(report.metrics.total_statements, 2);
    assert_eq!(report.metrics.passed_statements, 1);
    assert_eq!(report.metrics.failed_statements, 1);
}

#[tokio::test]
async fn outcomes_preserve_item_and_statement_order() {
    let document = ValidationDocument::new("doc", "test")
        .with_item(
            Item::new("a")
                .with_statement(StatementSpec::new("unique"))
                .with_statement(StatementSpec::new("not_null")),
        )
        .with_item(
            Item::new(vec!["a".to_string(), "b".to_string()])
                .with_statement(StatementSpec::new("row_count").with_parameter("min", 1)),
        )
        .with_item(Item::new("b").with_statement(StatementSpec::new("not_null")));

    let source = source_from(vec![
        ("a", vec![Some(1), Some(2), Some(3)]),
        ("b", vec![Some(1), Some(1), None]),
    ]);
    let report = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap();

    let sequence: Vec<(String, String)> = report
        .outcomes
        .iter()
        .map(|o| (o.scope.to_string(), o.statement.clone()))
        .collect();
    assert_eq!(
        sequence,
        vec![
            ("a".to_string(), "unique".to_string()),
            ("a".to_string(), "not_null".to_string()),
            ("[a, b]".to_string(), "row_count".to_string()),
            ("b".to_string(), "not_null".to_string()),
        ]
    );
}

#[tokio::test]
async fn unknown_column_in_scope_is_fatal() {
    let document = ValidationDocument::new("doc", "test")
        .with_item(Item::new("missing").with_statement(StatementSpec::new("not_null")));

    let source = source_from(vec![("a", vec![Some(1)])]);
    let err = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap_err();
    assert!(matches!(err, GuardError::ColumnNotFound { column } if column == "missing"));
}

#[tokio::test]
async fn unexpected_parameter_is_fatal_before_data_access() {
    let document = ValidationDocument::new("doc", "test").with_item(
        Item::new("a")
            .with_statement(StatementSpec::new("not_null").with_parameter("tolerance", 0.5)),
    );

    let source = source_from(vec![("a", vec![Some(1)])]);
    let err = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap_err();
    match err {
        GuardError::UnexpectedParameters {
            statement,
            parameters,
            ..
        } => {
            assert_eq!(statement, "not_null");
            assert_eq!(parameters, vec!["tolerance".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A table-wide statement that passes when the row count is even.
#[derive(Debug)]
struct EvenRowsStatement;

impl EvenRowsStatement {
    fn from_spec(spec: &StatementSpec) -> Result<Box<dyn Statement>> {
        tabguard::statements::validate_parameters("even_rows", &[], &spec.parameters)?;
        Ok(Box::new(Self))
    }

    fn descriptor() -> StatementDescriptor {
        StatementDescriptor::new("even_rows", true, &[], Self::from_spec)
    }
}

#[async_trait]
impl Statement for EvenRowsStatement {
    fn name(&self) -> &str {
        "even_rows"
    }

    async fn report(&self, data: &ScopedData) -> Result<Report> {
        let mut report = Report::new();
        report.insert("rows".to_string(), data.row_count().await?.into());
        Ok(report)
    }

    fn result(&self, report: &Report) -> Result<bool> {
        Ok(report_u64(report, "rows")? % 2 == 0)
    }
}

#[tokio::test]
async fn custom_statement_registers_and_runs() {
    let mut engine = ValidationEngine::new();
    engine
        .registry_mut()
        .register(EvenRowsStatement::descriptor())
        .unwrap();

    let document = ValidationDocument::new("doc", "test").with_item(
        Item::new(vec!["a".to_string()]).with_statement(StatementSpec::new("even_rows")),
    );

    let source = source_from(vec![("a", vec![Some(1), Some(2), Some(3), Some(4)])]);
    let report = engine.validate(&document, &source).await.unwrap();
    assert_eq!(report.outcomes[0].statement, "even_rows");
    assert!(report.outcomes[0].evaluation.result);
}

#[tokio::test]
async fn evaluation_detail_is_serializable_evidence() {
    let document = ValidationDocument::new("doc", "test")
        .with_item(Item::new("a").with_statement(StatementSpec::new("unique")));

    let source = source_from(vec![("a", vec![Some(1), Some(1), Some(2)])]);
    let report = ValidationEngine::new()
        .validate(&document, &source)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let detail = &json["outcomes"][0]["evaluation"]["detail"];
    assert_eq!(detail["rows"], 3);
    assert_eq!(detail["distinct_rows"], 2);
    assert_eq!(json["outcomes"][0]["evaluation"]["result"], false);
}
