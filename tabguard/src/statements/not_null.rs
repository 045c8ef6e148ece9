//! Non-null statement for validating column completeness.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::{Report, StatementSpec};
use crate::error::{GuardError, Result};
use crate::sources::ScopedData;
use crate::statements::{
    report_f64, validate_parameters, Inference, Statement, StatementDescriptor,
};

pub(crate) const NAME: &str = "not_null";
const EXPECTED_PARAMETERS: &[&str] = &["threshold"];

#[derive(Debug, Deserialize)]
struct NotNullOptions {
    #[serde(default = "full_threshold")]
    threshold: f64,
}

fn full_threshold() -> f64 {
    1.0
}

/// A statement that checks the non-null fraction of a single column.
///
/// `threshold` is the minimum acceptable non-null fraction, from 0.0 to
/// 1.0; the default of 1.0 forbids nulls entirely. An empty slice is
/// trivially complete.
///
/// # Examples
///
/// ```rust
/// use tabguard::statements::NotNullStatement;
///
/// // No nulls allowed
/// let statement = NotNullStatement::new(1.0).unwrap();
///
/// // Tolerate up to 5% nulls
/// let statement = NotNullStatement::new(0.95).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NotNullStatement {
    threshold: f64,
}

impl NotNullStatement {
    /// Creates a non-null statement with the given threshold.
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(GuardError::Configuration(format!(
                "'{NAME}' threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    /// Builds an instance from a statement spec, validating its parameters.
    pub fn from_spec(spec: &StatementSpec) -> Result<Box<dyn Statement>> {
        validate_parameters(NAME, EXPECTED_PARAMETERS, &spec.parameters)?;
        let options: NotNullOptions =
            serde_json::from_value(Value::Object(spec.parameters.clone())).map_err(|e| {
                GuardError::Configuration(format!("Invalid parameters for '{NAME}': {e}"))
            })?;
        Ok(Box::new(Self::new(options.threshold)?))
    }

    /// Returns the registry descriptor for this statement type.
    pub fn descriptor() -> StatementDescriptor {
        StatementDescriptor::new(NAME, false, EXPECTED_PARAMETERS, Self::from_spec)
            .with_profile(profile)
    }
}

#[async_trait]
impl Statement for NotNullStatement {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip(self, data), fields(statement.threshold = self.threshold))]
    async fn report(&self, data: &ScopedData) -> Result<Report> {
        let column = data.single_column()?;
        let rows = data.row_count().await?;
        let not_null_rows = data.non_null_count(column).await?;
        let null_rows = rows - not_null_rows;
        let fraction = if rows == 0 {
            1.0
        } else {
            not_null_rows as f64 / rows as f64
        };

        debug!(column, rows, null_rows, "Computed non-null report");

        let mut report = Report::new();
        report.insert("rows".to_string(), rows.into());
        report.insert("null_rows".to_string(), null_rows.into());
        report.insert("not_null_rows".to_string(), not_null_rows.into());
        report.insert("not_null_fraction".to_string(), fraction.into());
        Ok(report)
    }

    fn result(&self, report: &Report) -> Result<bool> {
        Ok(report_f64(report, "not_null_fraction")? >= self.threshold)
    }
}

fn profile(data: &ScopedData) -> BoxFuture<'_, Result<Inference>> {
    Box::pin(async move {
        let column = match data.single_column() {
            Ok(column) => column,
            Err(_) => return Ok(Inference::Unsupported),
        };
        let rows = data.row_count().await?;
        if rows == 0 {
            return Ok(Inference::Unsupported);
        }
        let not_null_rows = data.non_null_count(column).await?;
        let fraction = not_null_rows as f64 / rows as f64;
        // Round down: the generated rule must not claim more completeness
        // than the profiled sample shows
        let threshold = (fraction * 10_000.0).floor() / 10_000.0;

        debug!(column, threshold, "Inferred non-null statement");
        Ok(Inference::Statement(
            StatementSpec::new(NAME).with_parameter("threshold", threshold),
        ))
    })
}
