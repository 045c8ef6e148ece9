//! Uniqueness statement for validating distinct values in a column.

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

pub(crate) const NAME: &str = "unique";
const EXPECTED_PARAMETERS: &[&str] = &["threshold"];

#[derive(Debug, Deserialize)]
struct UniqueOptions {
    #[serde(default = "full_threshold")]
    threshold: f64,
}

fn full_threshold() -> f64 {
    1.0
}

/// A statement that checks the distinct fraction of a single column.
///
/// The distinct fraction is `COUNT(DISTINCT column) / COUNT(*)`; NULLs do
/// not count as distinct values but do count as rows. `threshold` is the
/// minimum acceptable fraction, default 1.0 (every row distinct). An empty
/// slice is trivially unique.
///
/// # Examples
///
/// ```rust
/// use tabguard::statements::UniqueStatement;
///
/// // Primary-key style uniqueness
/// let statement = UniqueStatement::new(1.0).unwrap();
///
/// // Allow a small number of duplicates
/// let statement = UniqueStatement::new(0.99).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct UniqueStatement {
    threshold: f64,
}

impl UniqueStatement {
    /// Creates a uniqueness statement with the given threshold.
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
        let options: UniqueOptions =
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
impl Statement for UniqueStatement {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip(self, data), fields(statement.threshold = self.threshold))]
    async fn report(&self, data: &ScopedData) -> Result<Report> {
        let column = data.single_column()?;
        let rows = data.row_count().await?;
        let distinct_rows = data.distinct_count(column).await?;
        let fraction = if rows == 0 {
            1.0
        } else {
            distinct_rows as f64 / rows as f64
        };

        debug!(column, rows, distinct_rows, "Computed uniqueness report");

        let mut report = Report::new();
        report.insert("rows".to_string(), rows.into());
        report.insert("distinct_rows".to_string(), distinct_rows.into());
        report.insert("unique_fraction".to_string(), fraction.into());
        Ok(report)
    }

    fn result(&self, report: &Report) -> Result<bool> {
        Ok(report_f64(report, "unique_fraction")? >= self.threshold)
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
        let distinct_rows = data.distinct_count(column).await?;
        // Only a fully distinct column yields a plausible uniqueness rule;
        // codifying a partial ratio would just bake in today's noise
        if distinct_rows < rows {
            return Ok(Inference::Unsupported);
        }

        debug!(column, "Inferred uniqueness statement");
        Ok(Inference::Statement(
            StatementSpec::new(NAME).with_parameter("threshold", 1.0),
        ))
    })
}
