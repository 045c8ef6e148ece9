//! Row-count statement for validating table size.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::{Report, StatementSpec};
use crate::error::{GuardError, Result};
use crate::sources::ScopedData;
use crate::statements::{
    report_u64, validate_parameters, Inference, Statement, StatementDescriptor,
};

pub(crate) const NAME: &str = "row_count";
const EXPECTED_PARAMETERS: &[&str] = &["min", "max"];

#[derive(Debug, Deserialize)]
struct RowCountOptions {
    #[serde(default)]
    min: Option<u64>,
    #[serde(default)]
    max: Option<u64>,
}

/// A table-wide statement that checks the number of rows.
///
/// Both bounds are optional and inclusive; an absent bound is unchecked.
///
/// # Examples
///
/// ```rust
/// use tabguard::statements::RowCountStatement;
///
/// // At least one row
/// let statement = RowCountStatement::new(Some(1), None).unwrap();
///
/// // Exactly 1000 rows
/// let statement = RowCountStatement::new(Some(1000), Some(1000)).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RowCountStatement {
    min: Option<u64>,
    max: Option<u64>,
}

impl RowCountStatement {
    /// Creates a row-count statement with the given inclusive bounds.
    pub fn new(min: Option<u64>, max: Option<u64>) -> Result<Self> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(GuardError::Configuration(format!(
                    "'{NAME}' bounds are inverted: min {min} > max {max}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Builds an instance from a statement spec, validating its parameters.
    pub fn from_spec(spec: &StatementSpec) -> Result<Box<dyn Statement>> {
        validate_parameters(NAME, EXPECTED_PARAMETERS, &spec.parameters)?;
        let options: RowCountOptions =
            serde_json::from_value(Value::Object(spec.parameters.clone())).map_err(|e| {
                GuardError::Configuration(format!("Invalid parameters for '{NAME}': {e}"))
            })?;
        Ok(Box::new(Self::new(options.min, options.max)?))
    }

    /// Returns the registry descriptor for this statement type.
    pub fn descriptor() -> StatementDescriptor {
        StatementDescriptor::new(NAME, true, EXPECTED_PARAMETERS, Self::from_spec)
            .with_profile(profile)
    }
}

#[async_trait]
impl Statement for RowCountStatement {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip(self, data), fields(statement.min = ?self.min, statement.max = ?self.max))]
    async fn report(&self, data: &ScopedData) -> Result<Report> {
        let rows = data.row_count().await?;
        debug!(rows, "Computed row-count report");

        let mut report = Report::new();
        report.insert("rows".to_string(), rows.into());
        Ok(report)
    }

    fn result(&self, report: &Report) -> Result<bool> {
        let rows = report_u64(report, "rows")?;
        let above_min = self.min.map_or(true, |min| rows >= min);
        let below_max = self.max.map_or(true, |max| rows <= max);
        Ok(above_min && below_max)
    }
}

fn profile(data: &ScopedData) -> BoxFuture<'_, Result<Inference>> {
    Box::pin(async move {
        let rows = data.row_count().await?;
        debug!(rows, "Inferred row-count statement");
        Ok(Inference::Statement(
            StatementSpec::new(NAME)
                .with_parameter("min", rows)
                .with_parameter("max", rows),
        ))
    })
}
