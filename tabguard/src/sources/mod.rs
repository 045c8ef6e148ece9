//! Data source adapter for the tabguard validation library.
//!
//! Validation and profiling both run against an opaque columnar dataset held
//! in memory by DataFusion. [`TableSource`] wraps a registered table;
//! [`ScopedData`] is the slice of it (one column, or an ordered list of
//! columns) that a statement is evaluated against, exposing exactly the
//! statistics the built-in statements need, each computed with a SQL
//! aggregate query.

use arrow::array::Int64Array;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use datafusion::datasource::{MemTable, TableProvider};
use datafusion::prelude::SessionContext;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::Scope;
use crate::error::{GuardError, Result};
use crate::security::SqlSecurity;

/// An in-memory tabular dataset registered with a DataFusion context.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use arrow::array::Int64Array;
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use tabguard::sources::TableSource;
///
/// # fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
/// let batch = RecordBatch::try_new(
///     schema.clone(),
///     vec![Arc::new(Int64Array::from(vec![1, 2, 3]))],
/// )?;
/// let source = TableSource::from_batches("users", schema, vec![batch])?;
/// assert_eq!(source.column_names(), vec!["id".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TableSource {
    ctx: SessionContext,
    table_name: String,
    schema: SchemaRef,
}

impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSource")
            .field("table_name", &self.table_name)
            .field("schema", &self.schema)
            .finish()
    }
}

impl TableSource {
    /// Wraps a table already registered with an existing DataFusion context.
    pub async fn from_context(
        ctx: SessionContext,
        table_name: impl Into<String>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        SqlSecurity::validate_identifier(&table_name)?;
        let provider = ctx.table_provider(table_name.as_str()).await?;
        let schema = provider.schema();
        Ok(Self {
            ctx,
            table_name,
            schema,
        })
    }

    /// Registers Arrow record batches as an in-memory table and wraps them.
    pub fn from_batches(
        table_name: impl Into<String>,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        SqlSecurity::validate_identifier(&table_name)?;
        let ctx = SessionContext::new();
        let provider = MemTable::try_new(schema.clone(), vec![batches])?;
        ctx.register_table(table_name.as_str(), Arc::new(provider))?;
        Ok(Self {
            ctx,
            table_name,
            schema,
        })
    }

    /// Returns the underlying session context.
    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    /// Returns the registered table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Returns the table's column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Selects the data slice for a scope.
    ///
    /// Every scoped column must exist in the table schema; a table scope
    /// must name at least one column.
    pub fn select(&self, scope: &Scope) -> Result<ScopedData> {
        let columns = scope.columns();
        if columns.is_empty() {
            return Err(GuardError::Configuration(
                "Scope must name at least one column".to_string(),
            ));
        }
        for column in &columns {
            if self.schema.index_of(column).is_err() {
                return Err(GuardError::column_not_found(column));
            }
        }
        debug!(table = %self.table_name, scope = %scope, "Selected scoped data");
        Ok(ScopedData {
            ctx: self.ctx.clone(),
            table_name: self.table_name.clone(),
            columns,
        })
    }
}

/// A scoped, row-aligned slice of a [`TableSource`].
///
/// Statements read statistics through this adapter and never touch the
/// session context directly; every accessor is a pure aggregate query over
/// the immutable dataset.
#[derive(Clone)]
pub struct ScopedData {
    ctx: SessionContext,
    table_name: String,
    columns: Vec<String>,
}

impl fmt::Debug for ScopedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedData")
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .finish()
    }
}

impl ScopedData {
    /// Returns the scoped column names in declared order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the single scoped column, or an error for multi-column scopes.
    pub fn single_column(&self) -> Result<&str> {
        match self.columns.as_slice() {
            [column] => Ok(column),
            _ => Err(GuardError::Internal(format!(
                "Expected a single-column scope, got [{}]",
                self.columns.join(", ")
            ))),
        }
    }

    /// Counts the rows of the underlying table.
    #[instrument(skip(self), fields(table = %self.table_name))]
    pub async fn row_count(&self) -> Result<u64> {
        let table = SqlSecurity::escape_identifier(&self.table_name)?;
        self.count_query(&format!("SELECT COUNT(*) FROM {table}"))
            .await
    }

    /// Counts the non-null values of a scoped column.
    #[instrument(skip(self), fields(table = %self.table_name, column))]
    pub async fn non_null_count(&self, column: &str) -> Result<u64> {
        self.require_column(column)?;
        let table = SqlSecurity::escape_identifier(&self.table_name)?;
        let column = SqlSecurity::escape_identifier(column)?;
        self.count_query(&format!("SELECT COUNT({column}) FROM {table}"))
            .await
    }

    /// Counts the distinct non-null values of a scoped column.
    ///
    /// NULLs are excluded from the distinct count but are included in
    /// [`row_count`](Self::row_count).
    #[instrument(skip(self), fields(table = %self.table_name, column))]
    pub async fn distinct_count(&self, column: &str) -> Result<u64> {
        self.require_column(column)?;
        let table = SqlSecurity::escape_identifier(&self.table_name)?;
        let column = SqlSecurity::escape_identifier(column)?;
        self.count_query(&format!("SELECT COUNT(DISTINCT {column}) FROM {table}"))
            .await
    }

    fn require_column(&self, column: &str) -> Result<()> {
        if self.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(GuardError::column_not_found(column))
        }
    }

    async fn count_query(&self, sql: &str) -> Result<u64> {
        debug!(query = sql, "Running count query");
        let df = self.ctx.sql(sql).await?;
        let batches = df.collect().await?;

        let batch = batches
            .iter()
            .find(|batch| batch.num_rows() > 0)
            .ok_or_else(|| GuardError::Internal("Count query returned no rows".to_string()))?;

        let count = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| {
                GuardError::Internal("Count query returned a non-integer column".to_string())
            })?
            .value(0);

        Ok(count.max(0) as u64)
    }
}
