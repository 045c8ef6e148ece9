//! Profiler that infers a baseline validation document from a dataset.
//!
//! Profiling inverts validation: instead of checking statements against
//! data, each registered statement is asked what rule it would write for a
//! representative data slice. The result is a complete validation document
//! a user can review, tighten, and commit.
//!
//! Inference is best-effort discovery: a statement that cannot infer a
//! rule for a scope answers [`Inference::Unsupported`] and is skipped
//! silently, unlike validation where a missing report is a hard error.

use tracing::{debug, info, instrument};

use crate::core::{Item, Scope, ValidationDocument};
use crate::error::Result;
use crate::sources::TableSource;
use crate::statements::{Inference, StatementRegistry};
use crate::storage::DocumentStore;

/// Generates baseline validation documents by profiling datasets.
///
/// The scope list is the full table first (for table-wide statements such
/// as `row_count`), then one single-column scope per column in schema
/// order (for per-column statements such as `not_null` and `unique`).
/// Statements are tried in registry order, so the generated document is
/// deterministic for a given dataset and registry.
///
/// # Examples
///
/// ```rust,ignore
/// let profiler = Profiler::new();
/// let document = profiler.profile(&source, "orders_baseline").await?;
/// store.write_document(&document, "orders_baseline.json")?;
/// ```
#[derive(Debug)]
pub struct Profiler {
    registry: StatementRegistry,
}

impl Profiler {
    /// Creates a profiler with the built-in statement registry.
    pub fn new() -> Self {
        Self::with_registry(StatementRegistry::builtins())
    }

    /// Creates a profiler with a caller-provided registry.
    pub fn with_registry(registry: StatementRegistry) -> Self {
        Self { registry }
    }

    /// Returns the statement registry.
    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Returns the statement registry for registering custom statements.
    pub fn registry_mut(&mut self) -> &mut StatementRegistry {
        &mut self.registry
    }

    /// Profiles a dataset into a validation document.
    #[instrument(skip(self, source), fields(document.name = %document_name))]
    pub async fn profile(
        &self,
        source: &TableSource,
        document_name: &str,
    ) -> Result<ValidationDocument> {
        let columns = source.column_names();
        info!(
            document.name = %document_name,
            table = %source.table_name(),
            columns = columns.len(),
            "Profiling dataset"
        );

        let mut scopes = Vec::with_capacity(columns.len() + 1);
        scopes.push((Scope::Table(columns.clone()), true));
        for column in &columns {
            scopes.push((Scope::Column(column.clone()), false));
        }

        let mut items = Vec::with_capacity(scopes.len());
        for (scope, table_only) in scopes {
            let slice = source.select(&scope)?;
            let mut item = Item::new(scope.clone());

            for descriptor in self.registry.iter().filter(|d| d.table_only() == table_only) {
                match descriptor.profile(&slice).await? {
                    Inference::Statement(spec) => {
                        debug!(
                            statement.name = descriptor.name(),
                            scope = %scope,
                            "Inferred statement"
                        );
                        item.statements.push(spec);
                    }
                    Inference::Unsupported => {
                        debug!(
                            statement.name = descriptor.name(),
                            scope = %scope,
                            "Statement does not profile this scope"
                        );
                    }
                }
            }

            items.push(item);
        }

        let statements: usize = items.iter().map(|item| item.statements.len()).sum();
        info!(
            document.name = %document_name,
            items = items.len(),
            statements,
            "Profiling completed"
        );

        Ok(ValidationDocument {
            name: document_name.to_string(),
            description: format!(
                "Auto generated using {} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            items,
        })
    }

    /// Profiles a dataset and persists the document through a store.
    #[instrument(skip(self, source, store), fields(document.name = %document_name, destination))]
    pub async fn profile_and_store(
        &self,
        source: &TableSource,
        document_name: &str,
        store: &dyn DocumentStore,
        destination: &str,
    ) -> Result<ValidationDocument> {
        let document = self.profile(source, document_name).await?;
        store.write_document(&document, destination)?;
        info!(destination, "Stored profiled validation document");
        Ok(document)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
