//! Statement registry mapping statement names to descriptors.

use futures::future::BoxFuture;
use std::fmt;

use crate::core::StatementSpec;
use crate::error::{GuardError, Result};
use crate::sources::ScopedData;
use crate::statements::{Inference, NotNullStatement, RowCountStatement, Statement, UniqueStatement};

/// Name reserved for the abstract statement interface itself.
///
/// Concrete statements must register under their own name; trying to take
/// the reserved name fails at registration time.
pub const RESERVED_STATEMENT_NAME: &str = "statement";

/// Builds a statement instance from a spec.
pub type StatementFactory = fn(&StatementSpec) -> Result<Box<dyn Statement>>;

/// Infers a plausible statement spec from a representative data slice.
pub type ProfileFn = for<'a> fn(&'a ScopedData) -> BoxFuture<'a, Result<Inference>>;

fn unsupported_profile(_data: &ScopedData) -> BoxFuture<'_, Result<Inference>> {
    Box::pin(async { Ok(Inference::Unsupported) })
}

/// Everything the engine and profiler need to know about one statement type.
///
/// A descriptor couples the statement's registry name with its declared
/// parameter list, its applicability flag, the factory that builds
/// instances from specs, and the optional profiling hook. Third-party
/// statements plug in by registering a descriptor; the built-in code never
/// changes.
///
/// # Examples
///
/// ```rust,ignore
/// let descriptor = StatementDescriptor::new("min_rows", true, &["min"], MinRows::from_spec);
/// registry.register(descriptor)?;
/// ```
pub struct StatementDescriptor {
    name: String,
    table_only: bool,
    expected_parameters: &'static [&'static str],
    factory: StatementFactory,
    profile: ProfileFn,
}

impl fmt::Debug for StatementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementDescriptor")
            .field("name", &self.name)
            .field("table_only", &self.table_only)
            .field("expected_parameters", &self.expected_parameters)
            .finish()
    }
}

impl StatementDescriptor {
    /// Creates a descriptor with no profiling capability.
    ///
    /// `table_only` partitions applicability: `true` means the statement is
    /// only ever evaluated with a full-table (column list) scope, `false`
    /// means only ever per single column.
    pub fn new(
        name: impl Into<String>,
        table_only: bool,
        expected_parameters: &'static [&'static str],
        factory: StatementFactory,
    ) -> Self {
        Self {
            name: name.into(),
            table_only,
            expected_parameters,
            factory,
            profile: unsupported_profile,
        }
    }

    /// Attaches a profiling hook.
    pub fn with_profile(mut self, profile: ProfileFn) -> Self {
        self.profile = profile;
        self
    }

    /// Returns the statement type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the statement only applies to full-table scopes.
    pub fn table_only(&self) -> bool {
        self.table_only
    }

    /// Returns the statement's declared parameter list.
    pub fn expected_parameters(&self) -> &'static [&'static str] {
        self.expected_parameters
    }

    /// Builds a statement instance from a spec.
    pub fn build(&self, spec: &StatementSpec) -> Result<Box<dyn Statement>> {
        (self.factory)(spec)
    }

    /// Asks the statement to infer a rule from a representative slice.
    ///
    /// [`Inference::Unsupported`] means "not applicable for this scope";
    /// callers skip the statement rather than failing.
    pub async fn profile(&self, data: &ScopedData) -> Result<Inference> {
        (self.profile)(data).await
    }
}

/// Registry of statement descriptors, iterated in registration order.
///
/// The built-ins (`not_null`, `row_count`, `unique`) come pre-registered
/// through [`builtins`](Self::builtins); additional statements register
/// without touching built-in code.
///
/// # Examples
///
/// ```rust
/// use tabguard::statements::StatementRegistry;
///
/// let registry = StatementRegistry::builtins();
/// assert!(registry.lookup("not_null").is_ok());
/// assert!(registry.lookup("no_such_rule").is_err());
/// ```
#[derive(Debug)]
pub struct StatementRegistry {
    descriptors: Vec<StatementDescriptor>,
}

impl StatementRegistry {
    /// Creates a registry with no statements.
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Creates a registry pre-loaded with the built-in statements.
    pub fn builtins() -> Self {
        let mut registry = Self::empty();
        let builtins = [
            NotNullStatement::descriptor(),
            RowCountStatement::descriptor(),
            UniqueStatement::descriptor(),
        ];
        for descriptor in builtins {
            #[allow(clippy::expect_used)]
            registry
                .register(descriptor)
                .expect("built-in statement names are unique and valid");
        }
        registry
    }

    /// Registers a statement descriptor.
    ///
    /// Fails, leaving the registry unchanged, when the name is empty,
    /// reserved, or already registered.
    pub fn register(&mut self, descriptor: StatementDescriptor) -> Result<()> {
        let name = descriptor.name();
        if name.is_empty() {
            return Err(GuardError::statement_registration(
                name,
                "statement name cannot be empty",
            ));
        }
        if name == RESERVED_STATEMENT_NAME {
            return Err(GuardError::statement_registration(
                name,
                format!("'{RESERVED_STATEMENT_NAME}' is reserved for the statement interface"),
            ));
        }
        if self.descriptors.iter().any(|d| d.name() == name) {
            return Err(GuardError::statement_registration(
                name,
                "a statement with this name is already registered",
            ));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Looks up a descriptor by statement type name.
    pub fn lookup(&self, name: &str) -> Result<&StatementDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| GuardError::unknown_statement(name))
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, StatementDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the number of registered statements.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true when no statements are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for StatementRegistry {
    fn default() -> Self {
        Self::builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_factory(_spec: &StatementSpec) -> Result<Box<dyn Statement>> {
        Err(GuardError::ReportNotImplemented {
            statement: "noop".to_string(),
        })
    }

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = StatementRegistry::builtins();
        let names: Vec<&str> = registry.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["not_null", "row_count", "unique"]);
    }

    #[test]
    fn test_builtin_table_only_flags() {
        let registry = StatementRegistry::builtins();
        assert!(!registry.lookup("not_null").unwrap().table_only());
        assert!(registry.lookup("row_count").unwrap().table_only());
        assert!(!registry.lookup("unique").unwrap().table_only());
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = StatementRegistry::builtins();
        let before = registry.len();
        let err = registry
            .register(StatementDescriptor::new("unique", false, &[], noop_factory))
            .unwrap_err();
        assert!(matches!(err, GuardError::StatementRegistration { .. }));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_register_rejects_reserved_name() {
        let mut registry = StatementRegistry::empty();
        let err = registry
            .register(StatementDescriptor::new(
                RESERVED_STATEMENT_NAME,
                false,
                &[],
                noop_factory,
            ))
            .unwrap_err();
        assert!(matches!(err, GuardError::StatementRegistration { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = StatementRegistry::empty();
        assert!(registry
            .register(StatementDescriptor::new("", false, &[], noop_factory))
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_unknown_statement() {
        let registry = StatementRegistry::builtins();
        let err = registry.lookup("no_such_rule").unwrap_err();
        assert!(matches!(err, GuardError::UnknownStatement { name } if name == "no_such_rule"));
    }

    #[tokio::test]
    async fn test_default_profile_is_unsupported() {
        let descriptor = StatementDescriptor::new("custom", false, &[], noop_factory);
        let schema = std::sync::Arc::new(arrow::datatypes::Schema::new(vec![
            arrow::datatypes::Field::new("a", arrow::datatypes::DataType::Int64, false),
        ]));
        let batch = arrow::record_batch::RecordBatch::try_new(
            schema.clone(),
            vec![std::sync::Arc::new(arrow::array::Int64Array::from(vec![1]))],
        )
        .unwrap();
        let source = crate::sources::TableSource::from_batches("data", schema, vec![batch]).unwrap();
        let slice = source.select(&crate::core::Scope::from("a")).unwrap();

        assert_eq!(
            descriptor.profile(&slice).await.unwrap(),
            Inference::Unsupported
        );
    }
}
