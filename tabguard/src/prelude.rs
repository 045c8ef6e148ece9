//! Prelude for commonly used types and traits in tabguard.

pub use crate::core::{
    Evaluation, Item, Report, Scope, Severity, StatementOutcome, StatementSpec,
    ValidationDocument, ValidationEngine, ValidationMetrics, ValidationReport,
};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::logging::LogConfig;
pub use crate::profiler::Profiler;
pub use crate::sources::{ScopedData, TableSource};
pub use crate::statements::{
    Inference, Statement, StatementDescriptor, StatementRegistry,
};
pub use crate::storage::{DocumentStore, LocalDocumentStore};
