//! Core validation types for the tabguard data quality library.
//!
//! This module provides the fundamental types for declaring and executing
//! validations: the document model, severities, the evaluation result
//! types, and the engine that drives a document against a dataset.
//!
//! ## Overview
//!
//! - **[`ValidationDocument`]**: an ordered list of scoped statement groups
//! - **[`Item`]**: one [`Scope`] paired with the statements to run there
//! - **[`StatementSpec`]**: one declarative statement entry (`type`,
//!   `severity`, `location`, plus statement-specific parameters)
//! - **[`Severity`]**: metadata consumers use to decide abort-vs-warn
//! - **[`ValidationEngine`]**: executes documents, producing a
//!   [`ValidationReport`] of ordered [`StatementOutcome`]s
//!
//! ## Architecture
//!
//! ```text
//! ValidationDocument
//!     ├── Item (scope: ["a", "b"])
//!     │   └── StatementSpec (type: row_count)
//!     └── Item (scope: "a")
//!         ├── StatementSpec (type: not_null)
//!         └── StatementSpec (type: unique)
//! ```

mod document;
mod engine;
mod result;
mod severity;

pub use document::{Item, Scope, StatementSpec, ValidationDocument};
pub use engine::ValidationEngine;
pub use result::{Evaluation, Report, StatementOutcome, ValidationMetrics, ValidationReport};
pub use severity::Severity;
