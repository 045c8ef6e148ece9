//! # tabguard - Declarative Data Validation for Rust
//!
//! tabguard validates tabular datasets against declarative validation
//! documents and can generate a baseline document by profiling an existing
//! dataset. It leverages DataFusion for efficient statistics queries and
//! includes structured logging through the `tracing` crate.
//!
//! ## Overview
//!
//! A validation document pairs scopes (a single column, or a list of
//! columns for table-wide rules) with statements to evaluate there. Each
//! statement runs a fixed two-phase protocol: it computes a report of
//! statistics over the scoped data, then derives a pass/fail decision from
//! that report alone, so every decision ships with serializable evidence.
//! The same statements can run in reverse: given a representative dataset,
//! the profiler asks each statement to infer a plausible rule, producing a
//! baseline document you can review and commit.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arrow::array::Int64Array;
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use tabguard::core::{Item, StatementSpec, ValidationDocument, ValidationEngine};
//! use tabguard::sources::TableSource;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! // Declare what must hold for the dataset
//! let document = ValidationDocument::new("orders", "critical order checks")
//!     .with_item(
//!         Item::new(vec!["order_id".to_string(), "amount".to_string()])
//!             .with_statement(StatementSpec::new("row_count").with_parameter("min", 1)),
//!     )
//!     .with_item(
//!         Item::new("order_id")
//!             .with_statement(StatementSpec::new("not_null"))
//!             .with_statement(StatementSpec::new("unique")),
//!     );
//!
//! // Wrap the dataset
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("order_id", DataType::Int64, false),
//!     Field::new("amount", DataType::Int64, true),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema.clone(),
//!     vec![
//!         Arc::new(Int64Array::from(vec![1, 2, 3])),
//!         Arc::new(Int64Array::from(vec![Some(10), None, Some(30)])),
//!     ],
//! )?;
//! let source = TableSource::from_batches("orders", schema, vec![batch])?;
//!
//! // Run the document against the data
//! let report = ValidationEngine::new().validate(&document, &source).await?;
//! assert!(report.passed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Profiling
//!
//! Profiling inverts validation to bootstrap a rule document from data you
//! already trust:
//!
//! ```rust
//! use tabguard::profiler::Profiler;
//! use tabguard::sources::TableSource;
//! use tabguard::storage::{DocumentStore, LocalDocumentStore};
//!
//! # async fn example(source: TableSource) -> tabguard::error::Result<()> {
//! let profiler = Profiler::new();
//! let document = profiler.profile(&source, "orders_baseline").await?;
//!
//! // Or persist the generated document as human-diffable JSON
//! let store = LocalDocumentStore::new();
//! profiler
//!     .profile_and_store(&source, "orders_baseline", &store, "orders_baseline.json")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Built-in Statements
//!
//! - **`not_null`** (per column): non-null fraction must reach `threshold`
//! - **`unique`** (per column): distinct fraction must reach `threshold`
//! - **`row_count`** (table-wide): row count within optional `min`/`max`
//!
//! Third-party statements implement the
//! [`Statement`](crate::statements::Statement) trait and register a
//! [`StatementDescriptor`](crate::statements::StatementDescriptor) without
//! touching built-in code.
//!
//! ## Architecture
//!
//! - **`core`**: document model, severities, outcomes, and the
//!   [`ValidationEngine`](crate::core::ValidationEngine)
//! - **`statements`**: the statement trait, registry, and built-ins
//! - **`sources`**: the data source adapter over DataFusion
//! - **`profiler`**: reverse rule inference
//! - **`storage`**: the document persistence collaborator
//! - **`error`** / **`logging`** / **`security`**: error taxonomy,
//!   logging configuration, SQL identifier hygiene

pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod profiler;
pub mod security;
pub mod sources;
pub mod statements;
pub mod storage;
