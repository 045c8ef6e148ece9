//! Document persistence collaborator.
//!
//! Validation documents travel as pretty-printed JSON so generated
//! baselines stay human-diffable in code review. The store is a thin
//! collaborator boundary: the profiler writes through it when given a save
//! target, and callers load hand-written documents through it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tracing::{debug, instrument};

use crate::core::ValidationDocument;
use crate::error::{GuardError, Result};

/// Reads and writes validation documents at string-addressed destinations.
pub trait DocumentStore: Send + Sync {
    /// Writes a document to the destination.
    fn write_document(&self, document: &ValidationDocument, destination: &str) -> Result<()>;

    /// Reads a document from the source.
    fn read_document(&self, source: &str) -> Result<ValidationDocument>;
}

/// A [`DocumentStore`] backed by the local filesystem.
///
/// # Examples
///
/// ```rust,ignore
/// let store = LocalDocumentStore::new();
/// store.write_document(&document, "checks/orders.json")?;
/// let loaded = store.read_document("checks/orders.json")?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDocumentStore;

impl LocalDocumentStore {
    /// Creates a local filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for LocalDocumentStore {
    #[instrument(skip(self, document), fields(document.name = %document.name, destination))]
    fn write_document(&self, document: &ValidationDocument, destination: &str) -> Result<()> {
        let file = File::create(destination)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)
            .map_err(|e| GuardError::Serialization(e.to_string()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!(destination, "Wrote validation document");
        Ok(())
    }

    #[instrument(skip(self), fields(source))]
    fn read_document(&self, source: &str) -> Result<ValidationDocument> {
        let file = File::open(source)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| GuardError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::core::{Item, StatementSpec};

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let path = path.to_str().unwrap();

        let document = ValidationDocument::new("orders", "hand written").with_item(
            Item::new("order_id")
                .with_statement(StatementSpec::new("not_null").with_parameter("threshold", 0.99)),
        );

        let store = LocalDocumentStore::new();
        store.write_document(&document, path).unwrap();
        let loaded = store.read_document(path).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn test_written_document_is_indented() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let path = path.to_str().unwrap();

        let document = ValidationDocument::new("orders", "hand written");
        LocalDocumentStore::new()
            .write_document(&document, path)
            .unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\n  \"name\""));
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = LocalDocumentStore::new()
            .read_document("/no/such/path.json")
            .unwrap_err();
        assert!(matches!(err, GuardError::Io(_)));
    }
}
