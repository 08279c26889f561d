//! The backing document store interface.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::types::{DocId, Document};
use serde_json::Value;

/// An immutable-document store the collection is built on.
///
/// The collection delegates all coordination to two primitives here:
/// idempotent deterministic creation (at most one winner per tag) and
/// last-write-wins update. Schema validation, if any, happens behind
/// `create`/`update`; the collection engines never validate payloads.
pub trait DocumentStore: Send + Sync {
    /// The authenticated principal new documents are created under.
    fn controller(&self) -> &str;

    /// Create a new document with the given content.
    fn create(&self, content: Value, schema: Option<DocId>) -> StoreResult<Document>;

    /// Load a document by reference.
    fn load(&self, id: DocId) -> StoreResult<Document>;

    /// Replace a document's content; a `Some` schema also re-points the
    /// document's schema reference.
    fn update(&self, id: DocId, content: Value, schema: Option<DocId>) -> StoreResult<()>;

    /// Idempotent get-or-create keyed by `(controller, tag)`.
    ///
    /// A document created this way starts with unset content; concurrent
    /// callers with the same selector converge on the same document.
    fn deterministic(&self, controller: &str, tag: &str) -> StoreResult<Document>;
}
