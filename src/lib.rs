//! # slicelog
//!
//! A paginated, append-only collection chunked into fixed-capacity slices,
//! built on top of an external immutable-document store.
//!
//! ## Core Concepts
//!
//! - **Slices**: fixed-capacity chunks of the collection, one document each;
//!   only the tail slice ever accepts appends
//! - **Cursors**: compact binary tokens locating one item by
//!   (slice reference, intra-slice offset)
//! - **Deterministic creation**: slices live at stable tags, so creation is
//!   idempotent and concurrent callers converge on one document per index
//! - **Pagination**: forward and backward walks that stitch items across
//!   slice boundaries and skip holes
//!
//! ## Example
//!
//! ```ignore
//! use slicelog::{Collection, CreateOptions, MemoryStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new("did:key:alice"));
//! let collection = Collection::create(store, schema_id, CreateOptions::default())?;
//!
//! // Append an item; the cursor pins its exact position
//! let cursor = collection.add(serde_json::json!({"text": "hello"}))?;
//!
//! // Page forward from the start
//! let page = collection.first(20, None)?;
//! assert!(!page.has_more);
//!
//! // Resume after a cursor round-tripped through text
//! let token = cursor.to_text();
//! let page = collection.first(20, Some(&slicelog::Cursor::from_text(&token)?))?;
//! ```

pub mod collection;
pub mod cursor;
pub mod docstore;
pub mod error;
pub mod schema;
pub mod types;

// Re-exports
pub use collection::{
    slice_tag, Collection, CreateOptions, Entry, Page, DEFAULT_SLICE_ITEMS, MAX_SLICE_ITEMS,
    MIN_SLICE_ITEMS,
};
pub use cursor::Cursor;
pub use docstore::{DocumentStore, MemoryStore};
pub use error::{CollectionError, Result, StoreError, StoreResult};
pub use types::{CollectionMeta, DocId, Document, SliceContent};
