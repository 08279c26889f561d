//! Collection handles: bootstrap, metadata, and the append/pagination engines.

mod append;
mod paginate;
mod slices;

pub use paginate::{Entry, Page};
pub use slices::slice_tag;

use crate::docstore::DocumentStore;
use crate::error::{CollectionError, Result};
use crate::schema;
use crate::types::{CollectionMeta, DocId, SliceContent};
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Smallest allowed slice capacity.
pub const MIN_SLICE_ITEMS: usize = 10;

/// Largest allowed slice capacity; cursor offsets are a single byte.
pub const MAX_SLICE_ITEMS: usize = 256;

/// Capacity used when neither the caller nor the slice schema sets one.
pub const DEFAULT_SLICE_ITEMS: usize = 50;

/// Options for creating a collection.
#[derive(Debug, Default)]
pub struct CreateOptions {
    /// First item to append right after bootstrap.
    pub item: Option<Value>,

    /// Explicit slice capacity; must lie in
    /// [`MIN_SLICE_ITEMS`]..=[`MAX_SLICE_ITEMS`].
    pub slice_max_items: Option<usize>,
}

/// Handle to a paginated, append-only collection.
///
/// A collection is a root document describing `{sliceMaxItems, slicesCount}`
/// plus lazily created slice documents holding the items. All item access
/// goes through [`add`](Collection::add), [`first`](Collection::first) and
/// [`last`](Collection::last); callers never touch slices directly.
pub struct Collection {
    /// Backing store.
    store: Arc<dyn DocumentStore>,

    /// Root document reference.
    id: DocId,

    /// Owning principal; slice addressing runs under this identity.
    controller: String,

    /// Schema every slice document is written under.
    slice_schema: DocId,

    /// Cache of full slices, which the fullness invariant makes immutable.
    full_slices: Mutex<LruCache<u64, (DocId, SliceContent)>>,
}

impl Collection {
    /// Full slices kept in memory per handle.
    const SLICE_CACHE_SIZE: usize = 32;

    /// Create a new collection conforming to `schema`.
    pub fn create(
        store: Arc<dyn DocumentStore>,
        schema: DocId,
        options: CreateOptions,
    ) -> Result<Self> {
        let slice_schema = schema::resolve_slice_schema(store.as_ref(), schema)?;
        let schema_capacity = schema::slice_capacity(store.as_ref(), slice_schema)?;

        let slice_max_items = match options.slice_max_items {
            Some(n) if (MIN_SLICE_ITEMS..=MAX_SLICE_ITEMS).contains(&n) => n,
            Some(n) => return Err(CollectionError::Capacity(n)),
            None => schema_capacity
                .map(|n| n.clamp(MIN_SLICE_ITEMS, MAX_SLICE_ITEMS))
                .unwrap_or(DEFAULT_SLICE_ITEMS),
        };

        let meta = CollectionMeta {
            slice_max_items,
            slices_count: 1,
        };
        let doc = store.create(serde_json::to_value(meta)?, Some(schema))?;
        tracing::debug!(collection = %doc.id, slice_max_items, "created collection");

        let collection = Self {
            store,
            id: doc.id,
            controller: doc.controller,
            slice_schema,
            full_slices: Self::new_cache(),
        };

        if let Some(item) = options.item {
            collection.add(item)?;
        }

        Ok(collection)
    }

    /// Load an existing collection by its root reference.
    pub fn load(store: Arc<dyn DocumentStore>, id: DocId) -> Result<Self> {
        let doc = store.load(id)?;
        let schema = doc.schema.ok_or_else(|| {
            CollectionError::InvalidCollection(format!("document {} has no schema pointer", id))
        })?;
        let slice_schema = schema::resolve_slice_schema(store.as_ref(), schema)?;

        Ok(Self {
            store,
            id,
            controller: doc.controller,
            slice_schema,
            full_slices: Self::new_cache(),
        })
    }

    /// The root document reference.
    pub fn id(&self) -> DocId {
        self.id
    }

    /// The owning principal.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Fresh read of the root descriptor.
    pub fn metadata(&self) -> Result<CollectionMeta> {
        let doc = self.store.load(self.id)?;
        let content = doc.content.ok_or_else(|| {
            CollectionError::InvalidCollection(format!("collection {} has no content", self.id))
        })?;
        Ok(serde_json::from_value(content)?)
    }

    fn new_cache() -> Mutex<LruCache<u64, (DocId, SliceContent)>> {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(Self::SLICE_CACHE_SIZE).unwrap(),
        ))
    }
}
