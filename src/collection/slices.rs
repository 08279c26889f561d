//! Slice addressing.
//!
//! The Nth slice of a collection lives at a stable, deterministic tag, so
//! creation can be delegated to the store's idempotent get-or-create
//! primitive. No locking is needed to avoid duplicate slices for an index,
//! even under concurrent callers.

use crate::collection::Collection;
use crate::error::Result;
use crate::types::{DocId, SliceContent};

/// Stable tag for the `index`th slice of a collection.
///
/// Pure function of the collection identity and the index; part of the
/// addressing contract, since every writer must derive the same tag.
pub fn slice_tag(collection: DocId, index: u64) -> String {
    format!("{}/{}", collection.to_hex(), index)
}

/// A slice document together with its parsed content.
pub(crate) struct Slice {
    pub id: DocId,
    pub index: u64,
    pub content: Option<SliceContent>,
}

impl Slice {
    /// Occupied positions, holes included.
    pub fn len(&self) -> usize {
        self.content.as_ref().map_or(0, |c| c.contents.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Collection {
    /// Resolve the slice at `index`, creating it if absent.
    ///
    /// Slices at `contents.len() == slice_max_items` are full, which the
    /// fullness invariant makes immutable, so they are served from and added
    /// to the handle's cache. The tail is always read fresh.
    pub(crate) fn slice_at(&self, index: u64, slice_max_items: usize) -> Result<Slice> {
        if let Some((id, content)) = self.full_slices.lock().get(&index) {
            return Ok(Slice {
                id: *id,
                index,
                content: Some(content.clone()),
            });
        }

        let doc = self
            .store
            .deterministic(&self.controller, &slice_tag(self.id, index))?;

        let content = match doc.content {
            Some(value) if !value.is_null() => Some(serde_json::from_value::<SliceContent>(value)?),
            _ => None,
        };

        let slice = Slice {
            id: doc.id,
            index,
            content,
        };

        if slice.len() == slice_max_items {
            if let Some(content) = &slice.content {
                self.full_slices
                    .lock()
                    .put(index, (slice.id, content.clone()));
            }
        }

        Ok(slice)
    }
}
