//! The append engine.
//!
//! Items always land in the tail slice. When the tail is full a new slice is
//! written first and only then advertised on the root, so a torn `add` never
//! points the tail at content that was not written. The pair of growth
//! writes is not transactional; retrying `add` converges because both writes
//! are idempotent against the same addresses.

use crate::collection::Collection;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::types::{CollectionMeta, DocId, SliceContent};
use serde_json::Value;

impl Collection {
    /// Append an item, returning the cursor that locates it.
    pub fn add(&self, item: Value) -> Result<Cursor> {
        let meta = self.metadata()?;
        let tail_index = meta.slices_count - 1;
        let tail = self.slice_at(tail_index, meta.slice_max_items)?;

        let Some(mut content) = tail.content else {
            return self.write_first_item(tail.id, tail_index, item);
        };
        if content.contents.is_empty() {
            return self.write_first_item(tail.id, tail_index, item);
        }

        if content.contents.len() < meta.slice_max_items {
            let position = content.contents.len();
            content.contents.push(Some(item));
            self.store
                .update(tail.id, serde_json::to_value(&content)?, None)?;
            return Cursor::new(tail.id, position);
        }

        // tail full: write the next slice, then advertise it on the root
        tracing::debug!(
            collection = %self.id,
            next_slice = meta.slices_count,
            "tail slice full, growing collection"
        );
        let next = self.slice_at(meta.slices_count, meta.slice_max_items)?;
        let cursor = self.write_first_item(next.id, meta.slices_count, item)?;

        let grown = CollectionMeta {
            slice_max_items: meta.slice_max_items,
            slices_count: meta.slices_count + 1,
        };
        self.store
            .update(self.id, serde_json::to_value(grown)?, None)?;

        Ok(cursor)
    }

    /// First write to a slice; also attaches the back-reference, the slice's
    /// index, and the slice schema.
    fn write_first_item(&self, slice: DocId, index: u64, item: Value) -> Result<Cursor> {
        let content = SliceContent {
            collection_ref: self.id,
            slice_index: index,
            contents: vec![Some(item)],
        };
        self.store.update(
            slice,
            serde_json::to_value(&content)?,
            Some(self.slice_schema),
        )?;
        Cursor::new(slice, 0)
    }
}
