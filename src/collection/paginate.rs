//! The pagination engine.
//!
//! Walks slices forward or backward, stitching items across slice boundaries
//! and skipping holes. A request for `count` items reads until `count + 1`
//! are accumulated so `has_more` reflects whether the walk has further data;
//! the extra item is dropped before returning. Slice reads within one walk
//! are sequential: whether slice N+1 matters is only known once slice N's
//! length is.

use crate::collection::Collection;
use crate::cursor::Cursor;
use crate::error::{CollectionError, Result};
use crate::types::{DocId, SliceContent};
use serde_json::Value;

/// One paginated item with the cursor that locates it.
#[derive(Clone, Debug)]
pub struct Entry {
    pub cursor: Cursor,
    pub data: Value,
}

/// A page of items plus an indicator of further data in the walk direction.
#[derive(Clone, Debug)]
pub struct Page {
    pub items: Vec<Entry>,
    pub has_more: bool,
}

impl Collection {
    /// Walk forward from the start of the collection, or from just after
    /// `after`.
    ///
    /// An empty or exhausted range is not an error; it yields an empty page.
    pub fn first(&self, count: usize, after: Option<&Cursor>) -> Result<Page> {
        let meta = self.metadata()?;
        let wanted = count + 1;
        let mut entries = Vec::new();

        let mut next_index = match after {
            Some(cursor) => {
                let content = self.load_cursor_slice(cursor)?;
                collect_forward(
                    &mut entries,
                    &content,
                    cursor.slice(),
                    cursor.item_index() + 1,
                    wanted,
                )?;
                content.slice_index + 1
            }
            None => 0,
        };

        while entries.len() < wanted {
            let slice = self.slice_at(next_index, meta.slice_max_items)?;
            if slice.is_empty() {
                break;
            }
            let Some(content) = slice.content else { break };
            collect_forward(&mut entries, &content, slice.id, 0, wanted)?;
            next_index += 1;
        }

        tracing::trace!(collection = %self.id, count, found = entries.len(), "forward walk");
        Ok(finish(entries, count))
    }

    /// Walk backward from the tail of the collection, or from just before
    /// `before`. Items are emitted most-recent-first.
    pub fn last(&self, count: usize, before: Option<&Cursor>) -> Result<Page> {
        let meta = self.metadata()?;
        let wanted = count + 1;
        let mut entries = Vec::new();

        let mut next_index = match before {
            Some(cursor) => {
                let content = self.load_cursor_slice(cursor)?;
                collect_backward(
                    &mut entries,
                    &content,
                    cursor.slice(),
                    cursor.item_index(),
                    wanted,
                )?;
                match content.slice_index.checked_sub(1) {
                    Some(index) => index,
                    None => return Ok(finish(entries, count)),
                }
            }
            None => meta.slices_count - 1,
        };

        // A torn grow can advertise a tail that was never written; step past
        // it once. Every slice below the tail is full by the fullness
        // invariant, so an empty slice anywhere else ends the walk.
        let mut at_tail = before.is_none();

        while entries.len() < wanted {
            let slice = self.slice_at(next_index, meta.slice_max_items)?;
            match slice.content {
                Some(content) if !content.contents.is_empty() => {
                    collect_backward(&mut entries, &content, slice.id, content.contents.len(), wanted)?;
                    at_tail = false;
                }
                _ if at_tail && next_index > 0 => {
                    at_tail = false;
                    next_index -= 1;
                    continue;
                }
                _ => break,
            }

            match next_index.checked_sub(1) {
                Some(index) => next_index = index,
                None => break,
            }
        }

        tracing::trace!(collection = %self.id, count, found = entries.len(), "backward walk");
        Ok(finish(entries, count))
    }

    fn load_cursor_slice(&self, cursor: &Cursor) -> Result<SliceContent> {
        let doc = self.store.load(cursor.slice())?;
        let content = doc.content.filter(|v| !v.is_null()).ok_or_else(|| {
            CollectionError::CursorDecode(format!(
                "cursor references unwritten document {}",
                cursor.slice()
            ))
        })?;
        Ok(serde_json::from_value(content)?)
    }
}

/// Emit non-hole entries of `content` in index order starting at `from`,
/// stopping once `wanted` entries are held.
fn collect_forward(
    entries: &mut Vec<Entry>,
    content: &SliceContent,
    slice: DocId,
    from: usize,
    wanted: usize,
) -> Result<()> {
    for (i, slot) in content.contents.iter().enumerate().skip(from) {
        if entries.len() >= wanted {
            break;
        }
        if let Some(data) = slot {
            entries.push(Entry {
                cursor: Cursor::new(slice, i)?,
                data: data.clone(),
            });
        }
    }
    Ok(())
}

/// Emit non-hole entries scanning down from `below - 1` to 0.
fn collect_backward(
    entries: &mut Vec<Entry>,
    content: &SliceContent,
    slice: DocId,
    below: usize,
    wanted: usize,
) -> Result<()> {
    // backward scans start at the last valid index, never one past it
    let below = below.min(content.contents.len());
    for i in (0..below).rev() {
        if entries.len() >= wanted {
            break;
        }
        if let Some(data) = &content.contents[i] {
            entries.push(Entry {
                cursor: Cursor::new(slice, i)?,
                data: data.clone(),
            });
        }
    }
    Ok(())
}

fn finish(mut entries: Vec<Entry>, count: usize) -> Page {
    let has_more = entries.len() > count;
    entries.truncate(count);
    Page {
        items: entries,
        has_more,
    }
}
