//! Pagination cursors.
//!
//! A cursor locates one item by (slice reference, intra-slice offset). The
//! backing store addresses whole documents, so the single trailing offset
//! byte is what makes a slice-chunked collection paginable with store-level
//! addressing alone; it also bounds slice capacity to 256 items.

use crate::error::{CollectionError, Result};
use crate::types::DocId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;

/// An opaque pagination token.
///
/// Binary form: the slice reference's bytes followed by one offset byte.
/// Text form: base64url (unpadded) of the binary form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    slice: DocId,
    item_index: u8,
}

impl Cursor {
    /// Build a cursor for the item at `item_index` inside `slice`.
    pub fn new(slice: DocId, item_index: usize) -> Result<Self> {
        if item_index > u8::MAX as usize {
            return Err(CollectionError::CursorRange(item_index));
        }
        Ok(Self {
            slice,
            item_index: item_index as u8,
        })
    }

    /// The slice document this cursor points into.
    pub fn slice(&self) -> DocId {
        self.slice
    }

    /// The item's offset inside the slice's contents.
    pub fn item_index(&self) -> usize {
        self.item_index as usize
    }

    /// Encode to the binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(DocId::LEN + 1);
        bytes.extend_from_slice(self.slice.as_bytes());
        bytes.push(self.item_index);
        bytes
    }

    /// Decode from the binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (last, prefix) = bytes
            .split_last()
            .ok_or_else(|| CollectionError::CursorDecode("empty cursor".into()))?;
        let slice = DocId::from_bytes(prefix).ok_or_else(|| {
            CollectionError::CursorDecode(format!(
                "invalid slice reference ({} bytes)",
                prefix.len()
            ))
        })?;
        Ok(Self {
            slice,
            item_index: *last,
        })
    }

    /// Encode to the text form.
    pub fn to_text(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decode from the text form.
    pub fn from_text(text: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(text)
            .map_err(|e| CollectionError::CursorDecode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cursor({}...@{})",
            &self.slice.to_hex()[..8],
            self.item_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_roundtrip() {
        let slice = DocId::digest(b"slice");
        let cursor = Cursor::new(slice, 17).unwrap();

        let bytes = cursor.to_bytes();
        assert_eq!(bytes.len(), DocId::LEN + 1);
        assert_eq!(Cursor::from_bytes(&bytes).unwrap(), cursor);
        assert_eq!(Cursor::from_text(&cursor.to_text()).unwrap(), cursor);
    }

    #[test]
    fn test_index_out_of_range() {
        let slice = DocId::digest(b"slice");
        assert!(Cursor::new(slice, 255).is_ok());
        assert!(matches!(
            Cursor::new(slice, 256),
            Err(CollectionError::CursorRange(256))
        ));
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(
            Cursor::from_bytes(&[]),
            Err(CollectionError::CursorDecode(_))
        ));
    }

    #[test]
    fn test_decode_bad_prefix() {
        // one byte short of a full reference plus the offset byte
        let bytes = vec![0u8; DocId::LEN];
        assert!(matches!(
            Cursor::from_bytes(&bytes),
            Err(CollectionError::CursorDecode(_))
        ));
    }

    #[test]
    fn test_decode_bad_text() {
        assert!(matches!(
            Cursor::from_text("not base64url!!"),
            Err(CollectionError::CursorDecode(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_roundtrip(bytes in prop::array::uniform32(any::<u8>()), index in 0usize..=255) {
            let cursor = Cursor::new(DocId(bytes), index).unwrap();
            prop_assert_eq!(Cursor::from_bytes(&cursor.to_bytes()).unwrap(), cursor);
            prop_assert_eq!(Cursor::from_text(&cursor.to_text()).unwrap(), cursor);
        }
    }
}
