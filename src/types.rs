//! Core types for the sliced collection.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque reference to a document in the backing store.
///
/// References are 32-byte content-derived identifiers. The collection core
/// never inspects their structure beyond byte-encoding them into cursors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub [u8; 32]);

impl DocId {
    /// Byte length of an encoded reference.
    pub const LEN: usize = 32;

    /// Derive a reference from raw bytes.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        DocId(hasher.finalize().into())
    }

    /// The reference's byte encoding.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decode a reference from its byte encoding.
    ///
    /// Returns `None` unless `bytes` is exactly [`DocId::LEN`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(DocId(arr))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(DocId(arr))
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// References travel as hex strings inside document content, so serde uses the
// text encoding rather than the raw byte array.
impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocId::from_hex(&s).map_err(D::Error::custom)
    }
}

/// A document as surfaced by the backing store.
///
/// `content` is `None` for documents created through the deterministic
/// primitive that have not been written yet.
#[derive(Clone, Debug)]
pub struct Document {
    pub id: DocId,
    pub controller: String,
    pub schema: Option<DocId>,
    pub content: Option<serde_json::Value>,
}

/// Root document content for a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    /// Fixed per-slice capacity, set at creation.
    pub slice_max_items: usize,

    /// Number of slices; grows monotonically, only through the append engine.
    pub slices_count: u64,
}

/// Content of a single slice document.
///
/// A `None` entry in `contents` is a hole: it is skipped during pagination
/// but still consumes its positional index.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceContent {
    /// Back-reference to the owning collection.
    pub collection_ref: DocId,

    /// Position of this slice in the collection, immutable once written.
    pub slice_index: u64,

    /// Ordered items, at most `sliceMaxItems` of them.
    pub contents: Vec<Option<serde_json::Value>>,
}
