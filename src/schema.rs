//! Meta-schema resolution for collections.
//!
//! A collection schema advertises the slice schema it chunks into through a
//! reserved marker field: `"$comment": "slicelog:<slice schema id>"`. The
//! slice schema may in turn carry an author-configured item capacity.

use crate::docstore::DocumentStore;
use crate::error::{CollectionError, Result};
use crate::types::DocId;
use serde_json::Value;

/// Reserved marker field on a collection schema document.
pub const MARKER_FIELD: &str = "$comment";

/// Prefix identifying a collection schema's slice pointer.
pub const MARKER_PREFIX: &str = "slicelog:";

/// Resolve the slice schema a collection schema points at.
pub fn resolve_slice_schema(store: &dyn DocumentStore, schema: DocId) -> Result<DocId> {
    let doc = store.load(schema)?;

    let marker = doc
        .content
        .as_ref()
        .and_then(|c| c.get(MARKER_FIELD))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            CollectionError::Schema(format!("schema {} carries no {} marker", schema, MARKER_FIELD))
        })?;

    let rest = marker.strip_prefix(MARKER_PREFIX).ok_or_else(|| {
        CollectionError::Schema(format!(
            "marker {:?} does not start with {:?}",
            marker, MARKER_PREFIX
        ))
    })?;

    if rest.is_empty() {
        return Err(CollectionError::Schema(
            "marker carries no slice schema id".into(),
        ));
    }

    DocId::from_hex(rest)
        .map_err(|e| CollectionError::Schema(format!("invalid slice schema id {:?}: {}", rest, e)))
}

/// Read the author-configured item capacity from a slice schema, if any.
pub fn slice_capacity(store: &dyn DocumentStore, slice_schema: DocId) -> Result<Option<usize>> {
    let doc = store.load(slice_schema)?;
    Ok(doc
        .content
        .as_ref()
        .and_then(|c| c.get("maxItems"))
        .and_then(Value::as_u64)
        .map(|n| n as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstore::MemoryStore;
    use serde_json::json;

    fn marked(id: DocId) -> Value {
        json!({ MARKER_FIELD: format!("{}{}", MARKER_PREFIX, id.to_hex()) })
    }

    #[test]
    fn test_resolve_ok() {
        let store = MemoryStore::new("did:key:alice");
        let slice_schema = store.create(json!({"maxItems": 64}), None).unwrap();
        let schema = store.create(marked(slice_schema.id), None).unwrap();

        let resolved = resolve_slice_schema(&store, schema.id).unwrap();
        assert_eq!(resolved, slice_schema.id);
        assert_eq!(slice_capacity(&store, resolved).unwrap(), Some(64));
    }

    #[test]
    fn test_resolve_missing_marker() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store.create(json!({"title": "plain"}), None).unwrap();

        assert!(matches!(
            resolve_slice_schema(&store, schema.id),
            Err(CollectionError::Schema(_))
        ));
    }

    #[test]
    fn test_resolve_wrong_prefix() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store
            .create(json!({ MARKER_FIELD: "elsewhere:abc" }), None)
            .unwrap();

        assert!(matches!(
            resolve_slice_schema(&store, schema.id),
            Err(CollectionError::Schema(_))
        ));
    }

    #[test]
    fn test_resolve_empty_reference() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store
            .create(json!({ MARKER_FIELD: MARKER_PREFIX }), None)
            .unwrap();

        assert!(matches!(
            resolve_slice_schema(&store, schema.id),
            Err(CollectionError::Schema(_))
        ));
    }

    #[test]
    fn test_resolve_garbage_reference() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store
            .create(
                json!({ MARKER_FIELD: format!("{}not-hex", MARKER_PREFIX) }),
                None,
            )
            .unwrap();

        assert!(matches!(
            resolve_slice_schema(&store, schema.id),
            Err(CollectionError::Schema(_))
        ));
    }

    #[test]
    fn test_capacity_absent() {
        let store = MemoryStore::new("did:key:alice");
        let slice_schema = store.create(json!({"title": "slice"}), None).unwrap();
        assert_eq!(slice_capacity(&store, slice_schema.id).unwrap(), None);
    }
}
