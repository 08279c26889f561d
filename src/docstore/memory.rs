//! In-memory document store.
//!
//! Backs the collection's tests and benches. Deterministic creation keeps a
//! `(controller, tag)` registry guarded by a write lock, so concurrent
//! callers converge on a single document per tag.

use crate::docstore::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{DocId, Document};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

struct StoredDoc {
    controller: String,
    schema: Option<DocId>,
    content: Option<Value>,
}

/// A [`DocumentStore`] holding everything in process memory.
pub struct MemoryStore {
    /// Principal new documents are created under.
    controller: String,

    /// All documents by reference.
    docs: RwLock<HashMap<DocId, StoredDoc>>,

    /// Deterministic-creation registry: (controller, tag) -> document.
    tags: RwLock<HashMap<(String, String), DocId>>,

    /// Counter mixed into freshly minted references.
    nonce: RwLock<u64>,
}

impl MemoryStore {
    /// Create an empty store authenticated as `controller`.
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            docs: RwLock::new(HashMap::new()),
            tags: RwLock::new(HashMap::new()),
            nonce: RwLock::new(0),
        }
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    fn mint_id(&self, content: &Value) -> DocId {
        let mut nonce = self.nonce.write();
        *nonce += 1;

        let mut data = Vec::new();
        data.extend_from_slice(self.controller.as_bytes());
        data.push(0);
        data.extend_from_slice(&nonce.to_le_bytes());
        data.extend_from_slice(content.to_string().as_bytes());
        DocId::digest(&data)
    }

    fn tag_id(controller: &str, tag: &str) -> DocId {
        let mut data = Vec::from(&b"tag:"[..]);
        data.extend_from_slice(controller.as_bytes());
        data.push(0);
        data.extend_from_slice(tag.as_bytes());
        DocId::digest(&data)
    }

    /// Structural validation against the referenced schema document.
    ///
    /// Only the bound the collection core relies on is enforced: a schema's
    /// `maxItems` caps the length of a `contents` array.
    fn validate(&self, content: &Value, schema: DocId) -> StoreResult<()> {
        let docs = self.docs.read();
        let schema_doc = docs.get(&schema).ok_or(StoreError::NotFound(schema))?;
        let Some(schema_content) = &schema_doc.content else {
            return Ok(());
        };

        if let Some(max) = schema_content.get("maxItems").and_then(Value::as_u64) {
            if let Some(contents) = content.get("contents").and_then(Value::as_array) {
                if contents.len() as u64 > max {
                    return Err(StoreError::Validation(format!(
                        "contents length {} exceeds maxItems {}",
                        contents.len(),
                        max
                    )));
                }
            }
        }

        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn controller(&self) -> &str {
        &self.controller
    }

    fn create(&self, content: Value, schema: Option<DocId>) -> StoreResult<Document> {
        if let Some(schema) = schema {
            self.validate(&content, schema)?;
        }

        let id = self.mint_id(&content);
        self.docs.write().insert(
            id,
            StoredDoc {
                controller: self.controller.clone(),
                schema,
                content: Some(content.clone()),
            },
        );

        Ok(Document {
            id,
            controller: self.controller.clone(),
            schema,
            content: Some(content),
        })
    }

    fn load(&self, id: DocId) -> StoreResult<Document> {
        let docs = self.docs.read();
        let doc = docs.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(Document {
            id,
            controller: doc.controller.clone(),
            schema: doc.schema,
            content: doc.content.clone(),
        })
    }

    fn update(&self, id: DocId, content: Value, schema: Option<DocId>) -> StoreResult<()> {
        let effective_schema = {
            let docs = self.docs.read();
            let doc = docs.get(&id).ok_or(StoreError::NotFound(id))?;
            schema.or(doc.schema)
        };
        if let Some(schema) = effective_schema {
            self.validate(&content, schema)?;
        }

        let mut docs = self.docs.write();
        let doc = docs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        doc.content = Some(content);
        if schema.is_some() {
            doc.schema = schema;
        }
        Ok(())
    }

    fn deterministic(&self, controller: &str, tag: &str) -> StoreResult<Document> {
        let key = (controller.to_string(), tag.to_string());

        if let Some(&id) = self.tags.read().get(&key) {
            return self.load(id);
        }

        let mut tags = self.tags.write();
        // re-check under the write lock; another caller may have won the tag
        if let Some(&id) = tags.get(&key) {
            drop(tags);
            return self.load(id);
        }

        let id = Self::tag_id(controller, tag);
        self.docs.write().insert(
            id,
            StoredDoc {
                controller: controller.to_string(),
                schema: None,
                content: None,
            },
        );
        tags.insert(key, id);

        Ok(Document {
            id,
            controller: controller.to_string(),
            schema: None,
            content: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_and_load() {
        let store = MemoryStore::new("did:key:alice");
        let doc = store.create(json!({"hello": "world"}), None).unwrap();

        let loaded = store.load(doc.id).unwrap();
        assert_eq!(loaded.controller, "did:key:alice");
        assert_eq!(loaded.content, Some(json!({"hello": "world"})));
    }

    #[test]
    fn test_load_missing() {
        let store = MemoryStore::new("did:key:alice");
        let missing = DocId::digest(b"nope");
        assert!(matches!(
            store.load(missing),
            Err(StoreError::NotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_update_replaces_content() {
        let store = MemoryStore::new("did:key:alice");
        let doc = store.create(json!({"v": 1}), None).unwrap();

        store.update(doc.id, json!({"v": 2}), None).unwrap();
        assert_eq!(store.load(doc.id).unwrap().content, Some(json!({"v": 2})));
    }

    #[test]
    fn test_deterministic_is_idempotent() {
        let store = MemoryStore::new("did:key:alice");

        let first = store.deterministic("did:key:alice", "stream/0").unwrap();
        assert_eq!(first.content, None);

        store
            .update(first.id, json!({"written": true}), None)
            .unwrap();

        // same selector returns the same document, content intact
        let again = store.deterministic("did:key:alice", "stream/0").unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.content, Some(json!({"written": true})));

        // a different tag gets a different document
        let other = store.deterministic("did:key:alice", "stream/1").unwrap();
        assert_ne!(other.id, first.id);
    }

    #[test]
    fn test_schema_max_items_enforced() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store.create(json!({"maxItems": 2}), None).unwrap();

        let ok = store
            .create(json!({"contents": ["a", "b"]}), Some(schema.id))
            .unwrap();
        assert!(store.load(ok.id).is_ok());

        let too_long = store.create(json!({"contents": ["a", "b", "c"]}), Some(schema.id));
        assert!(matches!(too_long, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_update_keeps_schema_pointer() {
        let store = MemoryStore::new("did:key:alice");
        let schema = store.create(json!({"maxItems": 1}), None).unwrap();
        let doc = store
            .create(json!({"contents": ["a"]}), Some(schema.id))
            .unwrap();

        // schema survives an update that does not re-point it
        let err = store.update(doc.id, json!({"contents": ["a", "b"]}), None);
        assert!(matches!(err, Err(StoreError::Validation(_))));
        assert_eq!(store.load(doc.id).unwrap().schema, Some(schema.id));
    }
}
