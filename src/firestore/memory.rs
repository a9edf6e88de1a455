use std::collections::{BTreeMap, HashSet};

use anyhow::anyhow;
use futures::future::{self, BoxFuture};

use crate::error::FirebaseError;

use super::reference::DocumentReference;
use super::value::{from_fields, to_fields, Fields, JsonMap};
use super::DocumentStore;

/// An in-memory [`DocumentStore`]. Documents are kept in Firestore's field
/// representation, so reads go through the same conversion as a real
/// database.
#[derive(Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Fields>,
    failing_ids: HashSet<String>,
    write_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent write of a document with this ID fails, regardless
    /// of its collection.
    pub fn fail_writes_to(&mut self, id: impl Into<String>) {
        self.failing_ids.insert(id.into());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Paths of all stored documents, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn set<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
        document: &'a JsonMap,
    ) -> BoxFuture<'a, Result<(), FirebaseError>> {
        let result: Result<(), FirebaseError> = if self.failing_ids.contains(doc_ref.id()) {
            Err(anyhow!("write to '{doc_ref}' rejected").into())
        } else {
            self.documents
                .insert(doc_ref.to_string(), to_fields(document));
            self.write_count += 1;
            Ok(())
        };

        Box::pin(future::ready(result))
    }

    fn get<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, FirebaseError>> {
        let path = doc_ref.to_string();
        let result = match self.documents.get(&path) {
            Some(fields) => from_fields(fields.clone())
                .map(Some)
                .map_err(|source| FirebaseError::Value {
                    source,
                    document: Some(path),
                }),
            None => Ok(None),
        };

        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::firestore::collection;

    fn body(value: serde_json::Value) -> JsonMap {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn set_replaces_the_whole_document() {
        let mut store = MemoryStore::new();
        let doc_ref = collection("shops").doc("test");

        store
            .set(&doc_ref, &body(json!({ "items": [], "legacy": true })))
            .await
            .unwrap();
        store
            .set(&doc_ref, &body(json!({ "items": [{ "key": "Haircut", "value": 1 }] })))
            .await
            .unwrap();

        let stored = store.get(&doc_ref).await.unwrap().unwrap();
        assert_eq!(
            stored,
            body(json!({ "items": [{ "key": "Haircut", "value": 1 }] }))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn missing_documents_read_as_none() {
        let mut store = MemoryStore::new();

        let doc = store.get(&collection("shops").doc("nowhere")).await.unwrap();

        assert!(doc.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn injected_failures_leave_store_untouched() {
        let mut store = MemoryStore::new();
        store.fail_writes_to("he");

        let result = store
            .set(&collection("shops").doc("he"), &body(json!({ "items": [] })))
            .await;

        assert!(result.is_err());
        assert!(store.is_empty());
        assert_eq!(store.write_count(), 0);
    }
}
