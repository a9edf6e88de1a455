//! The document seeder: writes a fixed batch of documents into one
//! collection, replacing whatever was stored under the same IDs.

use serde::Serialize;

use crate::credential::CredentialProvider;
use crate::error::SeedError;
use crate::firestore::reference::{validate_segment, CollectionReference};
use crate::firestore::value::to_json_map;
use crate::firestore::DocumentStore;

/// Documents to seed, keyed by document ID. Iteration follows insertion
/// order and IDs are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedBatch<T> {
    documents: Vec<(String, T)>,
}

impl<T> Default for SeedBatch<T> {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
        }
    }
}

impl<T> SeedBatch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document. Fails if a document with the same ID is already in
    /// the batch.
    pub fn insert(&mut self, id: impl Into<String>, body: T) -> Result<(), SeedError> {
        let id = id.into();
        if self.documents.iter().any(|(existing, _)| *existing == id) {
            return Err(SeedError::InvalidInput(format!(
                "document '{id}' appears more than once"
            )));
        }
        self.documents.push((id, body));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, body: T) -> Result<Self, SeedError> {
        self.insert(id, body)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.documents
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, body)| body)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.documents.iter().map(|(id, body)| (id.as_str(), body))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Writes every document of the batch into `collection_path`, each as a full
/// overwrite of `collection_path/<id>`, and returns how many were written.
///
/// All input is validated before the first write: the collection path must
/// be a valid collection, the batch must not be empty, every ID must be a
/// valid document ID and every body must serialize to a JSON object. Writes
/// then happen in batch order and the first failing write aborts the run
/// with [`SeedError::Write`]; documents written before it stay written.
///
/// # Examples
///
/// ```
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use services_seeder::{
///     firestore::{collection, memory::MemoryStore, DocumentStore},
///     seeder::{seed, SeedBatch},
///     services::{ServiceItem, ServicesList},
/// };
///
/// let mut store = MemoryStore::new();
/// let documents = SeedBatch::new().with(
///     "en",
///     ServicesList {
///         items: vec![ServiceItem::new("Haircut", 1)],
///     },
/// )?;
///
/// let written = seed(&mut store, "shops/test/services_list", &documents).await?;
/// assert_eq!(written, 1);
///
/// let doc_ref = collection("shops").doc("test").collection("services_list").doc("en");
/// let stored = store.get(&doc_ref).await?.unwrap();
/// assert_eq!(
///     serde_json::Value::Object(stored),
///     serde_json::json!({ "items": [{ "key": "Haircut", "value": 1 }] })
/// );
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(name = "Seed documents", skip_all, fields(collection = %collection_path))]
pub async fn seed<S, T>(
    store: &mut S,
    collection_path: &str,
    documents: &SeedBatch<T>,
) -> Result<usize, SeedError>
where
    S: DocumentStore + ?Sized,
    T: Serialize,
{
    let collection_ref = CollectionReference::try_from(collection_path)
        .map_err(|e| SeedError::InvalidInput(e.to_string()))?;

    if documents.is_empty() {
        return Err(SeedError::InvalidInput("no documents to seed".to_string()));
    }

    let prepared = documents
        .iter()
        .map(|(id, body)| {
            validate_segment(id)
                .map_err(|reason| SeedError::InvalidInput(format!("document ID: {reason}")))?;
            let fields = to_json_map(body)
                .map_err(|e| SeedError::InvalidInput(format!("document '{id}': {e}")))?;
            Ok((collection_ref.doc(id), fields))
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    for (doc_ref, fields) in &prepared {
        tracing::debug!(document = %doc_ref, "Writing document");
        store
            .set(doc_ref, fields)
            .await
            .map_err(|source| SeedError::Write {
                id: doc_ref.id().to_string(),
                source,
            })?;
    }

    tracing::info!(count = prepared.len(), "Seeded documents");
    Ok(prepared.len())
}

/// Connects through `provider` and seeds the batch. Nothing is written if
/// the provider cannot produce a store.
pub async fn run<P, T>(
    provider: &P,
    collection_path: &str,
    documents: &SeedBatch<T>,
) -> Result<usize, SeedError>
where
    P: CredentialProvider + ?Sized,
    T: Serialize,
{
    let mut store = provider.connect().await?;
    seed(&mut store, collection_path, documents).await
}

/// The line printed after a successful run, for example
/// `Done. Wrote shops/meamore/services_list/en and shops/meamore/services_list/he`.
pub fn confirmation_line<I, S>(collection_path: &str, ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let collection_path = collection_path.trim_matches('/');
    let paths: Vec<String> = ids
        .into_iter()
        .map(|id| format!("{collection_path}/{}", id.as_ref()))
        .collect();

    let listed = match paths.split_last() {
        None => "nothing".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    };

    format!("Done. Wrote {listed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_rejects_duplicate_ids() {
        let mut batch = SeedBatch::new();
        batch.insert("en", 1).unwrap();

        let err = batch.insert("en", 2).unwrap_err();

        assert!(matches!(err, SeedError::InvalidInput(_)));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get("en"), Some(&1));
    }

    #[test]
    fn batch_keeps_insertion_order() {
        let batch = SeedBatch::new()
            .with("he", ())
            .and_then(|b| b.with("en", ()))
            .unwrap();

        assert_eq!(batch.ids().collect::<Vec<_>>(), ["he", "en"]);
    }

    #[test]
    fn confirmation_for_two_locales() {
        assert_eq!(
            confirmation_line("shops/meamore/services_list", ["en", "he"]),
            "Done. Wrote shops/meamore/services_list/en and shops/meamore/services_list/he"
        );
    }

    #[test]
    fn confirmation_for_one_and_many() {
        assert_eq!(
            confirmation_line("shops/test/services_list/", ["en"]),
            "Done. Wrote shops/test/services_list/en"
        );
        assert_eq!(
            confirmation_line("c", ["a", "b", "d"]),
            "Done. Wrote c/a, c/b and c/d"
        );
    }
}
