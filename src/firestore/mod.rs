//! # Firestore
//!
//! The document store layer of the seeder. The seeder only needs two
//! capabilities from a store, expressed by the [`DocumentStore`] trait:
//! replacing a whole document and reading one back.
//!
//! - [`FirestoreClient`] talks to a real Firestore database over gRPC.
//! - [`MemoryStore`] keeps documents in memory, for tests and dry runs.
//!
//! [`FirestoreClient`]: client::FirestoreClient
//! [`MemoryStore`]: memory::MemoryStore
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use services_seeder::firestore::{collection, memory::MemoryStore, DocumentStore};
//!
//! let mut store = MemoryStore::new();
//! let doc_ref = collection("shops").doc("meamore").collection("services_list").doc("en");
//! let body = serde_json::json!({ "items": [{ "key": "Haircut", "value": 1 }] });
//!
//! store.set(&doc_ref, body.as_object().unwrap()).await?;
//!
//! let stored = store.get(&doc_ref).await?.unwrap();
//! assert_eq!(stored["items"][0]["key"], "Haircut");
//! # Ok(())
//! # }
//! ```

use futures::future::BoxFuture;

use crate::error::FirebaseError;

pub mod client;
pub mod memory;
pub mod reference;
mod token_provider;
pub mod value;

/// This module isn't really supposed to be exposed, but we are lacking
/// `#[cfg(doctest)]`, and integration tests can only see public items.
///
/// Relevant rust-lang issue: <https://github.com/rust-lang/rust/issues/67295>
pub mod test_helpers;

pub use reference::collection;

use reference::DocumentReference;
use value::JsonMap;

/// The capabilities the seeder needs from a document database.
pub trait DocumentStore: Send {
    /// Writes `document` at `doc_ref`, creating it if it is absent and
    /// replacing its entire content if it exists. Fields are never merged.
    fn set<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
        document: &'a JsonMap,
    ) -> BoxFuture<'a, Result<(), FirebaseError>>;

    /// Reads the document at `doc_ref`, or `None` if it does not exist.
    fn get<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, FirebaseError>>;
}
