//! # Services seeder
//!
//! Seeds the localized services lists of the Me Amore grooming shop into
//! Firestore: one document per locale (`en`, `he`) under
//! `shops/meamore/services_list`, each written as a full overwrite.
//!
//! The pieces:
//!
//! - [`seeder::seed`] writes a [`SeedBatch`] into a collection of any
//!   [`DocumentStore`].
//! - [`firestore`] holds the store seam, the gRPC [`FirestoreClient`] and an
//!   in-memory store for tests.
//! - [`credential`] turns a service account key file into a connected client.
//! - [`services`] defines the document bodies and the bundled data.
//! - [`config`] reads the binary's settings from the environment.
//!
//! [`SeedBatch`]: seeder::SeedBatch
//! [`DocumentStore`]: firestore::DocumentStore
//! [`FirestoreClient`]: firestore::client::FirestoreClient

pub mod config;
pub mod credential;
pub mod error;
pub mod firestore;
pub mod seeder;
mod service_account;
pub mod services;

pub use service_account::ServiceAccount;
