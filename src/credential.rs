use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use crate::error::SeedError;
use crate::firestore::client::{FirestoreClient, FirestoreClientOptions};
use crate::firestore::DocumentStore;
use crate::ServiceAccount;

/// Turns a credential into a connected document store.
pub trait CredentialProvider {
    type Store: DocumentStore;

    /// Loads the credential and connects. Fails with
    /// [`SeedError::Credential`] if the credential cannot be loaded and with
    /// [`SeedError::Connection`] if the store cannot be reached.
    fn connect(&self) -> BoxFuture<'_, Result<Self::Store, SeedError>>;
}

/// Connects to Firestore with a service account key file.
#[derive(Debug, Clone)]
pub struct ServiceAccountFile {
    path: PathBuf,
    options: FirestoreClientOptions,
}

impl ServiceAccountFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: FirestoreClientOptions::default(),
        }
    }

    pub fn options(mut self, options: FirestoreClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for ServiceAccountFile {
    type Store = FirestoreClient;

    fn connect(&self) -> BoxFuture<'_, Result<FirestoreClient, SeedError>> {
        Box::pin(async move {
            let service_account =
                ServiceAccount::from_file(&self.path).map_err(SeedError::Credential)?;
            tracing::info!(project_id = %service_account.project_id, "Loaded service account");

            FirestoreClient::initialise(service_account, self.options.clone())
                .await
                .map_err(SeedError::Connection)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::test_helpers::TEST_RSA_KEY;

    #[tokio::test]
    async fn missing_key_file_is_a_credential_error() {
        let path = std::env::temp_dir().join(format!("no-such-key-{}.json", ulid::Ulid::new()));
        let provider = ServiceAccountFile::new(&path);

        let result = provider.connect().await;

        assert!(matches!(result, Err(SeedError::Credential(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connection_error() {
        let key_file = serde_json::json!({
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-key-id",
            "private_key": TEST_RSA_KEY,
            "client_email": "seeder@test-project.iam.gserviceaccount.com",
            "client_id": "1234567890",
        });
        let path = std::env::temp_dir().join(format!("service-account-{}.json", ulid::Ulid::new()));
        std::fs::write(&path, key_file.to_string()).unwrap();

        let provider = ServiceAccountFile::new(&path)
            .options(FirestoreClientOptions::default().host_url("http://127.0.0.1:1"));
        let result = provider.connect().await;
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(SeedError::Connection(_))));
    }

    #[test]
    fn options_are_configurable() {
        let provider = ServiceAccountFile::new("key.json")
            .options(FirestoreClientOptions::default().host_url("https://127.0.0.1:8081"));

        assert_eq!(provider.path(), Path::new("key.json"));
        assert_eq!(provider.options.host_url, "https://127.0.0.1:8081");
    }
}
