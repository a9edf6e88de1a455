//! Runtime settings of the seeder binary, read from the environment.

use std::{env, path::PathBuf};

use crate::{
    credential::ServiceAccountFile,
    error::SeedError,
    firestore::client::FirestoreClientOptions,
    seeder::SeedBatch,
    services::{self, ServicesList},
};

pub const DEFAULT_CREDENTIALS_PATH: &str = "./service-account.json";
pub const DEFAULT_COLLECTION: &str = "shops/meamore/services_list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederConfig {
    /// Service account key file (`SEED_SERVICE_ACCOUNT`, falling back to
    /// `GOOGLE_APPLICATION_CREDENTIALS`).
    pub credentials_path: PathBuf,
    /// `FIRESTORE_HOST_URL` and `FIRESTORE_DATABASE_ID`.
    pub client_options: FirestoreClientOptions,
    /// `SEED_COLLECTION`
    pub collection: String,
    /// `SEED_DATA_PATH`, replaces the bundled services lists when set.
    pub data_path: Option<PathBuf>,
}

impl SeederConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let credentials_path = var("SEED_SERVICE_ACCOUNT")
            .or_else(|| var("GOOGLE_APPLICATION_CREDENTIALS"))
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string());

        let mut client_options = FirestoreClientOptions::default();
        if let Some(host_url) = var("FIRESTORE_HOST_URL") {
            client_options = client_options.host_url(host_url);
        }
        if let Some(database_id) = var("FIRESTORE_DATABASE_ID") {
            client_options = client_options.database_id(database_id);
        }

        Self {
            credentials_path: credentials_path.into(),
            client_options,
            collection: var("SEED_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            data_path: var("SEED_DATA_PATH").map(PathBuf::from),
        }
    }

    pub fn credential_provider(&self) -> ServiceAccountFile {
        ServiceAccountFile::new(&self.credentials_path).options(self.client_options.clone())
    }

    pub fn load_documents(&self) -> Result<SeedBatch<ServicesList>, SeedError> {
        match &self.data_path {
            Some(path) => services::from_file(path),
            None => services::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> SeederConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SeederConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_the_grooming_shop() {
        let config = config_from(&[]);

        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(config.collection, "shops/meamore/services_list");
        assert_eq!(config.client_options, FirestoreClientOptions::default());
        assert_eq!(config.data_path, None);
    }

    #[test]
    fn explicit_service_account_wins_over_google_default() {
        let config = config_from(&[
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/gcp.json"),
            ("SEED_SERVICE_ACCOUNT", "/secrets/seeder.json"),
        ]);
        assert_eq!(config.credentials_path, PathBuf::from("/secrets/seeder.json"));

        let config = config_from(&[("GOOGLE_APPLICATION_CREDENTIALS", "/etc/gcp.json")]);
        assert_eq!(config.credentials_path, PathBuf::from("/etc/gcp.json"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("FIRESTORE_HOST_URL", "https://127.0.0.1:8081"),
            ("FIRESTORE_DATABASE_ID", "staging"),
            ("SEED_COLLECTION", "shops/test/services_list"),
            ("SEED_DATA_PATH", "fixtures/services.json"),
            ("SEED_SERVICE_ACCOUNT", "  "),
        ]);

        assert_eq!(config.client_options.host_url, "https://127.0.0.1:8081");
        assert_eq!(config.client_options.database_id, "staging");
        assert_eq!(config.collection, "shops/test/services_list");
        assert_eq!(
            config.data_path,
            Some(PathBuf::from("fixtures/services.json"))
        );
        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
    }

    #[test]
    fn loads_bundled_documents_by_default() {
        let documents = config_from(&[]).load_documents().unwrap();
        assert_eq!(documents.len(), 2);
    }
}
