use std::{env, fs::File, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::error::FirebaseError;

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Service account information contained within the service account JSON file
/// that you can download from Firebase.
///
/// `Serialize`, `Display`, and `Debug` are intentionally not implemented to
/// avoid accidentally leaking credentials.
#[derive(Deserialize, Clone)]
pub struct ServiceAccount {
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    pub project_id: String,
    pub private_key: String,
    pub private_key_id: String,
    pub client_email: String,
    pub client_id: String,
}

impl ServiceAccount {
    /// Creates a new `ServiceAccount` instance from a service account JSON
    /// file. You can download such a file from the Firebase console under
    /// *Project settings > Service accounts*.
    ///
    /// The file is rejected if it is not a service account key, if any
    /// required field is empty, or if the private key is not a valid RSA key.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FirebaseError> {
        let path = path.as_ref();
        let file_reader = File::open(path).with_context(|| {
            format!(
                "Failed to read service account JSON file '{}'",
                path.display()
            )
        })?;
        let service_account: ServiceAccount = serde_json::from_reader(file_reader)
            .context("Could not extract service account details from file")?;

        service_account.validate()?;
        Ok(service_account)
    }

    /// Creates a `ServiceAccount` from the `FIREBASE_*` environment variables.
    /// Escaped newlines in `FIREBASE_PRIVATE_KEY` are expanded, so the key can
    /// be stored on a single line.
    pub fn from_env() -> Result<Self, FirebaseError> {
        let var = |name: &str| env::var(name).with_context(|| format!("Missing {name}"));

        let service_account = ServiceAccount {
            account_type: None,
            project_id: var("FIREBASE_PROJECT_ID")?,
            client_id: var("FIREBASE_CLIENT_ID")?,
            client_email: var("FIREBASE_CLIENT_EMAIL")?,
            private_key_id: var("FIREBASE_PRIVATE_KEY_ID")?,
            private_key: var("FIREBASE_PRIVATE_KEY")?.replace(r"\n", "\n"),
        };

        service_account.validate()?;
        Ok(service_account)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(account_type) = &self.account_type {
            if account_type != SERVICE_ACCOUNT_TYPE {
                bail!("Expected a credential of type '{SERVICE_ACCOUNT_TYPE}', got '{account_type}'");
            }
        }

        for (field, value) in [
            ("project_id", &self.project_id),
            ("private_key_id", &self.private_key_id),
            ("client_email", &self.client_email),
        ] {
            if value.trim().is_empty() {
                bail!("Service account field '{field}' is empty");
            }
        }

        jsonwebtoken::EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .context("Service account private key is not a valid RSA key")?;

        Ok(())
    }
}
