const DEFAULT_HOST_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE_ID: &str = "(default)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirestoreClientOptions {
    pub host_url: String,
    pub database_id: String,
}

impl Default for FirestoreClientOptions {
    fn default() -> Self {
        Self {
            host_url: DEFAULT_HOST_URL.to_string(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
        }
    }
}

impl FirestoreClientOptions {
    /// Point the client at another endpoint, such as a local emulator. Use
    /// `127.0.0.1` rather than `localhost` for the emulator.
    pub fn host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = host_url.into();
        self
    }

    pub fn database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let options = FirestoreClientOptions::default()
            .host_url("https://127.0.0.1:8081")
            .database_id("staging");

        assert_eq!(options.host_url, "https://127.0.0.1:8081");
        assert_eq!(options.database_id, "staging");
        assert_eq!(
            FirestoreClientOptions::default().database_id,
            "(default)"
        );
    }
}
