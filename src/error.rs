use firestore_grpc::tonic;

use crate::firestore::value::ValueError;

/// Errors raised by the Firestore layer: references, the value codec and the
/// gRPC transport.
#[derive(thiserror::Error)]
pub enum FirebaseError {
    #[error("Invalid reference '{path}': {reason}")]
    InvalidReference { path: String, reason: String },

    #[error(
        "value: {source}{}",
        document.as_ref().map(|d| format!(" in document '{d}'")).unwrap_or_default())
    ]
    Value {
        source: ValueError,
        document: Option<String>,
    },

    #[error("firestore request failed: {}", .0.message())]
    Status(#[from] tonic::Status),

    #[error("grpc: {0}")]
    GrpcError(#[from] tonic::transport::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ValueError> for FirebaseError {
    fn from(e: ValueError) -> Self {
        FirebaseError::Value {
            source: e,
            document: None,
        }
    }
}

impl std::fmt::Debug for FirebaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Errors that end a seeding run.
#[derive(thiserror::Error)]
pub enum SeedError {
    #[error("Could not load the service account credentials")]
    Credential(#[source] FirebaseError),

    #[error("Could not connect to the document store")]
    Connection(#[source] FirebaseError),

    #[error("Could not load the seed data")]
    Data(#[source] anyhow::Error),

    #[error("Invalid seed input: {0}")]
    InvalidInput(String),

    #[error("Failed to write document '{id}'")]
    Write {
        id: String,
        #[source]
        source: FirebaseError,
    },
}

impl SeedError {
    /// The identifier of the document whose write failed, if any.
    pub fn failed_document(&self) -> Option<&str> {
        match self {
            SeedError::Write { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Debug for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// Taken from https://www.lpalmieri.com/posts/error-handling-rust/#internal-errors
fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
