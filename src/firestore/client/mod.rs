use std::fmt::Display;

use anyhow::Context;
use firestore_grpc::tonic;
use firestore_grpc::v1::firestore_client::FirestoreClient as GrpcFirestoreClient;
use firestore_grpc::v1::{Document, DocumentMask, GetDocumentRequest, UpdateDocumentRequest};
use firestore_grpc::tonic::{
    codegen::InterceptedService, metadata::MetadataValue, transport::Channel, Request, Status,
};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FirebaseError;
use crate::ServiceAccount;

use super::reference::DocumentReference;
use super::token_provider::FirestoreTokenProvider;
use super::value::{from_fields, to_fields, to_json_map, JsonMap};
use super::DocumentStore;

mod options;

pub use options::FirestoreClientOptions;

type InterceptorFunction = Box<dyn FnMut(Request<()>) -> Result<Request<()>, Status> + Send>;

/// A gRPC client for a single Firestore database, authenticated with a
/// service account.
pub struct FirestoreClient {
    options: FirestoreClientOptions,
    client: GrpcFirestoreClient<InterceptedService<Channel, InterceptorFunction>>,
    grpc_channel: Channel,
    token_provider: FirestoreTokenProvider,
    root_resource_path: String,
}

impl Clone for FirestoreClient {
    fn clone(&self) -> Self {
        Self::from_channel(
            self.grpc_channel.clone(),
            self.token_provider.clone(),
            self.options.clone(),
        )
    }
}

fn create_auth_interceptor(mut token_provider: FirestoreTokenProvider) -> InterceptorFunction {
    Box::new(move |mut req: Request<()>| {
        let token = token_provider
            .get_token()
            .map_err(|_| Status::unauthenticated("Could not get token from token provider"))?;

        let bearer_token = format!("Bearer {token}");
        let mut header_value = MetadataValue::from_str(&bearer_token).map_err(|_| {
            Status::unauthenticated("Failed to construct metadata value for authorization token")
        })?;
        header_value.set_sensitive(true);

        req.metadata_mut().insert("authorization", header_value);

        Ok(req)
    })
}

impl FirestoreClient {
    /// Initialise a new client that can be used to interact with a Firestore
    /// database.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use services_seeder::{
    ///     firestore::client::{FirestoreClient, FirestoreClientOptions},
    ///     ServiceAccount,
    /// };
    ///
    /// let service_account = ServiceAccount::from_file("./service-account.json")?;
    /// let client = FirestoreClient::initialise(
    ///     service_account,
    ///     FirestoreClientOptions::default(),
    /// )
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn initialise(
        service_account: ServiceAccount,
        options: FirestoreClientOptions,
    ) -> Result<Self, FirebaseError> {
        tracing::debug!(host_url = %options.host_url, "Connecting to Firestore");

        let channel = Channel::from_shared(options.host_url.clone())
            .context("Failed to create gRPC channel")?
            .connect()
            .await?;

        let token_provider = FirestoreTokenProvider::new(service_account);

        Ok(Self::from_channel(channel, token_provider, options))
    }

    fn from_channel(
        channel: Channel,
        token_provider: FirestoreTokenProvider,
        options: FirestoreClientOptions,
    ) -> Self {
        // Cloning a channel is cheap, tonic multiplexes requests over it.
        let service = GrpcFirestoreClient::with_interceptor(
            channel.clone(),
            create_auth_interceptor(token_provider.clone()),
        );

        let root_resource_path = format!(
            "projects/{}/databases/{}/documents",
            token_provider.project_id(),
            options.database_id
        );

        Self {
            client: service,
            token_provider,
            grpc_channel: channel,
            root_resource_path,
            options,
        }
    }

    /// Retrieve a document from Firestore at the given document reference,
    /// or `None` if it does not exist.
    pub async fn get_document<T: DeserializeOwned>(
        &mut self,
        doc_ref: &DocumentReference,
    ) -> Result<Option<T>, FirebaseError> {
        match self.get_fields(doc_ref).await? {
            Some(fields) => {
                let doc = serde_json::from_value(serde_json::Value::Object(fields))
                    .with_context(|| format!("Failed to deserialize document '{doc_ref}'"))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// Sets a document at the given document reference. If it doesn't already
    /// exist, it is created, and if it does exist already, it is overwritten.
    pub async fn set_document<T: Serialize>(
        &mut self,
        doc_ref: &DocumentReference,
        document: &T,
    ) -> Result<(), FirebaseError> {
        let fields = to_json_map(document)
            .with_context(|| format!("Failed to serialize document '{doc_ref}'"))?;
        self.set_fields(doc_ref, &fields).await
    }

    async fn get_fields(
        &mut self,
        doc_ref: &DocumentReference,
    ) -> Result<Option<JsonMap>, FirebaseError> {
        let request = GetDocumentRequest {
            name: self.get_name_with(doc_ref),
            mask: None,
            consistency_selector: None,
        };

        match self.client.get_document(request).await {
            Ok(res) => {
                let doc = res.into_inner();
                let fields = from_fields(doc.fields).map_err(|source| FirebaseError::Value {
                    source,
                    document: Some(doc.name),
                })?;
                Ok(Some(fields))
            }
            Err(err) if err.code() == tonic::Code::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_fields(
        &mut self,
        doc_ref: &DocumentReference,
        fields: &JsonMap,
    ) -> Result<(), FirebaseError> {
        let doc = Document {
            name: self.get_name_with(doc_ref),
            fields: to_fields(fields),
            create_time: None,
            update_time: None,
        };

        // Without an update mask the whole document is replaced, which is
        // what makes this a "set" rather than a merge.
        let request = UpdateDocumentRequest {
            document: Some(doc),
            update_mask: None,
            mask: Some(DocumentMask {
                field_paths: vec![],
            }),
            current_document: None,
        };

        self.client.update_document(request).await?;

        Ok(())
    }

    pub(crate) fn get_name_with(&self, item: impl Display) -> String {
        format!("{}/{}", self.root_resource_path, item)
    }
}

impl DocumentStore for FirestoreClient {
    fn set<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
        document: &'a JsonMap,
    ) -> BoxFuture<'a, Result<(), FirebaseError>> {
        Box::pin(self.set_fields(doc_ref, document))
    }

    fn get<'a>(
        &'a mut self,
        doc_ref: &'a DocumentReference,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, FirebaseError>> {
        Box::pin(self.get_fields(doc_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implements_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FirestoreClient>();
    }
}
