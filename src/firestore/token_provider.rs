use anyhow::Context;
use jsonwebtoken::{get_current_timestamp, Algorithm};
use serde::Serialize;

use crate::{error::FirebaseError, ServiceAccount};

const FIRESTORE_AUDIENCE: &str = "https://firestore.googleapis.com/";

/// Tokens are valid for 60 minutes.
const TOKEN_LIFETIME_SECS: u64 = 60 * 60;

/// A new token is minted once the current one has less than this left.
const EXPIRY_BUFFER_SECS: u64 = 5 * 60;

/// Mints the self-signed JWTs sent as bearer tokens on every Firestore
/// request, reusing a token until it is close to expiring.
#[derive(Clone)]
pub struct FirestoreTokenProvider {
    service_account: ServiceAccount,
    current_token: Option<Token>,
}

#[derive(Clone)]
struct Token {
    jwt: String,
    /// Seconds since the UNIX epoch after which the token must be replaced.
    refresh_at: u64,
}

impl FirestoreTokenProvider {
    pub fn new(service_account: ServiceAccount) -> Self {
        Self {
            service_account,
            current_token: None,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.service_account.project_id
    }

    pub fn get_token(&mut self) -> Result<String, FirebaseError> {
        match &self.current_token {
            Some(token) if token.refresh_at > get_current_timestamp() => Ok(token.jwt.clone()),
            _ => {
                tracing::debug!("Minting a new Firestore access token");
                let token = create_jwt(&self.service_account)?;
                let jwt = token.jwt.clone();
                self.current_token = Some(token);
                Ok(jwt)
            }
        }
    }
}

fn create_jwt(service_account: &ServiceAccount) -> Result<Token, anyhow::Error> {
    let mut header = jsonwebtoken::Header::new(Algorithm::RS256);
    header.kid = Some(service_account.private_key_id.clone());

    let issued_at_time = get_current_timestamp();
    let claims = JwtClaims {
        iss: &service_account.client_email,
        sub: &service_account.client_email,
        aud: FIRESTORE_AUDIENCE,
        iat: issued_at_time,
        exp: issued_at_time + TOKEN_LIFETIME_SECS,
        uid: &service_account.client_id,
    };

    let encoding_key =
        jsonwebtoken::EncodingKey::from_rsa_pem(service_account.private_key.as_ref())
            .context("Failed to create JWT encoding key from the given private key")?;

    let jwt =
        jsonwebtoken::encode(&header, &claims, &encoding_key).context("Failed to create JWT")?;

    Ok(Token {
        jwt,
        refresh_at: claims.exp - EXPIRY_BUFFER_SECS,
    })
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
    uid: &'a str,
}
