//! [Doc](https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests)

use core::time::Duration;
use std::{fs, io, path::Path};

use chrono::{serde::ts_seconds, DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, errors::Error as JsonwebtokenError, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::TOKEN_URI;

// one hour
pub const EXPIRATION_TIME_DURATION_SECONDS_MAX: u64 = 60 * 60;

//
#[derive(Deserialize, Debug, Clone)]
pub struct ServiceAccountKey {
    pub client_email: Box<str>,
    pub private_key: Box<str>,
    #[serde(default)]
    pub private_key_id: Option<Box<str>>,
    #[serde(default = "default_token_uri")]
    pub token_uri: Box<str>,
}

fn default_token_uri() -> Box<str> {
    TOKEN_URI.into()
}

impl ServiceAccountKey {
    pub fn from_json_slice(bytes: impl AsRef<[u8]>) -> Result<Self, ServiceAccountKeyLoadError> {
        serde_json::from_slice(bytes.as_ref()).map_err(ServiceAccountKeyLoadError::DecodeFailed)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceAccountKeyLoadError> {
        let bytes = fs::read(path).map_err(ServiceAccountKeyLoadError::ReadFailed)?;
        Self::from_json_slice(bytes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceAccountKeyLoadError {
    #[error("read service account key file failed: {0}")]
    ReadFailed(io::Error),
    #[error("decode service account key failed: {0}")]
    DecodeFailed(serde_json::Error),
}

//
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub iss: Box<str>,
    pub scope: Box<str>,
    pub aud: Box<str>,
    #[serde(with = "ts_seconds")]
    pub iat: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub exp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<Box<str>>,
}

impl Claims {
    pub fn new(
        key: &ServiceAccountKey,
        scope: impl AsRef<str>,
        subject: Option<&str>,
        issued_at: impl Into<Option<DateTime<Utc>>>,
        expiration_time_dur: impl Into<Option<Duration>>,
    ) -> Self {
        let issued_at = issued_at.into().unwrap_or_else(Utc::now);
        let mut expiration_time_dur = expiration_time_dur
            .into()
            .unwrap_or_else(|| Duration::from_secs(EXPIRATION_TIME_DURATION_SECONDS_MAX));
        if expiration_time_dur.as_secs() > EXPIRATION_TIME_DURATION_SECONDS_MAX {
            expiration_time_dur = Duration::from_secs(EXPIRATION_TIME_DURATION_SECONDS_MAX);
        }
        let expiration_time =
            issued_at + ChronoDuration::seconds(expiration_time_dur.as_secs() as i64);

        Self {
            iss: key.client_email.clone(),
            scope: scope.as_ref().into(),
            aud: key.token_uri.clone(),
            iat: issued_at,
            exp: expiration_time,
            sub: subject.map(Into::into),
        }
    }
}

/// Signs the assertion exchanged at the token endpoint for an access token.
///
/// `subject` is the user the service account impersonates through
/// domain-wide delegation.
pub fn create(
    key: &ServiceAccountKey,
    scope: impl AsRef<str>,
    subject: Option<&str>,
    issued_at: impl Into<Option<DateTime<Utc>>>,
    expiration_time_dur: impl Into<Option<Duration>>,
) -> Result<Box<str>, CreateError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(CreateError::MakeEncodingKeyFailed)?;

    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_owned());
    header.kid = key.private_key_id.as_deref().map(ToOwned::to_owned);

    let claims = Claims::new(key, scope, subject, issued_at, expiration_time_dur);

    let token = encode(&header, &claims, &encoding_key).map_err(CreateError::EncodeFailed)?;

    Ok(token.as_str().into())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("make encoding key failed: {0}")]
    MakeEncodingKeyFailed(JsonwebtokenError),
    #[error("encode failed: {0}")]
    EncodeFailed(JsonwebtokenError),
}
