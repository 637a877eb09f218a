use isahc::HttpClient;

use crate::{
    service_account::{create as assertion_create, CreateError as AssertionCreateError},
    token::{request_access_token, Grant, RequestError},
    AccessTokenResponse, IssuedAt, ServiceAccountKey, SCOPE,
};

//
#[derive(Debug, Clone)]
pub enum Credentials {
    /// OAuth2 client of an installed application plus a long-lived refresh token.
    InstalledApp {
        client_id: Box<str>,
        client_secret: Box<str>,
        refresh_token: Box<str>,
    },
    ServiceAccount {
        key: ServiceAccountKey,
        delegated_account: Option<Box<str>>,
    },
}

impl Credentials {
    pub fn token_uri(&self) -> &str {
        match self {
            Self::InstalledApp { .. } => crate::TOKEN_URI,
            Self::ServiceAccount { key, .. } => key.token_uri.as_ref(),
        }
    }

    pub fn grant(&self) -> Result<Grant, CredentialsRequestError> {
        match self {
            Self::InstalledApp {
                client_id,
                client_secret,
                refresh_token,
            } => Ok(Grant::RefreshToken {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                refresh_token: refresh_token.clone(),
            }),
            Self::ServiceAccount {
                key,
                delegated_account,
            } => {
                let assertion =
                    assertion_create(key, SCOPE, delegated_account.as_deref(), None, None)
                        .map_err(CredentialsRequestError::AssertionCreateFailed)?;
                Ok(Grant::JwtBearer { assertion })
            }
        }
    }

    pub fn request(
        &self,
        http: &HttpClient,
    ) -> Result<(AccessTokenResponse, IssuedAt), CredentialsRequestError> {
        let grant = self.grant()?;

        request_access_token(http, self.token_uri(), &grant)
            .map_err(CredentialsRequestError::AccessTokenRequestFailed)
    }
}

//
#[derive(Debug, thiserror::Error)]
pub enum CredentialsRequestError {
    #[error("create assertion failed: {0}")]
    AssertionCreateFailed(AssertionCreateError),
    #[error("access token request failed: {0}")]
    AccessTokenRequestFailed(RequestError),
}
