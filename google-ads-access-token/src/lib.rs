//! [Doc](https://developers.google.com/google-ads/api/docs/oauth/overview)

pub use isahc;

//
pub mod credentials;
pub mod service_account;
pub mod token;

pub use credentials::{Credentials, CredentialsRequestError};
pub use service_account::{ServiceAccountKey, ServiceAccountKeyLoadError};
pub use token::{request_access_token, AccessTokenResponse, Grant, RequestError};

pub const SCOPE: &str = "https://www.googleapis.com/auth/adwords";
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub type IssuedAt = std::time::SystemTime;
