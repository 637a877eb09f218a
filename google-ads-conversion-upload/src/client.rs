//! [Doc](https://developers.google.com/google-ads/api/rest/overview)

use std::path::Path;

use google_ads_access_token::{Credentials, ServiceAccountKey, ServiceAccountKeyLoadError};
use isahc::{HttpClient, ReadResponseExt as _, Request};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{ConfigError, CredentialsConfig, GoogleAdsConfig},
    path::{conversion_action_path, ResourcePathResolver},
    types::{ConversionUploadRequest, GoogleAdsError, UploadError, UploadResult},
    upload::{ConversionUploadService, UploadClickConversionsError},
};

pub const REQUEST_ID_HEADER: &str = "request-id";

/// Google Ads API client, built once from configuration and passed to
/// whatever needs it.
pub struct GoogleAdsClient {
    config: GoogleAdsConfig,
    credentials: Credentials,
    http: HttpClient,
}

impl GoogleAdsClient {
    pub fn new(config: GoogleAdsConfig) -> Result<Self, ClientBuildError> {
        let credentials = match &config.credentials {
            CredentialsConfig::InstalledApp {
                client_id,
                client_secret,
                refresh_token,
            } => Credentials::InstalledApp {
                client_id: client_id.as_str().into(),
                client_secret: client_secret.as_str().into(),
                refresh_token: refresh_token.as_str().into(),
            },
            CredentialsConfig::ServiceAccount {
                path_to_private_key_file,
                delegated_account,
            } => Credentials::ServiceAccount {
                key: ServiceAccountKey::from_file(path_to_private_key_file)
                    .map_err(ClientBuildError::ServiceAccountKeyLoadFailed)?,
                delegated_account: delegated_account.as_deref().map(Into::into),
            },
        };

        let http = HttpClient::new().map_err(ClientBuildError::HttpClientBuildFailed)?;

        Ok(Self {
            config,
            credentials,
            http,
        })
    }

    pub fn load_from_storage(path: Option<&Path>) -> Result<Self, ClientBuildError> {
        let config = GoogleAdsConfig::load_from_storage(path)?;
        Self::new(config)
    }

    pub fn config(&self) -> &GoogleAdsConfig {
        &self.config
    }

    fn upload_click_conversions_url(&self, customer_id: &str) -> String {
        format!(
            "{}/{}/customers/{}:uploadClickConversions",
            self.config.base_url(),
            self.config.api_version,
            customer_id
        )
    }
}

impl ResourcePathResolver for GoogleAdsClient {
    fn conversion_action_path(&self, customer_id: &str, conversion_action_id: &str) -> String {
        conversion_action_path(customer_id, conversion_action_id)
    }
}

impl ConversionUploadService for GoogleAdsClient {
    fn upload_click_conversions(
        &self,
        customer_id: &str,
        conversions: Vec<ConversionUploadRequest>,
    ) -> Result<Vec<UploadResult>, UploadClickConversionsError> {
        let (token, _) = self.credentials.request(&self.http)?;

        let body = serde_json::to_vec(&UploadClickConversionsRequest {
            conversions: &conversions,
            partial_failure: true,
        })
        .map_err(UploadClickConversionsError::EncodeFailed)?;

        let mut builder = Request::post(self.upload_click_conversions_url(customer_id))
            .header("authorization", format!("Bearer {}", token.access_token))
            .header("developer-token", self.config.developer_token.as_str())
            .header("content-type", "application/json");
        if let Some(login_customer_id) = &self.config.login_customer_id {
            builder = builder.header("login-customer-id", login_customer_id.as_str());
        }
        let request = builder.body(body)?;

        debug!(
            customer_id,
            conversions = conversions.len(),
            api_version = %self.config.api_version,
            "uploading click conversions"
        );

        let mut response = self.http.send(request)?;
        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response.text()?;

        debug!(status, request_id = request_id.as_deref(), "upload responded");

        decode_upload_response(status, request_id.as_deref(), &body)
    }
}

//
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("load service account key failed: {0}")]
    ServiceAccountKeyLoadFailed(ServiceAccountKeyLoadError),
    #[error("build http client failed: {0}")]
    HttpClientBuildFailed(isahc::Error),
}

//
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadClickConversionsRequest<'a> {
    conversions: &'a [ConversionUploadRequest],
    partial_failure: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct UploadClickConversionsResponse {
    #[serde(default)]
    results: Vec<UploadResult>,
    #[serde(default)]
    partial_failure_error: Option<Status>,
}

#[derive(Deserialize, Debug)]
struct ErrorResponseBody {
    error: Status,
}

/// `google.rpc.Status`, as rendered by the REST transport.
#[derive(Deserialize, Debug, Default)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<StatusDetail>,
}

/// Only `GoogleAdsFailure` details carry `errors`; other detail types decode
/// to an empty list.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct StatusDetail {
    #[serde(default)]
    errors: Vec<GoogleAdsError>,
    #[serde(default)]
    request_id: Option<String>,
}

impl Status {
    fn into_upload_error(self, request_id: Option<&str>) -> UploadError {
        let status_code = self
            .status
            .unwrap_or_else(|| code_name(self.code).to_owned());

        let request_id = request_id
            .map(ToOwned::to_owned)
            .or_else(|| {
                self.details
                    .iter()
                    .find_map(|detail| detail.request_id.clone())
            })
            .unwrap_or_default();

        let mut errors = self
            .details
            .into_iter()
            .flat_map(|detail| detail.errors)
            .collect::<Vec<_>>();
        if errors.is_empty() {
            errors.push(GoogleAdsError {
                message: self.message,
                field_path_elements: vec![],
            });
        }

        UploadError {
            request_id,
            status_code,
            errors,
        }
    }
}

pub(crate) fn decode_upload_response(
    status: u16,
    request_id: Option<&str>,
    body: &str,
) -> Result<Vec<UploadResult>, UploadClickConversionsError> {
    if (200..300).contains(&status) {
        let response = if body.trim().is_empty() {
            UploadClickConversionsResponse::default()
        } else {
            serde_json::from_str::<UploadClickConversionsResponse>(body)
                .map_err(UploadClickConversionsError::DecodeFailed)?
        };

        if let Some(partial_failure_error) = response.partial_failure_error {
            return Err(partial_failure_error.into_upload_error(request_id).into());
        }

        return Ok(response
            .results
            .into_iter()
            .filter(|result| !result.is_empty())
            .collect());
    }

    match serde_json::from_str::<ErrorResponseBody>(body) {
        Ok(body) => Err(body.error.into_upload_error(request_id).into()),
        Err(_) => Err(UploadClickConversionsError::UnexpectedResponse {
            status,
            body: body.to_owned(),
        }),
    }
}

/// Canonical name of a `google.rpc.Code`.
fn code_name(code: i32) -> &'static str {
    match code {
        0 => "OK",
        1 => "CANCELLED",
        2 => "UNKNOWN",
        3 => "INVALID_ARGUMENT",
        4 => "DEADLINE_EXCEEDED",
        5 => "NOT_FOUND",
        6 => "ALREADY_EXISTS",
        7 => "PERMISSION_DENIED",
        8 => "RESOURCE_EXHAUSTED",
        9 => "FAILED_PRECONDITION",
        10 => "ABORTED",
        11 => "OUT_OF_RANGE",
        12 => "UNIMPLEMENTED",
        13 => "INTERNAL",
        14 => "UNAVAILABLE",
        15 => "DATA_LOSS",
        16 => "UNAUTHENTICATED",
        _ => "UNKNOWN",
    }
}
