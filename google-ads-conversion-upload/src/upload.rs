use std::io;

use google_ads_access_token::CredentialsRequestError;

use crate::types::{ConversionUploadRequest, UploadError, UploadResult};

/// `ConversionUploadService.UploadClickConversions`.
#[cfg_attr(test, mockall::automock)]
pub trait ConversionUploadService {
    fn upload_click_conversions(
        &self,
        customer_id: &str,
        conversions: Vec<ConversionUploadRequest>,
    ) -> Result<Vec<UploadResult>, UploadClickConversionsError>;
}

/// Uploads `request` as a batch of one, with a single call.
pub fn upload_click_conversion(
    service: &impl ConversionUploadService,
    customer_id: &str,
    request: ConversionUploadRequest,
) -> Result<UploadResult, UploadClickConversionsError> {
    let mut results = service.upload_click_conversions(customer_id, vec![request])?;
    if results.is_empty() {
        return Err(UploadClickConversionsError::EmptyResults);
    }
    Ok(results.swap_remove(0))
}

//
#[derive(Debug, thiserror::Error)]
pub enum UploadClickConversionsError {
    #[error(transparent)]
    GoogleAds(#[from] UploadError),
    #[error("access token request failed: {0}")]
    AccessTokenRequestFailed(#[from] CredentialsRequestError),
    #[error("encode request body failed: {0}")]
    EncodeFailed(serde_json::Error),
    #[error("make request failed: {0}")]
    MakeRequestFailed(#[from] isahc::http::Error),
    #[error("send request failed: {0}")]
    SendFailed(#[from] isahc::Error),
    #[error("read response body failed: {0}")]
    ReadBodyFailed(#[from] io::Error),
    #[error("decode response body failed: {0}")]
    DecodeFailed(serde_json::Error),
    #[error("unexpected response with status {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },
    #[error("upload returned no results")]
    EmptyResults,
}
