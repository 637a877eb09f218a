//! [Doc](https://developers.google.com/google-ads/api/docs/conversions/upload-clicks)

pub use google_ads_access_token;

//
pub mod builder;
pub mod client;
pub mod config;
pub mod path;
pub mod report;
pub mod types;
pub mod upload;

use std::io::{self, Write};

use tracing::warn;

pub use self::builder::{build_click_conversion, BuildError, ConversionInput};
pub use self::client::{ClientBuildError, GoogleAdsClient};
pub use self::config::{ConfigError, GoogleAdsConfig};
pub use self::path::{ResourceNames, ResourcePathResolver};
pub use self::types::{
    ApiVersion, ConversionUploadRequest, FieldPathElement, GoogleAdsError, UploadError,
    UploadResult, CURRENCY_CODE,
};
pub use self::upload::{
    upload_click_conversion, ConversionUploadService, UploadClickConversionsError,
};

//
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Uploaded(UploadResult),
    Rejected(UploadError),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Uploaded(_) => 0,
            Self::Rejected(_) => 1,
        }
    }
}

/// Builds, uploads and reports one offline conversion.
///
/// A rejection by the service is fully written to `out` and returned as
/// [`Outcome::Rejected`]. Every other failure is returned as an error and
/// nothing is written.
pub fn run(
    resolver: &impl ResourcePathResolver,
    service: &impl ConversionUploadService,
    input: &ConversionInput,
    out: &mut impl Write,
) -> Result<Outcome, RunError> {
    let request = build_click_conversion(resolver, input)?;

    match upload_click_conversion(service, &input.customer_id, request) {
        Ok(result) => {
            report::report_success(out, &result).map_err(RunError::ReportFailed)?;
            Ok(Outcome::Uploaded(result))
        }
        Err(UploadClickConversionsError::GoogleAds(err)) => {
            warn!(
                request_id = %err.request_id,
                status_code = %err.status_code,
                errors = err.errors.len(),
                "upload rejected"
            );
            report::report_failure(out, &err).map_err(RunError::ReportFailed)?;
            Ok(Outcome::Rejected(err))
        }
        Err(err) => Err(RunError::UploadFailed(err)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("upload failed: {0}")]
    UploadFailed(UploadClickConversionsError),
    #[error("write report failed: {0}")]
    ReportFailed(io::Error),
}
