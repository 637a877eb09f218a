use core::fmt;

use serde::{Deserialize, Serialize};

pub const CURRENCY_CODE: &str = "USD";

//
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V2,
    V3,
    V4,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
            Self::V4 => "v4",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One click conversion, as sent in `uploadClickConversions`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionUploadRequest {
    #[serde(rename = "conversionAction")]
    pub resolved_conversion_action_path: String,
    #[serde(rename = "gclid")]
    pub click_id: String,
    #[serde(serialize_with = "ser_double")]
    pub conversion_value: f64,
    #[serde(rename = "conversionDateTime")]
    pub conversion_timestamp: String,
    pub currency_code: String,
}

/// proto3 JSON `double`: non-finite values travel as strings.
fn ser_double<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() && value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else if value.is_infinite() {
        serializer.serialize_str("-Infinity")
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Fields the service echoes back for an accepted conversion.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadResult {
    #[serde(rename = "conversionAction", default)]
    pub resolved_conversion_action_path: String,
    #[serde(rename = "gclid", default)]
    pub click_id: String,
    #[serde(rename = "conversionDateTime", default)]
    pub conversion_timestamp: String,
}

impl UploadResult {
    pub(crate) fn is_empty(&self) -> bool {
        self.resolved_conversion_action_path.is_empty()
            && self.click_id.is_empty()
            && self.conversion_timestamp.is_empty()
    }
}

/// The service rejected the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request {request_id} failed with status {status_code}")]
pub struct UploadError {
    pub request_id: String,
    pub status_code: String,
    pub errors: Vec<GoogleAdsError>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GoogleAdsError {
    #[serde(default)]
    pub message: String,
    /// Empty when the error is not tied to a field.
    #[serde(rename = "location", default, deserialize_with = "de_field_path_elements")]
    pub field_path_elements: Vec<FieldPathElement>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldPathElement {
    pub field_name: String,
    #[serde(default)]
    pub index: Option<i64>,
}

impl FieldPathElement {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            index: None,
        }
    }
}

fn de_field_path_elements<'de, D>(deserializer: D) -> Result<Vec<FieldPathElement>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorLocation {
        #[serde(default)]
        field_path_elements: Vec<FieldPathElement>,
    }

    let location = Option::<ErrorLocation>::deserialize(deserializer)?;
    Ok(location
        .map(|location| location.field_path_elements)
        .unwrap_or_default())
}
