use core::num::ParseFloatError;

use crate::{
    path::ResourcePathResolver,
    types::{ConversionUploadRequest, CURRENCY_CODE},
};

/// The raw command-line values of one offline conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInput {
    pub customer_id: String,
    pub conversion_action_id: String,
    pub gcl_id: String,
    pub conversion_time: String,
    pub conversion_value: String,
}

/// Builds the click conversion for `input`.
///
/// The conversion time is passed through untouched; the service validates its
/// format. Currency is always [`CURRENCY_CODE`].
pub fn build_click_conversion(
    resolver: &impl ResourcePathResolver,
    input: &ConversionInput,
) -> Result<ConversionUploadRequest, BuildError> {
    let conversion_value = input
        .conversion_value
        .trim()
        .parse::<f64>()
        .map_err(|source| BuildError::InvalidConversionValue {
            value: input.conversion_value.clone(),
            source,
        })?;

    Ok(ConversionUploadRequest {
        resolved_conversion_action_path: resolver
            .conversion_action_path(&input.customer_id, &input.conversion_action_id),
        click_id: input.gcl_id.clone(),
        conversion_value,
        conversion_timestamp: input.conversion_time.clone(),
        currency_code: CURRENCY_CODE.to_owned(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("conversion value '{value}' is not a number: {source}")]
    InvalidConversionValue {
        value: String,
        source: ParseFloatError,
    },
}
