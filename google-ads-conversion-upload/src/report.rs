use std::io::{self, Write};

use crate::types::{UploadError, UploadResult};

pub fn report_success(out: &mut impl Write, result: &UploadResult) -> io::Result<()> {
    writeln!(
        out,
        "Uploaded conversion that occurred at '{}' from Google Click ID '{}' to '{}'",
        result.conversion_timestamp, result.click_id, result.resolved_conversion_action_path
    )
}

/// Writes the summary line, then every error in the order received, each
/// followed by the fields it points at.
pub fn report_failure(out: &mut impl Write, error: &UploadError) -> io::Result<()> {
    writeln!(
        out,
        r#"Request with ID "{}" failed with status "{}" and includes the following errors:"#,
        error.request_id, error.status_code
    )?;
    for err in &error.errors {
        writeln!(out, "\tError with message \"{}\".", err.message)?;
        for field_path_element in &err.field_path_elements {
            writeln!(out, "\t\tOn field: {}", field_path_element.field_name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::{FieldPathElement, GoogleAdsError};

    #[test]
    fn test_report_success() {
        let mut out = vec![];
        report_success(
            &mut out,
            &UploadResult {
                resolved_conversion_action_path: "customers/123/conversionActions/456".to_owned(),
                click_id: "abc123".to_owned(),
                conversion_timestamp: "2020-01-01 12:32:45+00:00".to_owned(),
            },
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Uploaded conversion that occurred at '2020-01-01 12:32:45+00:00' \
             from Google Click ID 'abc123' to 'customers/123/conversionActions/456'\n"
        );
    }

    #[test]
    fn test_report_failure() {
        let mut out = vec![];
        report_failure(
            &mut out,
            &UploadError {
                request_id: "req-1".to_owned(),
                status_code: "INVALID_ARGUMENT".to_owned(),
                errors: vec![
                    GoogleAdsError {
                        message: "bad value".to_owned(),
                        field_path_elements: vec![
                            FieldPathElement::new("conversions"),
                            FieldPathElement::new("conversion_value"),
                        ],
                    },
                    GoogleAdsError {
                        message: "second".to_owned(),
                        field_path_elements: vec![],
                    },
                ],
            },
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Request with ID \"req-1\" failed with status \"INVALID_ARGUMENT\" \
             and includes the following errors:\n\
             \tError with message \"bad value\".\n\
             \t\tOn field: conversions\n\
             \t\tOn field: conversion_value\n\
             \tError with message \"second\".\n"
        );
    }
}
