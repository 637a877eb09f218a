//! [Doc](https://developers.google.com/identity/protocols/oauth2/web-server#offline)

use std::{io, time::SystemTime};

use isahc::{HttpClient, ReadResponseExt as _, Request};
use serde::Deserialize;
use tracing::debug;
use url::form_urlencoded;

use crate::IssuedAt;

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

//
#[derive(Debug, Clone)]
pub enum Grant {
    RefreshToken {
        client_id: Box<str>,
        client_secret: Box<str>,
        refresh_token: Box<str>,
    },
    JwtBearer {
        assertion: Box<str>,
    },
}

impl Grant {
    pub fn to_form_body(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        match self {
            Self::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => {
                serializer
                    .append_pair("grant_type", "refresh_token")
                    .append_pair("client_id", client_id)
                    .append_pair("client_secret", client_secret)
                    .append_pair("refresh_token", refresh_token);
            }
            Self::JwtBearer { assertion } => {
                serializer
                    .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
                    .append_pair("assertion", assertion);
            }
        }
        serializer.finish()
    }

    fn name(&self) -> &'static str {
        match self {
            Self::RefreshToken { .. } => "refresh_token",
            Self::JwtBearer { .. } => "jwt_bearer",
        }
    }
}

//
#[derive(Deserialize, Debug, Clone)]
pub struct AccessTokenResponse {
    pub access_token: Box<str>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<Box<str>>,
    #[serde(default)]
    pub scope: Option<Box<str>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponseBody {
    pub error: Box<str>,
    #[serde(default)]
    pub error_description: Option<Box<str>>,
}

pub fn request_access_token(
    http: &HttpClient,
    token_uri: impl AsRef<str>,
    grant: &Grant,
) -> Result<(AccessTokenResponse, IssuedAt), RequestError> {
    let request = Request::post(token_uri.as_ref())
        .header("content-type", "application/x-www-form-urlencoded")
        .header("accept", "application/json")
        .body(grant.to_form_body())
        .map_err(RequestError::MakeRequestFailed)?;

    debug!(
        token_uri = token_uri.as_ref(),
        grant = grant.name(),
        "requesting access token"
    );

    let issued_at = SystemTime::now();
    let mut response = http.send(request).map_err(RequestError::SendFailed)?;
    let status = response.status().as_u16();
    let body = response.text().map_err(RequestError::ReadBodyFailed)?;

    let body = parse_response(status, &body)?;
    debug!(expires_in = body.expires_in, "access token issued");

    Ok((body, issued_at))
}

pub fn parse_response(status: u16, body: &str) -> Result<AccessTokenResponse, RequestError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(RequestError::DecodeFailed);
    }

    match serde_json::from_str::<ErrorResponseBody>(body) {
        Ok(body) => Err(RequestError::Rejected { status, body }),
        Err(_) => Err(RequestError::UnexpectedResponse {
            status,
            body: body.into(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("make request failed: {0}")]
    MakeRequestFailed(isahc::http::Error),
    #[error("send request failed: {0}")]
    SendFailed(isahc::Error),
    #[error("read response body failed: {0}")]
    ReadBodyFailed(io::Error),
    #[error("decode response body failed: {0}")]
    DecodeFailed(serde_json::Error),
    #[error("token request rejected with status {status}: {}", .body.error)]
    Rejected { status: u16, body: ErrorResponseBody },
    #[error("unexpected response with status {status}: {body}")]
    UnexpectedResponse { status: u16, body: Box<str> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_form_body() {
        let grant = Grant::RefreshToken {
            client_id: "1234.apps.googleusercontent.com".into(),
            client_secret: "s3cr3t/+".into(),
            refresh_token: "1//0g-refresh".into(),
        };
        assert_eq!(
            grant.to_form_body(),
            "grant_type=refresh_token&client_id=1234.apps.googleusercontent.com\
             &client_secret=s3cr3t%2F%2B&refresh_token=1%2F%2F0g-refresh"
        );
    }

    #[test]
    fn test_jwt_bearer_form_body() {
        let grant = Grant::JwtBearer {
            assertion: "aaa.bbb.ccc".into(),
        };
        assert_eq!(
            grant.to_form_body(),
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=aaa.bbb.ccc"
        );
    }

    #[test]
    fn test_parse_successful_response() {
        let body = r#"{"access_token":"ya29.token","expires_in":3599,"scope":"https://www.googleapis.com/auth/adwords","token_type":"Bearer"}"#;
        let body = parse_response(200, body).unwrap();
        assert_eq!(body.access_token.as_ref(), "ya29.token");
        assert_eq!(body.expires_in, Some(3599));
        assert_eq!(body.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#;
        match parse_response(400, body) {
            Err(RequestError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body.error.as_ref(), "invalid_grant");
                assert_eq!(
                    body.error_description.as_deref(),
                    Some("Token has been expired or revoked.")
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_unexpected_response() {
        match parse_response(502, "<html>Bad Gateway</html>") {
            Err(RequestError::UnexpectedResponse { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body.as_ref(), "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_undecodable_success() {
        assert!(matches!(
            parse_response(200, "{}"),
            Err(RequestError::DecodeFailed(_))
        ));
    }
}
