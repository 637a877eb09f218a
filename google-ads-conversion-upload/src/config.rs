//! `google-ads.yaml` loading.
//!
//! Values from the file are overlaid by `GOOGLE_ADS_*` environment variables,
//! e.g. `GOOGLE_ADS_DEVELOPER_TOKEN` or `GOOGLE_ADS_LOGIN_CUSTOMER_ID`.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::types::ApiVersion;

pub const DEFAULT_ENDPOINT: &str = "googleads.googleapis.com";
pub const CONFIGURATION_FILE_NAME: &str = "google-ads.yaml";
pub const CONFIGURATION_FILE_PATH_ENV: &str = "GOOGLE_ADS_CONFIGURATION_FILE_PATH";
pub const ENV_PREFIX: &str = "GOOGLE_ADS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleAdsConfig {
    pub developer_token: String,
    pub login_customer_id: Option<String>,
    pub endpoint: String,
    pub api_version: ApiVersion,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsConfig {
    InstalledApp {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    ServiceAccount {
        path_to_private_key_file: PathBuf,
        delegated_account: Option<String>,
    },
}

#[derive(Deserialize, Debug)]
struct Storage {
    developer_token: Option<String>,
    login_customer_id: Option<String>,
    endpoint: Option<String>,
    api_version: Option<ApiVersion>,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
    path_to_private_key_file: Option<PathBuf>,
    delegated_account: Option<String>,
}

impl GoogleAdsConfig {
    /// Reads `path`, or the default location when `None`.
    ///
    /// The default location is `$GOOGLE_ADS_CONFIGURATION_FILE_PATH`, falling
    /// back to `$HOME/google-ads.yaml`. Only the home file may be absent, in
    /// which case the environment alone has to carry the configuration. The
    /// same holds when neither variable is set.
    pub fn load_from_storage(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some((path.to_path_buf(), true)),
            None => default_path(
                env::var_os(CONFIGURATION_FILE_PATH_ENV),
                env::var_os("HOME"),
            ),
        };

        Self::from_sources(file, Environment::with_prefix(ENV_PREFIX))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)))
    }

    fn from_sources(
        file: Option<(PathBuf, bool)>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some((path, required)) = file {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Yaml)
                    .required(required),
            );
        }

        Self::from_builder(builder.add_source(environment))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let storage: Storage = builder.build()?.try_deserialize()?;
        Self::try_from(storage)
    }

    /// Scheme and host the API is called on, without a trailing slash.
    pub fn base_url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.trim_end_matches('/').to_owned()
        } else {
            format!("https://{}", self.endpoint.trim_end_matches('/'))
        }
    }
}

impl TryFrom<Storage> for GoogleAdsConfig {
    type Error = ConfigError;

    fn try_from(storage: Storage) -> Result<Self, Self::Error> {
        let developer_token = non_empty(storage.developer_token)
            .ok_or(ConfigError::MissingKey("developer_token"))?;

        let login_customer_id = non_empty(storage.login_customer_id);
        if let Some(login_customer_id) = &login_customer_id {
            if login_customer_id.len() != 10
                || !login_customer_id.chars().all(|c| c.is_ascii_digit())
            {
                return Err(ConfigError::InvalidLoginCustomerId(
                    login_customer_id.to_owned(),
                ));
            }
        }

        let client_id = non_empty(storage.client_id);
        let client_secret = non_empty(storage.client_secret);
        let refresh_token = non_empty(storage.refresh_token);

        let credentials = if client_id.is_some() || client_secret.is_some() || refresh_token.is_some()
        {
            CredentialsConfig::InstalledApp {
                client_id: client_id.ok_or(ConfigError::MissingKey("client_id"))?,
                client_secret: client_secret.ok_or(ConfigError::MissingKey("client_secret"))?,
                refresh_token: refresh_token.ok_or(ConfigError::MissingKey("refresh_token"))?,
            }
        } else if let Some(path_to_private_key_file) = storage.path_to_private_key_file {
            CredentialsConfig::ServiceAccount {
                path_to_private_key_file,
                delegated_account: non_empty(storage.delegated_account),
            }
        } else {
            return Err(ConfigError::MissingCredentials);
        };

        Ok(Self {
            developer_token,
            login_customer_id,
            endpoint: non_empty(storage.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            api_version: storage.api_version.unwrap_or_default(),
            credentials,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// The file to read and whether it has to exist.
fn default_path(
    configuration_file_path: Option<OsString>,
    home: Option<OsString>,
) -> Option<(PathBuf, bool)> {
    if let Some(path) = configuration_file_path {
        return Some((PathBuf::from(path), true));
    }
    home.map(|home| (PathBuf::from(home).join(CONFIGURATION_FILE_NAME), false))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("load configuration failed: {0}")]
    LoadFailed(#[from] config::ConfigError),
    #[error("required configuration key '{0}' was not found")]
    MissingKey(&'static str),
    #[error("no credentials configured, set client_id, client_secret and refresh_token, or path_to_private_key_file")]
    MissingCredentials,
    #[error("login_customer_id '{0}' must be 10 digits without dashes")]
    InvalidLoginCustomerId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<config::Map<String, String>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn test_installed_app() {
        let config = GoogleAdsConfig::from_yaml_str(
            r#"
developer_token: dev-token
client_id: 1234.apps.googleusercontent.com
client_secret: secret
refresh_token: 1//refresh
login_customer_id: 1234567890
"#,
        )
        .unwrap();

        assert_eq!(config.developer_token, "dev-token");
        assert_eq!(config.login_customer_id.as_deref(), Some("1234567890"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_version, ApiVersion::V2);
        assert_eq!(
            config.credentials,
            CredentialsConfig::InstalledApp {
                client_id: "1234.apps.googleusercontent.com".to_owned(),
                client_secret: "secret".to_owned(),
                refresh_token: "1//refresh".to_owned(),
            }
        );
        assert_eq!(config.base_url(), "https://googleads.googleapis.com");
    }

    #[test]
    fn test_service_account() {
        let config = GoogleAdsConfig::from_yaml_str(
            r#"
developer_token: dev-token
path_to_private_key_file: /etc/google-ads/key.json
delegated_account: ads-admin@example.com
api_version: v3
endpoint: http://127.0.0.1:8080/
"#,
        )
        .unwrap();

        assert_eq!(
            config.credentials,
            CredentialsConfig::ServiceAccount {
                path_to_private_key_file: PathBuf::from("/etc/google-ads/key.json"),
                delegated_account: Some("ads-admin@example.com".to_owned()),
            }
        );
        assert_eq!(config.api_version, ApiVersion::V3);
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert!(config.login_customer_id.is_none());
    }

    #[test]
    fn test_missing_developer_token() {
        let err = GoogleAdsConfig::from_yaml_str(
            r#"
client_id: id
client_secret: secret
refresh_token: token
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("developer_token")));
    }

    #[test]
    fn test_incomplete_installed_app() {
        let err = GoogleAdsConfig::from_yaml_str(
            r#"
developer_token: dev-token
client_id: id
client_secret: secret
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("refresh_token")));
    }

    #[test]
    fn test_missing_credentials() {
        let err = GoogleAdsConfig::from_yaml_str("developer_token: dev-token\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn test_login_customer_id_with_dashes() {
        let err = GoogleAdsConfig::from_yaml_str(
            r#"
developer_token: dev-token
client_id: id
client_secret: secret
refresh_token: token
login_customer_id: "123-456-7890"
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidLoginCustomerId(value) => assert_eq!(value, "123-456-7890"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let err =
            GoogleAdsConfig::load_from_storage(Some(Path::new("/nonexistent/google-ads.yaml")))
                .unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed(_)));
    }

    #[test]
    fn test_environment_overrides_file() {
        let builder = Config::builder()
            .add_source(File::from_str(
                r#"
developer_token: file-token
client_id: id
client_secret: secret
refresh_token: token
"#,
                FileFormat::Yaml,
            ))
            .add_source(environment(&[
                ("GOOGLE_ADS_DEVELOPER_TOKEN", "env-token"),
                ("GOOGLE_ADS_LOGIN_CUSTOMER_ID", "1234567890"),
            ]));

        let config = GoogleAdsConfig::from_builder(builder).unwrap();
        assert_eq!(config.developer_token, "env-token");
        assert_eq!(config.login_customer_id.as_deref(), Some("1234567890"));
        assert_eq!(
            config.credentials,
            CredentialsConfig::InstalledApp {
                client_id: "id".to_owned(),
                client_secret: "secret".to_owned(),
                refresh_token: "token".to_owned(),
            }
        );
    }

    #[test]
    fn test_environment_only() {
        let config = GoogleAdsConfig::from_sources(
            None,
            environment(&[
                ("GOOGLE_ADS_DEVELOPER_TOKEN", "env-token"),
                ("GOOGLE_ADS_PATH_TO_PRIVATE_KEY_FILE", "/etc/google-ads/key.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.developer_token, "env-token");
        assert_eq!(
            config.credentials,
            CredentialsConfig::ServiceAccount {
                path_to_private_key_file: PathBuf::from("/etc/google-ads/key.json"),
                delegated_account: None,
            }
        );
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            default_path(Some("/etc/google-ads.yaml".into()), Some("/home/ads".into())),
            Some((PathBuf::from("/etc/google-ads.yaml"), true))
        );
        assert_eq!(
            default_path(None, Some("/home/ads".into())),
            Some((PathBuf::from("/home/ads/google-ads.yaml"), false))
        );
        assert_eq!(default_path(None, None), None);
    }

    #[test]
    fn test_missing_home_file_is_optional() {
        let err = GoogleAdsConfig::from_sources(
            Some((PathBuf::from("/nonexistent/google-ads.yaml"), false)),
            environment(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("developer_token")));
    }
}
