//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from the environment (`ENCYCLOMEDIA_*`) or the
//! matching CLI flag. Most fields are optional so absent values fall back to
//! the defaults exposed by the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::deezer::DEFAULT_DEEZER_BASE_URL;
use crate::outbound::llm::{DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use crate::outbound::openlibrary::DEFAULT_OPENLIBRARY_BASE_URL;
use crate::outbound::security::DEFAULT_TOKEN_TTL_MINUTES;
use crate::outbound::tmdb::DEFAULT_TMDB_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];
/// Signing secret used only by debug builds when none is configured.
const DEV_JWT_SECRET: &str = "encyclomedia-dev-secret-change-me";

/// Invalid or missing settings detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid URL for {setting} `{value}`: {message}")]
    Url {
        setting: &'static str,
        value: String,
        message: String,
    },
    #[error("ENCYCLOMEDIA_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    #[error("token TTL must be a positive number of minutes")]
    InvalidTokenTtl,
}

/// Runtime configuration for the backend.
///
/// Fields whose initials collide carry explicit short flags.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENCYCLOMEDIA")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: Option<i64>,
    /// TMDB v4 read access token.
    #[ortho_config(cli_short = 'k')]
    pub tmdb_api_key: Option<String>,
    #[ortho_config(cli_short = 'm')]
    pub tmdb_base_url: Option<String>,
    pub openlibrary_base_url: Option<String>,
    #[ortho_config(cli_short = 'z')]
    pub deezer_base_url: Option<String>,
    #[ortho_config(cli_short = 'a')]
    pub llm_api_key: Option<String>,
    #[ortho_config(cli_short = 'g')]
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    /// Seconds before an outbound metadata request is abandoned.
    #[ortho_config(default = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
    /// Allowed CORS origins; the environment form is comma-separated.
    #[serde(default, deserialize_with = "origin_list")]
    pub cors_origins: Option<Vec<String>>,
}

/// A lone origin arrives as a string, several as a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OriginList {
    One(String),
    Many(Vec<String>),
}

fn origin_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OriginList>::deserialize(deserializer)?.map(|origins| match origins {
            OriginList::One(origin) => vec![origin],
            OriginList::Many(origins) => origins,
        }),
    )
}

fn parse_url(setting: &'static str, value: Option<&str>, default: &str) -> Result<Url, SettingsError> {
    let raw = value.unwrap_or(default);
    Url::parse(raw).map_err(|err| SettingsError::Url {
        setting,
        value: raw.to_owned(),
        message: err.to_string(),
    })
}

fn secret(value: Option<&String>) -> Option<Zeroizing<String>> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| Zeroizing::new(raw.clone()))
}

impl AppSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL when persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Token signing secret.
    ///
    /// Debug builds fall back to a fixed development secret.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] in release builds when no
    /// secret is configured.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, SettingsError> {
        match secret(self.jwt_secret.as_ref()) {
            Some(value) => Ok(value),
            None if cfg!(debug_assertions) => Ok(Zeroizing::new(DEV_JWT_SECRET.to_owned())),
            None => Err(SettingsError::MissingJwtSecret),
        }
    }

    /// Access-token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidTokenTtl`] for zero or negative values.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let minutes = self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if minutes <= 0 {
            return Err(SettingsError::InvalidTokenTtl);
        }
        Ok(chrono::Duration::minutes(minutes))
    }

    pub fn tmdb_api_key(&self) -> Option<Zeroizing<String>> {
        secret(self.tmdb_api_key.as_ref())
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the override is not a URL.
    pub fn tmdb_base_url(&self) -> Result<Url, SettingsError> {
        parse_url("TMDB", self.tmdb_base_url.as_deref(), DEFAULT_TMDB_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the override is not a URL.
    pub fn openlibrary_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "OpenLibrary",
            self.openlibrary_base_url.as_deref(),
            DEFAULT_OPENLIBRARY_BASE_URL,
        )
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the override is not a URL.
    pub fn deezer_base_url(&self) -> Result<Url, SettingsError> {
        parse_url("Deezer", self.deezer_base_url.as_deref(), DEFAULT_DEEZER_BASE_URL)
    }

    pub fn llm_api_key(&self) -> Option<Zeroizing<String>> {
        secret(self.llm_api_key.as_ref())
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the override is not a URL.
    pub fn llm_base_url(&self) -> Result<Url, SettingsError> {
        parse_url("LLM", self.llm_base_url.as_deref(), DEFAULT_LLM_BASE_URL)
    }

    pub fn llm_model(&self) -> &str {
        self.llm_model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_LLM_MODEL)
    }

    /// Timeout applied to every outbound metadata request.
    pub fn upstream_timeout(&self) -> Duration {
        match self.upstream_timeout_secs {
            0 => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Allowed CORS origins, trimmed and without blanks.
    pub fn cors_origins(&self) -> Vec<String> {
        match &self.cors_origins {
            Some(origins) => origins
                .iter()
                .map(|origin| origin.trim())
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.map(str::to_owned).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 13] = [
        "ENCYCLOMEDIA_BIND_ADDR",
        "ENCYCLOMEDIA_DATABASE_URL",
        "ENCYCLOMEDIA_JWT_SECRET",
        "ENCYCLOMEDIA_TOKEN_TTL_MINUTES",
        "ENCYCLOMEDIA_TMDB_API_KEY",
        "ENCYCLOMEDIA_TMDB_BASE_URL",
        "ENCYCLOMEDIA_OPENLIBRARY_BASE_URL",
        "ENCYCLOMEDIA_DEEZER_BASE_URL",
        "ENCYCLOMEDIA_LLM_API_KEY",
        "ENCYCLOMEDIA_LLM_BASE_URL",
        "ENCYCLOMEDIA_LLM_MODEL",
        "ENCYCLOMEDIA_UPSTREAM_TIMEOUT_SECS",
        "ENCYCLOMEDIA_CORS_ORIGINS",
    ];

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("encyclomedia")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared_except(&[]));
        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.token_ttl().expect("ttl"), chrono::Duration::minutes(15));
        assert!(settings.tmdb_api_key().is_none());
        assert_eq!(
            settings.tmdb_base_url().expect("url").as_str(),
            "https://api.themoviedb.org/3"
        );
        assert_eq!(settings.llm_model(), "gpt-4o-mini");
        assert_eq!(settings.upstream_timeout(), Duration::from_secs(10));
        assert_eq!(
            settings.cors_origins(),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("ENCYCLOMEDIA_BIND_ADDR", "127.0.0.1:9000"),
            ("ENCYCLOMEDIA_DATABASE_URL", "postgres://localhost/encyclomedia"),
            ("ENCYCLOMEDIA_JWT_SECRET", "s3cret"),
            ("ENCYCLOMEDIA_TOKEN_TTL_MINUTES", "60"),
            ("ENCYCLOMEDIA_TMDB_API_KEY", "tmdb-token"),
            ("ENCYCLOMEDIA_LLM_MODEL", "local-model"),
            ("ENCYCLOMEDIA_UPSTREAM_TIMEOUT_SECS", "3"),
            ("ENCYCLOMEDIA_CORS_ORIGINS", " https://app.example , "),
        ]));
        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/encyclomedia")
        );
        assert_eq!(settings.jwt_secret().expect("secret").as_str(), "s3cret");
        assert_eq!(settings.token_ttl().expect("ttl"), chrono::Duration::minutes(60));
        assert_eq!(
            settings.tmdb_api_key().map(|key| key.as_str().to_owned()),
            Some("tmdb-token".to_owned())
        );
        assert_eq!(settings.llm_model(), "local-model");
        assert_eq!(settings.upstream_timeout(), Duration::from_secs(3));
        assert_eq!(settings.cors_origins(), vec!["https://app.example"]);
    }

    #[rstest]
    #[case("https://a.example", vec!["https://a.example"])]
    #[case("https://a.example,https://b.example", vec!["https://a.example", "https://b.example"])]
    #[case(" https://a.example ,, https://b.example ", vec!["https://a.example", "https://b.example"])]
    fn comma_separated_origins_are_split(#[case] raw: &str, #[case] expected: Vec<&str>) {
        let _guard = lock_env(cleared_except(&[("ENCYCLOMEDIA_CORS_ORIGINS", raw)]));
        let settings = load_from_empty_args();
        assert_eq!(settings.cors_origins(), expected);
    }

    #[rstest]
    fn blank_origin_entries_are_dropped() {
        let settings = AppSettings {
            cors_origins: Some(vec![" ".into(), " https://app.example ".into()]),
            ..AppSettings::default()
        };
        assert_eq!(settings.cors_origins(), vec!["https://app.example"]);
    }

    #[rstest]
    fn zero_timeout_falls_back_to_default() {
        assert_eq!(AppSettings::default().upstream_timeout(), Duration::from_secs(10));
    }

    #[rstest]
    #[case(AppSettings { bind_addr: Some("nowhere".into()), ..AppSettings::default() })]
    fn bad_bind_address_is_reported(#[case] settings: AppSettings) {
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-5))]
    fn non_positive_ttl_is_rejected(#[case] minutes: Option<i64>) {
        let settings = AppSettings {
            token_ttl_minutes: minutes,
            ..AppSettings::default()
        };
        assert_eq!(settings.token_ttl(), Err(SettingsError::InvalidTokenTtl));
    }

    #[rstest]
    fn malformed_provider_url_names_the_provider() {
        let settings = AppSettings {
            deezer_base_url: Some("not a url".into()),
            ..AppSettings::default()
        };
        let error = settings.deezer_base_url().expect_err("invalid");
        assert!(error.to_string().contains("Deezer"));
    }

    #[rstest]
    fn blank_secrets_count_as_unset() {
        let settings = AppSettings {
            llm_api_key: Some("   ".into()),
            ..AppSettings::default()
        };
        assert!(settings.llm_api_key().is_none());
    }
}
