//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use encyclomedia::outbound::persistence::DbPool;
use encyclomedia::settings::{AppSettings, SettingsError};
use url::Url;
use zeroize::Zeroizing;

/// Endpoints and credentials for the metadata providers.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub(crate) tmdb_base_url: Url,
    pub(crate) tmdb_api_key: Option<Zeroizing<String>>,
    pub(crate) openlibrary_base_url: Url,
    pub(crate) deezer_base_url: Url,
    pub(crate) llm_base_url: Url,
    pub(crate) llm_api_key: Option<Zeroizing<String>>,
    pub(crate) llm_model: String,
    pub(crate) timeout: Duration,
}

impl UpstreamConfig {
    /// Resolve provider settings, applying defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when an override is not a valid URL.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            tmdb_base_url: settings.tmdb_base_url()?,
            tmdb_api_key: settings.tmdb_api_key(),
            openlibrary_base_url: settings.openlibrary_base_url()?,
            deezer_base_url: settings.deezer_base_url()?,
            llm_base_url: settings.llm_base_url()?,
            llm_api_key: settings.llm_api_key(),
            llm_model: settings.llm_model().to_owned(),
            timeout: settings.upstream_timeout(),
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) upstream: UpstreamConfig,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Zeroizing<String>,
        token_ttl: chrono::Duration,
        upstream: UpstreamConfig,
    ) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            jwt_secret,
            token_ttl,
            upstream,
            cors_origins: Vec::new(),
        }
    }

    /// Build everything except the database pool from loaded settings.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SettingsError`] reported by the accessors.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(
            settings.bind_addr()?,
            settings.jwt_secret()?,
            settings.token_ttl()?,
            UpstreamConfig::from_settings(settings)?,
        )
        .with_cors_origins(settings.cors_origins()))
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server keeps all community data in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn has_db_pool(&self) -> bool {
        self.db_pool.is_some()
    }

    #[must_use]
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}
