//! Console configuration loaded via OrthoConfig.
//!
//! Values come from `VAKAALAT_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use zeroize::Zeroizing;

use vakaalat_console::domain::OrphanPolicy;
use vakaalat_console::outbound::hosted::HostedSettings;

const DEFAULT_PHOTO_BUCKET: &str = "Photos";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Reasons the configuration cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No backend URL was configured.
    #[error("backend URL is not configured (set VAKAALAT_BACKEND_URL)")]
    MissingBackendUrl,
    /// The backend URL did not parse.
    #[error("backend URL {value:?} is invalid: {source}")]
    InvalidBackendUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// No service key was configured.
    #[error("service key is not configured (set VAKAALAT_SERVICE_KEY)")]
    MissingServiceKey,
    /// The bind address did not parse.
    #[error("bind address {value:?} is invalid: {source}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
        /// Parser failure.
        source: std::net::AddrParseError,
    },
}

/// Settings for the console process.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VAKAALAT")]
pub struct ConsoleSettings {
    /// Root URL of the hosted backend project.
    pub backend_url: Option<String>,
    /// Service-role key; the operator's shared secret.
    pub service_key: Option<String>,
    /// Bucket holding profile photos.
    pub photo_bucket: Option<String>,
    /// Listen address for the HTTP server.
    pub bind_addr: Option<String>,
    /// Per-request timeout for store calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Delete a freshly created principal when its profile insert fails.
    #[ortho_config(default = false)]
    pub delete_orphaned_principals: bool,
}

impl std::fmt::Debug for ConsoleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSettings")
            .field("backend_url", &self.backend_url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("photo_bucket", &self.photo_bucket)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("delete_orphaned_principals", &self.delete_orphaned_principals)
            .finish()
    }
}

impl ConsoleSettings {
    /// Parsed backend URL.
    pub fn backend_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .backend_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(SettingsError::MissingBackendUrl)?;
        Url::parse(raw).map_err(|source| SettingsError::InvalidBackendUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// The shared secret, wiped from memory on drop.
    pub fn service_key(&self) -> Result<Zeroizing<String>, SettingsError> {
        self.service_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Zeroizing::new(key.to_owned()))
            .ok_or(SettingsError::MissingServiceKey)
    }

    /// Configured photo bucket, falling back to `Photos`.
    pub fn photo_bucket(&self) -> &str {
        self.photo_bucket.as_deref().unwrap_or(DEFAULT_PHOTO_BUCKET)
    }

    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Store call timeout, falling back to thirty seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Compensation applied when a profile insert fails.
    pub fn orphan_policy(&self) -> OrphanPolicy {
        if self.delete_orphaned_principals {
            OrphanPolicy::DeletePrincipal
        } else {
            OrphanPolicy::Retain
        }
    }

    /// Connection parameters for the hosted stores.
    pub fn hosted(&self) -> Result<HostedSettings, SettingsError> {
        Ok(HostedSettings {
            base_url: self.backend_url()?,
            service_key: self.service_key()?,
            photo_bucket: self.photo_bucket().to_owned(),
            request_timeout: self.request_timeout(),
        })
    }
}
