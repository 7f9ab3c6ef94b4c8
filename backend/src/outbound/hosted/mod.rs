//! Adapters for a hosted backend project exposing an admin users API,
//! a PostgREST relational API and an object storage API behind one gateway.

mod connection;
mod identity;
mod profiles;
mod storage;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use zeroize::Zeroizing;

pub use connection::HostedConnection;
pub use identity::HostedIdentityStore;
pub use profiles::HostedProfileStore;
pub use storage::HostedBlobStore;

use crate::domain::ports::StoreContext;

/// Connection parameters for one hosted project.
pub struct HostedSettings {
    /// Project root URL.
    pub base_url: Url,
    /// Operator's shared secret, used for every store.
    pub service_key: Zeroizing<String>,
    /// Bucket holding profile photos.
    pub photo_bucket: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Builds the store context for a hosted project.
pub struct HostedBackend;

impl HostedBackend {
    /// Connect all three stores with one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn connect(settings: HostedSettings) -> Result<StoreContext, reqwest::Error> {
        let connection = Arc::new(HostedConnection::new(
            settings.base_url,
            settings.service_key,
            settings.request_timeout,
        )?);
        Ok(StoreContext::new(
            Arc::new(HostedIdentityStore::new(Arc::clone(&connection))),
            Arc::new(HostedProfileStore::new(Arc::clone(&connection))),
            Arc::new(HostedBlobStore::new(connection, settings.photo_bucket)),
        ))
    }
}
