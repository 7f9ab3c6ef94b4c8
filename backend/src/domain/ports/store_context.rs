//! Explicit connection context shared by the console's services.

use std::sync::Arc;

use super::{BlobStore, BlobStoreError, IdentityStore, IdentityStoreError, ProfileStore, ProfileStoreError};

/// Failure of any single store call, carrying the store's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Identity store failure.
    #[error(transparent)]
    Identity(#[from] IdentityStoreError),
    /// Profile store failure.
    #[error(transparent)]
    Profile(#[from] ProfileStoreError),
    /// Blob store failure.
    #[error(transparent)]
    Blob(#[from] BlobStoreError),
}

impl StoreError {
    /// Message reported by the failing store; never blank.
    pub fn message(&self) -> &str {
        let message = match self {
            Self::Identity(err) => err.message(),
            Self::Profile(err) => err.message(),
            Self::Blob(err) => err.message(),
        };
        if message.trim().is_empty() {
            "store request failed"
        } else {
            message
        }
    }

    /// Name of the failing store, for logs.
    pub fn store(&self) -> &'static str {
        match self {
            Self::Identity(_) => "identity",
            Self::Profile(_) => "profile",
            Self::Blob(_) => "blob",
        }
    }
}

/// Handles to the three stores, all authenticated with the operator's
/// shared secret.
///
/// Built once at process start and passed by reference into
/// [`crate::domain::AccountProvisioner`], [`crate::domain::RecordSynchronizer`]
/// and [`crate::domain::AccountAdministrator`]. A different secret means a
/// new context.
#[derive(Clone)]
pub struct StoreContext {
    identity: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl StoreContext {
    /// Bundle the three store handles.
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            blobs,
        }
    }

    /// Identity store handle.
    pub fn identity(&self) -> &dyn IdentityStore {
        self.identity.as_ref()
    }

    /// Profile store handle.
    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    /// Blob store handle.
    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext").finish_non_exhaustive()
    }
}
