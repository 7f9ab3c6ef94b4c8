//! Domain ports for the three external stores.
//!
//! The identity, profile and blob stores fail independently and share no
//! transaction. Services receive them bundled in a [`StoreContext`] built
//! once at startup.

mod macros;
pub(crate) use macros::define_store_error;

mod blob_store;
mod identity_store;
mod profile_store;
mod store_context;

#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobPath, BlobStore, BlobStoreError, WriteMode};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError};
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{
    Filter, MatchKey, OrderBy, ProfileStore, ProfileStoreError, Row, SelectQuery,
};
pub use store_context::{StoreContext, StoreError};
