//! Port for the identity (authentication) store.
//!
//! The store owns principals: sign-in email, credential, phone and ban
//! state. The console never reads a principal back in full; only its id is
//! used.

use async_trait::async_trait;

use crate::domain::{NewPrincipal, PrincipalId, PrincipalUpdate};

use super::define_store_error;

define_store_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// The store could not be reached or timed out.
        Transport => "transport",
        /// The store refused the request.
        Rejected => "rejected",
        /// The store answered with a payload the adapter could not read.
        Decode => "decode",
    }
}

/// Administrative access to principals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create a principal and return its identifier.
    async fn create_principal(
        &self,
        principal: &NewPrincipal,
    ) -> Result<PrincipalId, IdentityStoreError>;

    /// Apply every staged change in one call.
    async fn update_principal(
        &self,
        id: &PrincipalId,
        update: &PrincipalUpdate,
    ) -> Result<(), IdentityStoreError>;

    /// Delete a principal.
    async fn delete_principal(&self, id: &PrincipalId) -> Result<(), IdentityStoreError>;

    /// List one page of principals.
    ///
    /// Only used to prove the operator's secret grants admin access.
    async fn list_principals(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PrincipalId>, IdentityStoreError>;
}
