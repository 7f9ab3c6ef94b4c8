//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the store context and remain testable with mocked ports.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::OrphanPolicy;
use crate::domain::ports::StoreContext;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Store handles built at startup.
    pub stores: Arc<StoreContext>,
    /// Clock stamping notifications.
    pub clock: Arc<dyn Clock>,
    /// Compensation applied when a profile insert fails.
    pub orphan_policy: OrphanPolicy,
}

impl HttpState {
    /// State retaining orphaned principals.
    pub fn new(stores: Arc<StoreContext>, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            clock,
            orphan_policy: OrphanPolicy::default(),
        }
    }

    /// Override the orphan policy.
    #[must_use]
    pub fn with_orphan_policy(mut self, orphan_policy: OrphanPolicy) -> Self {
        self.orphan_policy = orphan_policy;
        self
    }
}
