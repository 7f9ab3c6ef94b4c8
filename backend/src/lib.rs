//! Operator console for a legal-services marketplace.
//!
//! The console provisions client and lawyer accounts, edits stored
//! records, and moderates accounts across three hosted stores: an identity
//! store, a relational profile store and a blob store for photos.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
