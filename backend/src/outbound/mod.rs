//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **hosted**: reqwest clients for the hosted identity, relational and
//!   object storage APIs.
//!
//! Adapters are thin translators between domain types and wire payloads.
//! They contain no business logic.

pub mod hosted;
