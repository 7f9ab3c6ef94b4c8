//! Request middleware.
//!
//! Operator authentication is an extractor in `inbound::http::auth`; only
//! request correlation lives here.

pub mod trace;

pub use trace::Trace;
