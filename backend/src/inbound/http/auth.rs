//! Operator authentication.
//!
//! The console has a single operator credential: the shared secret the
//! store context was built with. Requests prove possession by sending it as
//! a bearer token. Only its SHA-256 digest is kept in memory.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use sha2::{Digest, Sha256};

use crate::domain::Error;

/// Length of the logged fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Digest of the operator's shared secret.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorKey {
    digest: [u8; 32],
}

impl OperatorKey {
    /// Derive the key from the raw secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            digest: digest(secret),
        }
    }

    /// Truncated hex digest, safe to log.
    ///
    /// # Examples
    /// ```
    /// use vakaalat_console::inbound::http::auth::OperatorKey;
    ///
    /// let fp = OperatorKey::from_secret("service-role-key").fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.digest[..FINGERPRINT_BYTES])
    }

    fn matches(&self, presented: &str) -> bool {
        digest(presented)
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn digest(secret: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    out
}

impl std::fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OperatorKey").field(&self.fingerprint()).finish()
    }
}

/// Proof that the request carried the operator's secret.
///
/// Add it as a handler argument to guard the route.
#[derive(Debug, Clone, Copy)]
pub struct Operator;

impl FromRequest for Operator {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorise(req))
    }
}

fn authorise(req: &HttpRequest) -> Result<Operator, Error> {
    let key = req
        .app_data::<web::Data<OperatorKey>>()
        .ok_or_else(|| Error::internal("operator key is not configured"))?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Missing bearer token"))?;
    if key.matches(token) {
        Ok(Operator)
    } else {
        Err(Error::unauthorized("Invalid key or unauthorized access"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn request(header: Option<&str>) -> HttpRequest {
        let mut builder =
            TestRequest::default().app_data(web::Data::new(OperatorKey::from_secret("s3cret-key")));
        if let Some(value) = header {
            builder = builder.insert_header((AUTHORIZATION, value));
        }
        builder.to_http_request()
    }

    #[rstest]
    fn matching_bearer_is_accepted() {
        assert!(authorise(&request(Some("Bearer s3cret-key"))).is_ok());
    }

    #[rstest]
    #[case(None, "Missing bearer token")]
    #[case(Some("Basic czNjcmV0LWtleQ=="), "Missing bearer token")]
    #[case(Some("Bearer "), "Missing bearer token")]
    #[case(Some("Bearer wrong-key"), "Invalid key or unauthorized access")]
    fn other_requests_are_unauthorised(#[case] header: Option<&str>, #[case] message: &str) {
        let err = authorise(&request(header)).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn fingerprint_is_stable_and_short() {
        let a = OperatorKey::from_secret("one");
        assert_eq!(a.fingerprint(), OperatorKey::from_secret("one").fingerprint());
        assert_ne!(a.fingerprint(), OperatorKey::from_secret("two").fingerprint());
        assert_eq!(a.fingerprint().len(), FINGERPRINT_BYTES * 2);
    }

    #[rstest]
    fn debug_never_shows_the_digest() {
        let key = OperatorKey::from_secret("one");
        assert_eq!(format!("{key:?}"), format!("OperatorKey({:?})", key.fingerprint()));
    }
}
