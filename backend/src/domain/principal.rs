//! Identity-store primitives: principal identifiers, credentials and the
//! payloads sent when creating or updating a principal.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::schema::CREDENTIAL_MIN_CHARS;

/// Validation errors for principal inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalValidationError {
    /// Identifier was blank.
    #[error("principal id must not be empty")]
    EmptyId,
    /// Identifier carried surrounding whitespace.
    #[error("principal id must not contain surrounding whitespace")]
    PaddedId,
    /// Email was blank.
    #[error("Email and Password required")]
    EmptyEmail,
    /// Credential was blank.
    #[error("Email and Password required")]
    EmptyCredential,
    /// Credential shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    CredentialTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

/// Opaque identifier issued by the identity store.
///
/// Profile rows use the same value as their primary key.
///
/// # Examples
/// ```
/// use vakaalat_console::domain::PrincipalId;
///
/// let id = PrincipalId::new("7d9f2c1e-0000-4000-8000-000000000001").unwrap();
/// assert_eq!(id.as_str(), "7d9f2c1e-0000-4000-8000-000000000001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PrincipalValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PrincipalValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PrincipalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<PrincipalId> for String {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Write-only principal credential.
///
/// The value is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Validate a raw credential: non-empty and at least
    /// [`CREDENTIAL_MIN_CHARS`] characters.
    pub fn new(raw: &str) -> Result<Self, PrincipalValidationError> {
        if raw.is_empty() {
            return Err(PrincipalValidationError::EmptyCredential);
        }
        if raw.chars().count() < CREDENTIAL_MIN_CHARS {
            return Err(PrincipalValidationError::CredentialTooShort {
                min: CREDENTIAL_MIN_CHARS,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Credential text, for adapters that must transmit it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Sign-in credentials collected by the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    email: String,
    credential: Credential,
}

impl AccountCredentials {
    /// Validate email and credential together.
    ///
    /// Email is trimmed; the credential keeps caller whitespace.
    pub fn try_from_parts(email: &str, credential: &str) -> Result<Self, PrincipalValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(PrincipalValidationError::EmptyEmail);
        }
        let credential = Credential::new(credential)?;
        Ok(Self {
            email: email.to_owned(),
            credential,
        })
    }

    /// Sign-in email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Sign-in credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Payload for creating a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    /// Sign-in email.
    pub email: String,
    /// Initial credential.
    pub credential: Credential,
    /// Mark the email as confirmed so the account is usable immediately.
    pub email_confirmed: bool,
}

impl From<&AccountCredentials> for NewPrincipal {
    fn from(value: &AccountCredentials) -> Self {
        Self {
            email: value.email.clone(),
            credential: value.credential.clone(),
            email_confirmed: true,
        }
    }
}

/// Partial update applied to an existing principal in a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalUpdate {
    /// Replacement credential.
    pub credential: Option<Credential>,
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement phone number.
    pub phone: Option<String>,
    /// Ban the principal for this many hours.
    pub ban_duration_hours: Option<u32>,
}

impl PrincipalUpdate {
    /// Return `true` when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.credential.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.ban_duration_hours.is_none()
    }
}
