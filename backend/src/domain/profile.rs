//! Role-specific profile drafts, case-history entries and staged photos.
//!
//! Form values arrive as raw text. Turning a draft into a row consults the
//! role lookup table in [`crate::domain::schema`], so only allow-listed
//! columns are ever written and blank values are omitted rather than stored
//! as empty strings.

use std::collections::BTreeSet;

use serde_json::Value;

use super::ports::Row;
use super::schema::{
    EXPERIENCE_MIN_YEARS, EXPERIENCE_TITLE_MIN_CHARS, FieldKind, PHOTO_URL_COLUMN, ProfileField,
    Role, Specialization,
};
use super::PrincipalId;

/// Validation errors raised by the profile-details step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// Full name was blank.
    #[error("Full Name is required")]
    MissingFullName,
    /// A lawyer draft had no bar registration number.
    #[error("Bar Council Number is required")]
    MissingBarCouncilNumber,
    /// A numeric field held something other than a whole number.
    #[error("{field} must be a whole number")]
    NotAWholeNumber {
        /// Offending column.
        field: &'static str,
    },
    /// The draft's role differs from the role the wizard was opened with.
    #[error("profile details are for a {found} but the account is a {expected}")]
    RoleMismatch {
        /// Role chosen when the wizard opened.
        expected: Role,
        /// Role of the submitted draft.
        found: Role,
    },
}

impl ProfileValidationError {
    /// Column the error refers to, for field-level reporting.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingFullName => ProfileField::FullName.column(),
            Self::MissingBarCouncilNumber => ProfileField::BarCouncilNumber.column(),
            Self::NotAWholeNumber { field } => field,
            Self::RoleMismatch { .. } => "role",
        }
    }
}

/// Contact attributes shared by both roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    /// Full name; required.
    pub full_name: String,
    /// Age as typed.
    pub age: String,
    /// Phone number.
    pub phone: String,
    /// First address line.
    pub address_line1: String,
    /// City.
    pub city: String,
    /// State or union territory.
    pub state: String,
}

/// Client-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDetails {
    /// Shared contact attributes.
    pub contact: ContactDetails,
    /// Free-text occupation.
    pub occupation: String,
}

/// Lawyer-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LawyerDetails {
    /// Shared contact attributes.
    pub contact: ContactDetails,
    /// Bar council registration number; required.
    pub bar_council_number: String,
    /// Law school attended.
    pub law_school: String,
    /// Primary area of practice.
    pub primary_specialization: Option<Specialization>,
    /// Secondary areas of practice, never containing the primary one.
    pub other_specializations: BTreeSet<Specialization>,
    /// Years of experience as typed.
    pub experience_years: String,
}

impl LawyerDetails {
    /// Drop the primary specialization from the secondary set.
    pub fn normalise_specializations(&mut self) {
        if let Some(primary) = self.primary_specialization {
            self.other_specializations.remove(&primary);
        }
    }
}

/// Profile attributes for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDetails {
    /// Client profile.
    Client(ClientDetails),
    /// Lawyer profile.
    Lawyer(LawyerDetails),
}

enum FormValue<'a> {
    Absent,
    Text(&'a str),
    Set(&'a BTreeSet<Specialization>),
}

impl ProfileDetails {
    /// Role this draft describes.
    pub fn role(&self) -> Role {
        match self {
            Self::Client(_) => Role::Client,
            Self::Lawyer(_) => Role::Lawyer,
        }
    }

    /// Shared contact attributes.
    pub fn contact(&self) -> &ContactDetails {
        match self {
            Self::Client(details) => &details.contact,
            Self::Lawyer(details) => &details.contact,
        }
    }

    /// Check required fields and numeric coercions.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.contact().full_name.trim().is_empty() {
            return Err(ProfileValidationError::MissingFullName);
        }
        if let Self::Lawyer(details) = self {
            if details.bar_council_number.trim().is_empty() {
                return Err(ProfileValidationError::MissingBarCouncilNumber);
            }
        }
        for field in self.role().schema().fields {
            if field.kind() != FieldKind::Integer {
                continue;
            }
            if let FormValue::Text(raw) = self.form_value(*field) {
                coerce_integer(raw)
                    .map_err(|()| ProfileValidationError::NotAWholeNumber { field: field.column() })?;
            }
        }
        Ok(())
    }

    /// Declared experience, when the draft is a lawyer's and a whole number
    /// was entered.
    pub fn experience_years(&self) -> Option<i64> {
        match self {
            Self::Lawyer(details) => coerce_integer(&details.experience_years).ok().flatten(),
            Self::Client(_) => None,
        }
    }

    /// Whether the wizard must collect case history before committing.
    pub fn requires_experience(&self) -> bool {
        self.role().schema().collects_experience
            && self
                .experience_years()
                .is_some_and(|years| years >= EXPERIENCE_MIN_YEARS)
    }

    /// Build the profile row for `id`.
    ///
    /// Only the role's allow-listed columns are written; numeric columns are
    /// coerced to integers and blank text is omitted. The role's fixed
    /// occupation, when it has one, overrides anything entered.
    pub fn to_row(&self, id: &PrincipalId, email: &str, photo_url: Option<&str>) -> Row {
        let schema = self.role().schema();
        let mut row = Row::new();
        row.insert("id".to_owned(), Value::from(id.as_str()));
        row.insert(ProfileField::Email.column().to_owned(), Value::from(email));
        if let Some(url) = photo_url.filter(|_| schema.permits(ProfileField::ProfilePhotoUrl)) {
            row.insert(PHOTO_URL_COLUMN.to_owned(), Value::from(url));
        }

        for field in schema.fields {
            if let Some(value) = self.column_value(*field) {
                row.insert(field.column().to_owned(), value);
            }
        }

        if let Some(occupation) = schema.fixed_occupation {
            row.insert(
                ProfileField::Occupation.column().to_owned(),
                Value::from(occupation),
            );
        }
        row
    }

    fn column_value(&self, field: ProfileField) -> Option<Value> {
        match (field.kind(), self.form_value(field)) {
            (_, FormValue::Absent) => None,
            (FieldKind::Integer, FormValue::Text(raw)) => {
                coerce_integer(raw).ok().flatten().map(Value::from)
            }
            (_, FormValue::Text(raw)) if raw.is_empty() => None,
            (_, FormValue::Text(raw)) => Some(Value::from(raw)),
            (_, FormValue::Set(set)) => Some(Value::Array(
                set.iter().map(|spec| Value::from(spec.as_str())).collect(),
            )),
        }
    }

    fn form_value(&self, field: ProfileField) -> FormValue<'_> {
        let contact = self.contact();
        match (self, field) {
            (_, ProfileField::FullName) => FormValue::Text(&contact.full_name),
            (_, ProfileField::Age) => FormValue::Text(&contact.age),
            (_, ProfileField::Phone) => FormValue::Text(&contact.phone),
            (_, ProfileField::AddressLine1) => FormValue::Text(&contact.address_line1),
            (_, ProfileField::City) => FormValue::Text(&contact.city),
            (_, ProfileField::State) => FormValue::Text(&contact.state),
            (Self::Client(details), ProfileField::Occupation) => {
                FormValue::Text(&details.occupation)
            }
            (Self::Lawyer(details), ProfileField::BarCouncilNumber) => {
                FormValue::Text(&details.bar_council_number)
            }
            (Self::Lawyer(details), ProfileField::LawSchool) => FormValue::Text(&details.law_school),
            (Self::Lawyer(details), ProfileField::PrimarySpecialization) => details
                .primary_specialization
                .map_or(FormValue::Absent, |spec| FormValue::Text(spec.as_str())),
            (Self::Lawyer(details), ProfileField::OtherSpecializations) => {
                FormValue::Set(&details.other_specializations)
            }
            (Self::Lawyer(details), ProfileField::ExperienceYears) => {
                FormValue::Text(&details.experience_years)
            }
            _ => FormValue::Absent,
        }
    }
}

/// Parse a form value as a whole number; blank yields `Ok(None)`.
fn coerce_integer(raw: &str) -> Result<Option<i64>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<i64>().map(Some).map_err(|_| ())
}

/// One past case declared by a lawyer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceEntry {
    /// Case title; entries under three characters are discarded.
    pub case_title: String,
    /// Area of law the case belongs to.
    pub case_domain: Option<Specialization>,
    /// Free-text description.
    pub case_description: String,
    /// Outcome, e.g. "Acquitted".
    pub case_outcome: String,
}

impl ExperienceEntry {
    /// An empty entry as offered when the case-history step opens.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Entries with short titles are incomplete and never persisted.
    pub fn is_complete(&self) -> bool {
        self.case_title.chars().count() >= EXPERIENCE_TITLE_MIN_CHARS
    }

    /// Row owned by `lawyer`.
    pub fn to_row(&self, lawyer: &PrincipalId) -> Row {
        let mut row = Row::new();
        row.insert("lawyer_id".to_owned(), Value::from(lawyer.as_str()));
        row.insert("case_title".to_owned(), Value::from(self.case_title.as_str()));
        row.insert(
            "case_domain".to_owned(),
            self.case_domain
                .map_or(Value::Null, |domain| Value::from(domain.as_str())),
        );
        row.insert(
            "case_description".to_owned(),
            Value::from(self.case_description.as_str()),
        );
        row.insert(
            "case_outcome".to_owned(),
            Value::from(self.case_outcome.as_str()),
        );
        row
    }
}

/// A photo file staged by the operator.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Stage `bytes` uploaded under `file_name`.
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Text after the last `.`; a name without a dot is its own extension.
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or_default()
    }

    /// MIME type to store the object with.
    ///
    /// A declared type wins; otherwise it is guessed from the extension.
    pub fn content_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(declared) if !declared.trim().is_empty() => declared,
            _ => mime_guess::from_ext(self.extension())
                .first_raw()
                .unwrap_or("application/octet-stream"),
        }
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
