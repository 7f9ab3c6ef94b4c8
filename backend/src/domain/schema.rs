//! Field schema and role model.
//!
//! Static data consulted by the provisioning wizard and the record
//! synchroniser. The role lookup table is the single source of truth for
//! which profile columns a role may write, so a client payload can never
//! acquire lawyer-only columns such as `bar_council_number`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum length of a principal credential.
pub const CREDENTIAL_MIN_CHARS: usize = 6;
/// Declared years of experience from which case history is collected.
pub const EXPERIENCE_MIN_YEARS: i64 = 2;
/// Experience entries with shorter titles are treated as incomplete.
pub const EXPERIENCE_TITLE_MIN_CHARS: usize = 3;
/// Number of blank experience entries offered when the step opens.
pub const EXPERIENCE_PREFILL_SLOTS: usize = 2;
/// Occupation written for every lawyer profile.
pub const LAWYER_OCCUPATION: &str = "Lawyer";
/// File stem of a principal's photo object.
pub const PHOTO_OBJECT_STEM: &str = "profile";
/// Ban duration applied when the operator does not choose one (~100 years).
pub const DEFAULT_BAN_HOURS: u32 = 876_000;

/// Column holding the public photo URL on profile rows.
pub const PHOTO_URL_COLUMN: &str = "profile_photo_url";

/// Keys that are never writable through the record synchroniser:
/// identifiers, timestamps, the photo URL, and joined sub-objects.
pub const READ_ONLY_FIELDS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    PHOTO_URL_COLUMN,
    "user_id",
    "client_id",
    "lawyer_id",
    "case_id",
    "clients",
    "lawyers",
    "case_table",
];

/// Return `true` when `key` belongs to the fixed exclusion set.
#[must_use]
pub fn is_read_only(key: &str) -> bool {
    READ_ONLY_FIELDS.contains(&key)
}

/// Backend tables written by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Table {
    /// Client profiles.
    #[serde(rename = "clients")]
    Clients,
    /// Lawyer profiles.
    #[serde(rename = "lawyers")]
    Lawyers,
    /// Cases, keyed by `case_id`.
    #[serde(rename = "case_table")]
    Cases,
    /// Requests from clients to lawyers.
    #[serde(rename = "case_requests")]
    CaseRequests,
    /// Self-assessment answers.
    #[serde(rename = "user_assessments")]
    Assessments,
    /// In-app notifications.
    #[serde(rename = "notifications")]
    Notifications,
    /// Case history rows owned by a lawyer.
    #[serde(rename = "lawyer_experience_details")]
    LawyerExperience,
}

impl Table {
    /// Every table, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::Clients,
        Self::Lawyers,
        Self::Cases,
        Self::CaseRequests,
        Self::Assessments,
        Self::Notifications,
        Self::LawyerExperience,
    ];

    /// Backend table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
            Self::Cases => "case_table",
            Self::CaseRequests => "case_requests",
            Self::Assessments => "user_assessments",
            Self::Notifications => "notifications",
            Self::LawyerExperience => "lawyer_experience_details",
        }
    }

    /// Profile tables share their primary key with an identity principal.
    #[must_use]
    pub const fn is_profile(self) -> bool {
        matches!(self, Self::Clients | Self::Lawyers)
    }

    /// Role owning rows of this table, for profile tables.
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::Clients => Some(Role::Client),
            Self::Lawyers => Some(Role::Lawyer),
            _ => None,
        }
    }

    /// Key column used when a row carries no `id`.
    #[must_use]
    pub const fn fallback_key(self) -> Option<&'static str> {
        match self {
            Self::Cases => Some("case_id"),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a table name is not one the console manages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table: {0}")]
pub struct UnknownTable(pub String);

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| UnknownTable(s.to_owned()))
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Person seeking legal services.
    Client,
    /// Registered advocate offering services.
    Lawyer,
}

impl Role {
    /// Schema row describing this role.
    #[must_use]
    pub fn schema(self) -> &'static RoleSchema {
        match self {
            Self::Client => &CLIENT_SCHEMA,
            Self::Lawyer => &LAWYER_SCHEMA,
        }
    }

    /// Profile table for this role.
    #[must_use]
    pub fn table(self) -> Table {
        self.schema().table
    }

    /// Human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Lawyer => "Lawyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "lawyer" => Ok(Self::Lawyer),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// How a profile column's form value is coerced before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, omitted when blank.
    Text,
    /// Whole number parsed from form text, omitted when blank.
    Integer,
    /// Set of specializations written as a JSON array.
    SpecializationSet,
}

/// Writable profile columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// `full_name`
    FullName,
    /// `age`
    Age,
    /// `occupation`
    Occupation,
    /// `current_address_line1`
    AddressLine1,
    /// `current_city`
    City,
    /// `current_state`
    State,
    /// `phone`
    Phone,
    /// `email`
    Email,
    /// `bar_council_number`
    BarCouncilNumber,
    /// `primary_specialization`
    PrimarySpecialization,
    /// `other_specializations`
    OtherSpecializations,
    /// `experience_years`
    ExperienceYears,
    /// `profile_photo_url`
    ProfilePhotoUrl,
    /// `law_school`
    LawSchool,
}

impl ProfileField {
    /// Column name in the profile table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Age => "age",
            Self::Occupation => "occupation",
            Self::AddressLine1 => "current_address_line1",
            Self::City => "current_city",
            Self::State => "current_state",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::BarCouncilNumber => "bar_council_number",
            Self::PrimarySpecialization => "primary_specialization",
            Self::OtherSpecializations => "other_specializations",
            Self::ExperienceYears => "experience_years",
            Self::ProfilePhotoUrl => PHOTO_URL_COLUMN,
            Self::LawSchool => "law_school",
        }
    }

    /// Coercion applied to the form value.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Age | Self::ExperienceYears => FieldKind::Integer,
            Self::OtherSpecializations => FieldKind::SpecializationSet,
            _ => FieldKind::Text,
        }
    }
}

/// One row of the role lookup table.
#[derive(Debug)]
pub struct RoleSchema {
    /// Role described by this row.
    pub role: Role,
    /// Profile table written for the role.
    pub table: Table,
    /// Allow-listed writable columns.
    pub fields: &'static [ProfileField],
    /// Occupation forced onto every profile of the role.
    pub fixed_occupation: Option<&'static str>,
    /// Whether a photo attached during provisioning is uploaded.
    pub accepts_photo: bool,
    /// Whether case history may be collected during provisioning.
    pub collects_experience: bool,
}

impl RoleSchema {
    /// Return `true` when `field` is on the role's allow-list.
    #[must_use]
    pub fn permits(&self, field: ProfileField) -> bool {
        self.fields.contains(&field)
    }
}

const CLIENT_FIELDS: &[ProfileField] = &[
    ProfileField::FullName,
    ProfileField::Age,
    ProfileField::Occupation,
    ProfileField::AddressLine1,
    ProfileField::City,
    ProfileField::State,
    ProfileField::Phone,
    ProfileField::Email,
];

const LAWYER_FIELDS: &[ProfileField] = &[
    ProfileField::FullName,
    ProfileField::Age,
    ProfileField::AddressLine1,
    ProfileField::City,
    ProfileField::State,
    ProfileField::Phone,
    ProfileField::Email,
    ProfileField::BarCouncilNumber,
    ProfileField::PrimarySpecialization,
    ProfileField::OtherSpecializations,
    ProfileField::ExperienceYears,
    ProfileField::ProfilePhotoUrl,
    ProfileField::LawSchool,
];

/// Schema row for clients.
pub static CLIENT_SCHEMA: RoleSchema = RoleSchema {
    role: Role::Client,
    table: Table::Clients,
    fields: CLIENT_FIELDS,
    fixed_occupation: None,
    accepts_photo: false,
    collects_experience: false,
};

/// Schema row for lawyers.
pub static LAWYER_SCHEMA: RoleSchema = RoleSchema {
    role: Role::Lawyer,
    table: Table::Lawyers,
    fields: LAWYER_FIELDS,
    fixed_occupation: Some(LAWYER_OCCUPATION),
    accepts_photo: true,
    collects_experience: true,
};

/// Areas of legal practice shared by profiles and case history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Specialization {
    /// Criminal Law
    #[serde(rename = "Criminal Law")]
    CriminalLaw,
    /// Civil Law
    #[serde(rename = "Civil Law")]
    CivilLaw,
    /// Corporate Law
    #[serde(rename = "Corporate Law")]
    CorporateLaw,
    /// Property Law
    #[serde(rename = "Property Law")]
    PropertyLaw,
    /// Intellectual Property
    #[serde(rename = "Intellectual Property")]
    IntellectualProperty,
    /// Labor Law
    #[serde(rename = "Labor Law")]
    LaborLaw,
    /// Tax Law
    #[serde(rename = "Tax Law")]
    TaxLaw,
    /// Cyber Law
    #[serde(rename = "Cyber Law")]
    CyberLaw,
    /// Constitutional Law
    #[serde(rename = "Constitutional Law")]
    ConstitutionalLaw,
    /// Pro Bono
    #[serde(rename = "Pro Bono")]
    ProBono,
}

impl Specialization {
    /// Every specialization, in display order.
    pub const ALL: [Self; 10] = [
        Self::CriminalLaw,
        Self::CivilLaw,
        Self::CorporateLaw,
        Self::PropertyLaw,
        Self::IntellectualProperty,
        Self::LaborLaw,
        Self::TaxLaw,
        Self::CyberLaw,
        Self::ConstitutionalLaw,
        Self::ProBono,
    ];

    /// Display name, also the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CriminalLaw => "Criminal Law",
            Self::CivilLaw => "Civil Law",
            Self::CorporateLaw => "Corporate Law",
            Self::PropertyLaw => "Property Law",
            Self::IntellectualProperty => "Intellectual Property",
            Self::LaborLaw => "Labor Law",
            Self::TaxLaw => "Tax Law",
            Self::CyberLaw => "Cyber Law",
            Self::ConstitutionalLaw => "Constitutional Law",
            Self::ProBono => "Pro Bono",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised specialization name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown specialization: {0}")]
pub struct UnknownSpecialization(pub String);

impl FromStr for Specialization {
    type Err = UnknownSpecialization;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|spec| spec.as_str() == s)
            .ok_or_else(|| UnknownSpecialization(s.to_owned()))
    }
}
