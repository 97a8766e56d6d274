use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every field the intake form declares, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntakeField {
    FullName,
    Email,
    Phone,
    Dob,
    Qualification,
    GradYear,
    Score,
    ScreeningScore,
    Status,
    Aadhaar,
    OfferSent,
}

impl IntakeField {
    pub const ALL: [IntakeField; 11] = [
        IntakeField::FullName,
        IntakeField::Email,
        IntakeField::Phone,
        IntakeField::Dob,
        IntakeField::Qualification,
        IntakeField::GradYear,
        IntakeField::Score,
        IntakeField::ScreeningScore,
        IntakeField::Status,
        IntakeField::Aadhaar,
        IntakeField::OfferSent,
    ];

    /// Wire name, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            IntakeField::FullName => "fullName",
            IntakeField::Email => "email",
            IntakeField::Phone => "phone",
            IntakeField::Dob => "dob",
            IntakeField::Qualification => "qualification",
            IntakeField::GradYear => "gradYear",
            IntakeField::Score => "score",
            IntakeField::ScreeningScore => "screeningScore",
            IntakeField::Status => "status",
            IntakeField::Aadhaar => "aadhaar",
            IntakeField::OfferSent => "offerSent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntakeField::FullName => "Full name",
            IntakeField::Email => "Email",
            IntakeField::Phone => "Phone",
            IntakeField::Dob => "Date of birth",
            IntakeField::Qualification => "Qualification",
            IntakeField::GradYear => "Graduation year",
            IntakeField::Score => "Academic score",
            IntakeField::ScreeningScore => "Screening score",
            IntakeField::Status => "Interview status",
            IntakeField::Aadhaar => "Aadhaar number",
            IntakeField::OfferSent => "Offer letter sent",
        }
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values captured by the intake form. Absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub qualification: String,
    pub grad_year: String,
    pub score: String,
    pub screening_score: String,
    pub status: String,
    pub aadhaar: String,
    pub offer_sent: bool,
}

impl CandidateForm {
    pub fn value(&self, field: IntakeField) -> FieldValue<'_> {
        let text = match field {
            IntakeField::FullName => &self.full_name,
            IntakeField::Email => &self.email,
            IntakeField::Phone => &self.phone,
            IntakeField::Dob => &self.dob,
            IntakeField::Qualification => &self.qualification,
            IntakeField::GradYear => &self.grad_year,
            IntakeField::Score => &self.score,
            IntakeField::ScreeningScore => &self.screening_score,
            IntakeField::Status => &self.status,
            IntakeField::Aadhaar => &self.aadhaar,
            IntakeField::OfferSent => return FieldValue::Flag(self.offer_sent),
        };
        FieldValue::Text(text.as_str())
    }
}

/// Borrowed view over one form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}

impl<'a> FieldValue<'a> {
    /// Text exactly as entered, or `None` for toggles.
    pub fn raw(self) -> Option<&'a str> {
        match self {
            FieldValue::Text(raw) => Some(raw),
            FieldValue::Flag(_) => None,
        }
    }

    /// Trimmed text, or `None` for toggles.
    pub fn text(self) -> Option<&'a str> {
        match self {
            FieldValue::Text(raw) => Some(raw.trim()),
            FieldValue::Flag(_) => None,
        }
    }

    /// A toggle always carries a value; text is blank when only whitespace.
    pub fn is_blank(self) -> bool {
        match self {
            FieldValue::Text(raw) => raw.trim().is_empty(),
            FieldValue::Flag(_) => false,
        }
    }

    /// Whether the value switches on dependency checks.
    pub fn is_active(self) -> bool {
        match self {
            FieldValue::Text(raw) => !raw.trim().is_empty(),
            FieldValue::Flag(on) => on,
        }
    }

    /// Comparable text form; toggles render as `true` / `false`.
    pub fn as_comparable(self) -> String {
        match self {
            FieldValue::Text(raw) => raw.trim().to_string(),
            FieldValue::Flag(on) => on.to_string(),
        }
    }
}

/// Waiver request filed against a soft-rule warning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionRequest {
    pub requested: bool,
    pub rationale: String,
}

impl ExceptionRequest {
    pub fn with_rationale(rationale: impl Into<String>) -> Self {
        Self {
            requested: true,
            rationale: rationale.into(),
        }
    }
}

pub type ExceptionRequests = BTreeMap<IntakeField, ExceptionRequest>;

/// Snapshot of everything a single validation pass reads from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeDraft {
    pub form: CandidateForm,
    pub exceptions: ExceptionRequests,
    pub is_cgpa: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable audit entry written once per accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(flatten)]
    pub form: CandidateForm,
    pub exceptions: BTreeMap<IntakeField, String>,
    pub flagged: bool,
    pub exception_count: usize,
    pub is_cgpa: bool,
    pub timestamp: DateTime<Utc>,
    pub id: SubmissionId,
}
