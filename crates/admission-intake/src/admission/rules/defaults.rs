use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use super::{FieldDependency, FieldPattern, FieldRule, SoftCheck, SoftRule, StrictRule};
use crate::admission::domain::IntakeField;

const NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z .'-]*$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^[6-9]\d{9}$";
const AADHAAR_PATTERN: &str = r"^\d{12}$";

struct BuiltinPatterns {
    name: FieldPattern,
    email: FieldPattern,
    phone: FieldPattern,
    aadhaar: FieldPattern,
}

// Compiled once; every later `defaults()` call clones the compiled regexes.
static BUILTIN_PATTERNS: LazyLock<BuiltinPatterns> = LazyLock::new(|| BuiltinPatterns {
    name: compile(NAME_PATTERN),
    email: compile(EMAIL_PATTERN),
    phone: compile(PHONE_PATTERN),
    aadhaar: compile(AADHAAR_PATTERN),
});

pub(super) fn default_rules() -> BTreeMap<IntakeField, FieldRule> {
    let patterns = &*BUILTIN_PATTERNS;
    let mut rules = BTreeMap::new();

    rules.insert(
        IntakeField::FullName,
        FieldRule::Strict(StrictRule {
            required: true,
            min_length: Some(2),
            pattern: Some(patterns.name.clone()),
            required_message: Some("Full name is required".to_string()),
            ..StrictRule::new(
                "Name must be at least 2 characters and contain only letters, spaces, or . ' -",
            )
        }),
    );
    rules.insert(
        IntakeField::Email,
        FieldRule::Strict(StrictRule {
            required: true,
            pattern: Some(patterns.email.clone()),
            required_message: Some("Email is required".to_string()),
            ..StrictRule::new("Enter a valid email address")
        }),
    );
    rules.insert(
        IntakeField::Phone,
        FieldRule::Strict(StrictRule {
            required: true,
            pattern: Some(patterns.phone.clone()),
            required_message: Some("Phone number is required".to_string()),
            ..StrictRule::new("Phone must be a 10-digit mobile number starting with 6-9")
        }),
    );
    rules.insert(
        IntakeField::Dob,
        FieldRule::Soft(SoftRule::new(
            SoftCheck::AgeRange { min: 18, max: 35 },
            "Candidate age {age} is outside the preferred range of {min}-{max} years",
        )),
    );
    rules.insert(
        IntakeField::Qualification,
        FieldRule::Strict(StrictRule {
            required: true,
            ..StrictRule::new("Select the highest qualification")
        }),
    );
    rules.insert(
        IntakeField::GradYear,
        FieldRule::Soft(SoftRule::new(
            SoftCheck::YearRange {
                min: 2015,
                max: 2025,
            },
            "Graduation year {year} is outside the accepted window of {min}-{max}",
        )),
    );
    rules.insert(
        IntakeField::Score,
        FieldRule::Soft(SoftRule::new(
            SoftCheck::Thresholds {
                percentage: 60.0,
                cgpa: 6.0,
            },
            "Score {value} is below the minimum of {threshold}",
        )),
    );
    rules.insert(
        IntakeField::ScreeningScore,
        FieldRule::Soft(SoftRule::new(
            SoftCheck::Minimum(40.0),
            "Screening score {value} is below the minimum of {threshold}",
        )),
    );
    rules.insert(
        IntakeField::Status,
        FieldRule::Strict(StrictRule {
            required: true,
            forbidden_value: Some("Rejected".to_string()),
            forbidden_message: Some("Rejected candidates cannot be admitted".to_string()),
            ..StrictRule::new("Select an interview status")
        }),
    );
    rules.insert(
        IntakeField::Aadhaar,
        FieldRule::Strict(StrictRule {
            required: true,
            pattern: Some(patterns.aadhaar.clone()),
            required_message: Some("Aadhaar number is required".to_string()),
            ..StrictRule::new("Aadhaar must be exactly 12 digits")
        }),
    );
    rules.insert(
        IntakeField::OfferSent,
        FieldRule::Strict(StrictRule {
            dependency: Some(FieldDependency {
                on_field: IntakeField::Status,
                allowed_values: BTreeSet::from(["Selected".to_string(), "Waitlisted".to_string()]),
            }),
            ..StrictRule::new(
                "An offer letter can only be sent to Selected or Waitlisted candidates",
            )
        }),
    );

    rules
}

fn compile(source: &str) -> FieldPattern {
    FieldPattern::new(source).expect("built-in pattern compiles")
}
