use chrono::{Datelike, NaiveDate};

use super::{EvaluationContext, FieldOutcome};
use crate::admission::domain::FieldValue;
use crate::admission::rules::{SoftCheck, SoftRule};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Empty values always pass: optional fields never raise soft warnings.
pub(super) fn evaluate(
    rule: &SoftRule,
    value: FieldValue<'_>,
    context: &EvaluationContext,
) -> FieldOutcome {
    let raw = match value.text() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return FieldOutcome::Pass,
    };

    match &rule.check {
        SoftCheck::AgeRange { min, max } => {
            let Ok(birth) = NaiveDate::parse_from_str(raw, DATE_FORMAT) else {
                return unreadable(raw, "a date (YYYY-MM-DD)");
            };
            let age = age_on(birth, context.reference_date);
            if age < i64::from(*min) || age > i64::from(*max) {
                return warning(
                    &rule.error_message,
                    &[
                        ("age", age.to_string()),
                        ("min", min.to_string()),
                        ("max", max.to_string()),
                        ("value", raw.to_string()),
                    ],
                );
            }
        }
        SoftCheck::YearRange { min, max } => {
            let Ok(year) = raw.parse::<i32>() else {
                return unreadable(raw, "a year");
            };
            if year < *min || year > *max {
                return warning(
                    &rule.error_message,
                    &[
                        ("year", year.to_string()),
                        ("min", min.to_string()),
                        ("max", max.to_string()),
                        ("value", raw.to_string()),
                    ],
                );
            }
        }
        SoftCheck::Thresholds { percentage, cgpa } => {
            let Some(score) = parse_number(raw) else {
                return unreadable(raw, "a number");
            };
            let threshold = if context.is_cgpa { *cgpa } else { *percentage };
            if score < threshold {
                return warning(
                    &rule.error_message,
                    &[
                        ("threshold", threshold.to_string()),
                        ("value", raw.to_string()),
                    ],
                );
            }
        }
        SoftCheck::Minimum(minimum) => {
            let Some(score) = parse_number(raw) else {
                return unreadable(raw, "a number");
            };
            if score < *minimum {
                return warning(
                    &rule.error_message,
                    &[
                        ("threshold", minimum.to_string()),
                        ("min", minimum.to_string()),
                        ("value", raw.to_string()),
                    ],
                );
            }
        }
    }

    FieldOutcome::Pass
}

/// Whole years elapsed between `birth` and `reference`, counting a birthday only once it has
/// passed.
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> i64 {
    let mut age = i64::from(reference.year()) - i64::from(birth.year());
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn unreadable(raw: &str, expected: &str) -> FieldOutcome {
    FieldOutcome::Warning(format!("'{raw}' could not be read as {expected}"))
}

fn warning(template: &str, values: &[(&str, String)]) -> FieldOutcome {
    let message = values
        .iter()
        .fold(template.to_string(), |message, (key, value)| {
            message.replace(&format!("{{{key}}}"), value)
        });
    FieldOutcome::Warning(message)
}
