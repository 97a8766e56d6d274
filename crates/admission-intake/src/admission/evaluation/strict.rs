use super::FieldOutcome;
use crate::admission::domain::{CandidateForm, FieldValue};
use crate::admission::rules::StrictRule;

/// Checks run in order; the first failure is the only one reported.
pub(super) fn evaluate(
    rule: &StrictRule,
    value: FieldValue<'_>,
    form: &CandidateForm,
) -> FieldOutcome {
    if rule.required && value.is_blank() {
        return FieldOutcome::Error(rule.required_message().to_string());
    }

    // Length and pattern see the value as entered.
    if let Some(text) = value.raw() {
        if let Some(min_length) = rule.min_length {
            if text.chars().count() < min_length {
                return FieldOutcome::Error(rule.error_message.clone());
            }
        }

        if let Some(pattern) = &rule.pattern {
            if !text.is_empty() && !pattern.is_match(text) {
                return FieldOutcome::Error(rule.error_message.clone());
            }
        }
    }

    if let Some(forbidden) = &rule.forbidden_value {
        if value.as_comparable() == *forbidden {
            return FieldOutcome::Error(rule.forbidden_message().to_string());
        }
    }

    if let Some(dependency) = &rule.dependency {
        if value.is_active() {
            let current = form.value(dependency.on_field).as_comparable();
            if !dependency.allowed_values.contains(&current) {
                return FieldOutcome::Error(rule.error_message.clone());
            }
        }
    }

    FieldOutcome::Pass
}
