use serde::{Deserialize, Serialize};

use super::{FieldDependency, FieldPattern, FieldRule, RuleConfigError, SoftCheck};
use crate::admission::domain::IntakeField;

/// Single-attribute edit issued by the rule configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "camelCase")]
pub enum RulePatch {
    Required(bool),
    MinLength(Option<usize>),
    Pattern(Option<String>),
    ForbiddenValue(Option<String>),
    Dependency(Option<FieldDependency>),
    ErrorMessage(String),
    RequiredMessage(Option<String>),
    ForbiddenMessage(Option<String>),
    AgeRange { min: u32, max: u32 },
    YearRange { min: i32, max: i32 },
    Thresholds { percentage: f64, cgpa: f64 },
    Minimum(f64),
    ExceptionAllowed(bool),
}

impl RulePatch {
    pub fn attribute(&self) -> &'static str {
        match self {
            RulePatch::Required(_) => "required",
            RulePatch::MinLength(_) => "minLength",
            RulePatch::Pattern(_) => "pattern",
            RulePatch::ForbiddenValue(_) => "forbiddenValue",
            RulePatch::Dependency(_) => "dependency",
            RulePatch::ErrorMessage(_) => "errorMessage",
            RulePatch::RequiredMessage(_) => "requiredMessage",
            RulePatch::ForbiddenMessage(_) => "forbiddenMessage",
            RulePatch::AgeRange { .. } => "ageRange",
            RulePatch::YearRange { .. } => "yearRange",
            RulePatch::Thresholds { .. } => "thresholds",
            RulePatch::Minimum(_) => "minimum",
            RulePatch::ExceptionAllowed(_) => "exceptionAllowed",
        }
    }

    pub(super) fn apply(
        self,
        field: IntakeField,
        rule: FieldRule,
    ) -> Result<FieldRule, RuleConfigError> {
        let attribute = self.attribute();
        let mismatch = |rule: &FieldRule| RuleConfigError::AttributeMismatch {
            field,
            kind: rule.kind(),
            attribute,
        };

        match (rule, self) {
            (FieldRule::Strict(mut strict), patch) => {
                match patch {
                    RulePatch::Required(required) => strict.required = required,
                    RulePatch::MinLength(min_length) => strict.min_length = min_length,
                    RulePatch::Pattern(pattern) => {
                        strict.pattern = pattern
                            .as_deref()
                            .map(FieldPattern::new)
                            .transpose()?;
                    }
                    RulePatch::ForbiddenValue(value) => strict.forbidden_value = value,
                    RulePatch::Dependency(dependency) => strict.dependency = dependency,
                    RulePatch::ErrorMessage(message) => strict.error_message = message,
                    RulePatch::RequiredMessage(message) => strict.required_message = message,
                    RulePatch::ForbiddenMessage(message) => strict.forbidden_message = message,
                    _ => return Err(mismatch(&FieldRule::Strict(strict))),
                }
                Ok(FieldRule::Strict(strict))
            }
            (FieldRule::Soft(mut soft), patch) => {
                match (soft.check.clone(), patch) {
                    (_, RulePatch::ErrorMessage(message)) => soft.error_message = message,
                    (_, RulePatch::ExceptionAllowed(allowed)) => soft.exception_allowed = allowed,
                    (SoftCheck::AgeRange { .. }, RulePatch::AgeRange { min, max }) => {
                        soft.check = SoftCheck::AgeRange { min, max };
                    }
                    (SoftCheck::YearRange { .. }, RulePatch::YearRange { min, max }) => {
                        soft.check = SoftCheck::YearRange { min, max };
                    }
                    (SoftCheck::Thresholds { .. }, RulePatch::Thresholds { percentage, cgpa }) => {
                        soft.check = SoftCheck::Thresholds { percentage, cgpa };
                    }
                    (SoftCheck::Minimum(_), RulePatch::Minimum(minimum)) => {
                        soft.check = SoftCheck::Minimum(minimum);
                    }
                    _ => return Err(mismatch(&FieldRule::Soft(soft))),
                }
                Ok(FieldRule::Soft(soft))
            }
        }
    }
}
