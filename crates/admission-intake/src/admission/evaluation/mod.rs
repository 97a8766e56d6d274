mod soft;
mod strict;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CandidateForm, FieldValue};
use super::rules::FieldRule;

pub use soft::age_on;

/// Date ages are measured against unless configured otherwise.
pub const DEFAULT_REFERENCE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(date) => date,
    None => panic!("default reference date is a valid calendar date"),
};

/// Inputs outside the form that influence evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    pub reference_date: NaiveDate,
    /// Selects the CGPA threshold instead of the percentage threshold.
    pub is_cgpa: bool,
}

impl EvaluationContext {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            is_cgpa: false,
        }
    }

    pub fn with_cgpa(mut self, is_cgpa: bool) -> Self {
        self.is_cgpa = is_cgpa;
        self
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_DATE)
    }
}

/// Result of checking one value against one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "camelCase")]
pub enum FieldOutcome {
    Pass,
    Error(String),
    Warning(String),
}

impl FieldOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, FieldOutcome::Pass)
    }
}

/// Check `value` against `rule`. `form` supplies the fields a dependency refers to.
pub fn evaluate_field(
    rule: &FieldRule,
    value: FieldValue<'_>,
    form: &CandidateForm,
    context: &EvaluationContext,
) -> FieldOutcome {
    match rule {
        FieldRule::Strict(strict) => strict::evaluate(strict, value, form),
        FieldRule::Soft(soft) => soft::evaluate(soft, value, context),
    }
}
