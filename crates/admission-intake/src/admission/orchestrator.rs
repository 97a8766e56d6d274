//! Full recomputation of derived validation state from one snapshot of inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateForm, ExceptionRequests, IntakeField};
use super::evaluation::{evaluate_field, EvaluationContext, FieldOutcome};
use super::rationale::validate_rationale;
use super::rules::{FieldRule, RuleSet};

/// A submission is flagged for secondary review above this many active exceptions.
pub const FLAG_THRESHOLD: usize = 2;

const EXCEPTION_NOT_ALLOWED: &str = "Exceptions are not allowed for this field";

/// Derived state; never patched, always rebuilt by [`recompute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationState {
    pub rules_version: u64,
    pub errors: BTreeMap<IntakeField, String>,
    pub warnings: BTreeMap<IntakeField, String>,
    pub rationale_errors: BTreeMap<IntakeField, String>,
    pub active_exception_count: usize,
    pub flagged: bool,
    pub is_valid: bool,
}

impl ValidationState {
    /// A warning is resolved once an exception was requested with an accepted rationale.
    pub fn is_resolved(&self, field: IntakeField, exceptions: &ExceptionRequests) -> bool {
        self.warnings.contains_key(&field)
            && !self.rationale_errors.contains_key(&field)
            && exceptions
                .get(&field)
                .map(|request| request.requested)
                .unwrap_or(false)
    }

    pub fn unresolved_warnings<'a>(
        &'a self,
        exceptions: &'a ExceptionRequests,
    ) -> impl Iterator<Item = IntakeField> + 'a {
        self.warnings
            .keys()
            .copied()
            .filter(move |field| !self.is_resolved(*field, exceptions))
    }

    /// Rationales of the exceptions counted toward `active_exception_count`.
    pub fn resolved_exceptions(
        &self,
        exceptions: &ExceptionRequests,
    ) -> BTreeMap<IntakeField, String> {
        self.warnings
            .keys()
            .filter(|field| self.is_resolved(**field, exceptions))
            .filter_map(|field| {
                exceptions
                    .get(field)
                    .map(|request| (*field, request.rationale.trim().to_string()))
            })
            .collect()
    }
}

/// Evaluate every rule, settle exceptions, and derive flag and validity. Pure and idempotent.
pub fn recompute(
    form: &CandidateForm,
    exceptions: &ExceptionRequests,
    rules: &RuleSet,
    context: &EvaluationContext,
) -> ValidationState {
    let mut errors = BTreeMap::new();
    let mut warnings = BTreeMap::new();

    for (field, rule) in rules.iter() {
        match evaluate_field(rule, form.value(field), form, context) {
            FieldOutcome::Pass => {}
            FieldOutcome::Error(message) => {
                errors.insert(field, message);
            }
            FieldOutcome::Warning(message) => {
                warnings.insert(field, message);
            }
        }
    }

    let mut rationale_errors = BTreeMap::new();
    let mut active_exception_count = 0;
    let mut unresolved = 0;

    for field in warnings.keys() {
        let Some(request) = exceptions.get(field).filter(|request| request.requested) else {
            unresolved += 1;
            continue;
        };

        let waivable = matches!(
            rules.rule(*field),
            Some(FieldRule::Soft(soft)) if soft.exception_allowed
        );
        if !waivable {
            rationale_errors.insert(*field, EXCEPTION_NOT_ALLOWED.to_string());
            unresolved += 1;
            continue;
        }

        match validate_rationale(&request.rationale) {
            Ok(()) => active_exception_count += 1,
            Err(err) => {
                rationale_errors.insert(*field, err.to_string());
                unresolved += 1;
            }
        }
    }

    let required_filled = rules
        .required_fields()
        .all(|field| !form.value(field).is_blank());

    ValidationState {
        rules_version: rules.version(),
        is_valid: errors.is_empty() && required_filled && unresolved == 0,
        errors,
        warnings,
        rationale_errors,
        active_exception_count,
        flagged: active_exception_count > FLAG_THRESHOLD,
    }
}

/// Display category for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldStatus {
    Error,
    Warning,
    Valid,
    Idle,
}

pub fn classify_field(
    field: IntakeField,
    form: &CandidateForm,
    exceptions: &ExceptionRequests,
    state: &ValidationState,
) -> FieldStatus {
    if state.errors.contains_key(&field) {
        return FieldStatus::Error;
    }
    if state.warnings.contains_key(&field) {
        return if state.is_resolved(field, exceptions) {
            FieldStatus::Valid
        } else {
            FieldStatus::Warning
        };
    }
    if form.value(field).is_active() {
        FieldStatus::Valid
    } else {
        FieldStatus::Idle
    }
}

pub fn field_statuses(
    form: &CandidateForm,
    exceptions: &ExceptionRequests,
    state: &ValidationState,
) -> BTreeMap<IntakeField, FieldStatus> {
    IntakeField::ALL
        .into_iter()
        .map(|field| (field, classify_field(field, form, exceptions, state)))
        .collect()
}

/// Validation state plus per-field display status, as returned to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(flatten)]
    pub state: ValidationState,
    pub field_status: BTreeMap<IntakeField, FieldStatus>,
}

impl ValidationReport {
    pub fn new(
        form: &CandidateForm,
        exceptions: &ExceptionRequests,
        state: ValidationState,
    ) -> Self {
        let field_status = field_statuses(form, exceptions, &state);
        Self {
            state,
            field_status,
        }
    }
}
