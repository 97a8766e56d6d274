//! Candidate admission intake: declarative field rules, waiver handling, and the audit log.
//!
//! Every change to the form triggers a full [`recompute`] over the current [`RuleSet`]. Strict
//! rules block submission outright; soft rules raise warnings that a justified exception can
//! resolve. More than [`FLAG_THRESHOLD`] active exceptions flag the submission for review.

pub mod domain;
pub mod evaluation;
pub mod export;
pub mod orchestrator;
pub mod rationale;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateForm, ExceptionRequest, ExceptionRequests, FieldValue, IntakeDraft, IntakeField,
    SubmissionId, SubmissionRecord,
};
pub use evaluation::{evaluate_field, EvaluationContext, FieldOutcome, DEFAULT_REFERENCE_DATE};
pub use export::{submissions_csv, write_submissions_csv};
pub use orchestrator::{
    classify_field, field_statuses, recompute, FieldStatus, ValidationReport, ValidationState,
    FLAG_THRESHOLD,
};
pub use rationale::{validate_rationale, RationaleError, MIN_RATIONALE_LENGTH, RATIONALE_KEYWORDS};
pub use repository::{AuditSummary, RepositoryError, SubmissionRepository};
pub use router::admission_router;
pub use rules::{
    FieldDependency, FieldPattern, FieldRule, JsonFileRuleStore, RuleConfigError, RulePatch,
    RuleSet, RuleStore, RuleStoreError, SoftCheck, SoftRule, StrictRule,
};
pub use service::{AdmissionIntakeService, IntakeServiceError};
