use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::domain::{IntakeDraft, IntakeField, SubmissionId, SubmissionRecord};
use super::evaluation::EvaluationContext;
use super::orchestrator::{recompute, ValidationReport, ValidationState};
use super::repository::{RepositoryError, SubmissionRepository};
use super::rules::{FieldRule, RuleConfigError, RulePatch, RuleSet, RuleStore, RuleStoreError};
use crate::config::IntakeConfig;

/// Facade composing the rule store, validation engine, and submission log.
pub struct AdmissionIntakeService<R, S> {
    repository: Arc<R>,
    rule_store: Arc<S>,
    rules: RwLock<RuleSet>,
    reference_date: NaiveDate,
    sequence: AtomicU64,
}

impl<R, S> AdmissionIntakeService<R, S>
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    /// Build the service, starting from persisted rule overrides when the store has any.
    pub fn new(
        repository: Arc<R>,
        rule_store: Arc<S>,
        config: &IntakeConfig,
    ) -> Result<Self, IntakeServiceError> {
        let rules = match rule_store.load()? {
            Some(rules) => {
                info!(version = rules.version(), "loaded persisted rule overrides");
                rules
            }
            None => RuleSet::defaults(),
        };

        let next_id = repository
            .list()?
            .iter()
            .map(|record| record.id.0)
            .max()
            .unwrap_or(0)
            + 1;

        Ok(Self {
            repository,
            rule_store,
            rules: RwLock::new(rules),
            reference_date: config.reference_date,
            sequence: AtomicU64::new(next_id),
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Snapshot of the active rule set.
    pub fn rules(&self) -> RuleSet {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn context(&self, draft: &IntakeDraft) -> EvaluationContext {
        EvaluationContext::new(self.reference_date).with_cgpa(draft.is_cgpa)
    }

    /// Recompute validation state for the draft against the current rules.
    pub fn validate(&self, draft: &IntakeDraft) -> ValidationState {
        let rules = self.rules();
        recompute(&draft.form, &draft.exceptions, &rules, &self.context(draft))
    }

    pub fn report(&self, draft: &IntakeDraft) -> ValidationReport {
        let state = self.validate(draft);
        ValidationReport::new(&draft.form, &draft.exceptions, state)
    }

    /// Record the draft if it passes validation. Refused drafts are never stored.
    pub fn submit(&self, draft: IntakeDraft) -> Result<SubmissionRecord, IntakeServiceError> {
        let state = self.validate(&draft);
        if !state.is_valid {
            return Err(IntakeServiceError::Invalid(Box::new(state)));
        }

        let exceptions = state.resolved_exceptions(&draft.exceptions);
        let id = SubmissionId(self.sequence.fetch_add(1, Ordering::Relaxed));
        let record = SubmissionRecord {
            form: draft.form,
            exception_count: state.active_exception_count,
            exceptions,
            flagged: state.flagged,
            is_cgpa: draft.is_cgpa,
            timestamp: Utc::now(),
            id,
        };

        let stored = self.repository.insert(record)?;
        if stored.flagged {
            warn!(
                submission_id = %stored.id,
                exception_count = stored.exception_count,
                "submission flagged for secondary review"
            );
        } else {
            info!(
                submission_id = %stored.id,
                exception_count = stored.exception_count,
                "submission recorded"
            );
        }
        Ok(stored)
    }

    pub fn submissions(&self) -> Result<Vec<SubmissionRecord>, IntakeServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn clear_submissions(&self) -> Result<usize, IntakeServiceError> {
        let removed = self.repository.clear()?;
        info!(removed, "submission log cleared");
        Ok(removed)
    }

    pub fn replace_rules(
        &self,
        rules: BTreeMap<IntakeField, FieldRule>,
    ) -> Result<RuleSet, IntakeServiceError> {
        self.edit_rules(|set| set.replace(rules))
    }

    pub fn set_rule(
        &self,
        field: IntakeField,
        rule: FieldRule,
    ) -> Result<RuleSet, IntakeServiceError> {
        self.edit_rules(|set| set.set_rule(field, rule))
    }

    pub fn patch_rule(
        &self,
        field: IntakeField,
        patch: RulePatch,
    ) -> Result<RuleSet, IntakeServiceError> {
        let attribute = patch.attribute();
        let updated = self.edit_rules(|set| set.patch(field, patch))?;
        info!(%field, attribute, version = updated.version(), "rule attribute updated");
        Ok(updated)
    }

    /// Return to the built-in rules under a new version, persisted like any other edit.
    pub fn reset_rules(&self) -> Result<RuleSet, IntakeServiceError> {
        let reset = self.edit_rules(|set| {
            set.reset();
            Ok(())
        })?;
        info!(version = reset.version(), "rules reset to defaults");
        Ok(reset)
    }

    // Edits apply to a copy that is persisted before it becomes visible.
    fn edit_rules<F>(&self, edit: F) -> Result<RuleSet, IntakeServiceError>
    where
        F: FnOnce(&mut RuleSet) -> Result<(), RuleConfigError>,
    {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = guard.clone();
        edit(&mut candidate)?;
        self.rule_store.save(&candidate)?;
        *guard = candidate.clone();
        info!(version = candidate.version(), "rule set updated");
        Ok(candidate)
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(
        "submission blocked: {} error(s), {} warning(s), {} rationale issue(s)",
        .0.errors.len(),
        .0.warnings.len(),
        .0.rationale_errors.len()
    )]
    Invalid(Box<ValidationState>),
    #[error(transparent)]
    RuleConfig(#[from] RuleConfigError),
    #[error(transparent)]
    RuleStore(#[from] RuleStoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
