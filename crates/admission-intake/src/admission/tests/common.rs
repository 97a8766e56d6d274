use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::admission::domain::{
    CandidateForm, ExceptionRequest, ExceptionRequests, IntakeDraft, IntakeField, SubmissionRecord,
};
use crate::admission::evaluation::EvaluationContext;
use crate::admission::repository::{RepositoryError, SubmissionRepository};
use crate::admission::rules::{RuleSet, RuleStore, RuleStoreError};
use crate::admission::service::AdmissionIntakeService;
use crate::config::IntakeConfig;

pub(super) const WAIVER: &str = "Approved by the admissions director after interview";

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

pub(super) fn context() -> EvaluationContext {
    EvaluationContext::new(reference_date())
}

pub(super) fn valid_form() -> CandidateForm {
    CandidateForm {
        full_name: "Asha Verma".to_string(),
        email: "asha.verma@example.com".to_string(),
        phone: "9876543210".to_string(),
        dob: "2000-05-15".to_string(),
        qualification: "B.Tech".to_string(),
        grad_year: "2021".to_string(),
        score: "78".to_string(),
        screening_score: "72".to_string(),
        status: "Selected".to_string(),
        aadhaar: "123456789012".to_string(),
        offer_sent: true,
    }
}

/// Valid strict fields with four soft warnings: age 17, 2012 graduate, 45%, screening 30.
pub(super) fn borderline_form() -> CandidateForm {
    CandidateForm {
        dob: "2007-06-01".to_string(),
        grad_year: "2012".to_string(),
        score: "45".to_string(),
        screening_score: "30".to_string(),
        ..valid_form()
    }
}

pub(super) fn waivers(fields: &[IntakeField]) -> ExceptionRequests {
    fields
        .iter()
        .map(|field| (*field, ExceptionRequest::with_rationale(WAIVER)))
        .collect()
}

pub(super) fn draft(form: CandidateForm, exceptions: ExceptionRequests) -> IntakeDraft {
    IntakeDraft {
        form,
        exceptions,
        is_cgpa: false,
    }
}

pub(super) fn intake_config() -> IntakeConfig {
    IntakeConfig {
        reference_date: reference_date(),
        rules_path: None,
    }
}

pub(super) fn build_service() -> (
    AdmissionIntakeService<MemoryRepository, MemoryRuleStore>,
    Arc<MemoryRepository>,
    Arc<MemoryRuleStore>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let store = Arc::new(MemoryRuleStore::default());
    let service = AdmissionIntakeService::new(repository.clone(), store.clone(), &intake_config())
        .expect("service builds");
    (service, repository, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict(record.id));
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("audit log offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("audit log offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRuleStore {
    pub(super) saved: Arc<Mutex<Option<RuleSet>>>,
}

impl MemoryRuleStore {
    pub(super) fn with(rules: RuleSet) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Some(rules))),
        }
    }

    pub(super) fn saved(&self) -> Option<RuleSet> {
        self.saved.lock().expect("store mutex poisoned").clone()
    }
}

impl RuleStore for MemoryRuleStore {
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError> {
        Ok(self.saved())
    }

    fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError> {
        *self.saved.lock().expect("store mutex poisoned") = Some(rules.clone());
        Ok(())
    }
}

pub(super) struct ReadOnlyRuleStore;

impl RuleStore for ReadOnlyRuleStore {
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError> {
        Ok(None)
    }

    fn save(&self, _rules: &RuleSet) -> Result<(), RuleStoreError> {
        Err(RuleStoreError::Unavailable("read only".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
