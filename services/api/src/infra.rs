use admission_intake::admission::{
    AdmissionIntakeService, IntakeServiceError, JsonFileRuleStore, RepositoryError, RuleSet,
    RuleStore, RuleStoreError, SubmissionRecord, SubmissionRepository,
};
use admission_intake::config::IntakeConfig;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type IntakeService =
    AdmissionIntakeService<InMemorySubmissionRepository, RuleStoreBackend>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict(record.id));
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRuleStore {
    saved: Arc<Mutex<Option<RuleSet>>>,
}

impl RuleStore for InMemoryRuleStore {
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError> {
        Ok(self.saved.lock().expect("rule store mutex poisoned").clone())
    }

    fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError> {
        *self.saved.lock().expect("rule store mutex poisoned") = Some(rules.clone());
        Ok(())
    }
}

/// Rule overrides live on disk when `APP_RULES_PATH` is set, otherwise in memory.
pub(crate) enum RuleStoreBackend {
    File(JsonFileRuleStore),
    Memory(InMemoryRuleStore),
}

impl RuleStoreBackend {
    pub(crate) fn from_config(config: &IntakeConfig) -> Self {
        match &config.rules_path {
            Some(path) => Self::File(JsonFileRuleStore::new(path.clone())),
            None => Self::Memory(InMemoryRuleStore::default()),
        }
    }
}

impl RuleStore for RuleStoreBackend {
    fn load(&self) -> Result<Option<RuleSet>, RuleStoreError> {
        match self {
            Self::File(store) => store.load(),
            Self::Memory(store) => store.load(),
        }
    }

    fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError> {
        match self {
            Self::File(store) => store.save(rules),
            Self::Memory(store) => store.save(rules),
        }
    }
}

pub(crate) fn build_service(config: &IntakeConfig) -> Result<IntakeService, IntakeServiceError> {
    AdmissionIntakeService::new(
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(RuleStoreBackend::from_config(config)),
        config,
    )
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_and_trims() {
        let parsed = parse_date(" 2025-01-01 ").expect("date parses");
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn parse_date_reports_the_raw_input() {
        let err = parse_date("01/01/2025").unwrap_err();
        assert!(err.contains("01/01/2025"), "{err}");
    }

    #[test]
    fn memory_rule_store_is_used_without_a_rules_path() {
        let backend = RuleStoreBackend::from_config(&IntakeConfig::default());
        assert!(matches!(backend, RuleStoreBackend::Memory(_)));
        assert!(backend.load().expect("load").is_none());

        let rules = RuleSet::defaults();
        backend.save(&rules).expect("save");
        assert_eq!(backend.load().expect("load"), Some(rules));
    }
}
