//! Declarative per-field rules and the versioned rule set handed to every validation pass.

mod defaults;
mod patch;
pub mod store;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::IntakeField;

pub use patch::RulePatch;
pub use store::{JsonFileRuleStore, RuleStore, RuleStoreError};

/// One rule per field: strict rules block submission, soft rules can be waived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldRule {
    Strict(StrictRule),
    Soft(SoftRule),
}

impl FieldRule {
    pub fn is_required(&self) -> bool {
        matches!(self, FieldRule::Strict(rule) if rule.required)
    }

    pub fn error_message(&self) -> &str {
        match self {
            FieldRule::Strict(rule) => &rule.error_message,
            FieldRule::Soft(rule) => &rule.error_message,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            FieldRule::Strict(_) => "strict",
            FieldRule::Soft(_) => "soft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrictRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<FieldPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<FieldDependency>,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden_message: Option<String>,
}

impl StrictRule {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            required: false,
            min_length: None,
            pattern: None,
            forbidden_value: None,
            dependency: None,
            error_message: error_message.into(),
            required_message: None,
            forbidden_message: None,
        }
    }

    pub fn required_message(&self) -> &str {
        self.required_message
            .as_deref()
            .unwrap_or(&self.error_message)
    }

    pub fn forbidden_message(&self) -> &str {
        self.forbidden_message
            .as_deref()
            .unwrap_or(&self.error_message)
    }
}

/// Compiled regular expression that travels as its source text.
#[derive(Debug, Clone)]
pub struct FieldPattern(Regex);

impl FieldPattern {
    pub fn new(source: &str) -> Result<Self, RuleConfigError> {
        Regex::new(source)
            .map(Self)
            .map_err(|source_error| RuleConfigError::InvalidPattern {
                pattern: source.to_string(),
                source: source_error,
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldPattern::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Cross-field constraint: when the owning field is active, `on_field` must hold an allowed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDependency {
    pub on_field: IntakeField,
    pub allowed_values: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftRule {
    #[serde(flatten)]
    pub check: SoftCheck,
    pub error_message: String,
    #[serde(default = "exception_allowed_default")]
    pub exception_allowed: bool,
}

fn exception_allowed_default() -> bool {
    true
}

impl SoftRule {
    pub fn new(check: SoftCheck, error_message: impl Into<String>) -> Self {
        Self {
            check,
            error_message: error_message.into(),
            exception_allowed: true,
        }
    }
}

/// Overridable checks. Message templates may use `{min}`, `{max}`, `{age}`, `{year}`,
/// `{value}` and `{threshold}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftCheck {
    AgeRange { min: u32, max: u32 },
    YearRange { min: i32, max: i32 },
    Thresholds { percentage: f64, cgpa: f64 },
    Minimum(f64),
}

/// Errors raised while building or editing a rule set.
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("no rule configured for field '{0}'")]
    MissingRule(IntakeField),
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("range for field '{field}' is inverted (min {min} > max {max})")]
    InvalidRange { field: IntakeField, min: f64, max: f64 },
    #[error("field '{field}' has a {kind} rule without attribute '{attribute}'")]
    AttributeMismatch {
        field: IntakeField,
        kind: &'static str,
        attribute: &'static str,
    },
    #[error("field '{0}' cannot depend on itself")]
    SelfDependency(IntakeField),
}

/// Versioned, complete mapping from field to rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleSetDocument")]
pub struct RuleSet {
    version: u64,
    rules: BTreeMap<IntakeField, FieldRule>,
}

#[derive(Deserialize)]
struct RuleSetDocument {
    #[serde(default = "initial_version")]
    version: u64,
    rules: BTreeMap<IntakeField, FieldRule>,
}

fn initial_version() -> u64 {
    1
}

impl TryFrom<RuleSetDocument> for RuleSet {
    type Error = RuleConfigError;

    fn try_from(document: RuleSetDocument) -> Result<Self, Self::Error> {
        let mut rules = RuleSet::from_rules(document.rules)?;
        rules.version = document.version;
        Ok(rules)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl RuleSet {
    /// Built-in admission rule table.
    pub fn defaults() -> Self {
        Self {
            version: initial_version(),
            rules: defaults::default_rules(),
        }
    }

    /// Build a rule set, rejecting maps that leave any field without a rule.
    pub fn from_rules(rules: BTreeMap<IntakeField, FieldRule>) -> Result<Self, RuleConfigError> {
        validate_rules(&rules)?;
        Ok(Self {
            version: initial_version(),
            rules,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rule(&self, field: IntakeField) -> Option<&FieldRule> {
        self.rules.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntakeField, &FieldRule)> {
        self.rules.iter().map(|(field, rule)| (*field, rule))
    }

    pub fn rules(&self) -> &BTreeMap<IntakeField, FieldRule> {
        &self.rules
    }

    /// Fields whose strict rule marks them as required.
    pub fn required_fields(&self) -> impl Iterator<Item = IntakeField> + '_ {
        self.iter()
            .filter(|(_, rule)| rule.is_required())
            .map(|(field, _)| field)
    }

    pub fn replace(
        &mut self,
        rules: BTreeMap<IntakeField, FieldRule>,
    ) -> Result<(), RuleConfigError> {
        validate_rules(&rules)?;
        self.rules = rules;
        self.version += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.rules = defaults::default_rules();
        self.version += 1;
    }

    pub fn set_rule(&mut self, field: IntakeField, rule: FieldRule) -> Result<(), RuleConfigError> {
        validate_rule(field, &rule)?;
        self.rules.insert(field, rule);
        self.version += 1;
        Ok(())
    }

    /// Apply a single-attribute edit. The set is untouched when the edit fails.
    pub fn patch(&mut self, field: IntakeField, patch: RulePatch) -> Result<(), RuleConfigError> {
        let current = self
            .rules
            .get(&field)
            .ok_or(RuleConfigError::MissingRule(field))?;
        let updated = patch.apply(field, current.clone())?;
        validate_rule(field, &updated)?;
        self.rules.insert(field, updated);
        self.version += 1;
        Ok(())
    }
}

fn validate_rules(rules: &BTreeMap<IntakeField, FieldRule>) -> Result<(), RuleConfigError> {
    for field in IntakeField::ALL {
        let rule = rules.get(&field).ok_or(RuleConfigError::MissingRule(field))?;
        validate_rule(field, rule)?;
    }
    Ok(())
}

fn validate_rule(field: IntakeField, rule: &FieldRule) -> Result<(), RuleConfigError> {
    match rule {
        FieldRule::Strict(strict) => {
            if let Some(dependency) = &strict.dependency {
                if dependency.on_field == field {
                    return Err(RuleConfigError::SelfDependency(field));
                }
            }
            Ok(())
        }
        FieldRule::Soft(soft) => match soft.check {
            SoftCheck::AgeRange { min, max } if min > max => Err(RuleConfigError::InvalidRange {
                field,
                min: f64::from(min),
                max: f64::from(max),
            }),
            SoftCheck::YearRange { min, max } if min > max => Err(RuleConfigError::InvalidRange {
                field,
                min: f64::from(min),
                max: f64::from(max),
            }),
            _ => Ok(()),
        },
    }
}
