use super::common::*;
use crate::admission::domain::{CandidateForm, ExceptionRequest, ExceptionRequests, IntakeField};
use crate::admission::orchestrator::{classify_field, field_statuses, recompute, FieldStatus};
use crate::admission::rules::{RulePatch, RuleSet};

const WARNED: [IntakeField; 4] = [
    IntakeField::Dob,
    IntakeField::GradYear,
    IntakeField::Score,
    IntakeField::ScreeningScore,
];

#[test]
fn empty_form_reports_every_required_field() {
    let rules = RuleSet::defaults();
    let state = recompute(
        &CandidateForm::default(),
        &ExceptionRequests::new(),
        &rules,
        &context(),
    );

    let required: Vec<_> = rules.required_fields().collect();
    assert_eq!(required.len(), 6);
    for field in required {
        assert!(state.errors.contains_key(&field), "missing error for {field}");
    }
    assert!(state.warnings.is_empty());
    assert!(!state.is_valid);
}

#[test]
fn clean_form_is_valid() {
    let state = recompute(
        &valid_form(),
        &ExceptionRequests::new(),
        &RuleSet::defaults(),
        &context(),
    );

    assert!(state.errors.is_empty());
    assert!(state.warnings.is_empty());
    assert_eq!(state.active_exception_count, 0);
    assert!(!state.flagged);
    assert!(state.is_valid);
}

#[test]
fn rejected_status_blocks_regardless_of_other_fields() {
    let mut form = valid_form();
    form.status = "Rejected".to_string();

    let state = recompute(
        &form,
        &waivers(&WARNED),
        &RuleSet::defaults(),
        &context(),
    );

    assert!(state.errors.contains_key(&IntakeField::Status));
    assert!(state.errors.contains_key(&IntakeField::OfferSent));
    assert!(!state.is_valid);
}

#[test]
fn unresolved_warning_blocks_until_waived() {
    let mut form = valid_form();
    form.dob = "2007-06-01".to_string();
    let rules = RuleSet::defaults();

    let unresolved = recompute(&form, &ExceptionRequests::new(), &rules, &context());
    assert!(unresolved.warnings.contains_key(&IntakeField::Dob));
    assert!(unresolved.errors.is_empty());
    assert!(!unresolved.is_valid);

    let waived = recompute(&form, &waivers(&[IntakeField::Dob]), &rules, &context());
    assert!(waived.warnings.contains_key(&IntakeField::Dob));
    assert_eq!(waived.active_exception_count, 1);
    assert!(waived.is_valid);
}

#[test]
fn invalid_rationale_keeps_warning_unresolved() {
    let mut form = valid_form();
    form.dob = "1985-03-10".to_string();
    let mut exceptions = ExceptionRequests::new();
    exceptions.insert(IntakeField::Dob, ExceptionRequest::with_rationale("too short"));

    let state = recompute(&form, &exceptions, &RuleSet::defaults(), &context());

    let message = state
        .rationale_errors
        .get(&IntakeField::Dob)
        .expect("rationale error recorded");
    assert!(message.contains("at least 30 characters"));
    assert_eq!(state.active_exception_count, 0);
    assert!(!state.is_valid);
}

#[test]
fn unrequested_exception_text_is_ignored() {
    let mut form = valid_form();
    form.score = "50".to_string();
    let mut exceptions = ExceptionRequests::new();
    exceptions.insert(
        IntakeField::Score,
        ExceptionRequest {
            requested: false,
            rationale: WAIVER.to_string(),
        },
    );

    let state = recompute(&form, &exceptions, &RuleSet::defaults(), &context());

    assert_eq!(state.active_exception_count, 0);
    assert!(state.rationale_errors.is_empty());
    assert!(!state.is_valid);
}

#[test]
fn exceptions_without_a_warning_do_not_count() {
    let state = recompute(
        &valid_form(),
        &waivers(&WARNED),
        &RuleSet::defaults(),
        &context(),
    );

    assert_eq!(state.active_exception_count, 0);
    assert!(state.is_valid);
}

#[test]
fn three_active_exceptions_flag_the_form() {
    let rules = RuleSet::defaults();

    let two = recompute(
        &borderline_form(),
        &waivers(&WARNED[..2]),
        &rules,
        &context(),
    );
    assert_eq!(two.active_exception_count, 2);
    assert!(!two.flagged);
    assert!(!two.is_valid);

    let three = recompute(
        &borderline_form(),
        &waivers(&WARNED[..3]),
        &rules,
        &context(),
    );
    assert_eq!(three.active_exception_count, 3);
    assert!(three.flagged);
    assert!(!three.is_valid);

    let all = recompute(&borderline_form(), &waivers(&WARNED), &rules, &context());
    assert_eq!(all.active_exception_count, 4);
    assert!(all.flagged);
    assert!(all.is_valid);
}

#[test]
fn recompute_is_idempotent() {
    let rules = RuleSet::defaults();
    let form = borderline_form();
    let exceptions = waivers(&WARNED[..1]);

    let first = recompute(&form, &exceptions, &rules, &context());
    let second = recompute(&form, &exceptions, &rules, &context());

    assert_eq!(first, second);
}

#[test]
fn state_carries_the_rule_version_it_was_computed_with() {
    let mut rules = RuleSet::defaults();
    rules
        .patch(IntakeField::ScreeningScore, RulePatch::Minimum(80.0))
        .expect("patch applies");

    let state = recompute(&valid_form(), &ExceptionRequests::new(), &rules, &context());

    assert_eq!(state.rules_version, 2);
    assert!(state.warnings.contains_key(&IntakeField::ScreeningScore));
}

#[test]
fn non_waivable_rules_reject_exception_requests() {
    let mut rules = RuleSet::defaults();
    rules
        .patch(IntakeField::GradYear, RulePatch::ExceptionAllowed(false))
        .expect("patch applies");
    let mut form = valid_form();
    form.grad_year = "2010".to_string();

    let state = recompute(&form, &waivers(&[IntakeField::GradYear]), &rules, &context());

    assert!(state.rationale_errors.contains_key(&IntakeField::GradYear));
    assert_eq!(state.active_exception_count, 0);
    assert!(!state.is_valid);
}

#[test]
fn resolved_exceptions_list_only_accepted_rationales() {
    let form = borderline_form();
    let mut exceptions = waivers(&[IntakeField::Dob, IntakeField::Score]);
    exceptions.insert(
        IntakeField::GradYear,
        ExceptionRequest::with_rationale("needs review"),
    );

    let state = recompute(&form, &exceptions, &RuleSet::defaults(), &context());
    let resolved = state.resolved_exceptions(&exceptions);

    assert_eq!(
        resolved.keys().copied().collect::<Vec<_>>(),
        vec![IntakeField::Dob, IntakeField::Score]
    );
    assert_eq!(resolved[&IntakeField::Dob], WAIVER);
}

#[test]
fn classifier_maps_state_to_display_categories() {
    let mut form = borderline_form();
    form.email = "not-an-email".to_string();
    form.screening_score = String::new();
    let exceptions = waivers(&[IntakeField::Dob]);
    let state = recompute(&form, &exceptions, &RuleSet::defaults(), &context());

    assert_eq!(
        classify_field(IntakeField::Email, &form, &exceptions, &state),
        FieldStatus::Error
    );
    assert_eq!(
        classify_field(IntakeField::GradYear, &form, &exceptions, &state),
        FieldStatus::Warning
    );
    assert_eq!(
        classify_field(IntakeField::Dob, &form, &exceptions, &state),
        FieldStatus::Valid
    );
    assert_eq!(
        classify_field(IntakeField::FullName, &form, &exceptions, &state),
        FieldStatus::Valid
    );
    assert_eq!(
        classify_field(IntakeField::ScreeningScore, &form, &exceptions, &state),
        FieldStatus::Idle
    );

    let statuses = field_statuses(&form, &exceptions, &state);
    assert_eq!(statuses.len(), IntakeField::ALL.len());
    assert_eq!(statuses[&IntakeField::OfferSent], FieldStatus::Valid);
}
