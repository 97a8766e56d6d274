use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::json;

use super::domain::{IntakeDraft, IntakeField};
use super::export::submissions_csv;
use super::orchestrator::ValidationReport;
use super::repository::{AuditSummary, SubmissionRepository};
use super::rules::{FieldRule, RulePatch, RuleSet, RuleStore};
use super::service::{AdmissionIntakeService, IntakeServiceError};

/// Router builder exposing validation, submission, and rule configuration endpoints.
pub fn admission_router<R, S>(service: Arc<AdmissionIntakeService<R, S>>) -> Router
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    Router::new()
        .route("/api/v1/admissions/validate", post(validate_handler::<R, S>))
        .route(
            "/api/v1/admissions/submissions",
            post(submit_handler::<R, S>)
                .get(list_handler::<R, S>)
                .delete(clear_handler::<R, S>),
        )
        .route(
            "/api/v1/admissions/submissions/export",
            get(export_handler::<R, S>),
        )
        .route(
            "/api/v1/admissions/rules",
            get(rules_handler::<R, S>).put(replace_rules_handler::<R, S>),
        )
        .route(
            "/api/v1/admissions/rules/reset",
            post(reset_rules_handler::<R, S>),
        )
        .route(
            "/api/v1/admissions/rules/:field",
            patch(patch_rule_handler::<R, S>).put(set_rule_handler::<R, S>),
        )
        .with_state(service)
}

type SharedService<R, S> = State<Arc<AdmissionIntakeService<R, S>>>;

pub(crate) async fn validate_handler<R, S>(
    State(service): SharedService<R, S>,
    axum::Json(draft): axum::Json<IntakeDraft>,
) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    let report = service.report(&draft);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn submit_handler<R, S>(
    State(service): SharedService<R, S>,
    axum::Json(draft): axum::Json<IntakeDraft>,
) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    let form = draft.form.clone();
    let exceptions = draft.exceptions.clone();

    match service.submit(draft) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(IntakeServiceError::Invalid(state)) => {
            let report = ValidationReport::new(&form, &exceptions, *state);
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(report)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn list_handler<R, S>(State(service): SharedService<R, S>) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    match service.submissions() {
        Ok(records) => {
            let summary = AuditSummary::from_records(&records);
            let payload = json!({
                "summary": summary,
                "submissions": records,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn clear_handler<R, S>(State(service): SharedService<R, S>) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    match service.clear_submissions() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn export_handler<R, S>(State(service): SharedService<R, S>) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    let records = match service.submissions() {
        Ok(records) => records,
        Err(other) => return error_response(other),
    };

    match submissions_csv(&records) {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"admission-submissions.csv\"",
                ),
            ],
            document,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": format!("csv export failed: {err}") });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rules_handler<R, S>(State(service): SharedService<R, S>) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    (StatusCode::OK, axum::Json(service.rules())).into_response()
}

pub(crate) async fn replace_rules_handler<R, S>(
    State(service): SharedService<R, S>,
    axum::Json(rules): axum::Json<BTreeMap<IntakeField, FieldRule>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    rule_set_response(service.replace_rules(rules))
}

pub(crate) async fn reset_rules_handler<R, S>(State(service): SharedService<R, S>) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    rule_set_response(service.reset_rules())
}

pub(crate) async fn patch_rule_handler<R, S>(
    State(service): SharedService<R, S>,
    Path(field): Path<IntakeField>,
    axum::Json(patch): axum::Json<RulePatch>,
) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    rule_set_response(service.patch_rule(field, patch))
}

pub(crate) async fn set_rule_handler<R, S>(
    State(service): SharedService<R, S>,
    Path(field): Path<IntakeField>,
    axum::Json(rule): axum::Json<FieldRule>,
) -> Response
where
    R: SubmissionRepository + 'static,
    S: RuleStore + 'static,
{
    rule_set_response(service.set_rule(field, rule))
}

fn rule_set_response(result: Result<RuleSet, IntakeServiceError>) -> Response {
    match result {
        Ok(rules) => (StatusCode::OK, axum::Json(rules)).into_response(),
        Err(other) => error_response(other),
    }
}

fn error_response(error: IntakeServiceError) -> Response {
    let status = match &error {
        IntakeServiceError::Invalid(_) | IntakeServiceError::RuleConfig(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IntakeServiceError::Repository(_) | IntakeServiceError::RuleStore(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
