use crate::infra::build_service;
use admission_intake::admission::{
    submissions_csv, AuditSummary, CandidateForm, ExceptionRequest, ExceptionRequests,
    IntakeDraft, IntakeField, IntakeServiceError, ValidationState,
};
use admission_intake::config::{AppConfig, IntakeConfig};
use admission_intake::error::AppError;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date candidate ages are computed against (YYYY-MM-DD). Defaults to APP_REFERENCE_DATE.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) reference_date: Option<NaiveDate>,
    /// Print the audit log as CSV after the walkthrough.
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON file holding `{ "form": {...}, "exceptions": {...}, "isCgpa": false }`
    pub(crate) draft: PathBuf,
    /// Date candidate ages are computed against (YYYY-MM-DD). Defaults to APP_REFERENCE_DATE.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) reference_date: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Ignore any stored overrides and print the built-in rule table.
    #[arg(long)]
    pub(crate) defaults: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs {
        draft,
        reference_date,
    } = args;

    let service = build_service(&intake_config(reference_date)?)?;
    let raw = std::fs::read_to_string(&draft)?;
    let draft: IntakeDraft = serde_json::from_str(&raw)?;

    let report = service.report(&draft);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?.intake;
    if args.defaults {
        config.rules_path = None;
    }

    let service = build_service(&config)?;
    println!("{}", serde_json::to_string_pretty(&service.rules())?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        reference_date,
        csv,
    } = args;

    let mut config = intake_config(reference_date)?;
    config.rules_path = None;
    let service = build_service(&config)?;

    println!("Admission intake demo");
    println!(
        "- reference date {} | rule set version {}",
        service.reference_date(),
        service.rules().version()
    );

    for (label, draft) in sample_drafts() {
        println!("\n{label}");
        render_state(&draft, &service.validate(&draft));
        match service.submit(draft) {
            Ok(record) => println!(
                "  submitted as #{} | {} exception(s){}",
                record.id,
                record.exception_count,
                if record.flagged { " | FLAGGED for review" } else { "" }
            ),
            Err(IntakeServiceError::Invalid(_)) => println!("  submission refused"),
            Err(err) => return Err(err.into()),
        }
    }

    let records = service.submissions()?;
    let summary = AuditSummary::from_records(&records);
    println!("\nAudit log");
    println!(
        "- {} submission(s) | {} flagged | {} with exceptions | {} exception(s) total",
        summary.total, summary.flagged, summary.with_exceptions, summary.total_exceptions
    );

    if csv {
        println!();
        print!("{}", submissions_csv(&records)?);
    }

    Ok(())
}

fn intake_config(reference_date: Option<NaiveDate>) -> Result<IntakeConfig, AppError> {
    let mut config = AppConfig::load()?.intake;
    if let Some(date) = reference_date {
        config.reference_date = date;
    }
    Ok(config)
}

fn render_state(draft: &IntakeDraft, state: &ValidationState) {
    for (field, message) in &state.errors {
        println!("  [error]   {}: {message}", field.label());
    }
    for (field, message) in &state.warnings {
        let marker = if state.is_resolved(*field, &draft.exceptions) {
            "waived"
        } else {
            "warning"
        };
        println!("  [{marker}] {}: {message}", field.label());
    }
    for (field, message) in &state.rationale_errors {
        println!("  [rationale] {}: {message}", field.label());
    }
    println!(
        "  valid: {} | active exceptions: {} | flagged: {}",
        state.is_valid, state.active_exception_count, state.flagged
    );
}

fn sample_drafts() -> Vec<(&'static str, IntakeDraft)> {
    let clean = CandidateForm {
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
    };

    let borderline = CandidateForm {
        full_name: "Rohan Iyer".to_string(),
        email: "rohan.iyer@example.com".to_string(),
        phone: "8123456789".to_string(),
        dob: "2007-06-01".to_string(),
        grad_year: "2012".to_string(),
        score: "45".to_string(),
        screening_score: "30".to_string(),
        offer_sent: false,
        ..clean.clone()
    };

    let rejected = CandidateForm {
        full_name: "Meera Das".to_string(),
        email: "meera.das@example".to_string(),
        phone: "12345".to_string(),
        status: "Rejected".to_string(),
        ..clean.clone()
    };

    let waiver = "Approved by the admissions director after a panel interview";
    let all_waived: ExceptionRequests = [
        IntakeField::Dob,
        IntakeField::GradYear,
        IntakeField::Score,
        IntakeField::ScreeningScore,
    ]
    .into_iter()
    .map(|field| (field, ExceptionRequest::with_rationale(waiver)))
    .collect();

    let mut weak_rationale = all_waived.clone();
    weak_rationale.insert(
        IntakeField::Score,
        ExceptionRequest::with_rationale("Seems fine"),
    );

    vec![
        (
            "Clean candidate",
            IntakeDraft {
                form: clean,
                exceptions: ExceptionRequests::new(),
                is_cgpa: false,
            },
        ),
        (
            "Borderline candidate with a weak score rationale",
            IntakeDraft {
                form: borderline.clone(),
                exceptions: weak_rationale,
                is_cgpa: false,
            },
        ),
        (
            "Borderline candidate with every warning waived",
            IntakeDraft {
                form: borderline,
                exceptions: all_waived,
                is_cgpa: false,
            },
        ),
        (
            "Rejected candidate with malformed contact details",
            IntakeDraft {
                form: rejected,
                exceptions: ExceptionRequests::new(),
                is_cgpa: false,
            },
        ),
    ]
}
