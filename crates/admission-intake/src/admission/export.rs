use std::io::Write;

use super::domain::SubmissionRecord;

const HEADERS: [&str; 17] = [
    "id",
    "timestamp",
    "fullName",
    "email",
    "phone",
    "dob",
    "qualification",
    "gradYear",
    "score",
    "isCgpa",
    "screeningScore",
    "status",
    "aadhaar",
    "offerSent",
    "flagged",
    "exceptionCount",
    "exceptions",
];

/// Write the audit log as CSV, one row per submission in the given order.
pub fn write_submissions_csv<W: Write>(
    records: &[SubmissionRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for record in records {
        let form = &record.form;
        let exceptions = record
            .exceptions
            .iter()
            .map(|(field, rationale)| format!("{field}: {rationale}"))
            .collect::<Vec<_>>()
            .join(" | ");

        csv_writer.write_record([
            record.id.to_string(),
            record.timestamp.to_rfc3339(),
            form.full_name.clone(),
            form.email.clone(),
            form.phone.clone(),
            form.dob.clone(),
            form.qualification.clone(),
            form.grad_year.clone(),
            form.score.clone(),
            record.is_cgpa.to_string(),
            form.screening_score.clone(),
            form.status.clone(),
            form.aadhaar.clone(),
            form.offer_sent.to_string(),
            record.flagged.to_string(),
            record.exception_count.to_string(),
            exceptions,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Convenience wrapper producing the CSV document as a string.
pub fn submissions_csv(records: &[SubmissionRecord]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_submissions_csv(records, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
