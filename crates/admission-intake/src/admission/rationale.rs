/// Shortest justification accepted for an exception, in characters.
pub const MIN_RATIONALE_LENGTH: usize = 30;

/// At least one of these phrases must appear, case-insensitively.
pub const RATIONALE_KEYWORDS: [&str; 4] = [
    "approved by",
    "special case",
    "documentation pending",
    "waiver granted",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RationaleError {
    #[error("Rationale must be at least {minimum} characters (currently {length})")]
    TooShort { length: usize, minimum: usize },
    #[error(
        "Rationale must mention one of: approved by, special case, documentation pending, \
         waiver granted"
    )]
    MissingKeyword,
}

/// Length is checked before keywords; only the first failure is reported.
pub fn validate_rationale(text: &str) -> Result<(), RationaleError> {
    let length = text.chars().count();
    if length < MIN_RATIONALE_LENGTH {
        return Err(RationaleError::TooShort {
            length,
            minimum: MIN_RATIONALE_LENGTH,
        });
    }

    let lowered = text.to_lowercase();
    if !RATIONALE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return Err(RationaleError::MissingKeyword);
    }

    Ok(())
}
