use crate::admission::rationale::{validate_rationale, RationaleError, MIN_RATIONALE_LENGTH};

#[test]
fn twenty_nine_characters_is_too_short() {
    let text = "a".repeat(MIN_RATIONALE_LENGTH - 1);

    assert_eq!(
        validate_rationale(&text),
        Err(RationaleError::TooShort {
            length: 29,
            minimum: 30,
        })
    );
}

#[test]
fn long_text_without_keyword_is_rejected() {
    let text = "x".repeat(MIN_RATIONALE_LENGTH);

    assert_eq!(validate_rationale(&text), Err(RationaleError::MissingKeyword));
}

#[test]
fn keyword_match_is_case_insensitive() {
    assert_eq!(
        validate_rationale("Special Case: relocated family, interview done"),
        Ok(())
    );
    assert_eq!(
        validate_rationale("WAIVER GRANTED by the dean for this intake"),
        Ok(())
    );
    assert_eq!(
        validate_rationale("Documentation pending from previous university"),
        Ok(())
    );
}

#[test]
fn length_is_reported_before_keyword() {
    assert!(matches!(
        validate_rationale("special case"),
        Err(RationaleError::TooShort { .. })
    ));
}

#[test]
fn length_counts_every_character_as_entered() {
    let padded = "  special case, approved now  ";
    assert_eq!(padded.chars().count(), MIN_RATIONALE_LENGTH);

    assert_eq!(validate_rationale(padded), Ok(()));
    assert_eq!(
        validate_rationale(padded.trim_end()),
        Err(RationaleError::TooShort {
            length: 28,
            minimum: 30,
        })
    );
}
