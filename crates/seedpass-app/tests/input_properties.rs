//! Property-based tests for input normalization and validation.

use proptest::prelude::*;
use seedpass_app::{IdentityInput, normalize_input, validate_birthdate};

/// Printable ASCII plus tabs and newlines.
fn free_text() -> impl Strategy<Value = String> {
    "[ -~\t\n]{0,40}"
}

/// Printable ASCII without dots.
fn dotless_text() -> impl Strategy<Value = String> {
    "[ -\\-/-~\t\n]{0,40}"
}

proptest! {
    #[test]
    fn prop_output_has_no_dots_or_uppercase(text in free_text()) {
        let normalized = normalize_input(&[text.as_str()]);

        prop_assert!(!normalized.contains('.'));
        prop_assert!(!normalized.bytes().any(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn prop_case_is_ignored(text in free_text()) {
        prop_assert_eq!(
            normalize_input(&[text.to_ascii_uppercase().as_str()]),
            normalize_input(&[text.to_ascii_lowercase().as_str()])
        );
    }

    #[test]
    fn prop_surrounding_whitespace_is_ignored(text in free_text(), pad in "[ \t\n]{1,5}") {
        let padded = format!("{pad}{text}{pad}");
        prop_assert_eq!(normalize_input(&[padded.as_str()]), normalize_input(&[text.as_str()]));
    }

    #[test]
    fn prop_dotless_normalization_is_idempotent(text in dotless_text()) {
        let once = normalize_input(&[text.as_str()]);

        prop_assert!(!once.contains("  "));
        prop_assert_eq!(normalize_input(&[once.as_str()]), once);
    }

    #[test]
    fn prop_parts_join_with_hyphen(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
        prop_assert_eq!(normalize_input(&[a.as_str(), b.as_str()]), format!("{a}-{b}"));
        prop_assert_eq!(normalize_input(&[a.as_str(), ""]), a.clone());
        prop_assert_eq!(normalize_input(&["", b.as_str()]), b);
    }

    #[test]
    fn prop_valid_birthdates_accepted(day in 1u32..=31, month in 1u32..=12, year in 1900u32..=2100) {
        let date = format!("{day:02}{month:02}{year:04}");
        prop_assert!(validate_birthdate(&date).is_ok());
    }

    #[test]
    fn prop_identity_seed_needs_every_field(
        person in "[a-z]{0,6}",
        birthdate in "[0-9]{0,8}",
        master in "[A-Za-z0-9]{0,10}",
    ) {
        let seed = IdentityInput::new(person.clone(), birthdate.clone(), master.clone()).seed();
        let complete = !person.is_empty() && !birthdate.is_empty() && !master.is_empty();

        prop_assert_eq!(seed.is_some(), complete);
        if let Some(seed) = seed {
            let expected = format!("{person}{birthdate}{master}");
            prop_assert_eq!(seed.as_bytes(), expected.as_bytes());
        }
    }
}
