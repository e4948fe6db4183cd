//! Format checks for identity fields

use crate::error::{InputError, MasterPasswordRule};

/// Minimum master password length, in characters
const MIN_MASTER_CHARS: usize = 8;

/// Check a `DDMMYYYY` birthdate.
///
/// Day 01-31, month 01-12, year 1900-2100. Day and month are not checked
/// against each other.
pub fn validate_birthdate(date: &str) -> Result<(), InputError> {
    if date.len() != 8 || !date.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(InputError::InvalidBirthdate { reason: "expected exactly 8 digits" });
    }

    let field = |range: std::ops::Range<usize>| {
        date[range].bytes().fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'))
    };
    let (day, month, year) = (field(0..2), field(2..4), field(4..8));

    if !(1..=31).contains(&day) {
        return Err(InputError::InvalidBirthdate { reason: "day must be 01-31" });
    }
    if !(1..=12).contains(&month) {
        return Err(InputError::InvalidBirthdate { reason: "month must be 01-12" });
    }
    if !(1900..=2100).contains(&year) {
        return Err(InputError::InvalidBirthdate { reason: "year must be 1900-2100" });
    }
    Ok(())
}

/// Check the master password requirements in order: uppercase, digit,
/// length.
pub fn validate_master_password(password: &str) -> Result<(), InputError> {
    let rule = if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(MasterPasswordRule::Uppercase)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(MasterPasswordRule::Digit)
    } else if password.chars().count() < MIN_MASTER_CHARS {
        Some(MasterPasswordRule::Length)
    } else {
        None
    };

    match rule {
        Some(rule) => Err(InputError::WeakMasterPassword { rule }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthdate_reason(date: &str) -> &'static str {
        match validate_birthdate(date) {
            Err(InputError::InvalidBirthdate { reason }) => reason,
            other => unreachable!("expected InvalidBirthdate, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_birthdates() {
        assert!(validate_birthdate("21021982").is_ok());
        assert!(validate_birthdate("01011900").is_ok());
        assert!(validate_birthdate("31122100").is_ok());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(birthdate_reason("2102198"), "expected exactly 8 digits");
        assert_eq!(birthdate_reason("210219820"), "expected exactly 8 digits");
        assert_eq!(birthdate_reason("21-02-82"), "expected exactly 8 digits");
        assert_eq!(birthdate_reason(""), "expected exactly 8 digits");
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(birthdate_reason("00011990"), "day must be 01-31");
        assert_eq!(birthdate_reason("32011990"), "day must be 01-31");
        assert_eq!(birthdate_reason("01001990"), "month must be 01-12");
        assert_eq!(birthdate_reason("01131990"), "month must be 01-12");
        assert_eq!(birthdate_reason("01011899"), "year must be 1900-2100");
        assert_eq!(birthdate_reason("01012101"), "year must be 1900-2100");
    }

    #[test]
    fn master_password_rules_apply_in_order() {
        let rule = |pw: &str| match validate_master_password(pw) {
            Err(InputError::WeakMasterPassword { rule }) => Some(rule),
            _ => None,
        };

        assert_eq!(rule("secret"), Some(MasterPasswordRule::Uppercase));
        assert_eq!(rule("Secret"), Some(MasterPasswordRule::Digit));
        assert_eq!(rule("Secret1"), Some(MasterPasswordRule::Length));
        assert_eq!(rule("Secret12"), None);
    }

    #[test]
    fn master_password_length_counts_characters() {
        // 7 characters, 9 bytes
        assert!(validate_master_password("Sécrét1").is_err());
        assert!(validate_master_password("Sécrét12").is_ok());
    }
}
