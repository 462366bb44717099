//! Brazilian phone identity validation and extraction from free text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Country code every accepted identity starts with.
const COUNTRY_CODE: &str = "55";

/// Separator characters tolerated inside a written number.
const SEPARATORS: &[char] = &['(', ')', '.', ',', ' ', '-'];

/// Digit-count bounds for a candidate pulled out of free text.
const CANDIDATE_MIN_LEN: usize = 11;
const CANDIDATE_MAX_LEN: usize = 15;

/// A validated phone number: `55` followed by 10 or 11 digits, no formatting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneIdentity(String);

impl PhoneIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate and normalize a phone-number-like string.
///
/// Whitespace is trimmed and `()., -` separators are stripped before matching
/// `^55\d{10,11}$`. Returns `None` when the result does not match.
pub fn validate(input: &str) -> Option<PhoneIdentity> {
    let digits: String = input
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect();

    let valid = digits.starts_with(COUNTRY_CODE)
        && (12..=13).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());

    valid.then_some(PhoneIdentity(digits))
}

/// Pull the first plausible phone number out of free-form text.
///
/// Whitespace-delimited tokens are tried first: a token that, once trimmed of
/// punctuation, is all digits, starts with `55` and has 11 to 15 digits wins.
/// Otherwise the text is scanned for digit runs (separators between digits do
/// not break a run) and the first run of 11 to 15 digits is returned.
pub fn extract_candidate(text: &str) -> Option<String> {
    let from_tokens = text.split_whitespace().find_map(|word| {
        let clean = word.trim_matches(|c: char| c.is_ascii_punctuation());
        let plausible = clean.starts_with(COUNTRY_CODE)
            && (CANDIDATE_MIN_LEN..=CANDIDATE_MAX_LEN).contains(&clean.len())
            && clean.chars().all(|c| c.is_ascii_digit());
        plausible.then(|| clean.to_string())
    });

    from_tokens.or_else(|| {
        digit_runs(text)
            .into_iter()
            .find(|run| (CANDIDATE_MIN_LEN..=CANDIDATE_MAX_LEN).contains(&run.len()))
    })
}

/// Collect digit runs, letting separators continue a run between two digits.
fn digit_runs(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() && SEPARATORS.contains(&c) {
            // Look past the separator group for another digit.
            let mut j = i;
            while j < chars.len() && SEPARATORS.contains(&chars[j]) {
                j += 1;
            }
            if j < chars.len() && chars[j].is_ascii_digit() {
                i = j;
                continue;
            }
            runs.push(std::mem::take(&mut current));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        i += 1;
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_numbers() {
        assert_eq!(
            validate("5511999990000").map(PhoneIdentity::into_inner),
            Some("5511999990000".into())
        );
        assert_eq!(
            validate("551199990000").map(PhoneIdentity::into_inner),
            Some("551199990000".into())
        );
    }

    #[test]
    fn test_validate_strips_separators() {
        let id = validate("  55 (11) 99999-0000 ").unwrap();
        assert_eq!(id.as_str(), "5511999990000");

        let id = validate("55.11.99999.0000").unwrap();
        assert_eq!(id.as_str(), "5511999990000");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(validate("").is_none());
        assert!(validate("   ").is_none());
        assert!(validate("+5511999990000").is_none());
        assert!(validate("1411999990000").is_none());
        assert!(validate("55119999").is_none());
        assert!(validate("55119999900001").is_none());
        assert!(validate("55abc99990000").is_none());
    }

    #[test]
    fn test_validate_is_idempotent() {
        for input in ["5511999990000", " 55 21 98888-7777", "(55)1133334444"] {
            let once = validate(input).unwrap();
            let twice = validate(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_extract_from_token() {
        assert_eq!(
            extract_candidate("renan adicione o número 5511999990000"),
            Some("5511999990000".into())
        );
        assert_eq!(
            extract_candidate("renan, remova o número 5521988887777."),
            Some("5521988887777".into())
        );
    }

    #[test]
    fn test_extract_falls_back_to_digit_runs() {
        assert_eq!(
            extract_candidate("renan adicione o número +55 (11) 99999-0000 por favor"),
            Some("5511999990000".into())
        );
        assert_eq!(
            extract_candidate("número:5511999990000!"),
            Some("5511999990000".into())
        );
    }

    #[test]
    fn test_extract_skips_short_runs() {
        assert_eq!(extract_candidate("renan adicione o número 1234"), None);
        assert_eq!(extract_candidate("renan adicione o número"), None);
        assert_eq!(extract_candidate(""), None);
    }

    #[test]
    fn test_extract_token_pass_requires_country_code() {
        // Not a 55 token, but the digit-run pass still finds an 11+ digit run.
        assert_eq!(
            extract_candidate("ligue 14155551234"),
            Some("14155551234".into())
        );
    }

    #[test]
    fn test_phone_identity_serializes_as_string() {
        let id = validate("5511999990000").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5511999990000\"");
    }
}
