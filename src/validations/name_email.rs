use once_cell::sync::Lazy;
use regex::Regex;
// An extension trait to provide the `graphemes` method on `String` and `&str`
use unicode_segmentation::UnicodeSegmentation;

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Display name of a customer, restaurant or delivery staff member.
#[derive(Debug, Clone)]
pub struct AccountName(String);

impl AccountName {
    pub fn parse(s: String) -> Result<AccountName, String> {
        let trimmed = s.trim();
        let is_empty_or_whitespace = trimmed.is_empty();
        let is_too_long = trimmed.graphemes(true).count() > 100;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid name.", s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

/// Emails are compared case-insensitively, so they are stored lowercased.
#[derive(Debug, Clone)]
pub struct AccountEmail(String);

impl AccountEmail {
    pub fn parse(s: String) -> Result<AccountEmail, String> {
        let candidate = s.trim().to_lowercase();
        let is_valid = EMAIL_REGEX
            .as_ref()
            .is_some_and(|regex| regex.is_match(&candidate));
        if is_valid && candidate.len() <= 100 {
            Ok(Self(candidate))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}

impl AsRef<str> for AccountEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<AccountEmail> for String {
    fn from(email: AccountEmail) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};

    #[test]
    fn a_256_grapheme_long_name_is_rejected() {
        let name = "ë".repeat(256);
        assert_err!(AccountName::parse(name));
    }

    #[test]
    fn whitespace_only_names_are_rejected() {
        assert_err!(AccountName::parse(" ".to_string()));
    }

    #[test]
    fn names_containing_an_invalid_character_are_rejected() {
        for name in &['/', '(', ')', '"', '<', '>', '\\', '{', '}'] {
            assert_err!(AccountName::parse(name.to_string()));
        }
    }

    #[test]
    fn a_valid_name_is_parsed_successfully() {
        let name = assert_ok!(AccountName::parse("  Golden Dragon  ".to_string()));
        assert_eq!(name.as_ref(), "Golden Dragon");
    }

    #[test]
    fn email_missing_at_symbol_is_rejected() {
        assert_err!(AccountEmail::parse("ursuladomain.com".to_string()));
    }

    #[test]
    fn email_is_lowercased() {
        let email = assert_ok!(AccountEmail::parse("Ursula@Domain.COM".to_string()));
        assert_eq!(email.as_ref(), "ursula@domain.com");
    }
}
