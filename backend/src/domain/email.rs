//! E-mail address value type shared by users and deliverymen.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Email::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Input was empty once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Input is not shaped like `local@domain.tld`.
    #[error("email must be a valid address")]
    Malformed,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Pragmatic shape check; deliverability is not our concern.
        match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
            Ok(re) => re,
            Err(error) => panic!("email regex failed to compile: {error}"),
        }
    })
}

/// A syntactically valid e-mail address.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::parse("ops@fastfeet.com").expect("valid address");
/// assert_eq!(email.as_ref(), "ops@fastfeet.com");
/// assert!(Email::parse("not-an-address").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmailValidationError::Malformed);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("courier@fastfeet.com")]
    #[case("a.b+c@mail.example.org")]
    fn accepts_well_formed_addresses(#[case] raw: &str) {
        let email = Email::parse(raw).expect("valid address");
        assert_eq!(email.as_ref(), raw);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("missing-at.com", EmailValidationError::Malformed)]
    #[case("two@@fastfeet.com", EmailValidationError::Malformed)]
    #[case("no-tld@fastfeet", EmailValidationError::Malformed)]
    fn rejects_malformed_addresses(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(Email::parse(raw), Err(expected));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = Email::parse(" ops@fastfeet.com ").expect("valid address");
        assert_eq!(email.as_ref(), "ops@fastfeet.com");
    }
}
