//! Email address validation
//!
//! Syntax check only: local part, `@`, and a dotted domain. No DNS lookups.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// RFC 5321 path limit
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("invalid email regex")
});

/// Rejected address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value is not a valid email address: {reason}")]
pub struct EmailError {
    pub reason: &'static str,
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate an address.
    ///
    /// ```
    /// use famfin_server::models::Email;
    ///
    /// assert!(Email::new("a@b.com").is_ok());
    /// assert!(Email::new("invalid-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, EmailError> {
        let reject = |reason| Err(EmailError { reason });

        let Some((local, domain)) = s.rsplit_once('@') else {
            return reject("An email address must have an @-sign.");
        };
        if local.is_empty() {
            return reject("There must be something before the @-sign.");
        }
        if domain.is_empty() {
            return reject("There must be something after the @-sign.");
        }
        if s.len() > MAX_EMAIL_LEN {
            return reject("The email address is too long.");
        }
        if !EMAIL_RE.is_match(s) {
            return reject("The email address is not valid.");
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a value already accepted by the store.
    pub(crate) fn from_trusted(s: String) -> Self {
        Self(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, EmailError> {
        Self::new(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_addresses() {
        assert!(Email::new("a@b.com").is_ok());
        assert!(Email::new("test@example.com").is_ok());
        assert!(Email::new("first.last+tag@sub.example.co.uk").is_ok());
    }

    #[test]
    fn rejects_missing_at() {
        let err = Email::new("invalid-email").unwrap_err();
        assert_eq!(err.reason, "An email address must have an @-sign.");
        assert!(err.to_string().contains("not a valid email address"));
    }

    #[test]
    fn rejects_bare_domain() {
        assert!(Email::new("someone@localhost").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("someone@").is_err());
        assert!(Email::new("two words@example.com").is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let email: Email = serde_json::from_value(serde_json::json!("a@b.com")).unwrap();
        assert_eq!(email.as_str(), "a@b.com");
        assert_eq!(serde_json::to_value(&email).unwrap(), "a@b.com");

        let err = serde_json::from_value::<Email>(serde_json::json!("nope")).unwrap_err();
        assert!(err.to_string().starts_with("value is not a valid email address"));
    }

    #[test]
    fn rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(&long).is_err());
    }
}
