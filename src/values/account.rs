// Credentials and identity values used by login and registration.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::Rejection;

text_value! {
    /// Public account name.
    Username / UsernameError {
        len: 1..=150,
        allowed: |c: char| c.is_ascii_alphanumeric() || "_@+.-".contains(c),
        help: "Invalid username: it should be between 1 and 150 characters among letters, digits and '_@+.-'",
    }
}

text_value! {
    /// Session token handed out by the catalog service after login.
    Token / TokenError {
        len: 40..=40,
        allowed: |c: char| c.is_ascii_alphanumeric(),
        help: "Invalid token: it should be exactly 40 letters or digits",
    }
}

const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        ))
        .expect("email pattern is a valid regex")
    })
}

/// An email address in plain `local@domain.tld` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Invalid email: it can be at most 254 characters long")]
    TooLong,

    #[error("Invalid email: the part before '@' can be at most 64 characters long")]
    LocalPartTooLong,

    #[error("Invalid email: it should look like name@example.com")]
    Format,
}

impl Email {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailError> {
        let raw = raw.into();
        if raw.chars().count() > EMAIL_MAX_LEN {
            return Err(EmailError::TooLong);
        }
        if !email_pattern().is_match(&raw) {
            return Err(EmailError::Format);
        }
        let local = raw.split('@').next().unwrap_or_default();
        if local.len() > EMAIL_LOCAL_MAX_LEN {
            return Err(EmailError::LocalPartTooLong);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<EmailError> for Rejection {
    fn from(err: EmailError) -> Self {
        Rejection::Invalid(err.to_string())
    }
}

const PASSWORD_MIN_LEN: usize = 8;

/// A password of at least eight characters. Its `Debug` output is redacted
/// so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid password: it should be at least 8 characters long")]
pub struct PasswordError;

impl Password {
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordError> {
        let raw = raw.into();
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordError);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Password {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<PasswordError> for Rejection {
    fn from(err: PasswordError) -> Self {
        Rejection::Invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_common_address() {
        let email = Email::new("domenico@gmail.com").unwrap();
        assert_eq!(email.to_string(), "domenico@gmail.com");
    }

    #[test]
    fn email_rejects_empty() {
        assert_eq!(Email::new(""), Err(EmailError::Format));
    }

    #[test]
    fn email_rejects_too_long() {
        let raw = format!("a@{}.com", "a".repeat(250));
        assert_eq!(Email::new(raw), Err(EmailError::TooLong));
    }

    #[test]
    fn email_rejects_long_local_part() {
        let raw = format!("{}@example.com", "a".repeat(65));
        assert_eq!(Email::new(raw), Err(EmailError::LocalPartTooLong));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        let invalid = [
            "test@@example.com",
            "user@",
            "@example.com",
            "user@.com",
            "user@com",
            "user@example..com",
            "user example@example.com",
            "user@exam_ple.com",
            "user@-example.com",
            "user@example-.com",
            "user@example.c",
            "user@[123.456.789.000]",
        ];
        for raw in invalid {
            assert!(Email::new(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn password_requires_eight_characters() {
        assert_eq!(Password::new("seven77"), Err(PasswordError));
        assert!(Password::new("eight888").is_ok());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn token_is_exactly_forty_alphanumerics() {
        assert!(Token::new("a".repeat(40)).is_ok());
        assert_eq!(Token::new("a".repeat(39)), Err(TokenError));
        assert_eq!(Token::new("a".repeat(41)), Err(TokenError));
        assert_eq!(Token::new(format!("{}-", "a".repeat(39))), Err(TokenError));
    }

    #[test]
    fn username_charset() {
        assert!(Username::new("jane.doe+games@home").is_ok());
        assert_eq!(Username::new("jane doe"), Err(UsernameError));
        assert_eq!(Username::new(""), Err(UsernameError));
    }
}
