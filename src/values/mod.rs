// Validated values: every raw primitive the user types goes through one of
// these constructors before the rest of the program sees it. A value that
// exists has passed its check exactly once, at construction; there is no
// other way to build one and no way to change it afterwards.
//
// Each value kind has its own error type with a help message. Every error
// converts into a `Rejection`, which is what the interaction driver uses to
// decide between "print and ask again" and "give up".

use std::ops::RangeInclusive;

use thiserror::Error;

pub use account::{
    Email, EmailError, Password, PasswordError, Token, TokenError, Username, UsernameError,
};
pub use catalog::{
    GameDescription, GameDescriptionError, GameTitle, GameTitleError, Genre, GenreError,
    GlobalRating, GlobalRatingError, Pegi, PegiError, ReleaseDate, ReleaseDateError, Selection,
    Vote, VoteError,
};
pub use menu::{Description, DescriptionError, Key, KeyError};

/// How a constructor turned an input down.
///
/// The interaction driver prints `Invalid` and `Malformed` rejections and
/// asks again. `Fatal` is never caused by what the user typed and aborts
/// the prompt.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The input had the right shape but broke the value's rule.
    #[error("{0}")]
    Invalid(String),

    /// The input is not the primitive the value wraps, e.g. letters where a
    /// number was expected.
    #[error("{0}")]
    Malformed(String),

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl Rejection {
    pub fn invalid(message: impl Into<String>) -> Self {
        Rejection::Invalid(message.into())
    }
}

/// Failure of [`whole_number`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Please enter a whole number")]
    NotANumber,

    #[error("Please enter a number between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
}

impl From<NumberError> for Rejection {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::NotANumber => Rejection::Malformed(err.to_string()),
            NumberError::OutOfRange { .. } => Rejection::Invalid(err.to_string()),
        }
    }
}

/// Parse a whole number and check it falls inside `range`.
pub fn whole_number(raw: &str, range: RangeInclusive<i64>) -> Result<i64, NumberError> {
    let value: i64 = raw.trim().parse().map_err(|_| NumberError::NotANumber)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(NumberError::OutOfRange {
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Length (in characters) and charset check shared by the string values.
pub(crate) fn text_matches(raw: &str, len: RangeInclusive<usize>, allowed: impl Fn(char) -> bool) -> bool {
    len.contains(&raw.chars().count()) && raw.chars().all(allowed)
}

/// Declares a string-backed validated value together with its error type.
///
/// The generated type is ordered and compared by its raw string, renders
/// as that string, and can only be built through `new` or `FromStr`.
macro_rules! text_value {
    (
        $(#[$meta:meta])*
        $name:ident / $error:ident {
            len: $len:expr,
            allowed: $allowed:expr,
            help: $help:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        #[doc = concat!("Raised when a string is not a valid [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $error;

        impl $name {
            pub fn new(raw: impl Into<String>) -> Result<Self, $error> {
                let raw = raw.into();
                if $crate::values::text_matches(&raw, $len, $allowed) {
                    Ok(Self(raw))
                } else {
                    Err($error)
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $error {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($help)
            }
        }

        impl std::error::Error for $error {}

        impl From<$error> for $crate::values::Rejection {
            fn from(err: $error) -> Self {
                $crate::values::Rejection::Invalid(err.to_string())
            }
        }
    };
}

mod account;
mod catalog;
mod menu;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_number_accepts_bounds() {
        assert_eq!(whole_number("1", 1..=5), Ok(1));
        assert_eq!(whole_number(" 5 ", 1..=5), Ok(5));
    }

    #[test]
    fn whole_number_rejects_out_of_range() {
        assert_eq!(
            whole_number("6", 1..=5),
            Err(NumberError::OutOfRange { min: 1, max: 5 })
        );
    }

    #[test]
    fn whole_number_reports_letters_as_malformed() {
        let err = whole_number("five", 1..=5).unwrap_err();
        assert_eq!(err, NumberError::NotANumber);
        assert!(matches!(Rejection::from(err), Rejection::Malformed(_)));
    }

    #[test]
    fn constructor_bugs_are_fatal() {
        let rejection = Rejection::from(anyhow::anyhow!("constructor bug"));
        assert!(matches!(rejection, Rejection::Fatal(_)));
        assert!(matches!(Rejection::invalid("nope"), Rejection::Invalid(_)));
    }
}
