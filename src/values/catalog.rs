// Values describing games in the catalog and the user's opinion of them.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

use super::{whole_number, NumberError, Rejection};

text_value! {
    /// Name of a game genre, e.g. "Action" or "Role Playing".
    Genre / GenreError {
        len: 1..=100,
        allowed: |c: char| c.is_ascii_alphabetic() || c.is_whitespace(),
        help: "Invalid genre: it should be between 1 and 100 characters among letters and spaces",
    }
}

text_value! {
    GameTitle / GameTitleError {
        len: 1..=100,
        allowed: |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || c == ':',
        help: "Invalid game title: it should be between 1 and 100 characters among letters, digits, spaces and ':'",
    }
}

text_value! {
    GameDescription / GameDescriptionError {
        len: 1..=200,
        allowed: |c: char| c.is_alphanumeric() || c == '_' || c.is_whitespace() || "!,;:.?'\"()-".contains(c),
        help: "Invalid game description: it should be between 1 and 200 characters and cannot include special characters other than [!,;:.?'\"()-]",
    }
}

/// PEGI age rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pegi(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PegiError {
    #[error("Invalid PEGI rating: please enter a number")]
    NotANumber,

    #[error("Invalid PEGI rating: it should be one of 3, 7, 12, 16 or 18")]
    Unknown,
}

impl Pegi {
    pub const RATINGS: [u8; 5] = [3, 7, 12, 16, 18];

    pub fn new(rating: u8) -> Result<Self, PegiError> {
        if Self::RATINGS.contains(&rating) {
            Ok(Self(rating))
        } else {
            Err(PegiError::Unknown)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pegi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PEGI {}", self.0)
    }
}

impl FromStr for Pegi {
    type Err = PegiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rating: i64 = s.trim().parse().map_err(|_| PegiError::NotANumber)?;
        u8::try_from(rating)
            .map_err(|_| PegiError::Unknown)
            .and_then(Self::new)
    }
}

impl From<PegiError> for Rejection {
    fn from(err: PegiError) -> Self {
        match err {
            PegiError::NotANumber => Rejection::Malformed(err.to_string()),
            PegiError::Unknown => Rejection::Invalid(err.to_string()),
        }
    }
}

/// Average score of a game over all its votes, kept in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalRating(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid global rating, it should have an integer part between 0 and 10, a decimal part between 0 and 99 and, if the integer part is 10, the decimal part can't be different from 0")]
pub struct GlobalRatingError;

impl GlobalRating {
    const MAX_HUNDREDTHS: u32 = 1000;

    pub fn create(integer: u32, decimal: u32) -> Result<Self, GlobalRatingError> {
        if integer > 10 || decimal > 99 {
            return Err(GlobalRatingError);
        }
        Self::from_hundredths(integer * 100 + decimal)
    }

    /// Rating as the catalog service reports it, e.g. `7.5`.
    pub fn from_score(score: f64) -> Result<Self, GlobalRatingError> {
        if !score.is_finite() || score < 0.0 {
            return Err(GlobalRatingError);
        }
        let hundredths = (score * 100.0).round();
        if hundredths > f64::from(Self::MAX_HUNDREDTHS) {
            return Err(GlobalRatingError);
        }
        Self::from_hundredths(hundredths as u32)
    }

    fn from_hundredths(hundredths: u32) -> Result<Self, GlobalRatingError> {
        u16::try_from(hundredths)
            .ok()
            .filter(|h| u32::from(*h) <= Self::MAX_HUNDREDTHS)
            .map(Self)
            .ok_or(GlobalRatingError)
    }

    /// Nobody voted yet; the service reports those games as `0.0`.
    pub fn is_unrated(self) -> bool {
        self.0 == 0
    }

    pub fn integer(self) -> u16 {
        self.0 / 100
    }

    pub fn decimal(self) -> u16 {
        self.0 % 100
    }
}

impl fmt::Display for GlobalRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.integer(), self.decimal())
    }
}

impl From<GlobalRatingError> for Rejection {
    fn from(err: GlobalRatingError) -> Self {
        Rejection::Invalid(err.to_string())
    }
}

/// A single user's score for a game they played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vote(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("Invalid vote: please enter a number")]
    NotANumber,

    #[error("Invalid vote: it should be between 1 and 10")]
    OutOfRange,
}

impl Vote {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(vote: u8) -> Result<Self, VoteError> {
        if (Self::MIN..=Self::MAX).contains(&vote) {
            Ok(Self(vote))
        } else {
            Err(VoteError::OutOfRange)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Vote {
    type Err = VoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vote: i64 = s.trim().parse().map_err(|_| VoteError::NotANumber)?;
        u8::try_from(vote)
            .map_err(|_| VoteError::OutOfRange)
            .and_then(Self::new)
    }
}

impl From<VoteError> for Rejection {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::NotANumber => Rejection::Malformed(err.to_string()),
            VoteError::OutOfRange => Rejection::Invalid(err.to_string()),
        }
    }
}

/// Release date of a game. The first video game came out in 1952 and no
/// game in the catalog is released after the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseDate(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseDateError {
    #[error("Invalid release year: it should be between {first} and {last}")]
    Year { first: i32, last: i32 },

    #[error("Invalid release date: {year}-{month:02}-{day:02} is not a day of the calendar")]
    NoSuchDay { year: i32, month: u32, day: u32 },
}

impl ReleaseDate {
    pub const FIRST_YEAR: i32 = 1952;

    pub fn latest_year() -> i32 {
        Local::now().year()
    }

    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ReleaseDateError> {
        let last = Self::latest_year();
        if !(Self::FIRST_YEAR..=last).contains(&year) {
            return Err(ReleaseDateError::Year {
                first: Self::FIRST_YEAR,
                last,
            });
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(ReleaseDateError::NoSuchDay { year, month, day })
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<ReleaseDateError> for Rejection {
    fn from(err: ReleaseDateError) -> Self {
        Rejection::Invalid(err.to_string())
    }
}

/// Answer to "pick one of these N items (0 to cancel)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Cancel,
    /// Zero-based position in the listing.
    Item(usize),
}

impl Selection {
    /// Parse a one-based index into a listing of `len` items.
    pub fn parse(raw: &str, len: usize) -> Result<Self, NumberError> {
        let max = i64::try_from(len).unwrap_or(i64::MAX);
        match whole_number(raw, 0..=max)? {
            0 => Ok(Selection::Cancel),
            n => Ok(Selection::Item(n as usize - 1)),
        }
    }
}
