use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum YearError {
    #[error("enter a whole number")]
    NotANumber,

    #[error("year must be between 1 and 8")]
    OutOfRange,
}

//
// ─── YEAR OF STUDY ─────────────────────────────────────────────────────────────
//

/// The user's year in the programme, restricted to 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct YearOfStudy(u8);

impl YearOfStudy {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Creates a validated year.
    ///
    /// # Errors
    ///
    /// Returns `YearError::OutOfRange` if the value is outside 1..=8.
    pub fn new(year: u8) -> Result<Self, YearError> {
        if !(Self::MIN..=Self::MAX).contains(&year) {
            return Err(YearError::OutOfRange);
        }
        Ok(Self(year))
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for YearOfStudy {
    type Error = YearError;

    fn try_from(year: u8) -> Result<Self, Self::Error> {
        Self::new(year)
    }
}

impl From<YearOfStudy> for u8 {
    fn from(year: YearOfStudy) -> Self {
        year.0
    }
}

impl FromStr for YearOfStudy {
    type Err = YearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| YearError::NotANumber)?;
        Self::new(value)
    }
}

impl fmt::Display for YearOfStudy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── USER SESSION ──────────────────────────────────────────────────────────────
//

/// The signed-in user: profile fields from the identity provider plus the
/// access token the Drive and progress calls authenticate with.
///
/// Serialized flat; the field names are pinned to the persisted session blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub email: String,
    pub picture: String,
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<YearOfStudy>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
