//! Language tags as they appear in work metadata.
//!
//! Tags are kept verbatim: RDF metadata yields codes (`en`, `fr`), text headers
//! yield lower-cased names (`english`, `french`). No mapping between the two is
//! attempted, the catalog buckets works by whatever tag the metadata declares.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::consts::DEFAULT_LANGUAGE_TAG;
use crate::error::{Error, ErrorKind};

/// A non-empty language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageTag(String);
impl LanguageTag {
    /// The tag assumed when no metadata source yields one (`en`).
    pub fn fallback() -> Self {
        Self(DEFAULT_LANGUAGE_TAG.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl FromStr for LanguageTag {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            exn::bail!(ErrorKind::ParseError {
                field: "language",
                value: s.to_string()
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}
impl Borrow<str> for LanguageTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl Display for LanguageTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
