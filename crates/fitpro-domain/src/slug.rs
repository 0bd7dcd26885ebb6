//! Custom URL slugs for trainer pages.

use std::fmt;

use serde::Serialize;

pub const SLUG_MIN_LEN: usize = 3;
pub const SLUG_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlugFormatError {
    #[error("slug must be between 3 and 50 characters")]
    Length,
    #[error("slug may only contain lowercase letters, digits and hyphens")]
    Charset,
}

/// A URL path segment that passed the format rule: lowercase ASCII letters,
/// digits and `-`, 3 to 50 characters. Uniqueness is a storage concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn parse(candidate: &str) -> Result<Self, SlugFormatError> {
        let len = candidate.chars().count();
        if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
            return Err(SlugFormatError::Length);
        }
        if !candidate
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugFormatError::Charset);
        }
        Ok(Self(candidate.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
