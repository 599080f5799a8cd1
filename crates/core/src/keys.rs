use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for a [`DestinationSlug`].
const SLUG_MAX_LEN: usize = 64;

/// Maximum allowed length for an [`ActionKey`].
const ACTION_KEY_MAX_LEN: usize = 64;

/// Errors from constructing a [`DestinationSlug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    /// The input was empty or contained only whitespace.
    #[error("destination slug cannot be empty or whitespace")]
    Empty,
    /// The normalized slug contains characters other than `a-z`, `0-9` and `-`.
    #[error("destination slug contains invalid characters (only a-z, 0-9 and - allowed)")]
    InvalidCharacters,
    /// The normalized slug exceeds [`SLUG_MAX_LEN`] characters.
    #[error("destination slug exceeds maximum length of {SLUG_MAX_LEN} characters")]
    TooLong,
}

/// A normalized, validated identifier for a destination.
///
/// Normalization rules:
/// - Leading/trailing whitespace is trimmed.
/// - The string is lowercased.
/// - Whitespace and underscores are replaced with hyphens.
/// - Consecutive hyphens are collapsed to one.
/// - Leading/trailing hyphens are stripped.
///
/// # Examples
///
/// ```
/// use conduit_core::DestinationSlug;
///
/// let slug: DestinationSlug = "Actions FullStory".parse().unwrap();
/// assert_eq!(slug.as_str(), "actions-fullstory");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DestinationSlug(String);

impl DestinationSlug {
    /// Create a new slug, normalizing and validating the input.
    pub fn new(raw: &str) -> Result<Self, SlugError> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_whitespace() || c == '_' {
                    '-'
                } else {
                    c
                }
            })
            .collect();

        let collapsed = collapse_hyphens(&normalized);

        if collapsed.is_empty() {
            return Err(SlugError::Empty);
        }
        if !collapsed
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SlugError::InvalidCharacters);
        }
        if collapsed.len() > SLUG_MAX_LEN {
            return Err(SlugError::TooLong);
        }

        Ok(Self(collapsed))
    }

    /// Return the inner string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Collapse runs of hyphens and trim leading/trailing hyphens.
fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_hyphen = true;
    for c in s.chars() {
        if c == '-' {
            if !prev_hyphen {
                out.push('-');
            }
            prev_hyphen = true;
        } else {
            out.push(c);
            prev_hyphen = false;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}

impl fmt::Display for DestinationSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DestinationSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DestinationSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DestinationSlug> for String {
    fn from(slug: DestinationSlug) -> Self {
        slug.0
    }
}

impl AsRef<str> for DestinationSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for DestinationSlug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors from constructing an [`ActionKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionKeyError {
    /// The input was empty.
    #[error("action key cannot be empty")]
    Empty,
    /// The key does not start with an ASCII letter.
    #[error("action key must start with an ASCII letter")]
    InvalidStart,
    /// The key contains characters other than ASCII alphanumerics and `_`.
    #[error("action key contains invalid characters (only A-Z, a-z, 0-9 and _ allowed)")]
    InvalidCharacters,
    /// The key exceeds [`ACTION_KEY_MAX_LEN`] characters.
    #[error("action key exceeds maximum length of {ACTION_KEY_MAX_LEN} characters")]
    TooLong,
}

/// Identifier of an action within a destination (e.g. `trackEventV2`).
///
/// Unlike [`DestinationSlug`] the key is case-sensitive and never
/// normalized: presets refer to actions by their exact key.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionKey(String);

impl ActionKey {
    /// Validate and wrap an action key.
    pub fn new(raw: &str) -> Result<Self, ActionKeyError> {
        let first = raw.bytes().next().ok_or(ActionKeyError::Empty)?;
        if !first.is_ascii_alphabetic() {
            return Err(ActionKeyError::InvalidStart);
        }
        if !raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(ActionKeyError::InvalidCharacters);
        }
        if raw.len() > ACTION_KEY_MAX_LEN {
            return Err(ActionKeyError::TooLong);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Return the inner string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActionKey {
    type Err = ActionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActionKey {
    type Error = ActionKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ActionKey> for String {
    fn from(key: ActionKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ActionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for ActionKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
