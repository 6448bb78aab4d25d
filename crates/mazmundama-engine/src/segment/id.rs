use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

const PREFIX: &str = "sent-";

/// Identifier of a sentence unit, rendered as `sent-<n>` with `n >= 1`.
///
/// Ordering is numeric, so `sent-2` sorts before `sent-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SentenceId(u32);

impl SentenceId {
    /// Returns `None` for zero; numbering starts at 1.
    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sentence id {0:?}: expected sent-<n> with n >= 1")]
pub struct ParseSentenceIdError(String);

impl FromStr for SentenceId {
    type Err = ParseSentenceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PREFIX)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .and_then(SentenceId::new)
            .ok_or_else(|| ParseSentenceIdError(s.to_string()))
    }
}

impl TryFrom<String> for SentenceId {
    type Error = ParseSentenceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SentenceId> for String {
    fn from(id: SentenceId) -> Self {
        id.to_string()
    }
}

/// Hands out sentence ids in order for one pipeline run.
///
/// Each run owns its counter and threads it through the traversal, so
/// documents processed side by side never share numbering.
#[derive(Debug, Default)]
pub struct SentenceCounter {
    issued: u32,
}

impl SentenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id: `sent-1`, `sent-2`, ...
    pub fn next_id(&mut self) -> SentenceId {
        self.issued += 1;
        SentenceId(self.issued)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.issued
    }
}
