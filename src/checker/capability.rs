//! The collaborators a [`SpellCheckSession`](super::SpellCheckSession) leans on.
//!
//! The session never decides on its own whether a word is spelled right,
//! which words a user has taught it, or whether a link resolves. Each of
//! those lives behind one of these traits so the real backends can be swapped
//! for test doubles.

use crate::error::CapabilityError;
use crate::lines::TextRange;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Network-backed validation is permitted.
    pub use_network: bool,
    /// Ask for replacement candidates along with each flagged word.
    pub suggestions: bool,
}

/// A word the speller rejected, as a range into the exact text it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedWord {
    pub range: TextRange,
    pub suggestions: Vec<String>,
}

impl FlaggedWord {
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            suggestions: Vec::new(),
        }
    }
}

pub trait Speller: Send + Sync {
    fn supports_language(&self, language: &str) -> bool;

    /// Flag the misspelled words of `text`, in document order.
    fn check(
        &self,
        text: &str,
        language: &str,
        options: &CheckOptions,
    ) -> Result<Vec<FlaggedWord>, CapabilityError>;
}

/// The process-wide set of learned words, one set per language.
///
/// Implementations take `&self` and serialize writers internally; the last
/// writer wins. A failed write leaves the set as it was.
pub trait PersonalDictionary: Send + Sync {
    /// Returns how many words were not already present.
    fn add_words(&self, language: &str, words: &[String]) -> Result<usize, CapabilityError>;

    /// Returns how many words were actually removed.
    fn remove_words(&self, language: &str, words: &[String]) -> Result<usize, CapabilityError>;

    /// Fails when the backing word list cannot be read.
    fn contains(&self, language: &str, word: &str) -> Result<bool, CapabilityError>;
}

pub trait LinkValidator: Send + Sync {
    /// Whether `url` can be reached. Relative links resolve against `root`.
    fn validate(
        &self,
        url: &str,
        root: Option<&Path>,
        use_network: bool,
    ) -> Result<bool, CapabilityError>;
}
