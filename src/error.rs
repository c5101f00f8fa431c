use thiserror::Error;

/// Failures reported by the spell-check, dictionary or link collaborators.
///
/// These are kept apart from "nothing was found" so callers never mistake a
/// dead backend for a clean document.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary error: {0}")]
    Fst(#[from] fst::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("capability unavailable: {reason}")]
    Unavailable { reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("range {start}..{end} is outside the text (length {len})")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("line lookup at offset {start} comes before the previous lookup at {previous}")]
    NonMonotonicQuery { start: usize, previous: usize },

    #[error("no language is set")]
    LanguageNotSet,

    #[error("language '{language}' is not supported")]
    UnsupportedLanguage { language: String },

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

pub type Result<T> = std::result::Result<T, Error>;
