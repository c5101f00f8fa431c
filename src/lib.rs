pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod lines;
pub mod links;

pub use checker::{MisspelledRange, SessionConfig, SpellCheckSession, WordSet};
pub use config::Config;
pub use error::{CapabilityError, Error, Result};
pub use lines::{count_lines, lines_of, LineDescriptor, LineIndex, TextRange};

use serde::Serialize;

/// Everything found in one file, ready for output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub file: String,
    pub misspellings: Vec<Finding>,
    pub broken_links: Vec<Finding>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.misspellings.len() + self.broken_links.len()
    }
}

/// A flagged word or link with a printable position.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}
