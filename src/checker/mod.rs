pub mod capability;
pub mod dictionary;
pub mod speller;
pub mod suggestions;
pub mod tokenizer;
pub mod words;

pub use capability::{CheckOptions, FlaggedWord, LinkValidator, PersonalDictionary, Speller};
pub use speller::FstSpeller;
pub use words::{split_delimited, WordSet};

use crate::error::{CapabilityError, Error, Result};
use crate::lines::{LineDescriptor, LineIndex, TextRange};
use crate::links;
use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub use_network: bool,
    pub check_links: bool,
    pub verbose: bool,
    pub language: String,
    /// Base for relative links.
    pub root: Option<PathBuf>,
}

/// A flagged word and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MisspelledRange {
    pub range: TextRange,
    pub line: LineDescriptor,
    pub word: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub range: TextRange,
    pub line: LineDescriptor,
    pub url: String,
}

/// Results of the last `check_text`, kept until the next lookup on the same
/// snapshot and language.
struct CachedCheck {
    language: String,
    digest: Vec<u8>,
    results: Vec<MisspelledRange>,
}

/// One spell-checking context: configuration, collaborators, the ignore set
/// and the last results.
///
/// Texts are only borrowed for the duration of a call.
pub struct SpellCheckSession {
    config: SessionConfig,
    speller: Arc<dyn Speller>,
    dictionary: Arc<dyn PersonalDictionary>,
    links: Option<Arc<dyn LinkValidator>>,
    ignored: HashMap<String, WordSet>,
    last: Option<CachedCheck>,
}

impl SpellCheckSession {
    pub fn new(
        mut config: SessionConfig,
        speller: Arc<dyn Speller>,
        dictionary: Arc<dyn PersonalDictionary>,
    ) -> Self {
        config.language = config.language.trim().to_string();
        Self {
            config,
            speller,
            dictionary,
            links: None,
            ignored: HashMap::new(),
            last: None,
        }
    }

    pub fn with_link_validator(mut self, validator: Arc<dyn LinkValidator>) -> Self {
        self.links = Some(validator);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn language(&self) -> &str {
        &self.config.language
    }

    pub fn set_use_network(&mut self, use_network: bool) {
        self.config.use_network = use_network;
    }

    pub fn set_check_links(&mut self, check_links: bool) {
        self.config.check_links = check_links;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Switch language. Cached results from the old language are dropped.
    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into().trim().to_string();
        if language != self.config.language {
            self.config.language = language;
            self.last = None;
        }
    }

    pub fn set_root(&mut self, root: Option<PathBuf>) {
        self.config.root = root;
    }

    pub fn root(&self) -> Option<&Path> {
        self.config.root.as_deref()
    }

    /// Whether `text` has at least one misspelling not in the ignore set.
    ///
    /// The results are kept for a following [`find_misspellings`] on the same
    /// text. Empty text is clean.
    ///
    /// [`find_misspellings`]: Self::find_misspellings
    pub fn check_text(&mut self, text: &str) -> Result<bool> {
        self.active_language()?;
        self.last = None;
        if text.is_empty() {
            return Ok(false);
        }

        let results = self.run_check(text)?;
        let found = !results.is_empty();
        self.last = Some(CachedCheck {
            language: self.config.language.clone(),
            digest: digest(text),
            results,
        });
        Ok(found)
    }

    /// Every misspelling in `text` not in the ignore set, with its line,
    /// in document order. Empty when the text is clean.
    pub fn find_misspellings(&mut self, text: &str) -> Result<Vec<MisspelledRange>> {
        self.active_language()?;
        if text.is_empty() {
            self.last = None;
            return Ok(Vec::new());
        }

        if let Some(cached) = self.last.take() {
            if cached.language == self.config.language && cached.digest == digest(text) {
                return Ok(cached.results);
            }
        }

        self.run_check(text)
    }

    /// Links in `text` that do not resolve. Empty unless link checking is on.
    pub fn find_broken_links(&self, text: &str) -> Result<Vec<BrokenLink>> {
        if !self.config.check_links || text.is_empty() {
            return Ok(Vec::new());
        }
        let validator = self.links.as_ref().ok_or_else(|| CapabilityError::Unavailable {
            reason: "link checking is enabled but no link validator is configured".to_string(),
        })?;

        let mut index = LineIndex::new(text);
        let mut broken = Vec::new();
        for link in links::extract_links(text) {
            if validator.validate(&link.url, self.root(), self.config.use_network)? {
                continue;
            }
            let line = index.find_line(link.range)?;
            broken.push(BrokenLink {
                range: link.range,
                line,
                url: link.url,
            });
        }

        debug!("{} broken link(s)", broken.len());
        Ok(broken)
    }

    /// Add words to the persistent dictionary for the current language.
    /// Returns how many were new.
    pub fn learn<I, W>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = words::normalize(words);
        if words.is_empty() {
            return Ok(0);
        }
        let language = self.active_language()?;
        let added = self.dictionary.add_words(language, &words)?;
        if added > 0 {
            self.last = None;
        }
        Ok(added)
    }

    /// Remove words from the persistent dictionary for the current language.
    /// Returns how many were present.
    pub fn forget<I, W>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = words::normalize(words);
        if words.is_empty() {
            return Ok(0);
        }
        let language = self.active_language()?;
        let removed = self.dictionary.remove_words(language, &words)?;
        if removed > 0 {
            self.last = None;
        }
        Ok(removed)
    }

    /// Exclude words from reports for the rest of this session, in the
    /// current language only.
    pub fn ignore<I, W>(&mut self, words: I)
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let added = self
            .ignored
            .entry(self.config.language.clone())
            .or_default()
            .insert_all(words);
        if added > 0 {
            self.last = None;
        }
    }

    pub fn learn_delimited(&mut self, words: &str) -> Result<usize> {
        self.learn(split_delimited(words))
    }

    pub fn forget_delimited(&mut self, words: &str) -> Result<usize> {
        self.forget(split_delimited(words))
    }

    pub fn ignore_delimited(&mut self, words: &str) {
        self.ignore(split_delimited(words));
    }

    /// Ignored words for the current language.
    pub fn ignored(&self) -> Option<&WordSet> {
        self.ignored.get(&self.config.language)
    }

    fn active_language(&self) -> Result<&str> {
        let language = self.config.language.as_str();
        if language.is_empty() {
            return Err(Error::LanguageNotSet);
        }
        if !self.speller.supports_language(language) {
            return Err(Error::UnsupportedLanguage {
                language: language.to_string(),
            });
        }
        Ok(language)
    }

    fn run_check(&self, text: &str) -> Result<Vec<MisspelledRange>> {
        let language = self.active_language()?;
        let options = CheckOptions {
            use_network: self.config.use_network,
            suggestions: self.config.verbose,
        };

        let mut flagged = self.speller.check(text, language, &options)?;
        flagged.sort_by_key(|f| f.range.start);

        let ignored = self.ignored.get(&self.config.language);
        let mut index = LineIndex::new(text);
        let mut results = Vec::with_capacity(flagged.len());

        for FlaggedWord { range, suggestions } in flagged {
            let word = range.slice(text).ok_or(Error::RangeOutOfBounds {
                start: range.start,
                end: range.end(),
                len: text.len(),
            })?;
            if ignored.is_some_and(|set| set.contains(word)) {
                continue;
            }

            let line = index.find_line(range)?;
            results.push(MisspelledRange {
                range,
                line,
                word: word.to_string(),
                suggestions,
            });
        }

        debug!(
            "Checked {} bytes in '{}': {} misspelling(s)",
            text.len(),
            language,
            results.len()
        );
        Ok(results)
    }
}

fn digest(text: &str) -> Vec<u8> {
    Sha256::digest(text.as_bytes()).to_vec()
}
