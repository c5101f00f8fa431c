use crate::checker::capability::{CheckOptions, FlaggedWord, PersonalDictionary, Speller};
use crate::checker::dictionary::Dictionary;
use crate::checker::{suggestions, tokenizer};
use crate::config::Config;
use crate::error::CapabilityError;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Offline speller over FST word lists plus the shared personal dictionary.
///
/// Dictionaries are loaded on first use from `<data_dir>/<language>.dict`;
/// without a file the bundled bootstrap list is used where one exists.
pub struct FstSpeller {
    data_dir: Option<PathBuf>,
    dictionaries: Mutex<HashMap<String, Arc<Dictionary>>>,
    personal: Arc<dyn PersonalDictionary>,
    ignore_patterns: Vec<Regex>,
    max_suggestions: usize,
}

impl FstSpeller {
    pub fn new(personal: Arc<dyn PersonalDictionary>) -> Self {
        Self {
            data_dir: None,
            dictionaries: Mutex::new(HashMap::new()),
            personal,
            ignore_patterns: Vec::new(),
            max_suggestions: 5,
        }
    }

    pub fn from_config(config: &Config, personal: Arc<dyn PersonalDictionary>) -> Self {
        let mut speller = Self::new(personal)
            .with_ignore_patterns(&config.ignore_patterns)
            .with_max_suggestions(config.max_suggestions);
        speller.data_dir = config.dictionary_dir();
        speller
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Compile ignore patterns. Invalid ones are logged and skipped.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        for pattern in patterns {
            match Regex::new(pattern) {
                Ok(re) => self.ignore_patterns.push(re),
                Err(e) => warn!("Invalid ignore pattern '{}': {}", pattern, e),
            }
        }
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Register a dictionary for `language` directly, bypassing the data dir.
    pub fn with_dictionary(self, language: &str, dictionary: Dictionary) -> Self {
        self.cache()
            .insert(language.to_string(), Arc::new(dictionary));
        self
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Dictionary>>> {
        self.dictionaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dictionary_path(&self, language: &str) -> Option<PathBuf> {
        self.data_dir
            .as_deref()
            .map(|dir: &Path| dir.join(format!("{}.dict", language)))
    }

    fn dictionary_for(&self, language: &str) -> Result<Arc<Dictionary>, CapabilityError> {
        if let Some(dictionary) = self.cache().get(language) {
            return Ok(Arc::clone(dictionary));
        }

        let dictionary = match self.dictionary_path(language).filter(|p| p.exists()) {
            Some(path) => {
                debug!("Loading dictionary {}", path.display());
                Dictionary::load_from_path(&path)?
            }
            None => Dictionary::bootstrap(language).ok_or_else(|| {
                CapabilityError::Unavailable {
                    reason: format!("no dictionary installed for '{}'", language),
                }
            })?,
        };

        let dictionary = Arc::new(dictionary);
        self.cache()
            .insert(language.to_string(), Arc::clone(&dictionary));
        Ok(dictionary)
    }

    fn is_known(
        &self,
        dictionary: &Dictionary,
        language: &str,
        word: &str,
    ) -> Result<bool, CapabilityError> {
        let lower = word.to_lowercase().replace('’', "'");
        if dictionary.contains(&lower)
            || self.personal.contains(language, word)?
            || self.personal.contains(language, &lower)?
        {
            return Ok(true);
        }

        let parts = tokenizer::split_compound_word(word);
        if parts.len() < 2 {
            return Ok(false);
        }
        for part in parts {
            let part = part.to_lowercase();
            let known = part.chars().count() <= 1
                || dictionary.contains(&part)
                || self.personal.contains(language, &part)?;
            if !known {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn should_ignore(&self, word: &str) -> bool {
        self.ignore_patterns.iter().any(|re| re.is_match(word))
    }
}

impl Speller for FstSpeller {
    fn supports_language(&self, language: &str) -> bool {
        self.cache().contains_key(language)
            || self
                .dictionary_path(language)
                .is_some_and(|path| path.exists())
            || Dictionary::bootstrap(language).is_some()
    }

    fn check(
        &self,
        text: &str,
        language: &str,
        options: &CheckOptions,
    ) -> Result<Vec<FlaggedWord>, CapabilityError> {
        let dictionary = self.dictionary_for(language)?;
        if options.use_network {
            debug!("Network validation requested; FST dictionaries are checked locally");
        }

        let mut flagged = Vec::new();
        for token in tokenizer::words(text) {
            if self.should_ignore(token.text) || self.is_known(&dictionary, language, token.text)? {
                continue;
            }

            let suggestions = if options.suggestions {
                suggestions::generate(
                    &token.text.to_lowercase(),
                    &dictionary,
                    self.max_suggestions,
                )
            } else {
                Vec::new()
            };

            flagged.push(FlaggedWord {
                range: token.range,
                suggestions,
            });
        }

        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::store::WordStore;

    fn speller(words: &[&str]) -> (FstSpeller, Arc<WordStore>) {
        let store = Arc::new(WordStore::in_memory());
        let speller = FstSpeller::new(store.clone())
            .with_dictionary("en", Dictionary::from_words(words).unwrap());
        (speller, store)
    }

    fn flagged_words(speller: &FstSpeller, text: &str) -> Vec<String> {
        speller
            .check(text, "en", &CheckOptions::default())
            .unwrap()
            .into_iter()
            .map(|f| f.range.slice(text).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_flags_unknown_words_in_order() {
        let (speller, _) = speller(&["the", "quick", "fox"]);
        assert_eq!(
            flagged_words(&speller, "The quikc brown fox"),
            vec!["quikc", "brown"]
        );
    }

    #[test]
    fn test_personal_dictionary_is_consulted() {
        let (speller, store) = speller(&["the"]);
        assert_eq!(flagged_words(&speller, "the rustacean"), vec!["rustacean"]);
        store.add_words("en", &["rustacean".to_string()]).unwrap();
        assert!(flagged_words(&speller, "the rustacean").is_empty());
    }

    #[test]
    fn test_compound_words_accepted_when_parts_known() {
        let (speller, _) = speller(&["line", "index", "read"]);
        assert!(flagged_words(&speller, "lineIndex line_index").is_empty());
        assert_eq!(flagged_words(&speller, "lineIndx"), vec!["lineIndx"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let store = Arc::new(WordStore::in_memory());
        let speller = FstSpeller::new(store)
            .with_dictionary("en", Dictionary::from_words(["word"]).unwrap())
            .with_ignore_patterns(&[r"^[A-Z]{2,}$".to_string(), "(".to_string()]);
        assert_eq!(flagged_words(&speller, "NASA word wrod"), vec!["wrod"]);
    }

    #[test]
    fn test_suggestions_only_when_requested() {
        let (speller, _) = speller(&["people"]);
        let options = CheckOptions {
            suggestions: true,
            ..Default::default()
        };
        let flagged = speller.check("peeple", "en", &options).unwrap();
        assert_eq!(flagged[0].suggestions, vec!["people"]);

        let flagged = speller.check("peeple", "en", &CheckOptions::default()).unwrap();
        assert!(flagged[0].suggestions.is_empty());
    }

    #[test]
    fn test_unknown_language() {
        let (speller, _) = speller(&["the"]);
        assert!(!speller.supports_language("zz_ZZ"));
        assert!(matches!(
            speller.check("text", "zz_ZZ", &CheckOptions::default()),
            Err(CapabilityError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_loads_dictionary_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        Dictionary::build_from_words(["bonjour", "monde"], &dir.path().join("fr_FR.dict"))
            .unwrap();
        let speller =
            FstSpeller::new(Arc::new(WordStore::in_memory())).with_data_dir(dir.path());
        assert!(speller.supports_language("fr_FR"));
        let flagged = speller
            .check("bonjour le monde", "fr_FR", &CheckOptions::default())
            .unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].range, crate::lines::TextRange::new(8, 2));
    }

    #[test]
    fn test_personal_dictionary_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("en.txt")).unwrap();
        let speller = FstSpeller::new(Arc::new(WordStore::open(dir.path())))
            .with_dictionary("en", Dictionary::from_words(["the"]).unwrap());

        assert!(matches!(
            speller.check("the zork", "en", &CheckOptions::default()),
            Err(CapabilityError::Io(_))
        ));
    }
}
