use crate::checker::capability::PersonalDictionary;
use crate::error::CapabilityError;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

const FILE_HEADER: &str = "# Personal dictionary, one word per line\n";

/// The learned-word lists shared by every session in the process.
///
/// Each language is kept in `<dir>/<language>.txt` and read the first time
/// it is touched. All access goes through one mutex, and every change
/// rewrites the whole file, so the last writer wins.
pub struct WordStore {
    dir: Option<PathBuf>,
    languages: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl WordStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            languages: Mutex::new(HashMap::new()),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            languages: Mutex::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, language: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.txt", language)))
    }

    /// All learned words for `language`, sorted.
    pub fn words(&self, language: &str) -> Result<Vec<String>, CapabilityError> {
        let mut languages = self.lock();
        let words = self.loaded(&mut languages, language)?;
        Ok(words.iter().cloned().collect())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BTreeSet<String>>> {
        self.languages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn loaded<'m>(
        &self,
        languages: &'m mut HashMap<String, BTreeSet<String>>,
        language: &str,
    ) -> Result<&'m mut BTreeSet<String>, CapabilityError> {
        if !languages.contains_key(language) {
            let words = match self.path_for(language) {
                Some(path) if path.exists() => {
                    debug!("Reading personal dictionary {}", path.display());
                    parse_word_file(&fs::read_to_string(&path)?)
                }
                _ => BTreeSet::new(),
            };
            languages.insert(language.to_string(), words);
        }
        Ok(languages.entry(language.to_string()).or_default())
    }

    fn persist(&self, language: &str, words: &BTreeSet<String>) -> Result<(), CapabilityError> {
        let Some(path) = self.path_for(language) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::from(FILE_HEADER);
        for word in words {
            content.push_str(word);
            content.push('\n');
        }
        fs::write(&path, content)?;
        Ok(())
    }

    /// Apply `apply` to a copy of the language's set and swap it in only once
    /// the file write succeeded.
    fn update(
        &self,
        language: &str,
        words: &[String],
        apply: impl Fn(&mut BTreeSet<String>, &str) -> bool,
    ) -> Result<usize, CapabilityError> {
        let mut languages = self.lock();
        let set = self.loaded(&mut languages, language)?;

        let mut updated = set.clone();
        let mut changed = 0;
        for word in words {
            let word = word.trim();
            if !word.is_empty() && apply(&mut updated, word) {
                changed += 1;
            }
        }

        if changed > 0 {
            self.persist(language, &updated)?;
            *set = updated;
        }
        Ok(changed)
    }
}

impl PersonalDictionary for WordStore {
    fn add_words(&self, language: &str, words: &[String]) -> Result<usize, CapabilityError> {
        self.update(language, words, |set, word| set.insert(word.to_string()))
    }

    fn remove_words(&self, language: &str, words: &[String]) -> Result<usize, CapabilityError> {
        self.update(language, words, |set, word| set.remove(word))
    }

    fn contains(&self, language: &str, word: &str) -> Result<bool, CapabilityError> {
        let mut languages = self.lock();
        Ok(self.loaded(&mut languages, language)?.contains(word))
    }
}

fn parse_word_file(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty() && !word.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let store = WordStore::in_memory();
        assert_eq!(store.add_words("en", &words(&["foo", "foo", " bar "])).unwrap(), 2);
        assert_eq!(store.add_words("en", &words(&["foo"])).unwrap(), 0);
        assert_eq!(store.words("en").unwrap(), vec!["bar", "foo"]);

        assert_eq!(store.remove_words("en", &words(&["missing", "foo"])).unwrap(), 1);
        assert_eq!(store.words("en").unwrap(), vec!["bar"]);
    }

    #[test]
    fn test_languages_are_separate() {
        let store = WordStore::in_memory();
        store.add_words("en_US", &words(&["color"])).unwrap();
        assert!(store.contains("en_US", "color").unwrap());
        assert!(!store.contains("en_GB", "color").unwrap());
    }

    #[test]
    fn test_persists_between_instances() {
        let dir = tempdir().unwrap();
        WordStore::open(dir.path())
            .add_words("en_US", &words(&["rustacean", "crate"]))
            .unwrap();

        let path = dir.path().join("en_US.txt");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('#'));

        let reopened = WordStore::open(dir.path());
        assert!(reopened.contains("en_US", "rustacean").unwrap());
        reopened.remove_words("en_US", &words(&["crate"])).unwrap();
        assert_eq!(
            WordStore::open(dir.path()).words("en_US").unwrap(),
            vec!["rustacean"]
        );
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let store = Arc::new(WordStore::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.add_words("en", &[format!("word{}", i)]).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.words("en").unwrap().len(), 8);
    }

    #[test]
    fn test_failed_write_leaves_words_unchanged() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let store = WordStore::open(blocker.join("personal"));
        assert!(matches!(
            store.add_words("en", &words(&["zork"])),
            Err(CapabilityError::Io(_))
        ));
        assert!(!store.contains("en", "zork").unwrap());
        assert!(store.words("en").unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_word_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("en.txt")).unwrap();

        let store = WordStore::open(dir.path());
        assert!(matches!(
            store.contains("en", "zork"),
            Err(CapabilityError::Io(_))
        ));
    }
}
