use crate::error::CapabilityError;
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Words bundled for bootstrapping when no dictionary file is installed.
const BOOTSTRAP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say",
    "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what",
    "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make", "can",
    "like", "time", "no", "just", "him", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "them", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our",
    "work", "first", "well", "way", "even", "new", "want", "because", "any", "these", "give",
    "day", "most", "us", "is", "are", "was", "were", "has", "had", "line", "word", "words",
    "text", "file", "check", "spell", "spelling", "link", "page", "document", "error",
];

/// An immutable, sorted word set backed by an FST.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Build an in-memory dictionary. Words are lowercased and deduplicated.
    pub fn from_words<I, W>(words: I) -> Result<Self, CapabilityError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let set = Set::from_iter(sorted_words(words))?;
        Ok(Self { set })
    }

    /// The bundled word list, for languages that have one.
    pub fn bootstrap(language: &str) -> Option<Self> {
        match language {
            "en_US" | "en_GB" | "en" => Self::from_words(BOOTSTRAP_WORDS).ok(),
            _ => None,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CapabilityError> {
        let bytes = fs::read(path)?;
        let set = Set::new(bytes)?;
        Ok(Self { set })
    }

    /// Write the words as an FST file at `output_path`. Returns the number of
    /// distinct words written.
    pub fn build_from_words<I, W>(words: I, output_path: &Path) -> Result<usize, CapabilityError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let words = sorted_words(words);
        let writer = BufWriter::new(File::create(output_path)?);
        let mut builder = SetBuilder::new(writer)?;
        for word in &words {
            builder.insert(word.as_bytes())?;
        }
        builder.finish()?;
        Ok(words.len())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }
}

fn sorted_words<I, W>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    let mut sorted: Vec<String> = words
        .into_iter()
        .map(|word| word.as_ref().trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect();
    sorted.sort();
    sorted.dedup();
    sorted
}
