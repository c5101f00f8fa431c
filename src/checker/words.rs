use std::collections::HashSet;

/// Split a comma-delimited word list, trimming whitespace and dropping empties.
pub fn split_delimited(words: &str) -> Vec<String> {
    words
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize any sequence of words the same way [`split_delimited`] does.
pub fn normalize<I, W>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| word.as_ref().trim().to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

/// An unordered set of words. Adding a present word or removing an absent
/// one is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many words were newly added.
    pub fn insert_all<I, W>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        normalize(words)
            .into_iter()
            .filter(|word| self.words.insert(word.clone()))
            .count()
    }

    /// Returns how many words were actually removed.
    pub fn remove_all<I, W>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        normalize(words)
            .iter()
            .filter(|word| self.words.remove(word.as_str()))
            .count()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<W: AsRef<str>> FromIterator<W> for WordSet {
    fn from_iter<I: IntoIterator<Item = W>>(iter: I) -> Self {
        let mut set = WordSet::new();
        set.insert_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_delimited() {
        assert_eq!(split_delimited("foo, bar ,,baz"), vec!["foo", "bar", "baz"]);
        assert!(split_delimited(" , ").is_empty());
        assert!(split_delimited("").is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = WordSet::new();
        assert_eq!(set.insert_all(["foo", "bar"]), 2);
        assert_eq!(set.insert_all(["foo", " bar "]), 0);
        assert_eq!(set.len(), 2);
        assert!(set.contains("bar"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set: WordSet = ["foo"].into_iter().collect();
        assert_eq!(set.remove_all(["missing"]), 0);
        assert_eq!(set.remove_all(["foo"]), 1);
        assert!(set.is_empty());
    }
}
