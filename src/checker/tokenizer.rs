use crate::lines::TextRange;
use unicode_segmentation::UnicodeSegmentation;

/// A checkable word and the bytes it occupies in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub range: TextRange,
}

/// Split `text` into words on Unicode word boundaries.
///
/// Numbers, punctuation and single characters are skipped. Apostrophes stay
/// inside words ("don't"), and so do underscores ("snake_case").
pub fn words(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.split_word_bound_indices().filter_map(|(start, word)| {
        let letters = word.chars().filter(|c| c.is_alphabetic()).count();
        if letters < 2 || word.chars().any(|c| c.is_numeric()) {
            return None;
        }
        if !word
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '\'' | '’' | '_'))
        {
            return None;
        }
        Some(Token {
            text: word,
            range: TextRange::new(start, word.len()),
        })
    })
}

/// Split camelCase and snake_case identifiers into their parts.
pub fn split_compound_word(word: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        if ch == '_' || ch == '-' {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            result.push(std::mem::take(&mut current));
            current.extend(ch.to_lowercase());
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        result.push(current);
    }

    if result.is_empty() {
        vec![word.to_string()]
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_with_offsets() {
        let text = "Hello, wörld! 42 x don't";
        let tokens: Vec<_> = words(text).collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Hello", "wörld", "don't"]);
        for token in tokens {
            assert_eq!(token.range.slice(text), Some(token.text));
        }
    }

    #[test]
    fn test_words_skip_alphanumerics() {
        let texts: Vec<_> = words("abc123 utf8 plain snake_case").map(|t| t.text).collect();
        assert_eq!(texts, vec!["plain", "snake_case"]);
    }

    #[test]
    fn test_compound_splitting() {
        assert_eq!(split_compound_word("camelCase"), vec!["camel", "case"]);
        assert_eq!(split_compound_word("snake_case"), vec!["snake", "case"]);
        assert_eq!(split_compound_word("kebab-case"), vec!["kebab", "case"]);
    }
}
