use crate::checker::dictionary::Dictionary;
use std::collections::BTreeSet;

const MAX_DISTANCE: usize = 2;

/// Replacement candidates for a lowercase `word`, closest first.
///
/// Candidates come from single edits that land in the dictionary and from
/// dictionary words sharing the first few characters.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 || word.is_empty() {
        return Vec::new();
    }

    let mut ranked: BTreeSet<(usize, String)> = BTreeSet::new();

    for candidate in single_edits(word) {
        if candidate != word && dictionary.contains(&candidate) {
            ranked.insert((1, candidate));
        }
    }

    for prefix_len in [3, 2] {
        if ranked.len() >= max_suggestions {
            break;
        }
        let prefix: String = word.chars().take(prefix_len).collect();
        if prefix.chars().count() < prefix_len {
            continue;
        }
        for candidate in dictionary.words_with_prefix(&prefix) {
            let distance = edit_distance(word, &candidate);
            if distance > 0 && distance <= MAX_DISTANCE {
                ranked.insert((distance, candidate));
            }
        }
    }

    ranked
        .into_iter()
        .map(|(_, candidate)| candidate)
        .take(max_suggestions)
        .collect()
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Every word one deletion, transposition, substitution or insertion away.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    for i in 0..chars.len() {
        let mut edit = chars.clone();
        edit.remove(i);
        edits.push(edit.into_iter().collect());
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut edit = chars.clone();
        edit.swap(i, i + 1);
        edits.push(edit.into_iter().collect());
    }

    for i in 0..=chars.len() {
        for letter in 'a'..='z' {
            if i < chars.len() {
                let mut edit = chars.clone();
                edit[i] = letter;
                edits.push(edit.into_iter().collect());
            }
            let mut edit = chars.clone();
            edit.insert(i, letter);
            edits.push(edit.into_iter().collect());
        }
    }

    edits
}
