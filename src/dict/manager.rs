use crate::checker::dictionary::Dictionary;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub word_count: Option<usize>,
}

/// Installed `.dict` files in `data_dir`, sorted by language.
pub fn list_dictionaries(data_dir: &Path) -> Result<Vec<DictionaryInfo>> {
    if !data_dir.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data directory: {}", data_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        found.push(DictionaryInfo {
            language: language.to_string(),
            size_bytes: fs::metadata(&path)?.len(),
            word_count: Dictionary::load_from_path(&path).ok().map(|d| d.len()),
            path,
        });
    }

    found.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(found)
}

/// Build `<data_dir>/<language>.dict` from a plain word list, one word per line.
pub fn build_dictionary(data_dir: &Path, language: &str, wordlist: &Path) -> Result<DictionaryInfo> {
    let content = fs::read_to_string(wordlist)
        .with_context(|| format!("Failed to read word list: {}", wordlist.display()))?;

    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    let words = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let path = data_dir.join(format!("{}.dict", language));
    let word_count = Dictionary::build_from_words(words, &path)
        .with_context(|| format!("Failed to build dictionary: {}", path.display()))?;

    Ok(DictionaryInfo {
        language: language.to_string(),
        size_bytes: fs::metadata(&path)?.len(),
        word_count: Some(word_count),
        path,
    })
}
