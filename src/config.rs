use crate::checker::SessionConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".spellscan.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub use_network: bool,
    pub check_links: bool,
    pub verbose: bool,
    pub root: Option<PathBuf>,
    pub ignore_words: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub max_suggestions: usize,
    /// Where `.dict` files and personal word lists live.
    pub data_dir: Option<PathBuf>,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            use_network: false,
            check_links: false,
            verbose: false,
            root: None,
            ignore_words: Vec::new(),
            ignore_patterns: vec![
                r"^[A-Z0-9_]{2,}$".to_string(),       // ALL_CAPS
                r"^[a-fA-F0-9]{32,}$".to_string(),    // Hashes
            ],
            max_suggestions: default_max_suggestions(),
            data_dir: None,
        }
    }
}

/// One config file as written. Absent keys leave the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    pub language: Option<String>,
    pub use_network: Option<bool>,
    pub check_links: Option<bool>,
    pub verbose: Option<bool>,
    pub root: Option<PathBuf>,
    pub ignore_words: Option<Vec<String>>,
    pub ignore_patterns: Option<Vec<String>>,
    pub max_suggestions: Option<usize>,
    pub data_dir: Option<PathBuf>,
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub use_network: bool,
    pub check_links: bool,
    pub verbose: bool,
    pub root: Option<PathBuf>,
    pub ignore_words: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config = config.merge(Self::from_file(&local_path)?);
        }

        Ok(config.apply(overrides))
    }

    pub fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(use_network) = file.use_network {
            self.use_network = use_network;
        }
        if let Some(check_links) = file.check_links {
            self.check_links = check_links;
        }
        if let Some(verbose) = file.verbose {
            self.verbose = verbose;
        }
        if file.root.is_some() {
            self.root = file.root;
        }
        if let Some(words) = file.ignore_words {
            self.ignore_words = words;
        }
        if let Some(patterns) = file.ignore_patterns {
            self.ignore_patterns = patterns;
        }
        if let Some(max) = file.max_suggestions {
            self.max_suggestions = max;
        }
        if file.data_dir.is_some() {
            self.data_dir = file.data_dir;
        }
        self
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        self.use_network |= overrides.use_network;
        self.check_links |= overrides.check_links;
        self.verbose |= overrides.verbose;
        if overrides.root.is_some() {
            self.root = overrides.root;
        }
        self.ignore_words.extend(overrides.ignore_words);
        self.ignore_patterns.extend(overrides.ignore_patterns);
        if overrides.data_dir.is_some() {
            self.data_dir = overrides.data_dir;
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            use_network: self.use_network,
            check_links: self.check_links,
            verbose: self.verbose,
            language: self.language.clone(),
            root: self.root.clone(),
        }
    }

    /// Directory holding installed `.dict` files.
    pub fn dictionary_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(Self::default_data_dir)
    }

    /// Directory holding the personal word lists.
    pub fn personal_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.join("personal")),
            None => ProjectDirs::from("", "", "spellscan")
                .map(|dirs| dirs.config_dir().join("personal")),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellscan").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellscan").map(|dirs| dirs.data_dir().to_path_buf())
    }
}
