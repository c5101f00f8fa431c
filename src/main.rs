use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::{debug, warn, LevelFilter};
use rayon::prelude::*;
use spellscan::checker::{split_delimited, FstSpeller, LinkValidator};
use spellscan::cli::output::{self, OutputFormat};
use spellscan::config::Overrides;
use spellscan::dict::{manager, WordStore};
use spellscan::links::HttpLinkValidator;
use spellscan::{Config, FileReport, SpellCheckSession};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "spellscan")]
#[command(version, about = "Spell check text files and report misspellings by line", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long, env = "SPELLSCAN_LANGUAGE")]
    language: Option<String>,

    /// Words to ignore for this run (comma-delimited, repeatable)
    #[arg(long, value_name = "WORDS")]
    ignore: Vec<String>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Check that links in the text resolve
    #[arg(long)]
    check_links: bool,

    /// Allow network access when validating links
    #[arg(long)]
    network: bool,

    /// Base directory for relative links
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Show suggestions and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if problems are found
    #[arg(long)]
    no_fail: bool,

    /// Directory holding dictionaries and personal word lists
    #[arg(long, env = "SPELLSCAN_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add words to the personal dictionary
    Learn {
        /// Words, comma-delimited or separate
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Remove words from the personal dictionary
    Forget {
        /// Words, comma-delimited or separate
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Build a dictionary from a word list (one word per line)
    Build {
        /// Language code (e.g., en_US, fr_FR)
        language: String,
        /// Word list file
        wordlist: PathBuf,
    },
}

struct Runtime {
    config: Config,
    store: Arc<WordStore>,
    speller: Arc<FstSpeller>,
    links: Option<Arc<dyn LinkValidator>>,
}

impl Runtime {
    fn session(&self) -> SpellCheckSession {
        let mut session = SpellCheckSession::new(
            self.config.session_config(),
            self.speller.clone(),
            self.store.clone(),
        );
        if let Some(links) = &self.links {
            session = session.with_link_validator(links.clone());
        }
        session.ignore(&self.config.ignore_words);
        session
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellscan", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        language: cli.language.clone(),
        use_network: cli.network,
        check_links: cli.check_links,
        verbose: cli.verbose,
        root: cli.root.clone(),
        ignore_words: cli.ignore.iter().flat_map(|w| split_delimited(w)).collect(),
        ignore_patterns: cli.ignore_pattern.clone(),
        data_dir: cli.data_dir.clone(),
    })?;

    let store = Arc::new(match config.personal_dir() {
        Some(dir) => WordStore::open(dir),
        None => WordStore::in_memory(),
    });
    let speller = Arc::new(FstSpeller::from_config(&config, store.clone()));
    let links: Option<Arc<dyn LinkValidator>> = if config.check_links {
        Some(Arc::new(
            HttpLinkValidator::new().context("Failed to set up link checking")?,
        ))
    } else {
        None
    };

    let ctx = Runtime {
        config,
        store,
        speller,
        links,
    };

    if let Some(command) = cli.command {
        return handle_command(command, &ctx, !cli.no_color);
    }

    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let files = collect_files(&cli.files)?;
    debug!("Checking {} file(s)", files.len());

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| check_file(path, &ctx))
        .collect::<Result<Vec<Option<FileReport>>>>()?
        .into_iter()
        .flatten()
        .collect();

    output::print_reports(&reports, !cli.no_color, cli.format);

    let total_errors: usize = reports.iter().map(FileReport::error_count).sum();
    if total_errors > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Expand directories into the files under them, skipping hidden entries.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Check one file. Files that are not valid UTF-8 are skipped.
fn check_file(path: &Path, ctx: &Runtime) -> Result<Option<FileReport>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            warn!("Skipping {}: not UTF-8 text", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
        }
    };

    let mut session = ctx.session();
    if session.config().root.is_none() {
        session.set_root(path.parent().map(Path::to_path_buf));
    }

    let misspellings = if session
        .check_text(&text)
        .with_context(|| format!("Failed to check {}", path.display()))?
    {
        session.find_misspellings(&text)?
    } else {
        Vec::new()
    };
    let broken_links = session
        .find_broken_links(&text)
        .with_context(|| format!("Failed to check links in {}", path.display()))?;

    Ok(Some(output::build_report(
        &path.display().to_string(),
        &text,
        &misspellings,
        &broken_links,
    )))
}

fn handle_command(command: Commands, ctx: &Runtime, colored: bool) -> Result<()> {
    match command {
        Commands::Learn { words } => {
            let words: Vec<String> = words.iter().flat_map(|w| split_delimited(w)).collect();
            let added = ctx.session().learn(&words)?;
            println!(
                "Learned {} new word(s) for {} ({} already known)",
                added,
                ctx.config.language,
                words.len() - added
            );
        }
        Commands::Forget { words } => {
            let words: Vec<String> = words.iter().flat_map(|w| split_delimited(w)).collect();
            let removed = ctx.session().forget(&words)?;
            println!(
                "Forgot {} word(s) for {} ({} not in the dictionary)",
                removed,
                ctx.config.language,
                words.len() - removed
            );
        }
        Commands::Dict { action } => {
            let data_dir = ctx
                .config
                .dictionary_dir()
                .context("Failed to get data directory")?;
            match action {
                DictCommands::List => {
                    output::print_dictionaries(&manager::list_dictionaries(&data_dir)?, colored);
                }
                DictCommands::Build { language, wordlist } => {
                    let info = manager::build_dictionary(&data_dir, &language, &wordlist)?;
                    println!(
                        "✓ Dictionary installed: {} ({} words)",
                        info.path.display(),
                        info.word_count.unwrap_or(0)
                    );
                }
            }
        }
    }
    Ok(())
}
