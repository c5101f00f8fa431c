use crate::checker::{BrokenLink, MisspelledRange};
use crate::dict::manager::DictionaryInfo;
use crate::lines::LineDescriptor;
use crate::{FileReport, Finding};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const CONTEXT_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_errors: usize,
    files: &'a [FileReport],
}

/// Turn session results for one file into printable findings.
pub fn build_report(
    file: &str,
    text: &str,
    misspellings: &[MisspelledRange],
    broken_links: &[BrokenLink],
) -> FileReport {
    FileReport {
        file: file.to_string(),
        misspellings: misspellings
            .iter()
            .map(|m| finding(text, &m.line, m.range.start, &m.word, m.suggestions.clone()))
            .collect(),
        broken_links: broken_links
            .iter()
            .map(|l| finding(text, &l.line, l.range.start, &l.url, Vec::new()))
            .collect(),
    }
}

fn finding(
    text: &str,
    line: &LineDescriptor,
    offset: usize,
    found: &str,
    suggestions: Vec<String>,
) -> Finding {
    let column = line.column_of(text, offset);
    Finding {
        text: found.to_string(),
        line: line.number,
        column,
        context: get_context(line.contents(text), column - 1, found.chars().count()),
        suggestions,
    }
}

/// Up to `CONTEXT_CHARS` characters either side of a word, with ellipses
/// where the line was cut.
fn get_context(line: &str, column: usize, word_chars: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let start = column.saturating_sub(CONTEXT_CHARS);
    let end = (column + word_chars + CONTEXT_CHARS).min(chars.len());
    let context: String = chars[start.min(end)..end].iter().collect();

    match (start > 0, end < chars.len()) {
        (true, true) => format!("...{}...", context),
        (true, false) => format!("...{}", context),
        (false, true) => format!("{}...", context),
        (false, false) => context,
    }
}

pub fn print_reports(reports: &[FileReport], colored_output: bool, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for report in reports {
                print_text_report(report, colored_output);
            }
            print_check_summary(reports, colored_output);
        }
        OutputFormat::Json => print_json_reports(reports),
    }
}

fn print_text_report(report: &FileReport, colored_output: bool) {
    if report.error_count() == 0 {
        return;
    }

    if colored_output {
        println!("\n{}", report.file.bold().underline());
    } else {
        println!("\n{}", report.file);
    }

    for error in &report.misspellings {
        let line_info = format!("{}:{}", error.line, error.column);

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                error.text.red().bold(),
                format_context(&error.context, &error.text, colored_output)
            );
        } else {
            println!("  {} {} {}", line_info, error.text, &error.context);
        }

        if !error.suggestions.is_empty() {
            let suggestions = if colored_output {
                error
                    .suggestions
                    .iter()
                    .map(|s| s.green().to_string())
                    .collect::<Vec<_>>()
                    .join(&", ".dimmed().to_string())
            } else {
                error.suggestions.join(", ")
            };
            println!("    → {}", suggestions);
        }
    }

    for link in &report.broken_links {
        let line_info = format!("{}:{}", link.line, link.column);
        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                "broken link".yellow(),
                link.text.red()
            );
        } else {
            println!("  {} broken link {}", line_info, link.text);
        }
    }
}

fn print_json_reports(reports: &[FileReport]) {
    let output = JsonOutput {
        files_checked: reports.len(),
        total_errors: reports.iter().map(FileReport::error_count).sum(),
        files: reports,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

fn format_context(context: &str, word: &str, colored: bool) -> String {
    if colored {
        context.replace(word, &word.red().bold().to_string())
    } else {
        context.to_string()
    }
}

pub fn print_check_summary(reports: &[FileReport], colored: bool) {
    let total_errors: usize = reports.iter().map(FileReport::error_count).sum();
    let files = reports.len();
    let file_word = if files == 1 { "file" } else { "files" };

    println!();
    if total_errors == 0 {
        let message = format!("✓ No problems found in {} {}", files, file_word);
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
    } else {
        let error_word = if total_errors == 1 { "problem" } else { "problems" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_errors.to_string().red().bold(),
                error_word,
                files,
                file_word
            );
        } else {
            println!("✗ {} {} found in {} {}", total_errors, error_word, files, file_word);
        }
    }
}

pub fn print_dictionaries(dictionaries: &[DictionaryInfo], colored: bool) {
    if dictionaries.is_empty() {
        println!("No dictionaries installed.");
        return;
    }

    println!("Installed dictionaries:");
    for info in dictionaries {
        let words = info
            .word_count
            .map_or_else(|| "unreadable".to_string(), |n| format!("{} words", n));
        let details = format!("{}KB, {}", info.size_bytes / 1024, words);
        if colored {
            println!("  {} {} ({})", "✓".green(), info.language.cyan().bold(), details.dimmed());
        } else {
            println!("  ✓ {} ({})", info.language, details);
        }
    }
}
