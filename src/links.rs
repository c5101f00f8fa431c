//! Finding links in text and checking that they resolve.

use crate::checker::capability::LinkValidator;
use crate::error::CapabilityError;
use crate::lines::TextRange;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref MARKDOWN_TARGET: Regex =
        Regex::new(r#"\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#).unwrap();
    static ref HTML_TARGET: Regex = Regex::new(r#"(?i)\b(?:href|src)\s*=\s*"([^"]+)""#).unwrap();
    static ref BARE_URL: Regex = Regex::new(r#"\b(?:https?|ftp)://[^\s<>()"'\[\]]+"#).unwrap();
}

/// A link target and where it sits in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub range: TextRange,
}

/// Markdown targets, HTML `href`/`src` values and bare URLs, in document order.
/// Overlapping matches keep the earliest one.
pub fn extract_links(text: &str) -> Vec<Link> {
    let mut links: Vec<Link> = Vec::new();

    for re in [&*MARKDOWN_TARGET, &*HTML_TARGET] {
        for caps in re.captures_iter(text) {
            if let Some(target) = caps.get(1) {
                links.push(Link {
                    url: target.as_str().to_string(),
                    range: TextRange::from_bounds(target.start(), target.end()),
                });
            }
        }
    }

    for found in BARE_URL.find_iter(text) {
        let url = found.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        links.push(Link {
            url: url.to_string(),
            range: TextRange::new(found.start(), url.len()),
        });
    }

    links.sort_by_key(|link| (link.range.start, std::cmp::Reverse(link.range.len)));
    let mut kept: Vec<Link> = Vec::with_capacity(links.len());
    for link in links {
        let overlaps = kept
            .last()
            .is_some_and(|prev| link.range.start < prev.range.end());
        if !overlaps {
            kept.push(link);
        }
    }
    kept
}

/// Checks local links against the filesystem and remote ones over HTTP.
///
/// Remote links are only fetched when the caller allows network use;
/// otherwise they are assumed reachable.
pub struct HttpLinkValidator {
    client: Client,
}

impl HttpLinkValidator {
    pub fn new() -> Result<Self, CapabilityError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn check_remote(&self, url: &str) -> Result<bool, CapabilityError> {
        let status = match self.client.head(url).send() {
            Ok(response) => response.status(),
            Err(e) if e.is_builder() => return Err(e.into()),
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                return Ok(false);
            }
        };

        if status == StatusCode::METHOD_NOT_ALLOWED {
            return match self.client.get(url).send() {
                Ok(response) => Ok(is_reachable(response.status())),
                Err(e) if e.is_builder() => Err(e.into()),
                Err(e) => {
                    debug!("GET {} failed: {}", url, e);
                    Ok(false)
                }
            };
        }

        Ok(is_reachable(status))
    }
}

fn is_reachable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// Filesystem path a local link points at, without fragment or query.
fn local_target(url: &str, root: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = url.strip_prefix("file://") {
        return Some(PathBuf::from(path));
    }

    let path = url.split(['#', '?']).next().unwrap_or("");
    if path.is_empty() {
        return None;
    }

    let base = root.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Some(base.join(path.trim_start_matches('/')))
}

impl LinkValidator for HttpLinkValidator {
    fn validate(
        &self,
        url: &str,
        root: Option<&Path>,
        use_network: bool,
    ) -> Result<bool, CapabilityError> {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if !use_network {
                debug!("Skipping remote link {} (network disabled)", url);
                return Ok(true);
            }
            return self.check_remote(url);
        }

        if lower.starts_with("mailto:") || lower.starts_with("ftp://") || lower.starts_with("tel:") {
            return Ok(true);
        }

        Ok(match local_target(url, root) {
            Some(path) => path.exists(),
            None => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn urls(text: &str) -> Vec<String> {
        extract_links(text).into_iter().map(|l| l.url).collect()
    }

    #[test]
    fn test_extracts_each_kind_once() {
        let text = "See [docs](https://example.com/docs) and <a href=\"guide.html\">x</a>.\n\
                    Plain: http://example.org/page. Also [local](notes.md#top \"title\")";
        assert_eq!(
            urls(text),
            vec![
                "https://example.com/docs",
                "guide.html",
                "http://example.org/page",
                "notes.md#top",
            ]
        );
    }

    #[test]
    fn test_link_ranges_point_at_target() {
        let text = "go [here](a/b.md) now";
        let links = extract_links(text);
        assert_eq!(links[0].range.slice(text), Some("a/b.md"));
    }

    #[test]
    fn test_local_links_resolve_against_root() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("present.md"), "").unwrap();
        let validator = HttpLinkValidator::new().unwrap();

        assert!(validator
            .validate("present.md#section", Some(dir.path()), false)
            .unwrap());
        assert!(validator
            .validate("/present.md", Some(dir.path()), false)
            .unwrap());
        assert!(!validator
            .validate("missing.md", Some(dir.path()), false)
            .unwrap());
        assert!(validator.validate("#anchor", Some(dir.path()), false).unwrap());
    }

    #[test]
    fn test_remote_links_assumed_reachable_offline() {
        let validator = HttpLinkValidator::new().unwrap();
        assert!(validator
            .validate("https://invalid.example/nowhere", None, false)
            .unwrap());
        assert!(validator.validate("mailto:someone@example.com", None, false).unwrap());
    }
}
