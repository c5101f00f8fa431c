//! Mapping between absolute offsets in a text snapshot and its lines.
//!
//! A [`LineIndex`] walks the snapshot forward exactly once. It yields
//! [`LineDescriptor`] values as an iterator and answers [`LineIndex::find_line`]
//! queries from the same cursor, so a batch of lookups sorted by start offset
//! costs a single pass over the text.

pub mod range;

pub use range::TextRange;

use crate::error::{Error, Result};
use serde::Serialize;
use std::iter::FusedIterator;

/// One line of a snapshot: its 1-based number and the bytes it occupies,
/// terminator included.
///
/// Descriptors are plain values. Holding one across further calls on the
/// index that produced it is always safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineDescriptor {
    pub number: usize,
    pub range: TextRange,
}

impl LineDescriptor {
    pub fn contains_range(&self, range: TextRange) -> bool {
        self.range.contains_range(range)
    }

    /// Length in bytes of the terminator that ends this line, 0 for an
    /// unterminated last line.
    pub fn terminator_len(&self, text: &str) -> usize {
        let Some(line) = self.range.slice(text) else {
            return 0;
        };
        if line.ends_with("\r\n") {
            2
        } else {
            line.chars()
                .next_back()
                .filter(|&c| is_terminator_char(c))
                .map_or(0, char::len_utf8)
        }
    }

    /// The line's text without its terminator.
    pub fn contents<'a>(&self, text: &'a str) -> &'a str {
        let end = self.range.end().saturating_sub(self.terminator_len(text));
        text.get(self.range.start..end).unwrap_or("")
    }

    /// 1-based character column of `offset` within this line.
    pub fn column_of(&self, text: &str, offset: usize) -> usize {
        let offset = offset.clamp(self.range.start, self.range.end());
        match text.get(self.range.start..offset) {
            Some(prefix) => prefix.chars().count() + 1,
            None => offset - self.range.start + 1,
        }
    }
}

fn is_terminator_char(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Position and byte length of the first line terminator at or after `from`.
fn next_terminator(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return Some((i, 1)),
            b'\r' => {
                let len = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                return Some((i, len));
            }
            // U+0085 NEXT LINE
            0xC2 if bytes.get(i + 1) == Some(&0x85) => return Some((i, 2)),
            // U+2028 LINE SEPARATOR, U+2029 PARAGRAPH SEPARATOR
            0xE2 if bytes.get(i + 1) == Some(&0x80)
                && matches!(bytes.get(i + 2), Some(0xA8) | Some(0xA9)) =>
            {
                return Some((i, 3))
            }
            _ => i += 1,
        }
    }
    None
}

/// Forward-only line walker over a borrowed snapshot.
///
/// Once exhausted it stays exhausted; build a new index to start over.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    cursor: usize,
    number: usize,
    current: Option<LineDescriptor>,
    last_query: Option<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: 0,
            number: 0,
            current: None,
            last_query: None,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The most recently produced line, if any.
    pub fn current(&self) -> Option<LineDescriptor> {
        self.current
    }

    /// Find the line containing the start of `range`.
    ///
    /// `range` must lie inside the snapshot. Successive calls must not move
    /// backwards: a start offset below the previous query's start, or below
    /// the line the index has already walked to, is rejected rather than
    /// rescanned. A range spanning several lines resolves to the line of its
    /// start.
    pub fn find_line(&mut self, range: TextRange) -> Result<LineDescriptor> {
        let len = self.text.len();
        if range.start >= len || range.end() > len {
            return Err(Error::RangeOutOfBounds {
                start: range.start,
                end: range.end(),
                len,
            });
        }

        if let Some(previous) = self.last_query {
            if range.start < previous {
                return Err(Error::NonMonotonicQuery {
                    start: range.start,
                    previous,
                });
            }
        }

        if let Some(line) = self.current {
            if line.range.contains_offset(range.start) {
                self.last_query = Some(range.start);
                return Ok(line);
            }
            if range.start < line.range.start {
                return Err(Error::NonMonotonicQuery {
                    start: range.start,
                    previous: line.range.start,
                });
            }
        }

        self.last_query = Some(range.start);
        while let Some(line) = self.next() {
            if line.range.contains_offset(range.start) {
                return Ok(line);
            }
        }

        // The bounds check above guarantees some line holds `range.start`.
        Err(Error::RangeOutOfBounds {
            start: range.start,
            end: range.end(),
            len,
        })
    }
}

impl Iterator for LineIndex<'_> {
    type Item = LineDescriptor;

    fn next(&mut self) -> Option<LineDescriptor> {
        if self.cursor >= self.text.len() {
            return None;
        }

        let start = self.cursor;
        let end = match next_terminator(self.text.as_bytes(), start) {
            Some((pos, len)) => pos + len,
            None => self.text.len(),
        };

        self.cursor = end;
        self.number += 1;
        let line = LineDescriptor {
            number: self.number,
            range: TextRange::from_bounds(start, end),
        };
        self.current = Some(line);
        Some(line)
    }
}

impl FusedIterator for LineIndex<'_> {}

/// Start walking the lines of `text`.
pub fn lines_of(text: &str) -> LineIndex<'_> {
    LineIndex::new(text)
}

/// Number of lines `text` splits into.
pub fn count_lines(text: &str) -> usize {
    LineIndex::new(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(text: &str) -> Vec<(usize, usize, usize)> {
        LineIndex::new(text)
            .map(|l| (l.number, l.range.start, l.range.end()))
            .collect()
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(ranges("").is_empty());
        assert_eq!(count_lines(""), 0);
    }

    #[test]
    fn test_unterminated_single_line() {
        assert_eq!(ranges("abc"), vec![(1, 0, 3)]);
    }

    #[test]
    fn test_terminated_lines() {
        assert_eq!(ranges("a\nb\n"), vec![(1, 0, 2), (2, 2, 4)]);
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(
            ranges("a\r\nb\rc\nd"),
            vec![(1, 0, 3), (2, 3, 5), (3, 5, 7), (4, 7, 8)]
        );
    }

    #[test]
    fn test_consecutive_terminators_give_empty_lines() {
        assert_eq!(ranges("\n\r\n\r"), vec![(1, 0, 1), (2, 1, 3), (3, 3, 4)]);
    }

    #[test]
    fn test_unicode_separators() {
        let text = "one\u{2028}two\u{85}three\u{2029}";
        let lines: Vec<_> = LineIndex::new(text).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].contents(text), "one");
        assert_eq!(lines[1].contents(text), "two");
        assert_eq!(lines[2].contents(text), "three");
        assert_eq!(lines[2].terminator_len(text), 3);
    }

    #[test]
    fn test_lines_cover_text_contiguously() {
        let samples = [
            "",
            "x",
            "\n",
            "hello\nworld",
            "a\r\n\r\nb\n\nc\r",
            "naïve café\nrésumé\r\n",
            "\u{2029}\u{2029}tail",
        ];
        for text in samples {
            let mut expected_start = 0;
            for (i, line) in LineIndex::new(text).enumerate() {
                assert_eq!(line.number, i + 1);
                assert_eq!(line.range.start, expected_start);
                assert!(!line.range.is_empty());
                expected_start = line.range.end();
            }
            assert_eq!(expected_start, text.len(), "coverage of {:?}", text);
        }
    }

    #[test]
    fn test_exhausted_index_does_not_replay() {
        let mut index = LineIndex::new("a\nb");
        assert_eq!(index.by_ref().count(), 2);
        assert_eq!(index.next(), None);
        assert_eq!(index.next(), None);
    }

    #[test]
    fn test_find_line_sorted_queries() {
        let text = "first line\nsecond\n\nfourth";
        let mut index = LineIndex::new(text);

        assert_eq!(index.find_line(TextRange::new(0, 5)).unwrap().number, 1);
        assert_eq!(index.find_line(TextRange::new(6, 4)).unwrap().number, 1);
        assert_eq!(index.find_line(TextRange::new(11, 6)).unwrap().number, 2);
        assert_eq!(index.find_line(TextRange::new(18, 0)).unwrap().number, 3);
        let last = index.find_line(TextRange::new(19, 6)).unwrap();
        assert_eq!(last.number, 4);
        assert_eq!(last.contents(text), "fourth");
    }

    #[test]
    fn test_find_line_every_offset() {
        let text = "ab\ncd\r\n\nefg";
        let expected: Vec<_> = LineIndex::new(text).collect();
        let mut index = LineIndex::new(text);
        for offset in 0..text.len() {
            let line = index.find_line(TextRange::new(offset, 1)).unwrap();
            assert!(line.range.contains_offset(offset));
            assert_eq!(line, expected[line.number - 1]);
        }
    }

    #[test]
    fn test_find_line_straddling_resolves_to_start() {
        let mut index = LineIndex::new("ab\ncd");
        let line = index.find_line(TextRange::new(1, 3)).unwrap();
        assert_eq!(line.number, 1);
        assert!(!line.contains_range(TextRange::new(1, 3)));
    }

    #[test]
    fn test_find_line_rejects_backwards_query() {
        let mut index = LineIndex::new("ab\ncd\nef");
        index.find_line(TextRange::new(4, 1)).unwrap();
        assert!(matches!(
            index.find_line(TextRange::new(3, 1)),
            Err(Error::NonMonotonicQuery { start: 3, previous: 4 })
        ));
        assert_eq!(index.find_line(TextRange::new(4, 1)).unwrap().number, 2);
    }

    #[test]
    fn test_find_line_rejects_offsets_behind_enumeration() {
        let mut index = LineIndex::new("ab\ncd\nef");
        index.next();
        index.next();
        assert!(matches!(
            index.find_line(TextRange::new(0, 1)),
            Err(Error::NonMonotonicQuery { .. })
        ));
    }

    #[test]
    fn test_find_line_rejects_out_of_bounds() {
        let mut index = LineIndex::new("abc");
        assert!(matches!(
            index.find_line(TextRange::new(3, 0)),
            Err(Error::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            index.find_line(TextRange::new(1, 5)),
            Err(Error::RangeOutOfBounds { .. })
        ));
        assert!(LineIndex::new("")
            .find_line(TextRange::new(0, 0))
            .is_err());
    }

    #[test]
    fn test_column_counts_chars() {
        let text = "x\nçé word";
        let mut index = LineIndex::new(text);
        let word = text.find("word").unwrap();
        let line = index.find_line(TextRange::new(word, 4)).unwrap();
        assert_eq!(line.number, 2);
        assert_eq!(line.column_of(text, word), 4);
    }
}
