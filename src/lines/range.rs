use serde::Serialize;
use std::fmt;

/// A half-open byte range `[start, start + len)` into a text snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub len: usize,
}

impl TextRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Build a range from `start..end`. An `end` before `start` gives an empty range.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// True iff `other` lies entirely inside `self`.
    ///
    /// An empty `other` is contained when its start is inside `self` or sits
    /// exactly on `self`'s end.
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// The slice of `text` this range covers, if it is in bounds and on char boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end())
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_range() {
        let line = TextRange::new(4, 6);
        assert!(line.contains_range(TextRange::new(4, 6)));
        assert!(line.contains_range(TextRange::new(5, 2)));
        assert!(!line.contains_range(TextRange::new(3, 2)));
        assert!(!line.contains_range(TextRange::new(8, 3)));
        assert!(line.contains_range(TextRange::new(10, 0)));
    }

    #[test]
    fn test_contains_offset_is_half_open() {
        let range = TextRange::from_bounds(2, 5);
        assert!(!range.contains_offset(1));
        assert!(range.contains_offset(2));
        assert!(range.contains_offset(4));
        assert!(!range.contains_offset(5));
        assert!(!TextRange::new(3, 0).contains_offset(3));
    }

    #[test]
    fn test_slice_respects_char_boundaries() {
        let text = "héllo";
        assert_eq!(TextRange::new(0, 3).slice(text), Some("hé"));
        assert_eq!(TextRange::new(0, 2).slice(text), None);
        assert_eq!(TextRange::new(4, 10).slice(text), None);
    }

    #[test]
    fn test_from_bounds_saturates() {
        assert_eq!(TextRange::from_bounds(7, 3), TextRange::new(7, 0));
        assert_eq!(TextRange::from(1..4), TextRange::new(1, 3));
    }
}
