//! Source text and text view types.
//!
//! Type names are scanned one character at a time, so every position in this
//! crate is a character offset, not a byte offset. `SourceText` keeps the
//! mapping between the two so views can be sliced without copying.

use std::fmt;

/// A position in source text, measured in characters from the start.
pub type TextPos = usize;

/// The immutable input of a parse, indexable by character.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    chars: Vec<char>,
    /// Byte offset of every character, plus one trailing entry for `text.len()`.
    offsets: Vec<usize>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            chars.push(ch);
            offsets.push(offset);
        }
        offsets.push(text.len());
        Self {
            text: text.to_string(),
            chars,
            offsets,
        }
    }

    /// The full source as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the source.
    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The character at `pos`, or `None` past either end.
    #[inline]
    pub fn char_at(&self, pos: TextPos) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// All characters of the source.
    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Byte offset of the character at `pos`. Positions past the end map to the
    /// byte length of the source.
    #[inline]
    pub fn byte_offset(&self, pos: TextPos) -> usize {
        self.offsets[pos.min(self.chars.len())]
    }

    /// Slice the characters `[start, end)`, clamped to the source bounds.
    pub fn slice(&self, start: TextPos, end: TextPos) -> &str {
        let end = end.min(self.chars.len());
        if start >= end {
            return "";
        }
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceText({:?})", self.text)
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A half-open `[start, end)` view over a `SourceText`.
///
/// The view does not own any text; the substring is materialized on demand by
/// [`TextView::text`]. While unlocked, both bounds may still move (the parser
/// extends `end` as it consumes characters). Once locked, assignments are
/// ignored and reported as not applied.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextView {
    start: TextPos,
    end: TextPos,
    locked: bool,
}

impl TextView {
    /// Create an unlocked view.
    #[inline]
    pub fn new(start: TextPos, end: TextPos) -> Self {
        Self {
            start,
            end,
            locked: false,
        }
    }

    /// Create an unlocked, empty view anchored at `pos`.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub fn start(&self) -> TextPos {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.end
    }

    /// Move the end bound. Returns `false` if the view is locked.
    pub fn set_end(&mut self, end: TextPos) -> bool {
        if self.locked {
            return false;
        }
        self.end = end;
        true
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freeze both bounds.
    #[inline]
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Whether the view selects nothing from a source of `source_len` characters.
    #[inline]
    pub fn is_empty(&self, source_len: usize) -> bool {
        source_len == 0 || self.start >= source_len || self.end <= self.start
    }

    /// The selected text, or `""` if the view is empty.
    pub fn text<'s>(&self, source: &'s SourceText) -> &'s str {
        if self.is_empty(source.len()) {
            return "";
        }
        source.slice(self.start, self.end)
    }
}

impl fmt::Debug for TextView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)?;
        if self.locked {
            write!(f, " (locked)")?;
        }
        Ok(())
    }
}

impl fmt::Display for TextView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_text_slices_by_char() {
        let source = SourceText::new("Ünïcode`1");
        assert_eq!(source.len(), 9);
        assert_eq!(source.char_at(0), Some('Ü'));
        assert_eq!(source.char_at(9), None);
        assert_eq!(source.slice(0, 7), "Ünïcode");
        assert_eq!(source.slice(7, 100), "`1");
        assert_eq!(source.slice(5, 2), "");
        assert_eq!(source.byte_offset(1), 2);
        assert_eq!(source.byte_offset(42), source.as_str().len());
    }

    #[test]
    fn test_text_view_empty() {
        let source = SourceText::new("System.Int32");
        assert!(TextView::empty(3).is_empty(source.len()));
        assert!(TextView::new(5, 2).is_empty(source.len()));
        assert!(TextView::new(12, 14).is_empty(source.len()));
        assert!(TextView::new(0, 1).is_empty(0));
        assert!(!TextView::new(0, 6).is_empty(source.len()));
        assert_eq!(TextView::new(0, 6).text(&source), "System");
        assert_eq!(TextView::new(7, 99).text(&source), "Int32");
    }

    #[test]
    fn test_text_view_lock() {
        let mut view = TextView::empty(0);
        assert!(view.set_end(4));
        view.lock();
        assert!(view.is_locked());
        assert!(!view.set_end(8));
        assert_eq!((view.start(), view.end()), (0, 4));
    }
}
