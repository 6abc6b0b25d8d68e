//! The structured error returned by a failed parse.

use std::fmt;

use clrname_core::{TextPos, Token};
use miette::{Diagnostic, LabeledSpan, SourceCode};
use thiserror::Error;

use crate::{ErrorCategory, ErrorDescriptor};

/// A fatal parse error: the first illegal transition of the parse.
///
/// Carries enough context to build a diagnostic without re-parsing. As a
/// [`miette::Diagnostic`] it labels the offending character in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position} (TN{code})")]
pub struct TypeNameError {
    code: u32,
    message: &'static str,
    category: ErrorCategory,
    position: TextPos,
    text: String,
    state: Token,
}

impl TypeNameError {
    /// Create an error from a catalogue entry.
    ///
    /// `position` is a character offset into `text`.
    pub fn new(descriptor: &ErrorDescriptor, text: &str, position: TextPos, state: Token) -> Self {
        Self {
            code: descriptor.code,
            message: descriptor.message,
            category: descriptor.category,
            position,
            text: text.to_string(),
            state,
        }
    }

    /// The numeric error code.
    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Character offset of the offending character.
    #[inline]
    pub fn position(&self) -> TextPos {
        self.position
    }

    /// The original source text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parser state the error was raised in.
    #[inline]
    pub fn state(&self) -> Token {
        self.state
    }

    /// Whether this error was raised from the given catalogue entry.
    pub fn is(&self, descriptor: &ErrorDescriptor) -> bool {
        self.code == descriptor.code
    }

    /// The character at the error position, if the position is inside the text.
    pub fn offending_char(&self) -> Option<char> {
        self.text.chars().nth(self.position)
    }

    /// The source text up to and including the offending character.
    pub fn excerpt(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.position)
            .map_or(self.text.len(), |(offset, ch)| offset + ch.len_utf8());
        &self.text[..end]
    }

    /// Byte range of the offending character (empty at end of text).
    fn byte_span(&self) -> std::ops::Range<usize> {
        match self.text.char_indices().nth(self.position) {
            Some((offset, ch)) => offset..offset + ch.len_utf8(),
            None => self.text.len()..self.text.len(),
        }
    }
}

impl Diagnostic for TypeNameError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("clrname::TN{}", self.code)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "{} error raised in parser state {}",
            self.category, self.state
        )))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.text)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::at(self.byte_span(), self.message);
        Some(Box::new(std::iter::once(label)))
    }
}
