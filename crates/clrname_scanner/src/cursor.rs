//! The parse cursor: scanning state shared by every parser transition.
//!
//! The cursor owns the scope tree under construction. Its position moves one
//! character at a time in either direction and is bounded to `[-1, len]`,
//! where both ends are sentinels without a current character.

use clrname_ast::{ScopeId, ScopeRef, ScopeTree};
use clrname_core::{SourceText, Token};
use clrname_diagnostics::{messages, DescriptorResult, ErrorDescriptor, TypeNameError};
use tracing::trace;

use crate::char_codes::*;
use crate::trace::ParseTrace;

/// Default bound on generic argument nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

pub type CursorResult<T> = Result<T, TypeNameError>;

/// Mutable scanning state driving the parse state machine.
pub struct ParseCursor {
    tree: ScopeTree,
    /// Current position; -1 before the first character, `len` past the last.
    pos: isize,
    ch: Option<char>,
    token: Token,
    prev_token: Token,
    /// Open scopes, root at the bottom.
    stack: Vec<ScopeId>,
    trace: Option<Vec<ParseTrace>>,
    max_depth: Option<usize>,
}

impl ParseCursor {
    /// Create a cursor before the first character of `text`, in `TypeNameStart`.
    pub fn new(text: &str) -> Self {
        Self {
            tree: ScopeTree::new(text),
            pos: -1,
            ch: None,
            token: Token::TypeNameStart,
            prev_token: Token::Undefined,
            stack: vec![ScopeId::ROOT],
            trace: None,
            max_depth: Some(DEFAULT_MAX_NESTING_DEPTH),
        }
    }

    /// Record every state transition, starting with the initial state.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled.then(|| vec![ParseTrace::new(self.token, self.prev_token, self.pos, None)]);
        self
    }

    /// Bound generic argument nesting; `None` removes the bound.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    #[inline]
    pub fn source(&self) -> &SourceText {
        self.tree.source()
    }

    #[inline]
    pub fn text(&self) -> &str {
        self.tree.text()
    }

    /// Length of the input in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.source().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source().is_empty()
    }

    #[inline]
    pub fn pos(&self) -> isize {
        self.pos
    }

    /// The position as an offset usable in errors and name blocks.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos.max(0) as usize
    }

    #[inline]
    pub fn current_char(&self) -> Option<char> {
        self.ch
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub fn prev_token(&self) -> Token {
        self.prev_token
    }

    /// Number of open scopes, root included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::ROOT)
    }

    #[inline]
    pub fn scope(&self) -> ScopeRef<'_> {
        self.tree.get(self.current_scope()).unwrap_or_else(|| self.tree.root())
    }

    #[inline]
    pub fn in_root(&self) -> bool {
        self.current_scope() == ScopeId::ROOT
    }

    /// Whether the cursor is on the last character.
    #[inline]
    pub fn at_last(&self) -> bool {
        !self.is_empty() && self.pos == self.len() as isize - 1
    }

    /// Whether the cursor has moved past the last character.
    #[inline]
    pub fn past_end(&self) -> bool {
        self.pos >= self.len() as isize
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Step forward onto the next character. Returns `false` on the last one.
    pub fn advance(&mut self) -> bool {
        if self.pos < self.len() as isize - 1 {
            self.set_pos(self.pos + 1);
            return true;
        }
        false
    }

    /// Step back one character. Returns `false` before the first one.
    pub fn retreat(&mut self) -> bool {
        if self.pos > -1 {
            self.set_pos(self.pos - 1);
            return true;
        }
        false
    }

    /// Jump to `pos`, clamped to `[-1, len]`.
    pub fn set_pos(&mut self, pos: isize) {
        self.pos = pos.clamp(-1, self.len() as isize);
        self.ch = self.char_at(self.pos);
    }

    fn char_at(&self, pos: isize) -> Option<char> {
        usize::try_from(pos).ok().and_then(|pos| self.source().char_at(pos))
    }

    /// Enter `token`. Re-entering the current state is a no-op.
    pub fn set_token(&mut self, token: Token) {
        if self.token == token {
            return;
        }
        self.prev_token = self.token;
        self.token = token;
        trace!(from = %self.prev_token, to = %token, pos = self.pos, "transition");

        if self.trace.is_some() {
            let name = self
                .tree
                .node(self.current_scope())
                .block(clrname_ast::BlockKind::TypeName)
                .map(|block| block.text(self.tree.source()).to_string());
            let entry = ParseTrace::new(self.token, self.prev_token, self.pos, name);
            if let Some(trace) = self.trace.as_mut() {
                trace.push(entry);
            }
        }
    }

    // ========================================================================
    // Character classes
    // ========================================================================

    #[inline]
    pub fn is(&self, ch: char) -> bool {
        self.ch == Some(ch)
    }

    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.ch.is_some_and(is_whitespace)
    }

    #[inline]
    pub fn is_digit(&self) -> bool {
        self.ch.is_some_and(is_digit)
    }

    pub fn is_valid_type_name_char(&self, first: bool) -> bool {
        match self.ch {
            Some(ch) if first => is_type_name_start(ch),
            Some(ch) => is_type_name_part(ch),
            None => false,
        }
    }

    /// Whether the current character belongs to the value the current state scans.
    pub fn is_valid_char(&self) -> bool {
        let Some(ch) = self.ch else {
            return false;
        };
        match self.token {
            Token::TypeName => is_type_name_part(ch),
            Token::AssemblyName => is_assembly_name_char(ch),
            Token::VersionValue => is_version_char(ch),
            Token::CultureValue => is_culture_char(ch),
            Token::PublicKeyTokenValue => is_public_key_token_char(ch),
            _ => true,
        }
    }

    /// Whether `keyword` occurs at `at`, ignoring case.
    pub fn matches_ignore_case(&self, keyword: &str, at: usize) -> bool {
        let chars = self.source().chars();
        let mut expected = keyword.chars();
        let mut index = at;
        loop {
            match expected.next() {
                None => return true,
                Some(want) => match chars.get(index) {
                    Some(&got) if got.to_lowercase().eq(want.to_lowercase()) => index += 1,
                    _ => return false,
                },
            }
        }
    }

    /// Last occurrence of `ch` at or before `from`, or -1.
    pub fn last_index_of(&self, ch: char, from: isize) -> isize {
        let chars = self.source().chars();
        if from >= chars.len() as isize {
            return -1;
        }
        let mut pos = from;
        while pos > -1 {
            if chars[pos as usize] == ch {
                return pos;
            }
            pos -= 1;
        }
        -1
    }

    // ========================================================================
    // Whitespace
    // ========================================================================

    /// First non-whitespace position at or after `from`. With `strict`,
    /// running off the end is a termination error.
    pub fn find_non_whitespace(&self, from: isize, strict: bool) -> CursorResult<isize> {
        let len = self.len() as isize;
        let mut pos = from.clamp(-1, len);
        while pos > -1 && pos < len && self.char_at(pos).is_some_and(is_whitespace) {
            pos += 1;
        }
        if strict && pos > len - 1 {
            return Err(self.error(&messages::INVALID_TYPE_NAME_TERMINATION));
        }
        Ok(pos)
    }

    /// Last non-whitespace position at or before `from`. With `strict`,
    /// running off the start is an error.
    pub fn find_non_whitespace_backward(&self, from: isize, strict: bool) -> CursorResult<isize> {
        let mut pos = from.clamp(-1, self.len() as isize - 1);
        while pos > -1 && self.char_at(pos).is_some_and(is_whitespace) {
            pos -= 1;
        }
        if strict && pos < 0 {
            return Err(self.error(&messages::INVALID_TYPE_NAME));
        }
        Ok(pos)
    }

    /// Move forward over whitespace from the current position.
    pub fn eat_whitespace(&mut self, strict: bool) -> CursorResult<()> {
        let pos = self.find_non_whitespace(self.pos, strict)?;
        self.set_pos(pos.max(0));
        Ok(())
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Open a new generic argument scope under the current one. A parent
    /// whose argument list is already full fails with 9000.
    pub fn start_scope(&mut self) -> CursorResult<ScopeId> {
        let parent = self.current_scope();
        if !self.tree.node(parent).is_generic_type() {
            return Err(self.error(&messages::INVALID_GENERICS_ARGUMENT_START));
        }
        if self.max_depth.is_some_and(|max| self.stack.len() > max) {
            return Err(self.error(&messages::NESTING_DEPTH_EXCEEDED));
        }
        let id = self.check(|tree| tree.add_generic_argument(parent))?;
        self.stack.push(id);
        Ok(id)
    }

    /// Close the current generic argument scope and freeze its name blocks.
    pub fn end_scope(&mut self) -> CursorResult<ScopeId> {
        if self.stack.len() < 2 {
            return Err(self.error(&messages::INVALID_GENERICS_ARGUMENT_END));
        }
        let id = self.current_scope();
        self.stack.pop();
        self.tree.lock_scope(id);
        Ok(id)
    }

    /// Apply a mutation to the current scope, lifting a rule violation into a
    /// positioned error.
    pub fn update<T>(
        &mut self,
        f: impl FnOnce(&mut ScopeTree, ScopeId) -> DescriptorResult<T>,
    ) -> CursorResult<T> {
        let id = self.current_scope();
        self.check(|tree| f(tree, id))
    }

    fn check<T>(&mut self, f: impl FnOnce(&mut ScopeTree) -> DescriptorResult<T>) -> CursorResult<T> {
        f(&mut self.tree).map_err(|descriptor| self.error(descriptor))
    }

    // ========================================================================
    // Errors and completion
    // ========================================================================

    /// An error at the current position and state.
    pub fn error(&self, descriptor: &ErrorDescriptor) -> TypeNameError {
        TypeNameError::new(descriptor, self.text(), self.offset(), self.token)
    }

    /// The canonical error of the current state.
    pub fn default_error(&self) -> TypeNameError {
        self.error(default_error_for(self.token))
    }

    /// Freeze the tree and hand it out with the recorded trace.
    pub fn finish(mut self) -> (ScopeTree, Vec<ParseTrace>) {
        self.tree.lock_all();
        (self.tree, self.trace.unwrap_or_default())
    }
}

/// The error raised for an illegal character in `token`.
pub fn default_error_for(token: Token) -> &'static ErrorDescriptor {
    match token {
        Token::Undefined => &messages::INVALID_TYPE_NAME,
        Token::TypeNameStart => &messages::INVALID_TYPE_NAME_START,
        Token::TypeName => &messages::INVALID_TYPE_NAME_CHAR,
        Token::TypeNameEnd => &messages::INVALID_TYPE_NAME_END,
        Token::ArrayStart => &messages::INVALID_ARRAY_START,
        Token::Array => &messages::INVALID_ARRAY,
        Token::ArrayEnd => &messages::INVALID_ARRAY_END,
        Token::GenericsCountStart | Token::GenericsCount | Token::GenericsCountEnd => {
            &messages::INVALID_GENERICS_COUNT
        }
        Token::GenericsStart => &messages::INVALID_GENERICS_START,
        Token::Generics => &messages::INVALID_GENERICS,
        Token::GenericsEnd => &messages::INVALID_GENERICS_END,
        Token::GenericsArgBlockOpen => &messages::INVALID_GENERICS_ARG_BLOCK_OPEN,
        Token::GenericsArgBlockClose => &messages::INVALID_GENERICS_ARG_BLOCK_CLOSE,
        Token::GenericsArgumentStart => &messages::INVALID_GENERICS_ARGUMENT_START,
        Token::GenericsArgumentEnd => &messages::INVALID_GENERICS_ARGUMENT_END,
        Token::AssemblyNameStart | Token::AssemblyName => &messages::INVALID_ASSEMBLY_NAME,
        Token::AssemblyPropertyStart => &messages::INVALID_ASSEMBLY_PROPERTY,
        Token::Version | Token::VersionValueStart => &messages::INVALID_ASSEMBLY_VERSION,
        Token::VersionValue => &messages::INVALID_ASSEMBLY_VERSION_VALUE,
        Token::Culture | Token::CultureValueStart => &messages::INVALID_ASSEMBLY_CULTURE,
        Token::CultureValue => &messages::INVALID_ASSEMBLY_CULTURE_VALUE,
        Token::PublicKeyToken | Token::PublicKeyTokenValueStart => {
            &messages::INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN
        }
        Token::PublicKeyTokenValue => &messages::INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN_VALUE,
    }
}
