//! The type-name parser.
//!
//! A single-pass state machine over the characters of the input. Each state
//! (a [`Token`]) decides how the current character is read; transitions that
//! must look at the same character again step the cursor back by one. The
//! first illegal character or transition aborts the parse.

use clrname_ast::BlockKind;
use clrname_core::Token;
use clrname_diagnostics::{messages, ErrorDescriptor, TypeNameError};
use clrname_scanner::char_codes::*;
use clrname_scanner::{CursorResult, ParseCursor};
use tracing::debug;

use crate::options::ParseOptions;
use crate::ParseResult;

/// Maximum number of digits in a generic arity marker.
const MAX_GENERIC_COUNT_DIGITS: usize = 3;

/// Parser for one input string.
pub struct Parser {
    cursor: ParseCursor,
}

impl Parser {
    pub fn new(text: &str, options: &ParseOptions) -> Self {
        let cursor = ParseCursor::new(text)
            .with_trace(options.trace)
            .with_max_depth(options.max_nesting_depth);
        Self { cursor }
    }

    /// Run the parse to completion.
    pub fn parse(mut self) -> Result<ParseResult, TypeNameError> {
        if self.cursor.is_empty() {
            return Err(TypeNameError::new(
                &messages::INVALID_TYPE_NAME,
                self.cursor.text(),
                0,
                Token::Undefined,
            ));
        }

        debug!(text = self.cursor.text(), "parsing type name");
        match self.run() {
            Ok(()) => {
                let (tree, trace) = self.cursor.finish();
                debug!(scopes = tree.node_count(), "parsed type name");
                Ok(ParseResult { tree, trace })
            }
            Err(err) => {
                debug!(code = err.code(), position = err.position(), state = %err.state(), "type name rejected");
                Err(err)
            }
        }
    }

    fn run(&mut self) -> CursorResult<()> {
        while self.cursor.advance() {
            match self.cursor.token() {
                Token::TypeNameStart => self.type_name_start()?,
                Token::TypeName => self.type_name()?,
                Token::TypeNameEnd => self.type_name_end()?,
                Token::ArrayStart => self.array_start()?,
                Token::Array => self.array()?,
                Token::ArrayEnd => self.array_end()?,
                Token::GenericsCountStart => self.generics_count_start()?,
                Token::GenericsCount => self.generics_count()?,
                Token::GenericsCountEnd => self.generics_count_end()?,
                Token::GenericsStart => self.generics_start()?,
                Token::Generics => self.generics()?,
                Token::GenericsEnd => self.generics_end()?,
                Token::GenericsArgBlockOpen => self.generics_arg_block_open()?,
                Token::GenericsArgBlockClose => self.generics_arg_block_close()?,
                Token::GenericsArgumentStart => self.generics_argument_start()?,
                Token::GenericsArgumentEnd => self.generics_argument_end()?,
                Token::AssemblyNameStart => self.assembly_name_start()?,
                Token::AssemblyPropertyStart => self.assembly_property_start()?,
                Token::Version | Token::Culture | Token::PublicKeyToken => self.assembly_property()?,
                Token::VersionValueStart | Token::CultureValueStart | Token::PublicKeyTokenValueStart => {
                    self.assembly_value_start()?
                }
                Token::AssemblyName
                | Token::VersionValue
                | Token::CultureValue
                | Token::PublicKeyTokenValue => self.assembly_value()?,
                Token::Undefined => return Err(self.cursor.default_error()),
            }
        }
        self.check_termination()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn fail<T>(&self) -> CursorResult<T> {
        Err(self.cursor.default_error())
    }

    #[inline]
    fn fail_with<T>(&self, descriptor: &ErrorDescriptor) -> CursorResult<T> {
        Err(self.cursor.error(descriptor))
    }

    /// Step back so the next advance re-reads the current character in `token`.
    fn reread_as(&mut self, token: Token) {
        self.cursor.retreat();
        self.cursor.set_token(token);
    }

    fn set_name_end(&mut self, end: usize) -> CursorResult<()> {
        self.cursor.update(|tree, id| tree.set_name_end(id, end))
    }

    // ========================================================================
    // Type name
    // ========================================================================

    fn type_name_start(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(false)?;
        let start = self.cursor.offset();
        self.cursor.update(|tree, id| tree.set_name(id, start))?;

        if !self.cursor.is_valid_type_name_char(true) {
            return self.fail();
        }
        self.reread_as(Token::TypeName);
        Ok(())
    }

    fn type_name(&mut self) -> CursorResult<()> {
        let Some(ch) = self.cursor.current_char() else {
            return self.fail();
        };
        match ch {
            BACKTICK => self.reread_as(Token::GenericsCountStart),
            OPEN_BRACKET => self.reread_as(Token::ArrayStart),
            _ if ch == COMMA || ch == CLOSE_BRACKET || is_whitespace(ch) => {
                self.set_name_end(self.cursor.offset())?;
                self.reread_as(Token::TypeNameEnd);
            }
            _ => {
                if !self.cursor.is_valid_type_name_char(false) {
                    return self.fail();
                }
                if self.cursor.at_last() {
                    self.set_name_end(self.cursor.offset() + 1)?;
                }
            }
        }
        Ok(())
    }

    fn type_name_end(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(false)?;
        if self.cursor.past_end() {
            return Ok(());
        }

        let scope = self.cursor.scope();
        let (is_argument, in_name_block) = (scope.is_generic_argument(), scope.in_name_block());
        let expects_list = scope.is_generic_type() && !scope.has_generic_argument();

        match self.cursor.current_char() {
            Some(COMMA) => {
                if is_argument && !in_name_block {
                    self.reread_as(Token::GenericsArgumentEnd);
                } else {
                    self.reread_as(Token::AssemblyNameStart);
                }
            }
            Some(CLOSE_BRACKET) => {
                if !is_argument {
                    return self.fail();
                }
                if in_name_block {
                    self.reread_as(Token::GenericsArgBlockClose);
                } else {
                    self.reread_as(Token::GenericsArgumentEnd);
                }
            }
            Some(OPEN_BRACKET) => {
                if !expects_list {
                    return self.fail();
                }
                self.set_name_end(self.cursor.offset())?;
                self.reread_as(Token::GenericsStart);
            }
            _ => {
                if !self.cursor.is_whitespace() {
                    return self.fail();
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Arrays
    // ========================================================================

    fn array_start(&mut self) -> CursorResult<()> {
        if !self.cursor.is(OPEN_BRACKET) {
            return self.fail();
        }
        self.cursor.update(|tree, id| tree.mark_array(id))?;
        self.cursor.set_token(Token::Array);
        Ok(())
    }

    fn array(&mut self) -> CursorResult<()> {
        if self.cursor.is(CLOSE_BRACKET) {
            self.reread_as(Token::ArrayEnd);
        } else if !self.cursor.is(COMMA) {
            return self.fail();
        }
        Ok(())
    }

    fn array_end(&mut self) -> CursorResult<()> {
        if !self.cursor.is(CLOSE_BRACKET) || !self.cursor.scope().is_array() {
            return self.fail();
        }
        self.set_name_end(self.cursor.offset() + 1)?;
        self.cursor.set_token(Token::TypeName);
        Ok(())
    }

    // ========================================================================
    // Generic arity
    // ========================================================================

    fn generics_count_start(&mut self) -> CursorResult<()> {
        if !self.cursor.is(BACKTICK) {
            return self.fail();
        }
        self.cursor.set_token(Token::GenericsCount);
        Ok(())
    }

    fn generics_count(&mut self) -> CursorResult<()> {
        if !self.cursor.is_digit() {
            self.reread_as(Token::GenericsCountEnd);
        } else if self.cursor.at_last() {
            self.set_name_end(self.cursor.offset() + 1)?;
        }
        Ok(())
    }

    fn generics_count_end(&mut self) -> CursorResult<()> {
        if !self.cursor.is(OPEN_BRACKET) {
            // `Name`N, assembly` is only accepted for an unbound root type.
            let scope = self.cursor.scope();
            let unbound_root = self.cursor.is(COMMA)
                && scope.is_root()
                && !scope.is_generic_type()
                && !scope.has_generic_argument();
            if !unbound_root {
                return self.fail();
            }
        }

        self.set_name_end(self.cursor.offset())?;
        let count = self.generic_count()?;
        self.cursor
            .update(|tree, id| tree.set_expected_generic_arg_count(id, count))?;
        self.reread_as(Token::TypeNameEnd);
        Ok(())
    }

    /// Read the digits between the last backtick and the cursor.
    fn generic_count(&self) -> CursorResult<usize> {
        let pos = self.cursor.pos();
        let tick = self.cursor.last_index_of(BACKTICK, pos - 1);
        if tick < 0 {
            return self.fail_with(&messages::INVALID_GENERICS_COUNT);
        }

        let digits = (pos - tick - 1) as usize;
        if digits == 0 || digits > MAX_GENERIC_COUNT_DIGITS {
            return self.fail_with(&messages::INVALID_GENERICS_COUNT);
        }
        self.cursor
            .source()
            .slice(tick as usize + 1, pos as usize)
            .parse::<usize>()
            .or_else(|_| self.fail_with(&messages::INVALID_GENERICS_COUNT))
    }

    // ========================================================================
    // Generic argument list
    // ========================================================================

    fn generics_start(&mut self) -> CursorResult<()> {
        if !self.cursor.is(OPEN_BRACKET) {
            return self.fail();
        }
        self.cursor.update(|tree, id| tree.enter_generics_block(id))?;
        self.cursor.set_token(Token::Generics);
        Ok(())
    }

    fn generics(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(true)?;
        let has_argument = self.cursor.scope().has_generic_argument();

        match self.cursor.current_char() {
            Some(COMMA) => {
                if !has_argument {
                    return self.fail_with(&messages::INVALID_GENERICS_ARGUMENT);
                }
                self.cursor.set_token(Token::GenericsArgumentStart);
            }
            Some(OPEN_BRACKET) => {
                if has_argument {
                    return self.fail_with(&messages::INVALID_GENERICS_ARGUMENT);
                }
                self.reread_as(Token::GenericsArgumentStart);
            }
            Some(CLOSE_BRACKET) => self.reread_as(Token::GenericsEnd),
            _ => self.reread_as(Token::GenericsArgumentStart),
        }
        Ok(())
    }

    fn generics_end(&mut self) -> CursorResult<()> {
        if !self.cursor.is(CLOSE_BRACKET) {
            return self.fail();
        }
        self.cursor.update(|tree, id| tree.leave_generics_block(id))?;

        if self.cursor.in_root() || self.cursor.scope().in_name_block() {
            self.cursor.set_token(Token::TypeNameEnd);
        } else {
            // A bare generic argument ends with its own argument list.
            self.cursor.end_scope()?;
            self.cursor.set_token(Token::Generics);
        }
        Ok(())
    }

    fn generics_arg_block_open(&mut self) -> CursorResult<()> {
        if !self.cursor.is(OPEN_BRACKET) || self.cursor.scope().in_name_block() {
            return self.fail();
        }
        self.cursor.update(|tree, id| tree.enter_name_block(id))?;
        self.cursor.set_token(Token::TypeNameStart);
        Ok(())
    }

    fn generics_arg_block_close(&mut self) -> CursorResult<()> {
        if !self.cursor.is(CLOSE_BRACKET) || !self.cursor.scope().in_name_block() {
            return self.fail();
        }
        self.cursor.update(|tree, id| tree.leave_name_block(id))?;
        self.cursor.set_token(Token::GenericsArgumentEnd);
        Ok(())
    }

    fn generics_argument_start(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(true)?;
        if self.cursor.is(CLOSE_BRACKET) {
            self.reread_as(Token::GenericsEnd);
            return Ok(());
        }

        self.cursor.start_scope()?;
        if self.cursor.is(OPEN_BRACKET) {
            self.reread_as(Token::GenericsArgBlockOpen);
        } else {
            self.reread_as(Token::TypeNameStart);
        }
        Ok(())
    }

    fn generics_argument_end(&mut self) -> CursorResult<()> {
        if self.cursor.depth() < 2 {
            return self.fail();
        }
        self.cursor.eat_whitespace(true)?;
        if !(self.cursor.is(COMMA) || self.cursor.is(CLOSE_BRACKET)) {
            return self.fail();
        }
        self.cursor.end_scope()?;
        self.reread_as(Token::Generics);
        Ok(())
    }

    // ========================================================================
    // Assembly identity
    // ========================================================================

    fn assembly_name_start(&mut self) -> CursorResult<()> {
        if !self.cursor.is(COMMA) {
            return self.fail();
        }
        self.cursor.set_token(Token::AssemblyName);
        Ok(())
    }

    fn assembly_property_start(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(true)?;
        let property = match self.cursor.current_char() {
            Some('v' | 'V') => Token::Version,
            Some('c' | 'C') => Token::Culture,
            Some('p' | 'P') => Token::PublicKeyToken,
            _ => return self.fail(),
        };
        self.reread_as(property);
        Ok(())
    }

    /// Match the property keyword at the cursor and skip over it.
    fn assembly_property(&mut self) -> CursorResult<()> {
        let token = self.cursor.token();
        if !self.cursor.scope().has_assembly() {
            return self.fail_with(defined_before_assembly_name(token));
        }

        let (Some(keyword), Some(sample), Some(value_start)) =
            (token.property_keyword(), token.property_sample(), token.value_start())
        else {
            return self.fail();
        };

        let pos = self.cursor.offset();
        let fits = pos + sample.chars().count() <= self.cursor.len();
        if !fits || !self.cursor.matches_ignore_case(keyword, pos) {
            return self.fail();
        }

        self.cursor.set_token(value_start);
        self.cursor.set_pos((pos + keyword.len()) as isize - 1);
        Ok(())
    }

    fn assembly_value_start(&mut self) -> CursorResult<()> {
        self.cursor.eat_whitespace(true)?;
        if !self.cursor.is(EQUALS) {
            return self.fail();
        }
        let Some(value) = self.cursor.token().value() else {
            return self.fail();
        };
        self.cursor.set_token(value);

        // Whitespace after `=` belongs to neither keyword nor value.
        let next = self.cursor.find_non_whitespace(self.cursor.pos() + 1, false)?;
        self.cursor.set_pos(next - 1);
        Ok(())
    }

    /// Scan an assembly name or property value up to `,`, `]` or the end of
    /// input, then record it trimmed of surrounding whitespace.
    fn assembly_value(&mut self) -> CursorResult<()> {
        let mut is_last = false;
        if self.cursor.is_valid_char() || self.cursor.is_whitespace() {
            is_last = self.cursor.at_last();
            if !is_last {
                return Ok(());
            }
        }

        let ch = self.cursor.current_char();
        let terminated = ch == Some(CLOSE_BRACKET)
            || ch == Some(COMMA)
            || (is_last && self.cursor.depth() == 1);
        if !terminated {
            return self.fail();
        }

        let token = self.cursor.token();
        let pos = self.cursor.pos();
        let strict = !self.cursor.in_root();
        let delimiter = if token == Token::AssemblyName { COMMA } else { EQUALS };

        let start = self.cursor.last_index_of(delimiter, pos - 1) + 1;
        let start = self.cursor.find_non_whitespace(start, strict)?;
        let end = self
            .cursor
            .find_non_whitespace_backward(if is_last { pos } else { pos - 1 }, strict)?
            + 1;

        let (start, end) = (start.max(0) as usize, end.max(0) as usize);
        self.cursor.update(|tree, id| match token {
            Token::VersionValue => tree.set_version(id, start, end),
            Token::CultureValue => tree.set_culture(id, start, end),
            Token::PublicKeyTokenValue => tree.set_public_key_token(id, start, end),
            _ => tree.set_assembly_name(id, start, end),
        })?;

        match ch {
            Some(COMMA) if !is_last => self.cursor.set_token(Token::AssemblyPropertyStart),
            Some(CLOSE_BRACKET) => self.reread_as(Token::TypeNameEnd),
            _ => {}
        }
        Ok(())
    }

    // ========================================================================
    // Termination
    // ========================================================================

    fn check_termination(&self) -> CursorResult<()> {
        let token = self.cursor.token();
        let scope = self.cursor.scope();

        if token.is_assembly_value() {
            let kind = block_kind(token);
            let recorded = match kind {
                BlockKind::AssemblyName => scope.assembly_name().is_some(),
                _ => scope.block(kind).is_some(),
            };
            if !recorded {
                return self.fail();
            }
        }

        let root = self.cursor.tree().root();
        if !token.is_valid_termination() || self.cursor.depth() != 1 || root.generics_block_depth() != 0 {
            return self.fail_with(&messages::INVALID_TYPE_NAME_TERMINATION);
        }
        Ok(())
    }
}

fn block_kind(token: Token) -> BlockKind {
    match token {
        Token::VersionValue => BlockKind::Version,
        Token::CultureValue => BlockKind::Culture,
        Token::PublicKeyTokenValue => BlockKind::PublicKeyToken,
        _ => BlockKind::AssemblyName,
    }
}

fn defined_before_assembly_name(token: Token) -> &'static ErrorDescriptor {
    match token {
        Token::Culture => &messages::CANNOT_DEFINE_CULTURE_BEFORE_ASSEMBLY_NAME,
        Token::PublicKeyToken => &messages::CANNOT_DEFINE_PUBLIC_KEY_TOKEN_BEFORE_ASSEMBLY_NAME,
        _ => &messages::CANNOT_DEFINE_VERSION_BEFORE_ASSEMBLY_NAME,
    }
}
