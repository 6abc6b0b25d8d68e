//! Transition history recorded when a parse is traced.

use std::fmt;

use clrname_core::Token;

/// One state transition of the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrace {
    /// The state entered.
    pub token: Token,
    /// The state left.
    pub prev_token: Token,
    /// Cursor position at the transition; -1 before the first character.
    pub pos: isize,
    /// Type name of the current scope at the transition, if one was started.
    pub name: Option<String>,
}

impl ParseTrace {
    pub fn new(token: Token, prev_token: Token, pos: isize, name: Option<String>) -> Self {
        Self {
            token,
            prev_token,
            pos,
            name,
        }
    }
}

impl fmt::Display for ParseTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} @ {}", self.prev_token, self.token, self.pos)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}
