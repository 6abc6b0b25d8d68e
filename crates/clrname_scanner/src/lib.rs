//! clrname_scanner: Character-level scanning for the type-name parser.
//!
//! Provides the bidirectional [`ParseCursor`] the parser's state machine walks
//! through the input, the character classes of the grammar, and the optional
//! transition trace.

pub mod char_codes;
mod cursor;
mod trace;

pub use cursor::{default_error_for, CursorResult, ParseCursor, DEFAULT_MAX_NESTING_DEPTH};
pub use trace::ParseTrace;
