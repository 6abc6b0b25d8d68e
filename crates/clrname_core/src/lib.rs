//! clrname_core: Core types for the CLR type-name parser.
//!
//! Provides the character-indexed source text, the text views that name blocks
//! are built on, and the token kinds that drive the parse state machine.

pub mod text;
pub mod token;

// Re-export commonly used types
pub use text::{SourceText, TextPos, TextView};
pub use token::Token;
