//! clrname_parser: Parser for runtime type names.
//!
//! Parses fully-qualified type names such as
//! `System.Collections.Generic.List`1[[System.Int32, mscorlib]], mscorlib`
//! into a [`ScopeTree`], which renders back to the bare, qualified and
//! assembly-qualified forms.
//!
//! ```ignore
//! let result = clrname_parser::parse("System.String[]")?;
//! assert!(result.root().is_array());
//! ```

mod options;
mod parser;

use std::fmt;

pub use clrname_ast::{BlockKind, RenderStyle, ScopeId, ScopeRef, ScopeTree};
pub use clrname_diagnostics::{messages, ErrorCategory, ErrorDescriptor, TypeNameError};
pub use clrname_scanner::ParseTrace;
pub use options::ParseOptions;
pub use parser::Parser;

/// A successfully parsed type name.
#[derive(Debug, Clone)]
pub struct ParseResult {
    tree: ScopeTree,
    trace: Vec<ParseTrace>,
}

impl ParseResult {
    /// The root scope.
    #[inline]
    pub fn root(&self) -> ScopeRef<'_> {
        self.tree.root()
    }

    #[inline]
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// Recorded state transitions; empty unless tracing was requested.
    #[inline]
    pub fn trace(&self) -> &[ParseTrace] {
        &self.trace
    }

    pub fn into_tree(self) -> ScopeTree {
        self.tree
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

/// Parse `text` with default options.
pub fn parse(text: &str) -> Result<ParseResult, TypeNameError> {
    parse_with_options(text, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<ParseResult, TypeNameError> {
    Parser::new(text, options).parse()
}
