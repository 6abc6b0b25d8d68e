//! Token kinds of the type-name grammar.
//!
//! Each token is a state of the parse state machine: the parser's current
//! token decides how the next character is interpreted.

use std::fmt;

/// The parse state the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Token {
    /// No state; used for errors raised before scanning starts.
    #[default]
    Undefined = 0,

    // Type name
    TypeNameStart,
    TypeName,
    TypeNameEnd,

    // Array rank markers: `[]`, `[,]`, ...
    ArrayStart,
    Array,
    ArrayEnd,

    // Generic arity: `` `N ``
    GenericsCountStart,
    GenericsCount,
    GenericsCountEnd,

    // Generic argument list
    GenericsStart,
    Generics,
    GenericsEnd,
    GenericsArgBlockOpen,
    GenericsArgBlockClose,
    GenericsArgumentStart,
    GenericsArgumentEnd,

    // Assembly identity
    AssemblyNameStart,
    AssemblyName,
    AssemblyPropertyStart,
    Version,
    VersionValueStart,
    VersionValue,
    Culture,
    CultureValueStart,
    CultureValue,
    PublicKeyToken,
    PublicKeyTokenValueStart,
    PublicKeyTokenValue,
}

impl Token {
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Undefined => "Undefined",
            Token::TypeNameStart => "TypeNameStart",
            Token::TypeName => "TypeName",
            Token::TypeNameEnd => "TypeNameEnd",
            Token::ArrayStart => "ArrayStart",
            Token::Array => "Array",
            Token::ArrayEnd => "ArrayEnd",
            Token::GenericsCountStart => "GenericsCountStart",
            Token::GenericsCount => "GenericsCount",
            Token::GenericsCountEnd => "GenericsCountEnd",
            Token::GenericsStart => "GenericsStart",
            Token::Generics => "Generics",
            Token::GenericsEnd => "GenericsEnd",
            Token::GenericsArgBlockOpen => "GenericsArgBlockOpen",
            Token::GenericsArgBlockClose => "GenericsArgBlockClose",
            Token::GenericsArgumentStart => "GenericsArgumentStart",
            Token::GenericsArgumentEnd => "GenericsArgumentEnd",
            Token::AssemblyNameStart => "AssemblyNameStart",
            Token::AssemblyName => "AssemblyName",
            Token::AssemblyPropertyStart => "AssemblyPropertyStart",
            Token::Version => "Version",
            Token::VersionValueStart => "VersionValueStart",
            Token::VersionValue => "VersionValue",
            Token::Culture => "Culture",
            Token::CultureValueStart => "CultureValueStart",
            Token::CultureValue => "CultureValue",
            Token::PublicKeyToken => "PublicKeyToken",
            Token::PublicKeyTokenValueStart => "PublicKeyTokenValueStart",
            Token::PublicKeyTokenValue => "PublicKeyTokenValue",
        }
    }

    /// Whether input may end while the parser is in this state.
    pub fn is_valid_termination(self) -> bool {
        matches!(
            self,
            Token::TypeName
                | Token::TypeNameEnd
                | Token::ArrayEnd
                | Token::AssemblyName
                | Token::VersionValue
                | Token::CultureValue
                | Token::PublicKeyTokenValue
                | Token::GenericsEnd
        )
    }

    /// Whether this state scans the value of an assembly identity field.
    pub fn is_assembly_value(self) -> bool {
        matches!(
            self,
            Token::AssemblyName
                | Token::VersionValue
                | Token::CultureValue
                | Token::PublicKeyTokenValue
        )
    }

    /// The literal keyword of an assembly property state (`Version`, `Culture`,
    /// `PublicKeyToken`).
    pub fn property_keyword(self) -> Option<&'static str> {
        match self {
            Token::Version => Some("Version"),
            Token::Culture => Some("Culture"),
            Token::PublicKeyToken => Some("PublicKeyToken"),
            _ => None,
        }
    }

    /// The shortest well-formed `keyword=value` text for an assembly property.
    pub fn property_sample(self) -> Option<&'static str> {
        match self {
            Token::Version => Some("Version=0.0.0.0"),
            Token::Culture => Some("Culture=en"),
            Token::PublicKeyToken => Some("PublicKeyToken=null"),
            _ => None,
        }
    }

    /// The `...ValueStart` state that follows a property keyword.
    pub fn value_start(self) -> Option<Token> {
        match self {
            Token::Version => Some(Token::VersionValueStart),
            Token::Culture => Some(Token::CultureValueStart),
            Token::PublicKeyToken => Some(Token::PublicKeyTokenValueStart),
            _ => None,
        }
    }

    /// The `...Value` state that follows `=`.
    pub fn value(self) -> Option<Token> {
        match self {
            Token::VersionValueStart => Some(Token::VersionValue),
            Token::CultureValueStart => Some(Token::CultureValue),
            Token::PublicKeyTokenValueStart => Some(Token::PublicKeyTokenValue),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
