//! Character constants and the character classes of the type-name grammar.

pub const NULL_CHARACTER: char = '\0';
pub const DOUBLE_QUOTE: char = '"';
pub const ASTERISK: char = '*';
pub const COMMA: char = ',';
pub const DOT: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const LESS_THAN: char = '<';
pub const EQUALS: char = '=';
pub const GREATER_THAN: char = '>';
pub const QUESTION: char = '?';
pub const AT: char = '@';
pub const OPEN_BRACKET: char = '[';
pub const BACKSLASH: char = '\\';
pub const CLOSE_BRACKET: char = ']';
pub const UNDERSCORE: char = '_';
pub const BACKTICK: char = '`';
pub const BAR: char = '|';

/// Characters that never appear in a type name outside of structure.
const TYPE_NAME_DELIMITERS: [char; 3] = [COMMA, OPEN_BRACKET, CLOSE_BRACKET];

/// Whitespace as the runtime defines it (Unicode `White_Space`).
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// First character of a type name: `@`, `_` or a letter.
#[inline]
pub fn is_type_name_start(ch: char) -> bool {
    ch == AT || ch == UNDERSCORE || ch.is_alphabetic()
}

/// Any later character of a type name.
#[inline]
pub fn is_type_name_part(ch: char) -> bool {
    !TYPE_NAME_DELIMITERS.contains(&ch)
}

/// Characters a file name may not contain, plus the grammar's own `*`, `/`,
/// `[` and `]`.
#[inline]
pub fn is_invalid_assembly_name_char(ch: char) -> bool {
    matches!(
        ch,
        NULL_CHARACTER..='\u{1F}'
            | DOUBLE_QUOTE
            | LESS_THAN
            | GREATER_THAN
            | BAR
            | COLON
            | ASTERISK
            | QUESTION
            | BACKSLASH
            | SLASH
            | OPEN_BRACKET
            | CLOSE_BRACKET
    )
}

#[inline]
pub fn is_assembly_name_char(ch: char) -> bool {
    ch != COMMA && !is_invalid_assembly_name_char(ch)
}

#[inline]
pub fn is_version_char(ch: char) -> bool {
    ch == DOT || is_digit(ch)
}

#[inline]
pub fn is_culture_char(ch: char) -> bool {
    ch != COMMA && ch != CLOSE_BRACKET
}

/// Hex digits, or the letters of `null` in either case.
#[inline]
pub fn is_public_key_token_char(ch: char) -> bool {
    ch.is_ascii_hexdigit() || matches!(ch, 'n' | 'u' | 'l' | 'N' | 'U' | 'L')
}
