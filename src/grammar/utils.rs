/// Check if a character can begin an identifier (rule name or label)
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check if an identifier is reserved
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Identifiers which cannot be used as rule names or labels
pub static RESERVED_WORDS: &[&str] = &["true", "false", "null", "undefined"];

/// Check if a character is insignificant between tokens
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}
