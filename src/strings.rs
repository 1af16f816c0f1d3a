// String literals know three escapes: \n, \" and \\. A backslash followed by
// anything else, or by nothing, is an error.

use bimap::BiMap;
use std::fmt;

lazy_static! {
    // Escape letter on the left, the character it stands for on the right.
    static ref ESCAPE_TABLE: BiMap<char, char> =
        [('n', '\n'), ('"', '"'), ('\\', '\\')].iter().copied().collect();
}

#[derive(Debug, PartialEq, Eq)]
pub enum BuildError {
    UnknownEscape(char),
    UnexpectedSingleBackslash,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownEscape(c) => write!(f, "unbalanced backslash: unknown escape \\{}", c),
            BuildError::UnexpectedSingleBackslash => {
                write!(f, "unbalanced backslash at end of string")
            }
        }
    }
}

/// Unescape the interior of a string literal (the text between the quotes).
pub(crate) fn build_string(interior: &str) -> Result<String, BuildError> {
    let mut built = String::with_capacity(interior.len());
    let mut chars = interior.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            built.push(c);
            continue;
        }
        let letter = chars.next().ok_or(BuildError::UnexpectedSingleBackslash)?;
        let unescaped = ESCAPE_TABLE
            .get_by_left(&letter)
            .ok_or(BuildError::UnknownEscape(letter))?;
        built.push(*unescaped);
    }
    Ok(built)
}

/// Quote and escape a string so that reading it back gives the same content.
pub(crate) fn string_repr(content: &str) -> String {
    let mut repr = String::with_capacity(content.len() + 2);
    repr.push('"');
    for c in content.chars() {
        match ESCAPE_TABLE.get_by_right(&c) {
            Some(letter) => {
                repr.push('\\');
                repr.push(*letter);
            }
            None => repr.push(c),
        }
    }
    repr.push('"');
    repr
}
