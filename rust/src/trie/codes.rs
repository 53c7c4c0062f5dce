//! Five-bit letter codes shared by every letter trie.

use crate::error::{StructureError, StructureResult};

/// Bits in every letter code.
pub const CODE_LENGTH: usize = 5;

/// `A = 00001` through `Z = 11010`: the letter's 1-based alphabet position
/// in binary.
const CODES: [&str; 26] = [
    "00001", "00010", "00011", "00100", "00101", "00110", "00111", "01000", "01001", "01010",
    "01011", "01100", "01101", "01110", "01111", "10000", "10001", "10010", "10011", "10100",
    "10101", "10110", "10111", "11000", "11001", "11010",
];

/// Uppercase `letter` and check it is in `A..=Z`.
pub fn normalize_letter(letter: char) -> StructureResult<char> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Ok(upper)
    } else {
        Err(StructureError::InvalidLetter(format!(
            "'{}' is not a letter A-Z",
            letter
        )))
    }
}

/// Code of an already normalized letter.
pub fn code_for(letter: char) -> Option<&'static str> {
    letter
        .is_ascii_uppercase()
        .then(|| CODES[(letter as u8 - b'A') as usize])
}

/// Normalize `letter` and return it with its code.
pub(crate) fn coded(letter: char) -> StructureResult<(char, &'static str)> {
    let letter = normalize_letter(letter)?;
    let code = code_for(letter).ok_or_else(|| {
        StructureError::InvalidLetter(format!("'{}' has no code", letter))
    })?;
    Ok((letter, code))
}
