//! A1-style cell addressing
//!
//! Rows and columns are 1-based. Column letters continue past `Z` as
//! `AA`, `AB`, ... `AZ`, `BA` (bijective base 26).

use crate::{Error, Result};
use std::fmt;

/// A single cell position (1-based row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Result<Self> {
        if row == 0 || col == 0 {
            return Err(Error::CellAddress(format!("row {row}, column {col}")));
        }
        Ok(Self { row, col })
    }

    /// Parse an address such as `C12` or `AB3`
    pub fn parse(address: &str) -> Result<Self> {
        let split = address
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::CellAddress(address.to_string()))?;
        let (letters, digits) = address.split_at(split);

        let col = column_index(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::CellAddress(address.to_string()))?;
        Self::new(row, col).map_err(|_| Error::CellAddress(address.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row)
    }
}

/// Column number to letters: 1 → `A`, 26 → `Z`, 27 → `AA`
pub fn column_name(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Column letters to number: `A` → 1, `AA` → 27 (case-insensitive)
pub fn column_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::CellAddress(letters.to_string()));
    }

    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return Err(Error::CellAddress(letters.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        acc.checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::CellAddress(letters.to_string()))
    })
}
