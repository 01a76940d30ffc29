//! Cell address and range types
//!
//! Addresses are 1-based on both axes. Column letters use bijective
//! base-26 (A=1 .. Z=26, AA=27, ...), so there is no letter for zero.
//!
//! ```
//! use cellbook_core::CellAddress;
//!
//! let addr = CellAddress::parse("B12").unwrap();
//! assert_eq!(addr.row(), 12);
//! assert_eq!(addr.column(), 2);
//! assert_eq!(addr.to_string(), "B12");
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27)
///
/// Only upper-case ASCII letters are accepted. Fails with
/// [`Error::InvalidReference`] on empty input, any other character, or a
/// value that does not fit in a `u32`.
pub fn column_letters_to_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::reference("empty column letters"));
    }

    let mut index: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(Error::reference(format!(
                "invalid column letter in '{}'",
                letters
            )));
        }
        index = index
            .checked_mul(26)
            .and_then(|n| n.checked_add((b - b'A') as u32 + 1))
            .ok_or_else(|| Error::reference(format!("column '{}' does not fit in u32", letters)))?;
    }

    Ok(index)
}

/// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA)
///
/// Fails with [`Error::InvalidReference`] for index 0, which has no
/// letter form.
pub fn index_to_column_letters(index: u32) -> Result<String> {
    if index == 0 {
        return Err(Error::reference("column index 0 has no letter form"));
    }
    Ok(letters_unchecked(index))
}

fn letters_unchecked(index: u32) -> String {
    // u32::MAX needs 7 letters
    let mut buf = [0u8; 7];
    let mut pos = buf.len();
    let mut n = index;

    while n > 0 {
        n -= 1;
        pos -= 1;
        buf[pos] = b'A' + (n % 26) as u8;
        n /= 26;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Parse an A1-style reference into an address
pub fn parse(text: &str) -> Result<CellAddress> {
    CellAddress::parse(text)
}

/// Format an address as A1-style text
pub fn format(address: CellAddress) -> String {
    address.to_string()
}

/// A cell address (e.g., "A1", "XFD1048576")
///
/// Both coordinates are at least 1. The codec accepts any `u32`
/// magnitude; sheet limits are not applied here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    row: u32,
    column: u32,
}

impl CellAddress {
    /// Create an address from 1-based row and column indices
    pub fn new(row: u32, column: u32) -> Result<Self> {
        if row == 0 || column == 0 {
            return Err(Error::reference(format!(
                "row and column must be >= 1 (got row {}, column {})",
                row, column
            )));
        }
        Ok(Self { row, column })
    }

    /// Build an address whose coordinates are already known to be >= 1
    pub(crate) fn from_parts(row: u32, column: u32) -> Self {
        debug_assert!(row >= 1 && column >= 1);
        Self { row, column }
    }

    /// 1-based row index
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 1-based column index
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Parse an address from A1-style notation
    ///
    /// The accepted form is `[A-Z]+[1-9][0-9]*`: upper-case letters
    /// followed by a decimal row with no leading zero.
    ///
    /// # Examples
    /// ```
    /// use cellbook_core::CellAddress;
    ///
    /// assert!(CellAddress::parse("AA100").is_ok());
    /// assert!(CellAddress::parse("A0").is_err());
    /// assert!(CellAddress::parse("12").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::reference("empty reference"));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && bytes[pos].is_ascii_uppercase() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::reference(format!("no column letters in '{}'", s)));
        }

        let column = column_letters_to_index(&s[..pos])?;

        let row_str = &s[pos..];
        match row_str.as_bytes().first() {
            None => return Err(Error::reference(format!("no row number in '{}'", s))),
            Some(b'0') => {
                return Err(Error::reference(format!(
                    "row number must start with 1-9 in '{}'",
                    s
                )))
            }
            Some(_) => {}
        }

        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::reference(format!("invalid row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::reference(format!("row number does not fit in u32 in '{}'", s)))?;

        Ok(Self { row, column })
    }

    /// Column letters of this address
    pub fn column_letters(&self) -> String {
        letters_unchecked(self.column)
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> Result<CellRange> {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", letters_unchecked(self.column), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
///
/// `start` is the top-left corner and `end` the bottom-right one. Ranges
/// are never normalized: an end that lies before the start on either axis
/// is rejected with [`Error::InvalidRange`] when the range is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: CellAddress, end: CellAddress) -> Result<Self> {
        if end.row < start.row || end.column < start.column {
            return Err(Error::InvalidRange(format!("{}:{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Create a range from 1-based row/column indices
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Result<Self> {
        Self::new(
            CellAddress::new(start_row, start_col)?,
            CellAddress::new(end_row, end_col)?,
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from `A1:B10` notation, or a single `A1`
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((a, b)) => Self::new(CellAddress::parse(a)?, CellAddress::parse(b)?),
            None => Ok(Self::single(CellAddress::parse(s)?)),
        }
    }

    /// Top-left corner
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.column >= self.start.column
            && addr.column <= self.end.column
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn column_count(&self) -> u32 {
        self.end.column - self.start.column + 1
    }

    /// Total number of cells covered
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.column_count() as u64
    }

    /// Check if this range shares at least one cell with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.column <= other.end.column
            && self.end.column >= other.start.column
    }

    /// Iterate over all addresses in the range, row by row
    pub fn cells(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            row: self.start.row,
            column: self.start.column,
            remaining: self.cell_count(),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<CellAddress> for CellRange {
    fn from(addr: CellAddress) -> Self {
        Self::single(addr)
    }
}

/// Row-major iterator over the addresses of a [`CellRange`]
pub struct CellRangeIter {
    range: CellRange,
    row: u32,
    column: u32,
    remaining: u64,
}

impl Iterator for CellRangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let addr = CellAddress::from_parts(self.row, self.column);

        if self.column == self.range.end.column {
            self.column = self.range.start.column;
            self.row = self.row.saturating_add(1);
        } else {
            self.column += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, usize::try_from(self.remaining).ok())
    }
}

impl ExactSizeIterator for CellRangeIter {}
