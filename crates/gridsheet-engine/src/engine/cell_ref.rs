//! Cell addressing.
//!
//! Maps between zero-indexed `(row, col)` coordinates, the canonical internal
//! identifier (`"row:col"`), and spreadsheet-style labels (`A1`, `AA12`).
//!
//! # Examples
//!
//! ```
//! use gridsheet_engine::engine::{CellRef, column_label, parse_label};
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!((cell.row, cell.col), (2, 1));
//! assert_eq!(cell.identifier(), "2:1");
//! assert_eq!(column_label(26), "AA");
//! assert_eq!(parse_label("AA12").unwrap(), (11, 26));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::AddressError;

/// A cell coordinate (0-indexed). Ordering is row-major.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Canonical internal identifier for this coordinate.
    pub fn identifier(&self) -> String {
        identifier(self.row, self.col)
    }

    pub fn from_identifier(id: &str) -> Result<CellRef, AddressError> {
        let (row, col) = position(id)?;
        Ok(CellRef::new(row, col))
    }

    /// Spreadsheet label, e.g. `B3`.
    pub fn label(&self) -> String {
        cell_label(self.row, self.col)
    }

    pub fn from_label(label: &str) -> Result<CellRef, AddressError> {
        let (row, col) = parse_label(label)?;
        Ok(CellRef::new(row, col))
    }
}

impl std::str::FromStr for CellRef {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_label(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.col), row_label(self.row))
    }
}

/// An inclusive, normalized rectangle of cells.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRange {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl CellRange {
    /// Build the rectangle spanned by two corners given in any order.
    pub fn from_corners(a: CellRef, b: CellRef) -> CellRange {
        CellRange {
            min_row: a.row.min(b.row),
            min_col: a.col.min(b.col),
            max_row: a.row.max(b.row),
            max_col: a.col.max(b.col),
        }
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        (self.min_row..=self.max_row).contains(&cell.row)
            && (self.min_col..=self.max_col).contains(&cell.col)
    }

    pub fn row_count(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// Every coordinate in the rectangle, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + use<> {
        let (min_col, max_col) = (self.min_col, self.max_col);
        (self.min_row..=self.max_row)
            .flat_map(move |row| (min_col..=max_col).map(move |col| CellRef::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            cell_label(self.min_row, self.min_col),
            cell_label(self.max_row, self.max_col)
        )
    }
}

pub fn identifier(row: usize, col: usize) -> String {
    format!("{}:{}", row, col)
}

/// Decode an identifier produced by [`identifier`].
pub fn position(id: &str) -> Result<(usize, usize), AddressError> {
    let invalid = || AddressError::InvalidIdentifier(id.to_string());
    let (row, col) = id.split_once(':').ok_or_else(invalid)?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(row) || !is_digits(col) {
        return Err(invalid());
    }
    let row = row.parse::<usize>().map_err(|_| invalid())?;
    let col = col.parse::<usize>().map_err(|_| invalid())?;
    Ok((row, col))
}

/// Convert column index to bijective base-26 letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_label(col: usize) -> String {
    let mut result = String::new();
    let mut n = col as u128 + 1;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

pub fn row_label(row: usize) -> String {
    (row as u128 + 1).to_string()
}

pub fn cell_label(row: usize, col: usize) -> String {
    format!("{}{}", column_label(col), row_label(row))
}

fn column_index(letters: &str) -> Option<usize> {
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        let digit = (c - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

/// Inverse of [`column_label`]: `A` -> 0, `AA` -> 26.
pub fn parse_column_label(letters: &str) -> Result<usize, AddressError> {
    column_index(letters).ok_or_else(|| AddressError::InvalidLabel(letters.to_string()))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").expect("label regex must compile")
    })
}

/// True if `text` has the shape of a label (`^[A-Z]+\d+$`).
pub fn is_label(text: &str) -> bool {
    label_re().is_match(text)
}

/// Parse a label such as `AA12` into `(row, col)`.
pub fn parse_label(label: &str) -> Result<(usize, usize), AddressError> {
    let invalid = || AddressError::InvalidLabel(label.to_string());
    let caps = label_re().captures(label).ok_or_else(invalid)?;
    let col = column_index(&caps["letters"]).ok_or_else(invalid)?;

    let row = caps["numbers"]
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(invalid)?;

    Ok((row, col))
}

/// Parse `A1:B5` style text. Endpoints may be given in any order.
pub fn parse_range(text: &str) -> Result<CellRange, AddressError> {
    let invalid = || AddressError::InvalidRange(text.to_string());
    let (start, end) = text.split_once(':').ok_or_else(invalid)?;
    if end.contains(':') {
        return Err(invalid());
    }
    let start = CellRef::from_label(start.trim()).map_err(|_| invalid())?;
    let end = CellRef::from_label(end.trim()).map_err(|_| invalid())?;
    Ok(CellRange::from_corners(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_label_bijection() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn test_parse_column_label() {
        assert_eq!(parse_column_label("A"), Ok(0));
        assert_eq!(parse_column_label("Z"), Ok(25));
        assert_eq!(parse_column_label("ZZ"), Ok(701));
        for col in [0, 25, 26, 700, 18277] {
            assert_eq!(parse_column_label(&column_label(col)), Ok(col));
        }
        assert!(parse_column_label("").is_err());
        assert!(parse_column_label("a").is_err());
        assert!(parse_column_label("A1").is_err());
    }

    #[test]
    fn test_round_trips() {
        for row in [0usize, 1, 9, 99, 12345] {
            for col in [0usize, 1, 25, 26, 701, 702, 18277] {
                assert_eq!(position(&identifier(row, col)).unwrap(), (row, col));
                let label = format!("{}{}", column_label(col), row_label(row));
                assert_eq!(parse_label(&label).unwrap(), (row, col));
            }
        }
    }

    #[test]
    fn test_position_rejects_malformed_identifiers() {
        for bad in ["", "1", "1:", ":1", "a:b", "1:2:3", "-1:0", " 1:2", "1.5:2"] {
            assert_eq!(
                position(bad),
                Err(AddressError::InvalidIdentifier(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_label_invalid_inputs() {
        for bad in ["", "123", "ABC", "A0", "1A", "A 1", "a1", "A1B", "$A$1"] {
            assert!(parse_label(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_parse_label_overflow_is_invalid() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(matches!(parse_label(&huge), Err(AddressError::InvalidLabel(_))));
    }

    #[test]
    fn test_parse_range_normalizes_endpoints() {
        let range = parse_range("B5:A1").unwrap();
        assert_eq!(
            range,
            CellRange {
                min_row: 0,
                min_col: 0,
                max_row: 4,
                max_col: 1
            }
        );
        assert_eq!(parse_range("A3:C1").unwrap().to_string(), "A1:C3");
        assert!(parse_range("A1").is_err());
        assert!(parse_range("A1:B2:C3").is_err());
        assert!(parse_range("A1:").is_err());
    }

    #[test]
    fn test_cell_ref_display_and_from_str() {
        let cell: CellRef = "AA100".parse().unwrap();
        assert_eq!(cell, CellRef::new(99, 26));
        assert_eq!(cell.to_string(), "AA100");
        assert_eq!(CellRef::from_identifier("99:26").unwrap(), cell);
    }

    #[test]
    fn test_range_cells_are_row_major() {
        let range = parse_range("A1:B2").unwrap();
        let cells: Vec<String> = range.cells().map(|c| c.label()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
        assert_eq!(range.row_count(), 2);
        assert_eq!(range.col_count(), 2);
        assert!(range.contains(&CellRef::new(1, 1)));
        assert!(!range.contains(&CellRef::new(2, 0)));
    }
}
