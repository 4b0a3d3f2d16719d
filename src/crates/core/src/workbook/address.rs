//! A1-style address parsing
//!
//! Strict by design: a malformed address is a host error for the one
//! operation carrying it, which the executor isolates from the rest of the
//! batch.

use crate::util::errors::{SheetMateError, SheetMateResult};

/// 0-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Inclusive rectangular range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }
}

/// "A" -> 0, "Z" -> 25, "AA" -> 26.
pub fn column_index(letters: &str) -> SheetMateResult<usize> {
    if letters.is_empty() {
        return Err(SheetMateError::host("Empty column letters"));
    }
    let mut index = 0usize;
    for ch in letters.chars() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return Err(SheetMateError::host(format!(
                "Invalid column letters: {}",
                letters
            )));
        }
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(ch as usize - 'A' as usize + 1))
            .ok_or_else(|| {
                SheetMateError::host(format!("Column letters out of range: {}", letters))
            })?;
    }
    Ok(index - 1)
}

/// 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII column letters")
}

/// Parse a single cell address like "B2".
pub fn parse_cell(address: &str) -> SheetMateResult<CellRef> {
    let address = address.trim().trim_start_matches('$');
    let split = address
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SheetMateError::host(format!("Invalid cell address: {}", address)))?;
    let (letters, digits) = address.split_at(split);
    let letters = letters.trim_end_matches('$');
    let row: usize = digits
        .parse()
        .map_err(|_| SheetMateError::host(format!("Invalid row in address: {}", address)))?;
    if row == 0 || letters.is_empty() {
        return Err(SheetMateError::host(format!(
            "Invalid cell address: {}",
            address
        )));
    }
    Ok(CellRef {
        row: row - 1,
        col: column_index(letters)?,
    })
}

/// Parse "A1:B10" or a single cell "A1" (treated as a 1x1 range). A sheet
/// qualifier like "Sheet1!A1:B10" is accepted and ignored here; sheet
/// targeting is carried separately by the operations that need it.
pub fn parse_range(address: &str) -> SheetMateResult<RangeRef> {
    let address = address
        .rsplit('!')
        .next()
        .unwrap_or(address);
    let (start, end) = match address.split_once(':') {
        Some((start, end)) => (parse_cell(start)?, parse_cell(end)?),
        None => {
            let cell = parse_cell(address)?;
            (cell, cell)
        }
    };
    if end.row < start.row || end.col < start.col {
        return Err(SheetMateError::host(format!(
            "Range end precedes start: {}",
            address
        )));
    }
    Ok(RangeRef { start, end })
}

/// Format a 0-based cell back into A1 notation.
pub fn format_cell(cell: CellRef) -> String {
    format!("{}{}", column_letters(cell.col), cell.row + 1)
}

/// Format a range back into A1 notation ("A1" for 1x1 ranges).
pub fn format_range(range: RangeRef) -> String {
    if range.start == range.end {
        format_cell(range.start)
    } else {
        format!("{}:{}", format_cell(range.start), format_cell(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_round_trip() {
        for (letters, index) in [("A", 0), ("Z", 25), ("AA", 26), ("AZ", 51), ("BA", 52)] {
            assert_eq!(column_index(letters).unwrap(), index);
            assert_eq!(column_letters(index), letters);
        }
    }

    #[test]
    fn parses_cells_and_ranges() {
        assert_eq!(parse_cell("B2").unwrap(), CellRef { row: 1, col: 1 });
        let range = parse_range("A1:C10").unwrap();
        assert_eq!(range.row_count(), 10);
        assert_eq!(range.col_count(), 3);
        assert_eq!(parse_range("D4").unwrap().start, CellRef { row: 3, col: 3 });
    }

    #[test]
    fn strips_sheet_qualifier_and_absolute_markers() {
        assert_eq!(
            parse_range("Sheet1!$A$1:$B$2").unwrap(),
            RangeRef {
                start: CellRef { row: 0, col: 0 },
                end: CellRef { row: 1, col: 1 },
            }
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "11", "A0", "1A", ":B2", "B2:A1"] {
            assert!(parse_range(bad).is_err(), "expected error for {:?}", bad);
        }
    }

    #[test]
    fn absurdly_long_column_letters_error_instead_of_overflowing() {
        let letters = "A".repeat(20);
        assert!(column_index(&letters).is_err());
        assert!(parse_cell(&format!("{}1", letters)).is_err());
    }

    #[test]
    fn formats_back_to_a1() {
        assert_eq!(format_range(parse_range("AA10:AB12").unwrap()), "AA10:AB12");
        assert_eq!(format_range(parse_range("C3").unwrap()), "C3");
    }
}
