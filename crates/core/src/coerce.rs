//! Numeric coercion of workbook cells.
//!
//! An empty cell is "no value" and takes the field's default. A cell that
//! holds something other than a number is malformed; callers decide whether
//! that is fatal.

use standings_sheet::CellValue;

/// A cell that has a value, but not a numeric one.
#[derive(Debug, Clone, PartialEq)]
pub struct NotANumber {
    pub kind: &'static str,
    pub value: String,
}

impl NotANumber {
    fn of(cell: &CellValue) -> Self {
        NotANumber {
            kind: cell.type_name(),
            value: cell.to_string(),
        }
    }
}

/// Integer value of a cell; empty cells yield 0 and fractions are truncated.
pub fn coerce_int(cell: &CellValue) -> Result<i64, NotANumber> {
    if cell.is_blank() {
        return Ok(0);
    }

    match cell {
        CellValue::Bool(_) => Err(NotANumber::of(cell)),
        _ => cell
            .as_int()
            .or_else(|| {
                cell.as_float()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
            .ok_or_else(|| NotANumber::of(cell)),
    }
}

/// Championship or race points
pub fn coerce_points(cell: &CellValue) -> Result<i64, NotANumber> {
    coerce_int(cell)
}

/// Ballast in kilograms, current or per-race change
pub fn coerce_ballast(cell: &CellValue) -> Result<i64, NotANumber> {
    coerce_int(cell)
}

/// Float value of a cell; empty cells yield `None`.
pub fn coerce_float(cell: &CellValue) -> Result<Option<f64>, NotANumber> {
    if cell.is_blank() {
        return Ok(None);
    }

    match cell {
        CellValue::Int(_) | CellValue::Float(_) | CellValue::String(_) => cell
            .as_float()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| NotANumber::of(cell)),
        _ => Err(NotANumber::of(cell)),
    }
}

/// Text of a cell; empty cells yield `None`.
pub fn coerce_text(cell: &CellValue) -> Option<String> {
    (!cell.is_blank()).then(|| cell.to_string())
}
