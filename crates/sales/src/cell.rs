//! Spreadsheet cell values, independent of any workbook library.

/// A single cell as read from a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Interpret the cell as an integer.
    ///
    /// Floats are accepted only when they have no fractional part and fit in
    /// `i64`; text is accepted when its trimmed content is a base-10 integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            Cell::Float(f) => float_to_i64(*f),
            Cell::Text(s) => s.trim().parse::<i64>().ok(),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }

    /// Render the cell as text. Never fails.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(f) => match float_to_i64(*f) {
                Some(v) => v.to_string(),
                None => f.to_string(),
            },
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Interpret the cell as a flag. Anything unrecognised is `false`.
    pub fn as_bool(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Int(v) => *v != 0,
            Cell::Float(f) => *f != 0.0,
            Cell::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1"
            }
            Cell::Empty => false,
        }
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
