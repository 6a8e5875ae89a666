use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A raw literal as read from a spreadsheet cell.
///
/// This is distinct from the typed [`crate::Scalar`] values produced once a
/// column's declared type has been applied: every `CellValue` is first turned
/// into text (see [`CellValue::to_text`]) and then parsed by the record
/// builder according to the column's type descriptor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
}

/// Shared empty literal returned for out-of-range reads.
pub static EMPTY_CELL: CellValue = CellValue::Empty;

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl CellValue {
    /// Textual content of the cell. Whole numbers render without a
    /// fractional part (`100.0` reads as `"100"`); booleans read as `1`/`0`
    /// so numeric columns accept them.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Boolean(b) => u8::from(*b).to_string(),
            other => other.to_string(),
        }
    }

    /// `true` for empty cells and cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}
