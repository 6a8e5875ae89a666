use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// Where a value came from: workbook path, sheet name and optional 1-based
/// row/column. Threaded through extraction and attached to errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub sheet: String,
    pub row: Option<u32>,
    pub col: Option<u32>,
}

impl Location {
    pub fn new(path: impl AsRef<Path>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: sheet.into(),
            row: None,
            col: None,
        }
    }

    /// Same sheet, pointing at the 0-based cell `(row, col)`.
    pub fn at(&self, row: u32, col: u32) -> Self {
        Self {
            path: self.path.clone(),
            sheet: self.sheet.clone(),
            row: Some(row + 1),
            col: Some(col + 1),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.sheet)?;
        match (self.row, self.col) {
            (Some(r), Some(c)) => write!(f, " row {r} column {c}"),
            (Some(r), None) => write!(f, " row {r}"),
            _ => Ok(()),
        }
    }
}
