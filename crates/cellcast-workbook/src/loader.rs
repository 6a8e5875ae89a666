use crate::IoError;
use crate::sheet::Sheet;
use crate::traits::SpreadsheetReader;
use std::path::{Path, PathBuf};

/// All sheets of one input file, read eagerly in workbook order.
#[derive(Debug)]
pub struct Workbook {
    path: PathBuf,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open `path`, choosing the backend from its extension (`.json`,
    /// `.xlsx`, `.xlsm`).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("workbook_open", path = %path.display()).entered();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => {
                let reader = crate::JsonAdapter::open_path(path)?;
                Self::from_reader(path, reader)
            }
            #[cfg(feature = "calamine")]
            Some("xlsx") | Some("xlsm") => {
                let reader = crate::CalamineAdapter::open_path(path)?;
                Self::from_reader(path, reader)
            }
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn from_reader<R>(path: impl AsRef<Path>, mut reader: R) -> Result<Self, IoError>
    where
        R: SpreadsheetReader,
        IoError: From<R::Error>,
    {
        let names = reader.sheet_names()?;
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let data = reader.read_sheet(&name)?;
            sheets.push(Sheet::new(name, data));
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }
}
