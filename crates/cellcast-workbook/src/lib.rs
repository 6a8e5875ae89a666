pub mod backends;
pub mod error;
pub mod loader;
pub mod sheet;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
pub use backends::JsonAdapter;
pub use error::IoError;
pub use loader::Workbook;
pub use sheet::Sheet;
pub use traits::{MergedRange, SheetData, SpreadsheetReader};

// Re-export for convenience
pub use cellcast_common::CellValue;
