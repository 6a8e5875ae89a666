//! Sheet extraction: walks a [`Sheet`] and feeds cell text to the
//! [`RecordBuilder`](crate::builder::RecordBuilder).

pub mod config_sheet;
pub mod item_sheet;
pub mod sheet_name;
pub mod sign;

pub use config_sheet::{ConfigColumns, detect_config_columns, extract_config_sheet};
pub use item_sheet::extract_item_sheet;
pub use sheet_name::{SheetAnnotation, parse_sheet_name};
pub use sign::SignFilter;

use cellcast_common::{Fields, Location, Value};
use cellcast_workbook::Sheet;

/// Consecutive blank rows that end a sheet.
pub const MAX_BLANK_ROWS: u32 = 3;

/// Per-sheet inputs shared by both extractors.
pub struct SheetContext<'a> {
    pub sheet: &'a Sheet,
    pub location: Location,
    pub signs: &'a SignFilter,
    /// Build schema entries as well as data.
    pub with_schema: bool,
}

/// Schema and data of one extracted sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub schema: Fields,
    pub data: Value,
}
