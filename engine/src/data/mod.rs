// Table retrieval and normalization.
pub mod csv_parser;
pub mod memo;
pub mod normalizer;
pub mod scale;
pub mod table;
pub mod workbook;

use std::path::Path;

use csv_parser::CsvTableSource;
use table::TableSource;
use workbook::WorkbookTableSource;

/// True for the file extensions calamine can open.
pub fn is_workbook_path(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref(),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods")
    )
}

/// Picks a table source by file extension: workbooks through calamine,
/// anything else as delimited text.
pub fn source_for_path(path: &Path, sheet: Option<String>, delimiter: u8) -> Box<dyn TableSource> {
    if is_workbook_path(path) {
        Box::new(WorkbookTableSource::new(path, sheet))
    } else {
        Box::new(CsvTableSource::new(path, delimiter))
    }
}
