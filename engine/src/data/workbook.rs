// Spreadsheet workbooks (.xlsx, .xls, .ods) read through calamine.
use super::table::{RawTable, TableSource};
use crate::error::EngineError;
use calamine::{open_workbook_auto, Data, Reader};
use shared::models::Cell;
use std::path::PathBuf;
use tracing::info;

/// Maps a workbook cell onto the table cell model. Date/time cells keep their
/// serial value, so duration cells arrive as fractions of a day.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
    }
}

/// A sheet of a workbook file. Without a sheet name the first sheet is used.
pub struct WorkbookTableSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl WorkbookTableSource {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        WorkbookTableSource { path: path.into(), sheet }
    }
}

impl TableSource for WorkbookTableSource {
    fn describe(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("workbook:{}#{}", self.path.display(), sheet),
            None => format!("workbook:{}", self.path.display()),
        }
    }

    fn fetch(&self) -> Result<RawTable, EngineError> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| EngineError::TableUnavailable(format!("{} has no sheets", self.path.display())))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|cell| cell_from_data(cell).to_text()).collect(),
            None => Vec::new(),
        };
        let body: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(cell_from_data).collect()).collect();

        info!(
            path = %self.path.display(),
            sheet = %sheet_name,
            rows = body.len(),
            "Loaded table from workbook"
        );
        Ok(RawTable::new(headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(5009)), Cell::Number(5009.0));
        assert_eq!(cell_from_data(&Data::Float(0.45)), Cell::Number(0.45));
        assert_eq!(cell_from_data(&Data::String("R$ 10,00".into())), Cell::Text("R$ 10,00".into()));
        assert_eq!(cell_from_data(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Text("true".into()));
    }

    #[test]
    fn test_missing_workbook_is_source_unreachable() {
        let source = WorkbookTableSource::new("missing_dashboard.xlsx", None);
        let err = source.fetch().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnreachable);
    }
}
