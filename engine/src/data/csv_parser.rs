use super::table::{RawTable, TableSource};
use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord};
use shared::models::Cell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

// CSV export of the project spreadsheet, Brazilian style:
// Projeto;Cliente;Cidade;Descricao;Status;Vendido;...
// 1001;ACME;Campinas;Galpão;Em andamento;R$ 1.000,00;...
// Every field is kept as text; numbers are read later by the normalizer.
pub struct BrazilianCsvParser;

impl BrazilianCsvParser {
    pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true) // Short rows are padded below instead of rejected
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(Self::to_cells(&record, headers.len()));
        }
        Ok(RawTable::new(headers, rows))
    }

    pub fn load_table_from_csv(file_path: &Path, delimiter: u8) -> Result<RawTable, EngineError> {
        let file = File::open(file_path)?;
        Self::read_table(BufReader::new(file), delimiter)
    }

    fn to_cells(record: &StringRecord, width: usize) -> Vec<Cell> {
        let mut cells: Vec<Cell> = record
            .iter()
            .map(|field| if field.trim().is_empty() { Cell::Empty } else { Cell::Text(field.to_string()) })
            .collect();
        if cells.len() < width {
            cells.resize(width, Cell::Empty);
        }
        cells
    }
}

/// Project table read from a CSV file on every fetch.
pub struct CsvTableSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        CsvTableSource { path: path.into(), delimiter }
    }
}

impl TableSource for CsvTableSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn fetch(&self) -> Result<RawTable, EngineError> {
        let table = BrazilianCsvParser::load_table_from_csv(&self.path, self.delimiter)?;
        info!(path = %self.path.display(), rows = table.rows.len(), "Loaded project table from CSV");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_table_keeps_text_cells() {
        let csv_content = "\
Projeto;Cliente;Vendido;Conclusao_%
1001;ACME;R$ 1.234,56;45%
1002;Beta;;0,5";
        let tmp_file = create_test_csv(csv_content);
        let table = CsvTableSource::new(tmp_file.path(), b';').fetch().unwrap();

        assert_eq!(table.headers, vec!["Projeto", "Cliente", "Vendido", "Conclusao_%"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], Cell::Text("R$ 1.234,56".into()));
        assert_eq!(table.rows[1][2], Cell::Empty);
        assert_eq!(table.rows[1][3], Cell::Text("0,5".into()));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv_content = "Projeto;Cliente;Vendido\n1001;ACME";
        let table = BrazilianCsvParser::read_table(csv_content.as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let csv_content = "\u{feff}Projeto;Vendido\n1001;10";
        let table = BrazilianCsvParser::read_table(csv_content.as_bytes(), b';').unwrap();
        assert_eq!(table.column_index("Projeto"), Some(0));
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let tmp_file = create_test_csv("Projeto;Cliente;Vendido");
        let table = CsvTableSource::new(tmp_file.path(), b';').fetch().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_is_source_unreachable() {
        let result = CsvTableSource::new("non_existent_file.csv", b';').fetch();
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnreachable);
        assert!(err.to_string().contains("I/O error"));
    }
}
