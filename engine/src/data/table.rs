// Raw project table and its normalization into `ProjectRecord`s.
use super::normalizer::{try_normalize_duration, try_normalize_number, HoursEncoding};
use super::scale::normalize_percentage_scale;
use crate::error::EngineError;
use serde::Serialize;
use shared::models::{Cell, ProjectRecord, ProjectStatus, UNCLASSIFIED_SEGMENT};
use tracing::{info, warn};

/// Column headers of the project spreadsheet.
pub mod columns {
    pub const PROJECT: &str = "Projeto";
    pub const CLIENT: &str = "Cliente";
    pub const CITY: &str = "Cidade";
    pub const DESCRIPTION: &str = "Descricao";
    pub const STATUS: &str = "Status";
    pub const SOLD: &str = "Vendido";
    pub const INVOICED: &str = "Faturado";
    pub const MATERIALS_BUDGETED: &str = "Mat_Orc";
    pub const MATERIALS_ACTUAL: &str = "Mat_Real";
    pub const EXPENSES_BUDGETED: &str = "Desp_Orc";
    pub const EXPENSES_ACTUAL: &str = "Desp_Real";
    pub const HOURS_BUDGETED: &str = "HH_Orc_Qtd";
    pub const HOURS_ACTUAL: &str = "HH_Real_Qtd";
    pub const LABOR_BUDGETED: &str = "HH_Orc_Vlr";
    pub const LABOR_ACTUAL: &str = "HH_Real_Vlr";
    pub const TAXES: &str = "Impostos";
    pub const COMPLETION: &str = "Conclusao_%";
    pub const SEGMENT: &str = "Tipo";

    /// Columns whose absence is reported. `Tipo` is optional.
    pub const EXPECTED: [&str; 17] = [
        PROJECT,
        CLIENT,
        CITY,
        DESCRIPTION,
        STATUS,
        SOLD,
        INVOICED,
        MATERIALS_BUDGETED,
        MATERIALS_ACTUAL,
        EXPENSES_BUDGETED,
        EXPENSES_ACTUAL,
        HOURS_BUDGETED,
        HOURS_ACTUAL,
        LABOR_BUDGETED,
        LABOR_ACTUAL,
        TAXES,
        COMPLETION,
    ];
}

/// A table as delivered by a source: header names and rows of cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        RawTable { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where the project table comes from. Fetching is blocking.
pub trait TableSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<RawTable, EngineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizeOptions {
    pub hours_encoding: HoursEncoding,
    /// Exchange the budgeted and actual labor-hour quantities. Some sheets carry
    /// them under each other's header.
    pub hours_columns_swapped: bool,
}

/// What had to be substituted while normalizing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataQuality {
    pub missing_columns: Vec<String>,
    pub parse_failures: usize,
    pub unknown_statuses: usize,
    pub skipped_rows: usize,
}

impl DataQuality {
    /// Human-readable notes for the views; empty when nothing was substituted.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.missing_columns.is_empty() {
            warnings.push(format!(
                "Columns missing from the table, zeros used instead: {}",
                self.missing_columns.join(", ")
            ));
        }
        if self.parse_failures > 0 {
            warnings.push(format!("{} cell(s) could not be read and count as 0", self.parse_failures));
        }
        if self.unknown_statuses > 0 {
            warnings.push(format!("{} project(s) have an unrecognized status", self.unknown_statuses));
        }
        warnings
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    pub records: Vec<ProjectRecord>,
    pub quality: DataQuality,
}

struct RowReader<'a> {
    table: &'a RawTable,
    row: &'a [Cell],
    quality: &'a mut DataQuality,
}

impl<'a> RowReader<'a> {
    fn cell(&self, column: &str) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        self.table
            .column_index(column)
            .and_then(|idx| self.row.get(idx))
            .unwrap_or(&EMPTY)
    }

    fn text(&self, column: &str) -> String {
        self.cell(column).to_text()
    }

    fn number(&mut self, column: &str) -> f64 {
        let cell = self.cell(column);
        try_normalize_number(cell).unwrap_or_else(|| {
            self.quality.parse_failures += 1;
            0.0
        })
    }

    fn hours(&mut self, column: &str, encoding: HoursEncoding) -> f64 {
        let cell = self.cell(column);
        try_normalize_duration(cell, encoding).unwrap_or_else(|| {
            self.quality.parse_failures += 1;
            0.0
        })
    }
}

/// Turns a raw table into project records. Never fails: unreadable cells become
/// zero, missing columns become columns of zeros, and both are counted in the
/// returned `DataQuality`.
pub fn normalize_table(table: &RawTable, options: &NormalizeOptions) -> NormalizedTable {
    use columns::*;

    let mut quality = DataQuality::default();
    quality.missing_columns = EXPECTED
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !quality.missing_columns.is_empty() {
        warn!(missing = ?quality.missing_columns, "Project table is missing expected columns");
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.iter().all(Cell::is_blank) {
            quality.skipped_rows += 1;
            continue;
        }

        let mut reader = RowReader { table, row, quality: &mut quality };

        let status_text = reader.text(STATUS);
        let status = ProjectStatus::parse(&status_text);
        let city = Some(reader.text(CITY)).filter(|c| !c.is_empty());
        let segment = Some(reader.text(SEGMENT))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNCLASSIFIED_SEGMENT.to_string());

        let mut hours_budgeted = reader.hours(HOURS_BUDGETED, options.hours_encoding);
        let mut hours_actual = reader.hours(HOURS_ACTUAL, options.hours_encoding);
        if options.hours_columns_swapped {
            std::mem::swap(&mut hours_budgeted, &mut hours_actual);
        }

        let record = ProjectRecord {
            project_id: reader.text(PROJECT),
            client: reader.text(CLIENT),
            city,
            description: reader.text(DESCRIPTION),
            status,
            segment,
            sold: reader.number(SOLD),
            invoiced: reader.number(INVOICED),
            materials_budgeted: reader.number(MATERIALS_BUDGETED),
            materials_actual: reader.number(MATERIALS_ACTUAL),
            expenses_budgeted: reader.number(EXPENSES_BUDGETED),
            expenses_actual: reader.number(EXPENSES_ACTUAL),
            labor_budgeted: reader.number(LABOR_BUDGETED),
            labor_actual: reader.number(LABOR_ACTUAL),
            labor_hours_budgeted: hours_budgeted,
            labor_hours_actual: hours_actual,
            taxes: reader.number(TAXES),
            completion_pct: normalize_percentage_scale(reader.number(COMPLETION)),
        };

        // Cost-center rows leave the status blank; only unreadable text counts.
        if status.is_none() && !status_text.is_empty() {
            quality.unknown_statuses += 1;
        }
        records.push(record);
    }

    info!(
        rows = table.rows.len(),
        records = records.len(),
        parse_failures = quality.parse_failures,
        "Normalized project table"
    );
    NormalizedTable { records, quality }
}
