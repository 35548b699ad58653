// Goals read from a small sheet: a header row, then one row holding the sales,
// margin and admin-cost goals in that order.
use super::{normalize_goal_set, GoalStore};
use crate::data::csv_parser::CsvTableSource;
use crate::data::normalizer::try_normalize_number;
use crate::data::table::TableSource;
use crate::data::workbook::WorkbookTableSource;
use crate::error::EngineError;
use csv::WriterBuilder;
use shared::models::{Cell, GoalSet};
use std::path::PathBuf;
use tracing::info;

pub const GOAL_HEADERS: [&str; 3] = ["Meta_Vendas", "Meta_Margem", "Meta_Custo_Adm"];

enum SheetFile {
    Csv { delimiter: u8 },
    Workbook { sheet: Option<String> },
}

pub struct SheetGoalStore {
    path: PathBuf,
    file: SheetFile,
}

impl SheetGoalStore {
    pub fn csv(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        SheetGoalStore {
            path: path.into(),
            file: SheetFile::Csv { delimiter },
        }
    }

    /// Workbook sheets can be read but not written back.
    pub fn workbook(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        SheetGoalStore {
            path: path.into(),
            file: SheetFile::Workbook { sheet },
        }
    }

    fn source(&self) -> Box<dyn TableSource> {
        match &self.file {
            SheetFile::Csv { delimiter } => Box::new(CsvTableSource::new(&self.path, *delimiter)),
            SheetFile::Workbook { sheet } => Box::new(WorkbookTableSource::new(&self.path, sheet.clone())),
        }
    }
}

// A goal cell must hold a readable number; blank or unreadable cells make the
// whole row malformed.
fn goal_cell(name: &str, cell: &Cell) -> Result<f64, EngineError> {
    if cell.is_blank() {
        return Err(EngineError::MalformedGoals(format!("{} goal is blank", name)));
    }
    try_normalize_number(cell)
        .ok_or_else(|| EngineError::MalformedGoals(format!("{} goal is not a number: {}", name, cell.to_text())))
}

fn decimal_comma(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

impl GoalStore for SheetGoalStore {
    fn describe(&self) -> String {
        self.source().describe()
    }

    fn load(&self) -> Result<GoalSet, EngineError> {
        let table = self.source().fetch()?;
        let row = table
            .rows
            .first()
            .ok_or_else(|| EngineError::MalformedGoals("goal sheet has no data row".into()))?;
        if row.len() < GOAL_HEADERS.len() {
            return Err(EngineError::MalformedGoals(format!(
                "goal row has {} cell(s), expected {}",
                row.len(),
                GOAL_HEADERS.len()
            )));
        }
        normalize_goal_set(
            goal_cell("sales", &row[0])?,
            goal_cell("margin", &row[1])?,
            goal_cell("admin cost", &row[2])?,
        )
    }

    fn save(&self, goals: &GoalSet) -> Result<(), EngineError> {
        let delimiter = match &self.file {
            SheetFile::Csv { delimiter } => *delimiter,
            SheetFile::Workbook { .. } => {
                return Err(EngineError::GoalStoreError(format!(
                    "{} is a workbook and cannot be written; edit the sheet directly",
                    self.path.display()
                )))
            }
        };

        let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(&self.path)?;
        writer.write_record(GOAL_HEADERS)?;
        writer.write_record([
            decimal_comma(goals.sales),
            decimal_comma(goals.gross_margin),
            decimal_comma(goals.admin_cost),
        ])?;
        writer.flush()?;
        info!(path = %self.path.display(), "Saved goals");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::goals::load_goals;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_brazilian_formatted_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metas.csv");
        fs::write(&path, "Meta_Vendas;Meta_Margem;Meta_Custo_Adm\nR$ 6.000.000,00;0,28;4\n").unwrap();

        let goals = SheetGoalStore::csv(&path, b';').load().unwrap();
        assert_eq!(goals.sales, 6_000_000.0);
        assert!((goals.gross_margin - 28.0).abs() < 1e-9);
        assert_eq!(goals.admin_cost, 4.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SheetGoalStore::csv(dir.path().join("metas.csv"), b';');
        let goals = GoalSet {
            sales: 4_250_000.5,
            gross_margin: 22.0,
            admin_cost: 3.5,
        };
        store.save(&goals).unwrap();

        let written = fs::read_to_string(dir.path().join("metas.csv")).unwrap();
        assert!(written.starts_with("Meta_Vendas;Meta_Margem;Meta_Custo_Adm"));
        assert!(written.contains("4250000,50;22,00;3,50"));
        assert_eq!(store.load().unwrap(), goals);
    }

    #[test]
    fn test_header_only_sheet_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metas.csv");
        fs::write(&path, "Meta_Vendas;Meta_Margem;Meta_Custo_Adm\n").unwrap();
        let err = SheetGoalStore::csv(&path, b';').load().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn test_negative_cell_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metas.csv");
        fs::write(&path, "Meta_Vendas;Meta_Margem;Meta_Custo_Adm\n1000;-5;5\n").unwrap();
        let err = SheetGoalStore::csv(&path, b';').load().unwrap_err();
        assert!(matches!(err, EngineError::MalformedGoals(_)));
    }

    #[test]
    fn test_unreadable_or_blank_cell_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metas.csv");
        fs::write(&path, "Meta_Vendas;Meta_Margem;Meta_Custo_Adm\n5000000;abc;\n").unwrap();
        let store = SheetGoalStore::csv(&path, b';');

        let err = store.load().unwrap_err();
        assert!(matches!(err, EngineError::MalformedGoals(_)));
        assert!(err.to_string().contains("abc"));

        let loaded = load_goals(&store);
        assert_eq!(loaded.goals, GoalSet::default());
        assert!(loaded.warning.is_some());

        fs::write(&path, "Meta_Vendas;Meta_Margem;Meta_Custo_Adm\n5000000;25;\n").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("admin cost goal is blank"));
    }

    #[test]
    fn test_workbook_store_is_read_only() {
        let store = SheetGoalStore::workbook("dados.xlsx", Some("Sheet2".into()));
        let err = store.save(&GoalSet::default()).unwrap_err();
        assert!(matches!(err, EngineError::GoalStoreError(_)));
    }
}
