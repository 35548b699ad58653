use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell as handed over by a table source.
/// Numbers come straight from typed workbook cells; everything a CSV or a
/// formatted workbook cell delivers as text stays text until normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
        }
    }

    /// Text rendering used for identifier and label columns.
    /// Whole numbers print without a fractional part ("1234", not "1234.0").
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) if n.is_nan() => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Finished,
    Presented,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Finished,
        ProjectStatus::Presented,
    ];

    /// Label as written in the source spreadsheet.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Não iniciado",
            ProjectStatus::InProgress => "Em andamento",
            ProjectStatus::Finished => "Finalizado",
            ProjectStatus::Presented => "Apresentado",
        }
    }

    /// Parses a status cell. Case, accents and repeated whitespace are ignored,
    /// so "NAO  INICIADO" and "Não iniciado" are the same status.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
            .chars()
            .map(fold_accent)
            .collect();

        match folded.as_str() {
            "nao iniciado" | "not started" | "notstarted" => Some(ProjectStatus::NotStarted),
            "em andamento" | "in progress" | "inprogress" => Some(ProjectStatus::InProgress),
            "finalizado" | "finished" => Some(ProjectStatus::Finished),
            "apresentado" | "presented" => Some(ProjectStatus::Presented),
            _ => None,
        }
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const UNCLASSIFIED_SEGMENT: &str = "Não Classificado";

/// One row of the project table after normalization. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: String,
    pub client: String,
    pub city: Option<String>,
    pub description: String,
    /// `None` when the status cell holds anything outside the four known labels.
    pub status: Option<ProjectStatus>,
    pub segment: String,
    pub sold: f64,
    pub invoiced: f64,
    pub materials_budgeted: f64,
    pub materials_actual: f64,
    pub expenses_budgeted: f64,
    pub expenses_actual: f64,
    pub labor_budgeted: f64,
    pub labor_actual: f64,
    /// Labor-hours, already converted to hours.
    pub labor_hours_budgeted: f64,
    pub labor_hours_actual: f64,
    pub taxes: f64,
    /// Physical completion on a 0-100 scale.
    pub completion_pct: f64,
}

impl ProjectRecord {
    /// Blank record with the given identifier; handy as a base for struct update syntax.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            client: String::new(),
            city: None,
            description: String::new(),
            status: None,
            segment: UNCLASSIFIED_SEGMENT.to_string(),
            sold: 0.0,
            invoiced: 0.0,
            materials_budgeted: 0.0,
            materials_actual: 0.0,
            expenses_budgeted: 0.0,
            expenses_actual: 0.0,
            labor_budgeted: 0.0,
            labor_actual: 0.0,
            labor_hours_budgeted: 0.0,
            labor_hours_actual: 0.0,
            taxes: 0.0,
            completion_pct: 0.0,
        }
    }

    /// "Cliente (Cidade)", or just the client when the city is blank.
    pub fn client_location(&self) -> String {
        match self.city.as_deref() {
            Some(city) if !city.trim().is_empty() => format!("{} ({})", self.client, city),
            _ => self.client.clone(),
        }
    }
}

/// The three configurable targets. Percent goals are on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalSet {
    pub sales: f64,
    pub gross_margin: f64,
    pub admin_cost: f64,
}

impl GoalSet {
    pub fn net_margin(&self) -> f64 {
        self.gross_margin - self.admin_cost
    }
}

impl Default for GoalSet {
    fn default() -> Self {
        GoalSet {
            sales: 5_000_000.0,
            gross_margin: 25.0,
            admin_cost: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursEfficiency {
    /// Hours consumed run ahead of physical progress by more than the tolerance.
    Low,
    /// Progress is ahead of hours consumed.
    High,
    Balanced,
}

/// Metrics derived from a single project record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total_cost: f64,
    pub profit: f64,
    pub margin_pct: f64,
    pub hours_consumption_pct: f64,
    pub materials_consumption_pct: f64,
    pub expenses_consumption_pct: f64,
    pub labor_value_consumption_pct: f64,
    /// Budgeted minus actual labor-hours; negative means overrun.
    pub hours_balance: f64,
    pub efficiency: HoursEfficiency,
    pub critical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_labels() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.label()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(ProjectStatus::parse("  NAO   iniciado "), Some(ProjectStatus::NotStarted));
        assert_eq!(ProjectStatus::parse("em Andamento"), Some(ProjectStatus::InProgress));
        assert_eq!(ProjectStatus::parse("Cancelado"), None);
        assert_eq!(ProjectStatus::parse(""), None);
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(Cell::Number(5009.0).to_text(), "5009");
        assert_eq!(Cell::Number(5009.2025).to_text(), "5009.2025");
        assert_eq!(Cell::Text("  abc ".into()).to_text(), "abc");
        assert_eq!(Cell::Empty.to_text(), "");
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(Cell::from(None::<f64>).is_blank());
    }

    #[test]
    fn test_client_location() {
        let mut record = ProjectRecord::new("1001");
        record.client = "ACME".into();
        assert_eq!(record.client_location(), "ACME");
        record.city = Some("Campinas".into());
        assert_eq!(record.client_location(), "ACME (Campinas)");
        record.city = Some(" ".into());
        assert_eq!(record.client_location(), "ACME");
    }

    #[test]
    fn test_goal_defaults_and_net_margin() {
        let goals = GoalSet::default();
        assert_eq!(goals.sales, 5_000_000.0);
        assert_eq!(goals.net_margin(), 20.0);
    }
}
