// Goal targets: where they are stored and how a failed load degrades to defaults.
pub mod json_store;
pub mod sheet_store;

use crate::data::is_workbook_path;
use crate::error::EngineError;
use shared::models::GoalSet;
use std::path::Path;
use tracing::{info, warn};

pub use json_store::JsonGoalStore;
pub use sheet_store::SheetGoalStore;

/// Persistence for the three goal targets.
pub trait GoalStore: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<GoalSet, EngineError>;
    fn save(&self, goals: &GoalSet) -> Result<(), EngineError>;
}

/// Goals ready for the views, with the reason defaults were used if they were.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGoals {
    pub goals: GoalSet,
    pub warning: Option<String>,
}

/// Loads from the store, falling back to `GoalSet::default()` on any failure.
pub fn load_goals(store: &dyn GoalStore) -> LoadedGoals {
    match store.load() {
        Ok(goals) => {
            info!(store = %store.describe(), ?goals, "Loaded goals");
            LoadedGoals { goals, warning: None }
        }
        Err(e) => {
            warn!(store = %store.describe(), error = %e, "Could not load goals, using defaults");
            LoadedGoals {
                goals: GoalSet::default(),
                warning: Some(format!("Goals could not be loaded ({}); default goals are in use", e)),
            }
        }
    }
}

// Percent targets written as fractions (0.25) are read as percentages (25).
fn percent_goal(name: &str, value: f64) -> Result<f64, EngineError> {
    let value = checked_goal(name, value)?;
    Ok(if value > 0.0 && value <= 1.0 { value * 100.0 } else { value })
}

fn checked_goal(name: &str, value: f64) -> Result<f64, EngineError> {
    if !value.is_finite() {
        return Err(EngineError::MalformedGoals(format!("{} goal is not a number", name)));
    }
    if value < 0.0 {
        return Err(EngineError::MalformedGoals(format!("{} goal is negative: {}", name, value)));
    }
    Ok(value)
}

/// Validates raw goal values and brings the percent goals onto the 0-100 scale.
pub fn normalize_goal_set(sales: f64, gross_margin: f64, admin_cost: f64) -> Result<GoalSet, EngineError> {
    Ok(GoalSet {
        sales: checked_goal("sales", sales)?,
        gross_margin: percent_goal("gross margin", gross_margin)?,
        admin_cost: percent_goal("admin cost", admin_cost)?,
    })
}

/// `.json` files hold a key-value goal record; CSV and workbook files hold the
/// goals in the first data row.
pub fn goal_store_for_path(path: &Path, sheet: Option<String>, delimiter: u8) -> Box<dyn GoalStore> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonGoalStore::new(path))
    } else if is_workbook_path(path) {
        Box::new(SheetGoalStore::workbook(path, sheet))
    } else {
        Box::new(SheetGoalStore::csv(path, delimiter))
    }
}
