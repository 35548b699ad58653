use super::{normalize_goal_set, GoalStore};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use shared::models::GoalSet;
use std::fs;
use std::path::PathBuf;
use tracing::info;

fn default_admin_goal() -> f64 {
    5.0
}

// On-disk layout: {"meta_vendas": 5000000.0, "meta_margem": 25.0, "meta_custo_adm": 5.0}
#[derive(Debug, Serialize, Deserialize)]
struct GoalFile {
    meta_vendas: f64,
    meta_margem: f64,
    #[serde(default = "default_admin_goal")]
    meta_custo_adm: f64,
}

/// Goals kept in a small JSON file that is both read and rewritten.
pub struct JsonGoalStore {
    path: PathBuf,
}

impl JsonGoalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonGoalStore { path: path.into() }
    }
}

impl GoalStore for JsonGoalStore {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load(&self) -> Result<GoalSet, EngineError> {
        let content = fs::read_to_string(&self.path)?;
        let file: GoalFile = serde_json::from_str(&content)?;
        normalize_goal_set(file.meta_vendas, file.meta_margem, file.meta_custo_adm)
    }

    fn save(&self, goals: &GoalSet) -> Result<(), EngineError> {
        let file = GoalFile {
            meta_vendas: goals.sales,
            meta_margem: goals.gross_margin,
            meta_custo_adm: goals.admin_cost,
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        info!(path = %self.path.display(), "Saved goals");
        Ok(())
    }
}
