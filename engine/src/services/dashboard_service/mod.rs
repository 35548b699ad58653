// engine/src/services/dashboard_service/mod.rs
// DashboardEngine owns the table source, the goal store and their memos. Each
// view method gathers the memoized inputs and hands them to its handler module.
use crate::config::settings::EngineSettings;
use crate::data::memo::TtlMemo;
use crate::data::source_for_path;
use crate::data::table::TableSource;
use crate::error::EngineError;
use crate::goals::{goal_store_for_path, normalize_goal_set, GoalStore, LoadedGoals};
use shared::models::GoalSet;
use shared::reports::{GoalsView, InsightsReport, PortfolioOverview, ProjectDetail, RevenueBase, TileQuery};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod goals;
pub mod helpers;
pub mod insights;
pub mod portfolio;
pub mod project_detail;

pub use helpers::TableSnapshot;
use helpers::{collect_warnings, load_goals_cached, load_table, ViewInputs};

pub struct DashboardEngine {
    settings: EngineSettings,
    table_source: Arc<dyn TableSource>,
    goal_store: Arc<dyn GoalStore>,
    table_memo: Arc<RwLock<TtlMemo<TableSnapshot>>>,
    goals_memo: Arc<RwLock<TtlMemo<LoadedGoals>>>,
}

impl DashboardEngine {
    pub fn new(settings: EngineSettings, table_source: Arc<dyn TableSource>, goal_store: Arc<dyn GoalStore>) -> Self {
        let table_memo = Arc::new(RwLock::new(TtlMemo::new(settings.table_ttl())));
        let goals_memo = Arc::new(RwLock::new(TtlMemo::new(settings.goals_ttl())));
        DashboardEngine {
            settings,
            table_source,
            goal_store,
            table_memo,
            goals_memo,
        }
    }

    /// Builds the table source and goal store named in the settings.
    pub fn from_settings(settings: EngineSettings) -> Self {
        let delimiter = settings.delimiter_byte();
        let table_source: Arc<dyn TableSource> =
            Arc::from(source_for_path(&settings.table_path, settings.table_sheet.clone(), delimiter));
        let goal_store: Arc<dyn GoalStore> =
            Arc::from(goal_store_for_path(&settings.goals_path, settings.goals_sheet.clone(), delimiter));
        tracing::info!(
            table = %table_source.describe(),
            goals = %goal_store.describe(),
            "Dashboard engine configured"
        );
        Self::new(settings, table_source, goal_store)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    async fn snapshot(&self) -> Result<Arc<TableSnapshot>, EngineError> {
        load_table(
            self.table_source.clone(),
            self.table_memo.clone(),
            self.settings.normalize_options(),
        )
        .await
    }

    async fn loaded_goals(&self) -> Result<Arc<LoadedGoals>, EngineError> {
        load_goals_cached(self.goal_store.clone(), self.goals_memo.clone()).await
    }

    fn view_inputs<'a>(&'a self, snapshot: &'a TableSnapshot, goals: &'a LoadedGoals) -> ViewInputs<'a> {
        ViewInputs {
            records: &snapshot.records,
            goals: &goals.goals,
            admin_prefixes: &self.settings.admin_prefixes,
            hours_tolerance: self.settings.hours_overrun_tolerance,
            warnings: collect_warnings(snapshot, goals),
        }
    }

    pub async fn portfolio(&self, query: &TileQuery) -> Result<PortfolioOverview, EngineError> {
        tracing::info!(statuses = ?query.statuses, sort = ?query.sort, order = ?query.order, "Portfolio requested");
        let goals = self.loaded_goals().await?;
        let snapshot = self.snapshot().await?;
        Ok(portfolio::build_portfolio(self.view_inputs(&snapshot, &goals), query))
    }

    pub async fn project_detail(&self, project_id: &str) -> Result<ProjectDetail, EngineError> {
        tracing::info!(project_id = %project_id, "Project detail requested");
        let goals = self.loaded_goals().await?;
        let snapshot = self.snapshot().await?;
        project_detail::build_project_detail(self.view_inputs(&snapshot, &goals), project_id)
    }

    pub async fn project_ids(&self) -> Result<Vec<String>, EngineError> {
        let goals = self.loaded_goals().await?;
        let snapshot = self.snapshot().await?;
        Ok(project_detail::project_ids(&self.view_inputs(&snapshot, &goals)))
    }

    pub async fn insights(&self, base: RevenueBase) -> Result<InsightsReport, EngineError> {
        tracing::info!(base = ?base, "Insights requested");
        let goals = self.loaded_goals().await?;
        let snapshot = self.snapshot().await?;
        Ok(insights::build_insights(self.view_inputs(&snapshot, &goals), base))
    }

    pub async fn goals_view(&self) -> Result<GoalsView, EngineError> {
        let goals = self.loaded_goals().await?;
        Ok(goals::build_goals_view(&goals))
    }

    /// Writes the goals through the store. The goals memo is cleared so the next
    /// view reads them back; a failed save leaves the memo untouched.
    /// Goals are checked the same way a load checks them, so negative or
    /// non-numeric goals never reach the store.
    pub async fn save_goals(&self, goals: GoalSet) -> Result<(), EngineError> {
        let goals = normalize_goal_set(goals.sales, goals.gross_margin, goals.admin_cost)?;
        let store = self.goal_store.clone();
        tokio::task::spawn_blocking(move || store.save(&goals))
            .await
            .map_err(|e| EngineError::ProcessingError(format!("goal save task failed: {}", e)))??;
        self.goals_memo.write().await.clear();
        tracing::info!(store = %self.goal_store.describe(), "Goals saved");
        Ok(())
    }

    /// Drops both memos; the next view fetches everything again.
    pub async fn refresh(&self) {
        self.table_memo.write().await.clear();
        self.goals_memo.write().await.clear();
        tracing::info!("Dashboard caches cleared");
    }
}
