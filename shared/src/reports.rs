// View models handed to the presentation layer. Each dashboard view is a plain
// serializable struct; how they are drawn is not this crate's business.
use crate::models::{GoalSet, ProjectMetrics, ProjectRecord, ProjectStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Project,
    Sold,
    Margin,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Status filter and ordering for the project tiles of the portfolio view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileQuery {
    pub statuses: Vec<ProjectStatus>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for TileQuery {
    fn default() -> Self {
        TileQuery {
            statuses: ProjectStatus::ALL.to_vec(),
            sort: SortKey::Project,
            order: SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTile {
    pub project_id: String,
    pub description: String,
    pub client: String,
    pub city: Option<String>,
    pub status: Option<ProjectStatus>,
    pub sold: f64,
    pub margin_pct: f64,
    pub margin_below_goal: bool,
    pub hours_consumption_pct: f64,
    pub hours_over_budget: bool,
    pub materials_consumption_pct: f64,
    pub materials_over_budget: bool,
    pub completion_pct: f64,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub generated_at: DateTime<Utc>,
    pub goals: GoalSet,
    pub sold_total: f64,
    pub invoiced_total: f64,
    pub concluded_total: f64,
    /// Sold total as a share of the annual sales goal.
    pub sales_goal_pct: f64,
    pub concluded_goal_pct: f64,
    /// Concluded value as a share of the sold total.
    pub concluded_share_pct: f64,
    pub internal_cost_total: f64,
    pub overhead_pct: f64,
    pub overhead_above_goal: bool,
    pub total_margin_pct: f64,
    pub total_margin_on_target: bool,
    pub concluded_margin_pct: f64,
    pub concluded_margin_on_target: bool,
    pub net_margin_pct: f64,
    pub net_margin_on_target: bool,
    pub open_count: usize,
    pub total_count: usize,
    pub tiles: Vec<ProjectTile>,
    pub notice: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostCategory {
    Materials,
    Expenses,
    Labor,
}

/// Budgeted against actual spend for one cost category of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: CostCategory,
    pub budgeted: f64,
    pub actual: f64,
    pub consumption_pct: f64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositionItem {
    Sold,
    Taxes,
    Materials,
    Expenses,
    Labor,
    Profit,
}

/// One step of the sold-to-profit breakdown. Deductions carry negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub item: CompositionItem,
    pub amount: f64,
    pub pct_of_sold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub generated_at: DateTime<Utc>,
    pub goals: GoalSet,
    pub record: ProjectRecord,
    pub metrics: ProjectMetrics,
    pub margin_on_target: bool,
    pub cost_lines: Vec<CostLine>,
    pub composition: Vec<CompositionEntry>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueBase {
    /// Sold value of closed projects.
    Concluded,
    /// Sold value of every sellable project.
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedSummary {
    pub sold_total: f64,
    pub profit_total: f64,
    pub margin_pct: f64,
    pub margin_on_target: bool,
    pub project_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub key: String,
    pub sold: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub segment: String,
    pub sold: f64,
    pub profit: f64,
    pub project_count: usize,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub key: String,
    pub description: Option<String>,
    pub amount: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalCostPanel {
    pub base: RevenueBase,
    pub base_total: f64,
    pub cost_total: f64,
    pub allowed_budget: f64,
    pub overhead_pct: f64,
    pub within_goal: bool,
    /// Allowed budget minus spent; negative when over budget.
    pub balance: f64,
    pub by_cost_center: Vec<CostShare>,
    pub by_nature: Vec<CostShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub generated_at: DateTime<Utc>,
    pub goals: GoalSet,
    /// `None` when no project is closed yet.
    pub closed: Option<ClosedSummary>,
    pub client_location_ranking: Vec<RankingEntry>,
    pub client_ranking: Vec<RankingEntry>,
    pub city_ranking: Vec<RankingEntry>,
    /// `None` while every closed project is unclassified.
    pub segments: Option<Vec<SegmentEntry>>,
    /// `None` when the table has no internal cost-center rows.
    pub internal_costs: Option<InternalCostPanel>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsView {
    pub goals: GoalSet,
    pub net_margin_goal: f64,
    pub warning: Option<String>,
}
