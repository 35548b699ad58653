// Portfolio overview: headline figures and the project tiles.
use super::helpers::ViewInputs;
use crate::metrics::portfolio::{admin_cost_total, invoiced_total, net_margin, overhead_pct, portfolio_margin, sold_total};
use crate::metrics::{ratio_pct, StatusSet};
use chrono::Utc;
use shared::models::{ProjectMetrics, ProjectRecord};
use shared::reports::{PortfolioOverview, ProjectTile, SortKey, SortOrder, TileQuery};
use std::cmp::Ordering;

pub const EMPTY_SELECTION_NOTICE: &str = "Select at least one status to list projects.";

fn tile(record: &ProjectRecord, metrics: &ProjectMetrics, margin_goal: f64) -> ProjectTile {
    ProjectTile {
        project_id: record.project_id.clone(),
        description: record.description.clone(),
        client: record.client.clone(),
        city: record.city.clone(),
        status: record.status,
        sold: record.sold,
        margin_pct: metrics.margin_pct,
        margin_below_goal: metrics.margin_pct < margin_goal,
        hours_consumption_pct: metrics.hours_consumption_pct,
        hours_over_budget: metrics.hours_consumption_pct > 100.0,
        materials_consumption_pct: metrics.materials_consumption_pct,
        materials_over_budget: metrics.materials_consumption_pct > 100.0,
        completion_pct: record.completion_pct,
        critical: metrics.critical,
    }
}

// Numeric identifiers compare as numbers so "999" sorts before "1001".
fn compare_project_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

fn compare_tiles(a: &ProjectTile, b: &ProjectTile, key: SortKey) -> Ordering {
    match key {
        SortKey::Project => compare_project_ids(&a.project_id, &b.project_id),
        SortKey::Sold => a.sold.total_cmp(&b.sold),
        SortKey::Margin => a.margin_pct.total_cmp(&b.margin_pct),
        SortKey::Progress => a.completion_pct.total_cmp(&b.completion_pct),
    }
}

/// Tiles for the sales projects whose status is selected, in the requested order.
pub fn build_tiles(inputs: &ViewInputs<'_>, query: &TileQuery) -> Vec<ProjectTile> {
    let deriver = inputs.deriver();
    let mut tiles: Vec<ProjectTile> = inputs
        .partition()
        .sales
        .into_iter()
        .filter(|record| record.status.map_or(false, |s| query.statuses.contains(&s)))
        .map(|record| tile(record, &deriver.derive(record), deriver.margin_goal()))
        .collect();

    tiles.sort_by(|a, b| {
        let ordering = compare_tiles(a, b, query.sort);
        match query.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    tiles
}

/// Builds the headline figures and the filtered tiles.
/// Sold, margin and net figures cover projects with a recognized status; rows
/// whose status could not be read only count toward invoiced and project totals.
pub fn build_portfolio(inputs: ViewInputs<'_>, query: &TileQuery) -> PortfolioOverview {
    let goals = *inputs.goals;
    let partition = inputs.partition();
    let sellable = partition.sales_in(StatusSet::Sellable);
    let closed = partition.sales_in(StatusSet::Closed);
    let open_count = partition.sales_in(StatusSet::Open).len();

    let sold = sold_total(sellable.iter().copied());
    let concluded = sold_total(closed.iter().copied());
    let internal_cost = admin_cost_total(partition.admin.iter().copied());
    let overhead = overhead_pct(partition.admin.iter().copied(), sold);
    let total_margin = portfolio_margin(sellable.iter().copied());
    let concluded_margin = portfolio_margin(closed.iter().copied());
    let net = net_margin(sellable.iter().copied(), partition.admin.iter().copied());

    let (tiles, notice) = if query.statuses.is_empty() {
        (Vec::new(), Some(EMPTY_SELECTION_NOTICE.to_string()))
    } else {
        (build_tiles(&inputs, query), None)
    };

    PortfolioOverview {
        generated_at: Utc::now(),
        goals,
        sold_total: sold,
        invoiced_total: invoiced_total(partition.sales.iter().copied()),
        concluded_total: concluded,
        sales_goal_pct: ratio_pct(sold, goals.sales),
        concluded_goal_pct: ratio_pct(concluded, goals.sales),
        concluded_share_pct: ratio_pct(concluded, sold),
        internal_cost_total: internal_cost,
        overhead_pct: overhead,
        overhead_above_goal: overhead > goals.admin_cost,
        total_margin_pct: total_margin,
        total_margin_on_target: total_margin >= goals.gross_margin,
        concluded_margin_pct: concluded_margin,
        concluded_margin_on_target: concluded_margin >= goals.gross_margin,
        net_margin_pct: net,
        net_margin_on_target: net >= goals.net_margin(),
        open_count,
        total_count: partition.sales.len(),
        tiles,
        notice,
        warnings: inputs.warnings,
    }
}
