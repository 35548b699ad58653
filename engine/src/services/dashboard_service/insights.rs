// Closed-project analysis and the internal cost panel.
use super::helpers::ViewInputs;
use crate::metrics::grouping::{cost_by_center, cost_by_nature, rank_by, segments};
use crate::metrics::portfolio::{admin_cost_total, cost_total, sold_total};
use crate::metrics::{ratio_pct, StatusSet};
use chrono::Utc;
use shared::models::{GoalSet, ProjectRecord, UNCLASSIFIED_SEGMENT};
use shared::reports::{ClosedSummary, InsightsReport, InternalCostPanel, RevenueBase};

fn closed_summary(closed: &[&ProjectRecord], goals: &GoalSet) -> Option<ClosedSummary> {
    if closed.is_empty() {
        return None;
    }
    let sold = sold_total(closed.iter().copied());
    let profit = sold - cost_total(closed.iter().copied());
    let margin_pct = ratio_pct(profit, sold);
    Some(ClosedSummary {
        sold_total: sold,
        profit_total: profit,
        margin_pct,
        margin_on_target: margin_pct >= goals.gross_margin,
        project_count: closed.len(),
    })
}

/// Overhead against the chosen revenue base.
pub fn internal_cost_panel(
    admin: &[&ProjectRecord],
    base: RevenueBase,
    base_total: f64,
    goals: &GoalSet,
) -> InternalCostPanel {
    let cost = admin_cost_total(admin.iter().copied());
    let allowed_budget = base_total * goals.admin_cost / 100.0;
    let overhead_pct = ratio_pct(cost, base_total);
    InternalCostPanel {
        base,
        base_total,
        cost_total: cost,
        allowed_budget,
        overhead_pct,
        within_goal: overhead_pct <= goals.admin_cost,
        balance: allowed_budget - cost,
        by_cost_center: cost_by_center(admin.iter().copied()),
        by_nature: cost_by_nature(admin.iter().copied()),
    }
}

pub fn build_insights(inputs: ViewInputs<'_>, base: RevenueBase) -> InsightsReport {
    let goals = *inputs.goals;
    let partition = inputs.partition();
    let closed = partition.sales_in(StatusSet::Closed);

    let all_unclassified = closed.iter().all(|r| r.segment == UNCLASSIFIED_SEGMENT);
    let segment_table = if closed.is_empty() || all_unclassified {
        None
    } else {
        Some(segments(closed.iter().copied()))
    };

    let internal_costs = if partition.admin.is_empty() {
        None
    } else {
        let base_total = match base {
            RevenueBase::Concluded => sold_total(closed.iter().copied()),
            // Rows with an unreadable status stay out of the total base.
            RevenueBase::Total => sold_total(partition.sales_in(StatusSet::Sellable)),
        };
        Some(internal_cost_panel(&partition.admin, base, base_total, &goals))
    };

    InsightsReport {
        generated_at: Utc::now(),
        goals,
        closed: closed_summary(&closed, &goals),
        client_location_ranking: rank_by(closed.iter().copied(), |r| Some(r.client_location())),
        client_ranking: rank_by(closed.iter().copied(), |r| Some(r.client.clone())),
        city_ranking: rank_by(closed.iter().copied(), |r| r.city.clone().filter(|c| !c.trim().is_empty())),
        segments: segment_table,
        internal_costs,
        warnings: inputs.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProjectStatus;

    fn closed(id: &str, client: &str, city: Option<&str>, sold: f64, cost: f64) -> ProjectRecord {
        ProjectRecord {
            status: Some(ProjectStatus::Finished),
            client: client.into(),
            city: city.map(str::to_string),
            sold,
            materials_actual: cost,
            ..ProjectRecord::new(id)
        }
    }

    fn fixture() -> Vec<ProjectRecord> {
        vec![
            closed("1001", "ACME", Some("Campinas"), 6000.0, 3000.0),
            closed("1002", "ACME", None, 2000.0, 1500.0),
            closed("1003", "Beta", Some("Campinas"), 2000.0, 1500.0),
            ProjectRecord {
                status: Some(ProjectStatus::InProgress),
                sold: 10_000.0,
                ..ProjectRecord::new("1004")
            },
            ProjectRecord {
                description: "Escritório".into(),
                labor_actual: 300.0,
                expenses_actual: 200.0,
                ..ProjectRecord::new("5009.1")
            },
        ]
    }

    fn inputs<'a>(records: &'a [ProjectRecord], goals: &'a GoalSet, prefixes: &'a [String]) -> ViewInputs<'a> {
        ViewInputs {
            records,
            goals,
            admin_prefixes: prefixes,
            hours_tolerance: 10.0,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_closed_summary_and_rankings() {
        let records = fixture();
        let goals = GoalSet::default();
        let prefixes = vec!["5009".to_string()];
        let report = build_insights(inputs(&records, &goals, &prefixes), RevenueBase::Concluded);

        let summary = report.closed.unwrap();
        assert_eq!(summary.sold_total, 10_000.0);
        assert_eq!(summary.profit_total, 4_000.0);
        assert_eq!(summary.margin_pct, 40.0);
        assert_eq!(summary.project_count, 3);

        let keys: Vec<_> = report.client_location_ranking.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ACME (Campinas)", "ACME", "Beta (Campinas)"]);
        assert_eq!(report.client_ranking[0].key, "ACME");
        assert_eq!(report.client_ranking[0].sold, 8_000.0);
        assert_eq!(report.city_ranking.len(), 1);
        assert_eq!(report.city_ranking[0].sold, 8_000.0);
    }

    #[test]
    fn test_segments_inactive_when_unclassified() {
        let records = fixture();
        let goals = GoalSet::default();
        let prefixes = vec!["5009".to_string()];
        let report = build_insights(inputs(&records, &goals, &prefixes), RevenueBase::Concluded);
        assert!(report.segments.is_none());

        let mut classified = fixture();
        classified[0].segment = "Industrial".into();
        let report = build_insights(inputs(&classified, &goals, &prefixes), RevenueBase::Concluded);
        let segments = report.segments.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].segment, "Industrial");
    }

    #[test]
    fn test_internal_cost_panel_by_base() {
        let records = fixture();
        let goals = GoalSet::default();
        let prefixes = vec!["5009".to_string()];

        let concluded = build_insights(inputs(&records, &goals, &prefixes), RevenueBase::Concluded)
            .internal_costs
            .unwrap();
        assert_eq!(concluded.base_total, 10_000.0);
        assert_eq!(concluded.cost_total, 500.0);
        assert_eq!(concluded.allowed_budget, 500.0);
        assert_eq!(concluded.overhead_pct, 5.0);
        assert!(concluded.within_goal);
        assert_eq!(concluded.balance, 0.0);
        assert_eq!(concluded.by_cost_center.len(), 1);
        assert_eq!(concluded.by_nature.len(), 2);

        let total = build_insights(inputs(&records, &goals, &prefixes), RevenueBase::Total)
            .internal_costs
            .unwrap();
        assert_eq!(total.base_total, 20_000.0);
        assert_eq!(total.overhead_pct, 2.5);
        assert_eq!(total.balance, 500.0);
    }

    #[test]
    fn test_no_closed_projects() {
        let records = vec![ProjectRecord {
            status: Some(ProjectStatus::NotStarted),
            ..ProjectRecord::new("1")
        }];
        let goals = GoalSet::default();
        let prefixes = vec!["5009".to_string()];
        let report = build_insights(inputs(&records, &goals, &prefixes), RevenueBase::Total);
        assert!(report.closed.is_none());
        assert!(report.client_ranking.is_empty());
        assert!(report.segments.is_none());
        assert!(report.internal_costs.is_none());
    }
}
