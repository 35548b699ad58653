// Per-project metrics: cost, profit, margin, consumption and the critical flag.
use super::ratio_pct;
use shared::models::{GoalSet, HoursEfficiency, ProjectMetrics, ProjectRecord, ProjectStatus};
use shared::reports::{CompositionEntry, CompositionItem, CostCategory, CostLine};

/// Percentage points that hour consumption may run ahead of physical progress.
pub const HOURS_OVERRUN_TOLERANCE: f64 = 10.0;

/// Realized cost of a sales project: materials, expenses, labor and taxes.
pub fn total_cost(record: &ProjectRecord) -> f64 {
    record.materials_actual + record.expenses_actual + record.labor_actual + record.taxes
}

/// Cost of an internal cost-center row. Cost centers carry no tax line, so taxes
/// stay out of this sum.
pub fn admin_cost(record: &ProjectRecord) -> f64 {
    record.materials_actual + record.expenses_actual + record.labor_actual
}

pub fn hours_efficiency(hours_consumption_pct: f64, completion_pct: f64, tolerance: f64) -> HoursEfficiency {
    if hours_consumption_pct > completion_pct + tolerance {
        HoursEfficiency::Low
    } else if hours_consumption_pct < completion_pct {
        HoursEfficiency::High
    } else {
        HoursEfficiency::Balanced
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDeriver {
    margin_goal: f64,
    hours_tolerance: f64,
}

impl MetricDeriver {
    pub fn new(goals: &GoalSet) -> Self {
        MetricDeriver {
            margin_goal: goals.gross_margin,
            hours_tolerance: HOURS_OVERRUN_TOLERANCE,
        }
    }

    pub fn with_hours_tolerance(mut self, tolerance: f64) -> Self {
        self.hours_tolerance = tolerance;
        self
    }

    pub fn margin_goal(&self) -> f64 {
        self.margin_goal
    }

    pub fn derive(&self, record: &ProjectRecord) -> ProjectMetrics {
        let total_cost = total_cost(record);
        let profit = record.sold - total_cost;
        let margin_pct = ratio_pct(profit, record.sold);
        let hours_consumption_pct = ratio_pct(record.labor_hours_actual, record.labor_hours_budgeted);

        let below_margin = margin_pct < self.margin_goal && record.status != Some(ProjectStatus::Presented);
        let hours_overrun = hours_consumption_pct > record.completion_pct + self.hours_tolerance;

        ProjectMetrics {
            total_cost,
            profit,
            margin_pct,
            hours_consumption_pct,
            materials_consumption_pct: ratio_pct(record.materials_actual, record.materials_budgeted),
            expenses_consumption_pct: ratio_pct(record.expenses_actual, record.expenses_budgeted),
            labor_value_consumption_pct: ratio_pct(record.labor_actual, record.labor_budgeted),
            hours_balance: record.labor_hours_budgeted - record.labor_hours_actual,
            efficiency: hours_efficiency(hours_consumption_pct, record.completion_pct, self.hours_tolerance),
            critical: below_margin || hours_overrun,
        }
    }
}

/// Budgeted against actual for materials, expenses and labor value.
pub fn cost_lines(record: &ProjectRecord) -> Vec<CostLine> {
    [
        (CostCategory::Materials, record.materials_budgeted, record.materials_actual),
        (CostCategory::Expenses, record.expenses_budgeted, record.expenses_actual),
        (CostCategory::Labor, record.labor_budgeted, record.labor_actual),
    ]
    .into_iter()
    .map(|(category, budgeted, actual)| {
        let consumption_pct = ratio_pct(actual, budgeted);
        CostLine {
            category,
            budgeted,
            actual,
            consumption_pct,
            over_budget: consumption_pct > 100.0,
        }
    })
    .collect()
}

/// Sold value broken down into deductions and the remaining profit, in money and
/// as a share of the sold value. With nothing sold the shares use a base of 1.
pub fn composition(record: &ProjectRecord) -> Vec<CompositionEntry> {
    let base = if record.sold > 0.0 { record.sold } else { 1.0 };
    let profit = record.sold - total_cost(record);
    [
        (CompositionItem::Sold, record.sold),
        (CompositionItem::Taxes, -record.taxes),
        (CompositionItem::Materials, -record.materials_actual),
        (CompositionItem::Expenses, -record.expenses_actual),
        (CompositionItem::Labor, -record.labor_actual),
        (CompositionItem::Profit, profit),
    ]
    .into_iter()
    .map(|(item, amount)| CompositionEntry {
        item,
        amount,
        pct_of_sold: amount / base * 100.0,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(sold: f64, cost_each: f64, status: ProjectStatus) -> ProjectRecord {
        ProjectRecord {
            sold,
            materials_actual: cost_each,
            expenses_actual: cost_each,
            labor_actual: cost_each,
            taxes: cost_each,
            status: Some(status),
            ..ProjectRecord::new("1001")
        }
    }

    #[test]
    fn test_margin_calculation() {
        let record = project(1000.0, 175.0, ProjectStatus::Finished);
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert_eq!(metrics.total_cost, 700.0);
        assert_eq!(metrics.profit, 300.0);
        assert_eq!(metrics.margin_pct, 30.0);
    }

    #[test]
    fn test_zero_sold_has_zero_margin() {
        let record = project(0.0, 10.0, ProjectStatus::InProgress);
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert_eq!(metrics.margin_pct, 0.0);
        assert!(metrics.margin_pct.is_finite());
    }

    #[test]
    fn test_critical_when_margin_below_goal() {
        let record = project(1000.0, 200.0, ProjectStatus::InProgress); // 20% margin
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert!(metrics.critical);
    }

    #[test]
    fn test_presented_project_with_low_margin_is_not_critical() {
        let record = project(1000.0, 200.0, ProjectStatus::Presented);
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert!(!metrics.critical);
    }

    #[test]
    fn test_hours_overrun_makes_presented_project_critical() {
        let record = ProjectRecord {
            labor_hours_budgeted: 100.0,
            labor_hours_actual: 80.0,
            completion_pct: 50.0,
            ..project(1000.0, 200.0, ProjectStatus::Presented)
        };
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert_eq!(metrics.hours_consumption_pct, 80.0);
        assert_eq!(metrics.efficiency, HoursEfficiency::Low);
        assert_eq!(metrics.hours_balance, 20.0);
        assert!(metrics.critical);
    }

    #[test]
    fn test_hours_within_tolerance() {
        let record = ProjectRecord {
            labor_hours_budgeted: 100.0,
            labor_hours_actual: 55.0,
            completion_pct: 50.0,
            ..project(1000.0, 100.0, ProjectStatus::InProgress)
        };
        let deriver = MetricDeriver::new(&GoalSet::default());
        let metrics = deriver.derive(&record);
        assert!(!metrics.critical);
        assert_eq!(metrics.efficiency, HoursEfficiency::Balanced);

        let strict = deriver.with_hours_tolerance(0.0).derive(&record);
        assert!(strict.critical);
    }

    #[test]
    fn test_hours_efficiency_bands() {
        assert_eq!(hours_efficiency(40.0, 50.0, 10.0), HoursEfficiency::High);
        assert_eq!(hours_efficiency(60.0, 50.0, 10.0), HoursEfficiency::Balanced);
        assert_eq!(hours_efficiency(60.5, 50.0, 10.0), HoursEfficiency::Low);
    }

    #[test]
    fn test_consumption_ratios_guard_zero_budget() {
        let record = ProjectRecord {
            materials_budgeted: 0.0,
            materials_actual: 50.0,
            ..ProjectRecord::new("2002")
        };
        let metrics = MetricDeriver::new(&GoalSet::default()).derive(&record);
        assert_eq!(metrics.materials_consumption_pct, 0.0);
        assert_eq!(metrics.hours_consumption_pct, 0.0);
    }

    #[test]
    fn test_admin_cost_excludes_taxes() {
        let record = project(0.0, 100.0, ProjectStatus::InProgress);
        assert_eq!(admin_cost(&record), 300.0);
        assert_eq!(total_cost(&record), 400.0);
    }

    #[test]
    fn test_cost_lines_flag_overruns() {
        let record = ProjectRecord {
            materials_budgeted: 100.0,
            materials_actual: 120.0,
            expenses_budgeted: 100.0,
            expenses_actual: 40.0,
            ..ProjectRecord::new("3003")
        };
        let lines = cost_lines(&record);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].category, CostCategory::Materials);
        assert!(lines[0].over_budget);
        assert!(!lines[1].over_budget);
        assert_eq!(lines[2].consumption_pct, 0.0);
    }

    #[test]
    fn test_composition_sums_to_profit() {
        let record = project(1000.0, 100.0, ProjectStatus::Finished);
        let entries = composition(&record);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].pct_of_sold, 100.0);
        let profit = entries.last().unwrap();
        assert_eq!(profit.item, CompositionItem::Profit);
        assert_eq!(profit.amount, 600.0);
        assert_eq!(profit.pct_of_sold, 60.0);
        let deductions: f64 = entries[1..5].iter().map(|e| e.amount).sum();
        assert_eq!(entries[0].amount + deductions, profit.amount);
    }
}
