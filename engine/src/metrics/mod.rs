// Financial metrics derived from normalized project records.
pub mod grouping;
pub mod portfolio;
pub mod project;

use shared::models::{ProjectRecord, ProjectStatus};

/// Identifier prefixes of the internal cost centers.
pub const ADMIN_PREFIXES: [&str; 3] = ["5009", "5010", "5011"];

/// Status subsets the aggregates operate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSet {
    /// Finished or presented.
    Closed,
    /// Not started or in progress.
    Open,
    /// Any of the four known statuses.
    Sellable,
}

impl StatusSet {
    pub fn statuses(&self) -> &'static [ProjectStatus] {
        match self {
            StatusSet::Closed => &[ProjectStatus::Finished, ProjectStatus::Presented],
            StatusSet::Open => &[ProjectStatus::NotStarted, ProjectStatus::InProgress],
            StatusSet::Sellable => &ProjectStatus::ALL,
        }
    }

    /// Records without a recognized status belong to no set.
    pub fn contains(&self, status: Option<ProjectStatus>) -> bool {
        status.map_or(false, |s| self.statuses().contains(&s))
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive.
/// Never returns NaN or infinity.
pub fn ratio_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    let pct = numerator / denominator * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

pub fn is_admin_record<S: AsRef<str>>(project_id: &str, prefixes: &[S]) -> bool {
    let id = project_id.trim();
    prefixes.iter().any(|prefix| id.starts_with(prefix.as_ref()))
}

/// Records split into internal cost centers and sales projects. Aggregates never
/// mix the two halves.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    pub admin: Vec<&'a ProjectRecord>,
    pub sales: Vec<&'a ProjectRecord>,
}

impl<'a> Partition<'a> {
    pub fn split<S: AsRef<str>>(records: &'a [ProjectRecord], prefixes: &[S]) -> Self {
        let (admin, sales): (Vec<_>, Vec<_>) = records
            .iter()
            .partition(|record| is_admin_record(&record.project_id, prefixes));
        Partition { admin, sales }
    }

    pub fn sales_in(&self, set: StatusSet) -> Vec<&'a ProjectRecord> {
        self.sales
            .iter()
            .copied()
            .filter(|record| set.contains(record.status))
            .collect()
    }
}
