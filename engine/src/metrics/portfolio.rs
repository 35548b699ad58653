// Aggregates over sets of records. Callers pick the status set and pass the
// matching records; none of these look at status themselves.
use super::project::{admin_cost, total_cost};
use super::ratio_pct;
use shared::models::ProjectRecord;

pub fn sold_total<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    records.into_iter().map(|r| r.sold).sum()
}

pub fn invoiced_total<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    records.into_iter().map(|r| r.invoiced).sum()
}

pub fn cost_total<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    records.into_iter().map(total_cost).sum()
}

/// Weighted margin: (Σ sold − Σ total cost) / Σ sold × 100, 0 when nothing is sold.
pub fn portfolio_margin<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let (sold, cost) = records
        .into_iter()
        .fold((0.0, 0.0), |(sold, cost), r| (sold + r.sold, cost + total_cost(r)));
    ratio_pct(sold - cost, sold)
}

/// Σ (materials + expenses + labor) over internal cost-center rows. No taxes.
pub fn admin_cost_total<'a, I>(admin_records: I) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    admin_records.into_iter().map(admin_cost).sum()
}

/// Internal cost as a percentage of the given sold total.
pub fn overhead_pct<'a, I>(admin_records: I, sold_total: f64) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    ratio_pct(admin_cost_total(admin_records), sold_total)
}

/// Margin left after internal costs: (Σ sold − Σ cost − admin cost) / Σ sold × 100.
pub fn net_margin<'a, I, J>(sales_records: I, admin_records: J) -> f64
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    J: IntoIterator<Item = &'a ProjectRecord>,
{
    let (sold, cost) = sales_records
        .into_iter()
        .fold((0.0, 0.0), |(sold, cost), r| (sold + r.sold, cost + total_cost(r)));
    ratio_pct(sold - cost - admin_cost_total(admin_records), sold)
}
