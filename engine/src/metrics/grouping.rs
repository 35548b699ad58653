// Group-by aggregations behind the rankings, the segment table and the internal
// cost breakdowns.
use super::project::{admin_cost, total_cost};
use super::ratio_pct;
use shared::models::ProjectRecord;
use shared::reports::{CostShare, RankingEntry, SegmentEntry};
use std::collections::BTreeMap;

#[derive(Default)]
struct GroupTotals {
    sold: f64,
    profit: f64,
    count: usize,
}

fn group<'a, I, F>(records: I, key: F) -> BTreeMap<String, GroupTotals>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    F: Fn(&ProjectRecord) -> Option<String>,
{
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for record in records {
        // Records without a key are left out, like blank cities.
        let Some(k) = key(record) else { continue };
        let totals = groups.entry(k).or_default();
        totals.sold += record.sold;
        totals.profit += record.sold - total_cost(record);
        totals.count += 1;
    }
    groups
}

/// Sold, profit and margin per key, largest sold value first.
pub fn rank_by<'a, I, F>(records: I, key: F) -> Vec<RankingEntry>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
    F: Fn(&ProjectRecord) -> Option<String>,
{
    let mut ranking: Vec<RankingEntry> = group(records, key)
        .into_iter()
        .map(|(key, totals)| RankingEntry {
            key,
            sold: totals.sold,
            profit: totals.profit,
            margin_pct: ratio_pct(totals.profit, totals.sold),
        })
        .collect();
    ranking.sort_by(|a, b| b.sold.total_cmp(&a.sold).then_with(|| a.key.cmp(&b.key)));
    ranking
}

/// Per-segment totals, largest sold value first.
pub fn segments<'a, I>(records: I) -> Vec<SegmentEntry>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let mut entries: Vec<SegmentEntry> = group(records, |r| Some(r.segment.clone()))
        .into_iter()
        .map(|(segment, totals)| SegmentEntry {
            segment,
            sold: totals.sold,
            profit: totals.profit,
            project_count: totals.count,
            margin_pct: ratio_pct(totals.profit, totals.sold),
        })
        .collect();
    entries.sort_by(|a, b| b.sold.total_cmp(&a.sold).then_with(|| a.segment.cmp(&b.segment)));
    entries
}

fn with_shares(mut shares: Vec<CostShare>) -> Vec<CostShare> {
    let total: f64 = shares.iter().map(|s| s.amount).sum();
    for share in &mut shares {
        share.share_pct = ratio_pct(share.amount, total);
    }
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.key.cmp(&b.key)));
    shares
}

/// Internal cost per cost center (project identifier), keeping the first
/// description seen for each.
pub fn cost_by_center<'a, I>(admin_records: I) -> Vec<CostShare>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let mut centers: BTreeMap<String, CostShare> = BTreeMap::new();
    for record in admin_records {
        let entry = centers.entry(record.project_id.clone()).or_insert_with(|| CostShare {
            key: record.project_id.clone(),
            description: Some(record.description.clone()).filter(|d| !d.is_empty()),
            amount: 0.0,
            share_pct: 0.0,
        });
        entry.amount += admin_cost(record);
    }
    with_shares(centers.into_values().collect())
}

/// Internal cost per nature of spend. Natures with nothing spent are dropped.
pub fn cost_by_nature<'a, I>(admin_records: I) -> Vec<CostShare>
where
    I: IntoIterator<Item = &'a ProjectRecord>,
{
    let (labor, expenses, materials) = admin_records.into_iter().fold((0.0, 0.0, 0.0), |acc, r| {
        (acc.0 + r.labor_actual, acc.1 + r.expenses_actual, acc.2 + r.materials_actual)
    });
    let shares = [("Pessoal", labor), ("Despesas", expenses), ("Materiais", materials)]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(key, amount)| CostShare {
            key: key.to_string(),
            description: None,
            amount,
            share_pct: 0.0,
        })
        .collect();
    with_shares(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(id: &str, client: &str, city: Option<&str>, sold: f64, cost: f64) -> ProjectRecord {
        ProjectRecord {
            client: client.to_string(),
            city: city.map(str::to_string),
            sold,
            materials_actual: cost,
            ..ProjectRecord::new(id)
        }
    }

    #[test]
    fn test_rank_by_client_orders_by_sold() {
        let records = vec![
            closed("1", "ACME", Some("Campinas"), 1000.0, 800.0),
            closed("2", "Beta", None, 5000.0, 4000.0),
            closed("3", "ACME", Some("Jundiaí"), 3000.0, 2000.0),
        ];
        let ranking = rank_by(&records, |r| Some(r.client.clone()));
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].key, "Beta");
        assert_eq!(ranking[1].key, "ACME");
        assert_eq!(ranking[1].sold, 4000.0);
        assert_eq!(ranking[1].profit, 1200.0);
        assert_eq!(ranking[1].margin_pct, 30.0);
    }

    #[test]
    fn test_rank_by_city_skips_blank_cities() {
        let records = vec![
            closed("1", "ACME", Some("Campinas"), 1000.0, 800.0),
            closed("2", "Beta", None, 5000.0, 4000.0),
        ];
        let ranking = rank_by(&records, |r| r.city.clone());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].key, "Campinas");
    }

    #[test]
    fn test_segments_count_projects() {
        let mut a = closed("1", "ACME", None, 1000.0, 500.0);
        a.segment = "Industrial".into();
        let mut b = closed("2", "Beta", None, 1000.0, 900.0);
        b.segment = "Industrial".into();
        let c = closed("3", "Gama", None, 500.0, 100.0);
        let entries = segments(&[a, b, c]);
        assert_eq!(entries[0].segment, "Industrial");
        assert_eq!(entries[0].project_count, 2);
        assert_eq!(entries[0].margin_pct, 30.0);
        assert_eq!(entries[1].project_count, 1);
    }

    #[test]
    fn test_cost_by_center_and_nature() {
        let admin = vec![
            ProjectRecord {
                description: "Administrativo".into(),
                labor_actual: 300.0,
                expenses_actual: 100.0,
                taxes: 999.0,
                ..ProjectRecord::new("5009.2025")
            },
            ProjectRecord {
                materials_actual: 100.0,
                ..ProjectRecord::new("5010.2025")
            },
        ];
        let centers = cost_by_center(&admin);
        assert_eq!(centers[0].key, "5009.2025");
        assert_eq!(centers[0].amount, 400.0);
        assert_eq!(centers[0].description.as_deref(), Some("Administrativo"));
        assert_eq!(centers[0].share_pct, 80.0);
        assert_eq!(centers[1].description, None);

        let natures = cost_by_nature(&admin);
        let keys: Vec<_> = natures.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["Pessoal", "Despesas", "Materiais"]);
        assert_eq!(natures[0].share_pct, 60.0);
    }

    #[test]
    fn test_cost_by_nature_drops_empty_natures() {
        let admin = vec![ProjectRecord {
            expenses_actual: 10.0,
            ..ProjectRecord::new("5011")
        }];
        let natures = cost_by_nature(&admin);
        assert_eq!(natures.len(), 1);
        assert_eq!(natures[0].key, "Despesas");
        assert_eq!(natures[0].share_pct, 100.0);
    }
}
