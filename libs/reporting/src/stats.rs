//! Statistics engine behind the dashboard and analytics views
//!
//! Every function here is a pure computation over an in-memory snapshot of
//! records plus, for the monthly trends, an explicit reference time. Rates
//! are percentages in `[0, 100]`; a rate whose denominator is zero is `0`.
//! Missing optional amounts (`cost`, `reduction_target_mwh`) count as zero.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::models::{
    ComplianceStatus, DisposalMethod, EnergyRecord, EnergyType, WasteRecord, WasteType,
};

/// Number of sites kept in the per-site rankings
pub const TOP_SITES: usize = 10;
/// Number of records kept in the dashboard's recent activity lists
pub const RECENT_RECORDS: usize = 5;
/// Length of the trailing window covered by monthly trends
pub const TREND_MONTHS: u32 = 12;

/// `numerator / denominator * 100`, or `0` when the denominator is not positive
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Energy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyStats {
    pub overview: EnergyOverview,
    pub by_type: Vec<EnergyTypeTotals>,
    pub by_site: Vec<EnergySiteTotals>,
    pub reduction_targets: ReductionTargets,
    pub monthly_trend: Vec<EnergyMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyOverview {
    pub total_consumption: f64,
    pub total_cost: f64,
    pub total_records: usize,
    pub average_cost_per_mwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTypeTotals {
    pub energy_type: EnergyType,
    pub consumption: f64,
    pub cost: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySiteTotals {
    pub site_name: String,
    pub consumption: f64,
    pub cost: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionTargets {
    pub total_with_targets: usize,
    pub total_target: f64,
    pub total_consumption: f64,
    pub targets_met: usize,
    pub achievement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyMonth {
    pub month: NaiveDate,
    pub consumption: f64,
    pub cost: f64,
}

/// Sum of a group: the ranking amount, the secondary amount, and a count
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    amount: f64,
    cost: f64,
    count: usize,
}

/// Group in first-encountered order
fn group_by<T, K, F, A>(records: &[T], key: F, amounts: A) -> Vec<(K, Totals)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
    A: Fn(&T) -> (f64, f64),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Totals)> = Vec::new();

    for record in records {
        let key = key(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Totals::default()));
            groups.len() - 1
        });

        let (amount, cost) = amounts(record);
        let totals = &mut groups[slot].1;
        totals.amount += amount;
        totals.cost += cost;
        totals.count += 1;
    }

    groups
}

/// Order groups by descending amount; ties keep first-encountered order
fn ranked<K>(mut groups: Vec<(K, Totals)>) -> Vec<(K, Totals)> {
    groups.sort_by(|a, b| b.1.amount.partial_cmp(&a.1.amount).unwrap_or(Ordering::Equal));
    groups
}

/// Start of the trailing trend window ending at `now`
pub fn trend_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(TREND_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn in_trend_window(period_start: NaiveDate, window_start: DateTime<Utc>) -> bool {
    period_start.and_time(NaiveTime::MIN).and_utc() >= window_start
}

fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn first_of_month((year, month): (i32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Monthly buckets of records in the trailing window, oldest month first
fn monthly<T, D, A>(
    records: &[T],
    now: DateTime<Utc>,
    date: D,
    amounts: A,
) -> Vec<(NaiveDate, Totals)>
where
    D: Fn(&T) -> NaiveDate,
    A: Fn(&T) -> (f64, f64),
{
    let window_start = trend_window_start(now);
    let recent: Vec<&T> = records
        .iter()
        .filter(|r| in_trend_window(date(*r), window_start))
        .collect();

    let mut months: Vec<(NaiveDate, Totals)> =
        group_by(&recent, |r| month_of(date(*r)), |r| amounts(*r))
            .into_iter()
            .filter_map(|(key, totals)| first_of_month(key).map(|month| (month, totals)))
            .collect();

    months.sort_by_key(|(month, _)| *month);
    months
}

/// Compute the energy analytics view
pub fn energy_stats(records: &[EnergyRecord], now: DateTime<Utc>) -> EnergyStats {
    let cost = |r: &EnergyRecord| r.cost.unwrap_or(0.0);
    let amounts = |r: &EnergyRecord| (r.consumption_mwh, cost(r));

    let total_consumption: f64 = records.iter().map(|r| r.consumption_mwh).sum();
    let total_cost: f64 = records.iter().map(cost).sum();

    let overview = EnergyOverview {
        total_consumption,
        total_cost,
        total_records: records.len(),
        average_cost_per_mwh: if total_consumption > 0.0 {
            total_cost / total_consumption
        } else {
            0.0
        },
    };

    let by_type = ranked(group_by(records, |r| r.energy_type, amounts))
        .into_iter()
        .map(|(energy_type, t)| EnergyTypeTotals {
            energy_type,
            consumption: t.amount,
            cost: t.cost,
            count: t.count,
        })
        .collect();

    let by_site = ranked(group_by(records, |r| r.site_name.clone(), amounts))
        .into_iter()
        .take(TOP_SITES)
        .map(|(site_name, t)| EnergySiteTotals {
            site_name,
            consumption: t.amount,
            cost: t.cost,
            count: t.count,
        })
        .collect();

    let monthly_trend = monthly(records, now, |r| r.reporting_period_start, amounts)
        .into_iter()
        .map(|(month, t)| EnergyMonth {
            month,
            consumption: t.amount,
            cost: t.cost,
        })
        .collect();

    EnergyStats {
        overview,
        by_type,
        by_site,
        reduction_targets: reduction_targets(records),
        monthly_trend,
    }
}

/// Target-versus-actual summary over records carrying a positive target
pub fn reduction_targets(records: &[EnergyRecord]) -> ReductionTargets {
    let targeted: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| match r.reduction_target_mwh {
            Some(target) if target > 0.0 => Some((target, r.consumption_mwh)),
            _ => None,
        })
        .collect();

    let total_with_targets = targeted.len();
    let targets_met = targeted
        .iter()
        .filter(|(target, consumption)| consumption <= target)
        .count();

    ReductionTargets {
        total_with_targets,
        total_target: targeted.iter().map(|(target, _)| target).sum(),
        total_consumption: targeted.iter().map(|(_, consumption)| consumption).sum(),
        targets_met,
        achievement_rate: percentage(targets_met as f64, total_with_targets as f64),
    }
}

/// How far actual consumption landed under (or over) a single target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionAchievement {
    pub reduction: f64,
    /// Rounded to one decimal place
    pub percentage: f64,
    pub achieved: bool,
}

/// Per-record achievement against a reduction target; `None` without a target
pub fn reduction_achievement(target: f64, actual: f64) -> Option<ReductionAchievement> {
    if target == 0.0 {
        return None;
    }

    let reduction = target - actual;
    Some(ReductionAchievement {
        reduction,
        percentage: round1(reduction / target * 100.0),
        achieved: reduction >= 0.0,
    })
}

// ---------------------------------------------------------------------------
// Waste
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteStats {
    pub overview: WasteOverview,
    pub by_type: Vec<WasteTypeTotals>,
    pub by_disposal_method: Vec<DisposalMethodTotals>,
    pub compliance: Vec<ComplianceCount>,
    pub by_site: Vec<WasteSiteTotals>,
    pub monthly_trend: Vec<WasteMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteOverview {
    pub total_quantity: f64,
    pub total_records: usize,
    pub compliance_rate: f64,
    pub diversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteTypeTotals {
    pub waste_type: WasteType,
    pub quantity: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalMethodTotals {
    pub disposal_method: DisposalMethod,
    pub quantity: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCount {
    pub status: ComplianceStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteSiteTotals {
    pub site_name: String,
    pub quantity: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteMonth {
    pub month: NaiveDate,
    pub quantity: f64,
}

/// Share of records marked compliant, as a percentage
pub fn compliance_rate(records: &[WasteRecord]) -> f64 {
    let compliant = records
        .iter()
        .filter(|r| r.regulatory_compliance == ComplianceStatus::Compliant)
        .count();
    percentage(compliant as f64, records.len() as f64)
}

/// Share of waste quantity recycled or composted, as a percentage
pub fn diversion_rate(records: &[WasteRecord]) -> f64 {
    let total: f64 = records.iter().map(|r| r.quantity_tons).sum();
    let diverted: f64 = records
        .iter()
        .filter(|r| r.disposal_method.is_diversion())
        .map(|r| r.quantity_tons)
        .sum();
    percentage(diverted, total)
}

/// Diversion rate from pre-summed quantities, rounded to one decimal place
pub fn waste_diversion_rate(recycled: f64, composted: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round1(percentage(recycled + composted, total))
}

/// Compute the waste analytics view
pub fn waste_stats(records: &[WasteRecord], now: DateTime<Utc>) -> WasteStats {
    let amounts = |r: &WasteRecord| (r.quantity_tons, 0.0);

    let overview = WasteOverview {
        total_quantity: records.iter().map(|r| r.quantity_tons).sum(),
        total_records: records.len(),
        compliance_rate: compliance_rate(records),
        diversion_rate: diversion_rate(records),
    };

    let by_type = ranked(group_by(records, |r| r.waste_type, amounts))
        .into_iter()
        .map(|(waste_type, t)| WasteTypeTotals {
            waste_type,
            quantity: t.amount,
            count: t.count,
        })
        .collect();

    let by_disposal_method = ranked(group_by(records, |r| r.disposal_method, amounts))
        .into_iter()
        .map(|(disposal_method, t)| DisposalMethodTotals {
            disposal_method,
            quantity: t.amount,
            count: t.count,
        })
        .collect();

    let compliance = group_by(records, |r| r.regulatory_compliance, amounts)
        .into_iter()
        .map(|(status, t)| ComplianceCount {
            status,
            count: t.count,
        })
        .collect();

    let by_site = ranked(group_by(records, |r| r.site_name.clone(), amounts))
        .into_iter()
        .take(TOP_SITES)
        .map(|(site_name, t)| WasteSiteTotals {
            site_name,
            quantity: t.amount,
            count: t.count,
        })
        .collect();

    let monthly_trend = monthly(records, now, |r| r.reporting_period_start, amounts)
        .into_iter()
        .map(|(month, t)| WasteMonth {
            month,
            quantity: t.amount,
        })
        .collect();

    WasteStats {
        overview,
        by_type,
        by_disposal_method,
        compliance,
        by_site,
        monthly_trend,
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub energy: EnergySummary,
    pub waste: WasteSummary,
    pub sites: SiteSummary,
    pub recent_energy: Vec<RecentEnergy>,
    pub recent_waste: Vec<RecentWaste>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub total_consumption: f64,
    pub total_cost: f64,
    pub total_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteSummary {
    pub total_quantity: f64,
    pub total_records: usize,
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub total_sites: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEnergy {
    /// Display ID of the record
    pub id: String,
    pub site_name: String,
    pub consumption: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWaste {
    /// Display ID of the record
    pub id: String,
    pub site_name: String,
    pub quantity: f64,
    pub compliance: ComplianceStatus,
    pub created_at: DateTime<Utc>,
}

/// The newest `n` records, newest first
fn most_recent<T>(records: &[T], created_at: impl Fn(&T) -> DateTime<Utc>, n: usize) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted.truncate(n);
    sorted
}

/// Compute the organization-wide dashboard summary
pub fn dashboard_summary(energy: &[EnergyRecord], waste: &[WasteRecord]) -> DashboardSummary {
    let sites: HashSet<&str> = energy
        .iter()
        .map(|r| r.site_name.as_str())
        .chain(waste.iter().map(|r| r.site_name.as_str()))
        .collect();

    let recent_energy = most_recent(energy, |r| r.created_at, RECENT_RECORDS)
        .into_iter()
        .map(|r| RecentEnergy {
            id: r.display_id.clone(),
            site_name: r.site_name.clone(),
            consumption: r.consumption_mwh,
            created_at: r.created_at,
        })
        .collect();

    let recent_waste = most_recent(waste, |r| r.created_at, RECENT_RECORDS)
        .into_iter()
        .map(|r| RecentWaste {
            id: r.display_id.clone(),
            site_name: r.site_name.clone(),
            quantity: r.quantity_tons,
            compliance: r.regulatory_compliance,
            created_at: r.created_at,
        })
        .collect();

    DashboardSummary {
        energy: EnergySummary {
            total_consumption: energy.iter().map(|r| r.consumption_mwh).sum(),
            total_cost: energy.iter().map(|r| r.cost.unwrap_or(0.0)).sum(),
            total_records: energy.len(),
        },
        waste: WasteSummary {
            total_quantity: waste.iter().map(|r| r.quantity_tons).sum(),
            total_records: waste.len(),
            compliance_rate: compliance_rate(waste),
        },
        sites: SiteSummary {
            total_sites: sites.len(),
        },
        recent_energy,
        recent_waste,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn energy(site: &str, energy_type: EnergyType, consumption: f64) -> EnergyRecord {
        EnergyRecord {
            id: Uuid::new_v4(),
            display_id: "EN-000001".into(),
            site_name: site.into(),
            reporting_period_start: date(2025, 5, 1),
            reporting_period_end: date(2025, 5, 31),
            energy_type,
            consumption_mwh: consumption,
            cost: None,
            supplier_name: None,
            energy_source_mix: None,
            reduction_target_mwh: None,
            remarks: None,
            created_by: Uuid::nil(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn waste(site: &str, quantity: f64, method: DisposalMethod) -> WasteRecord {
        WasteRecord {
            id: Uuid::new_v4(),
            display_id: "WS-000001".into(),
            site_name: site.into(),
            waste_type: WasteType::Recyclable,
            quantity_tons: quantity,
            disposal_method: method,
            reporting_period_start: date(2025, 5, 1),
            reporting_period_end: date(2025, 5, 31),
            disposal_date: None,
            contractor_name: None,
            regulatory_compliance: ComplianceStatus::Compliant,
            remarks: None,
            created_by: Uuid::nil(),
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn empty_inputs_produce_zero_rates() {
        let energy = energy_stats(&[], now());
        assert_eq!(energy.overview.total_records, 0);
        assert_eq!(energy.overview.average_cost_per_mwh, 0.0);
        assert_eq!(energy.reduction_targets.achievement_rate, 0.0);
        assert!(energy.by_type.is_empty());
        assert!(energy.monthly_trend.is_empty());

        let waste = waste_stats(&[], now());
        assert_eq!(waste.overview.compliance_rate, 0.0);
        assert_eq!(waste.overview.diversion_rate, 0.0);
        assert!(!waste.overview.compliance_rate.is_nan());

        let summary = dashboard_summary(&[], &[]);
        assert_eq!(summary.waste.compliance_rate, 0.0);
        assert_eq!(summary.sites.total_sites, 0);
    }

    #[test]
    fn energy_overview_treats_missing_cost_as_zero() {
        let mut priced = energy("A", EnergyType::Electricity, 10.0);
        priced.cost = Some(500.0);
        let unpriced = energy("B", EnergyType::Electricity, 15.0);

        let stats = energy_stats(&[priced, unpriced], now());
        assert_eq!(stats.overview.total_consumption, 25.0);
        assert_eq!(stats.overview.total_cost, 500.0);
        assert_eq!(stats.overview.average_cost_per_mwh, 20.0);
    }

    #[test]
    fn zero_consumption_yields_zero_average_cost() {
        let mut record = energy("A", EnergyType::Solar, 0.0);
        record.cost = Some(100.0);
        let stats = energy_stats(&[record], now());
        assert_eq!(stats.overview.average_cost_per_mwh, 0.0);
    }

    #[test]
    fn achievement_rate_counts_targets_met() {
        let records: Vec<EnergyRecord> = [(10.0, 5.0), (20.0, 25.0), (30.0, 30.0)]
            .into_iter()
            .map(|(target, consumption)| {
                let mut r = energy("A", EnergyType::Electricity, consumption);
                r.reduction_target_mwh = Some(target);
                r
            })
            .chain(std::iter::once({
                let mut r = energy("A", EnergyType::Electricity, 1.0);
                r.reduction_target_mwh = Some(0.0);
                r
            }))
            .collect();

        let targets = reduction_targets(&records);
        assert_eq!(targets.total_with_targets, 3);
        assert_eq!(targets.targets_met, 2);
        assert_eq!(targets.total_target, 60.0);
        assert_eq!(targets.total_consumption, 60.0);
        assert!((targets.achievement_rate - 66.666_666).abs() < 0.001);
    }

    #[test]
    fn diversion_rate_counts_recycling_and_composting() {
        let records = vec![
            waste("A", 10.0, DisposalMethod::Recycling),
            waste("A", 5.0, DisposalMethod::Landfill),
            waste("B", 5.0, DisposalMethod::Composting),
        ];
        let stats = waste_stats(&records, now());
        assert_eq!(stats.overview.total_quantity, 20.0);
        assert_eq!(stats.overview.diversion_rate, 75.0);
        assert_eq!(stats.overview.compliance_rate, 100.0);
    }

    #[test]
    fn compliance_groups_by_status_in_encounter_order() {
        let mut pending = waste("A", 1.0, DisposalMethod::Landfill);
        pending.regulatory_compliance = ComplianceStatus::PendingReview;
        let mut failing = waste("A", 1.0, DisposalMethod::Landfill);
        failing.regulatory_compliance = ComplianceStatus::NonCompliant;
        let ok = waste("A", 1.0, DisposalMethod::Landfill);

        let records = vec![pending.clone(), ok, failing, pending];
        let stats = waste_stats(&records, now());

        assert_eq!(
            stats.compliance,
            vec![
                ComplianceCount {
                    status: ComplianceStatus::PendingReview,
                    count: 2
                },
                ComplianceCount {
                    status: ComplianceStatus::Compliant,
                    count: 1
                },
                ComplianceCount {
                    status: ComplianceStatus::NonCompliant,
                    count: 1
                },
            ]
        );
        assert_eq!(stats.overview.compliance_rate, 25.0);
    }

    #[test]
    fn groups_rank_descending_with_stable_ties() {
        let records = vec![
            energy("A", EnergyType::Wind, 5.0),
            energy("B", EnergyType::Solar, 5.0),
            energy("C", EnergyType::Diesel, 9.0),
            energy("A", EnergyType::Wind, 1.0),
        ];
        let stats = energy_stats(&records, now());

        let types: Vec<_> = stats.by_type.iter().map(|t| t.energy_type).collect();
        assert_eq!(
            types,
            vec![EnergyType::Diesel, EnergyType::Wind, EnergyType::Solar]
        );
        assert_eq!(stats.by_type[1].count, 2);

        let sites: Vec<_> = stats.by_site.iter().map(|s| s.site_name.as_str()).collect();
        assert_eq!(sites, vec!["C", "A", "B"]);
    }

    #[test]
    fn site_rankings_keep_top_ten() {
        let records: Vec<WasteRecord> = (0..15)
            .map(|i| waste(&format!("Site {}", i), i as f64, DisposalMethod::Other))
            .collect();
        let stats = waste_stats(&records, now());

        assert_eq!(stats.by_site.len(), TOP_SITES);
        assert_eq!(stats.by_site[0].site_name, "Site 14");
        assert_eq!(stats.by_site[9].site_name, "Site 5");
        assert!(
            stats
                .by_site
                .windows(2)
                .all(|pair| pair[0].quantity >= pair[1].quantity)
        );

        let energy_records: Vec<EnergyRecord> = (0..12)
            .map(|i| energy(&format!("Site {}", i), EnergyType::Other, i as f64))
            .collect();
        assert_eq!(energy_stats(&energy_records, now()).by_site.len(), TOP_SITES);
    }

    #[test]
    fn monthly_trend_windows_and_orders_months() {
        let mut old = energy("A", EnergyType::Electricity, 100.0);
        old.reporting_period_start = date(2024, 6, 14);
        let mut edge = energy("A", EnergyType::Electricity, 1.0);
        edge.reporting_period_start = date(2024, 6, 16);
        let mut march = energy("A", EnergyType::Electricity, 2.0);
        march.reporting_period_start = date(2025, 3, 20);
        march.cost = Some(40.0);
        let mut march_again = energy("B", EnergyType::Solar, 3.0);
        march_again.reporting_period_start = date(2025, 3, 2);

        let stats = energy_stats(&[march, old, march_again, edge], now());

        assert_eq!(
            stats.monthly_trend,
            vec![
                EnergyMonth {
                    month: date(2024, 6, 1),
                    consumption: 1.0,
                    cost: 0.0
                },
                EnergyMonth {
                    month: date(2025, 3, 1),
                    consumption: 5.0,
                    cost: 40.0
                },
            ]
        );
    }

    #[test]
    fn waste_trend_skips_empty_months() {
        let mut jan = waste("A", 2.0, DisposalMethod::Landfill);
        jan.reporting_period_start = date(2025, 1, 10);
        let mut apr = waste("A", 3.0, DisposalMethod::Landfill);
        apr.reporting_period_start = date(2025, 4, 10);

        let stats = waste_stats(&[apr, jan], now());
        let months: Vec<_> = stats.monthly_trend.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![date(2025, 1, 1), date(2025, 4, 1)]);
    }

    #[test]
    fn dashboard_counts_distinct_sites_and_recent_records() {
        let energy_records: Vec<EnergyRecord> = (0..7)
            .map(|i| {
                let site = if i % 2 == 0 { "North" } else { "South" };
                let mut r = energy(site, EnergyType::Wind, 1.0);
                r.display_id = format!("EN-{:06}", i + 1);
                r.created_at = now() + Duration::minutes(i);
                r
            })
            .collect();
        let waste_records = vec![
            waste("South", 4.0, DisposalMethod::Recycling),
            waste("East", 6.0, DisposalMethod::Landfill),
        ];

        let summary = dashboard_summary(&energy_records, &waste_records);

        assert_eq!(summary.sites.total_sites, 3);
        assert_eq!(summary.energy.total_records, 7);
        assert_eq!(summary.energy.total_consumption, 7.0);
        assert_eq!(summary.waste.total_quantity, 10.0);
        assert_eq!(summary.waste.compliance_rate, 100.0);

        let recent: Vec<_> = summary.recent_energy.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            recent,
            vec!["EN-000007", "EN-000006", "EN-000005", "EN-000004", "EN-000003"]
        );
        assert_eq!(summary.recent_waste.len(), 2);
    }

    #[test]
    fn reduction_achievement_helper() {
        assert_eq!(reduction_achievement(0.0, 5.0), None);

        let achieved = reduction_achievement(100.0, 85.0).unwrap();
        assert_eq!(achieved.reduction, 15.0);
        assert_eq!(achieved.percentage, 15.0);
        assert!(achieved.achieved);

        let missed = reduction_achievement(30.0, 40.0).unwrap();
        assert_eq!(missed.percentage, -33.3);
        assert!(!missed.achieved);
    }

    #[test]
    fn rounded_diversion_helper() {
        assert_eq!(waste_diversion_rate(1.0, 1.0, 0.0), 0.0);
        assert_eq!(waste_diversion_rate(1.0, 0.0, 3.0), 33.3);
        assert_eq!(waste_diversion_rate(10.0, 5.0, 20.0), 75.0);
    }
}
