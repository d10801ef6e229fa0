use std::collections::HashMap;

use crate::models::{
    AggregateResult, Alert, AlertKind, FilterSelection, PortfolioSlice, SalesRecord,
    SupervisorSlice, WeeklyPoint,
};

pub const REPEAT_RATE_FLOOR_PCT: f64 = 75.0;
pub const SAMPLING_REACH_FLOOR_PCT: f64 = 65.0;

pub fn filter_records(records: &[SalesRecord], selection: &FilterSelection) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|record| record.month == selection.month)
        .filter(|record| selection.week.map_or(true, |week| record.week_in_month == week))
        .filter(|record| {
            selection
                .supervisor
                .as_deref()
                .map_or(true, |supervisor| record.supervisor == supervisor)
        })
        .cloned()
        .collect()
}

pub fn compute_aggregate(filtered: &[SalesRecord]) -> AggregateResult {
    let billed_customers: u64 = filtered.iter().map(|r| r.billed_customers).sum();
    let rice_customers: u64 = filtered.iter().map(|r| r.rice_customers).sum();

    // An empty selection aggregates to zero rather than NaN; callers check
    // record_count before presenting the numbers.
    AggregateResult {
        record_count: filtered.len(),
        total_bags_sold: filtered.iter().map(|r| r.total_bags_sold).sum(),
        billed_customers,
        rice_customers,
        conversion_rate_pct: ratio_pct(billed_customers, rice_customers),
        month_repeat_rate_pct: mean(filtered, |r| r.month_repeat_rate_pct),
        sampling_reach_pct: mean(filtered, |r| r.sampling_reach_pct),
        funnel_lapsers: filtered.iter().map(|r| r.funnel_lapsers).sum(),
    }
}

fn mean<F>(records: &[SalesRecord], field: F) -> f64
where
    F: Fn(&SalesRecord) -> f64,
{
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(field).sum::<f64>() / records.len() as f64
}

fn ratio_pct(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

// Weekly series stay scoped to the whole month so trend charts keep their
// shape while the week and supervisor filters narrow the KPIs.
pub fn weekly_series<F>(records: &[SalesRecord], month: &str, value: F) -> Vec<WeeklyPoint>
where
    F: Fn(&[SalesRecord]) -> f64,
{
    let mut groups: HashMap<u32, Vec<SalesRecord>> = HashMap::new();
    for record in records.iter().filter(|record| record.month == month) {
        groups
            .entry(record.week_in_month)
            .or_default()
            .push(record.clone());
    }

    let mut points: Vec<WeeklyPoint> = groups
        .into_iter()
        .map(|(week_in_month, rows)| WeeklyPoint {
            week_in_month,
            value: value(&rows),
        })
        .collect();
    points.sort_by_key(|point| point.week_in_month);
    points
}

pub fn weekly_conversion_trend(records: &[SalesRecord], month: &str) -> Vec<WeeklyPoint> {
    weekly_series(records, month, |rows| {
        let billed: u64 = rows.iter().map(|r| r.billed_customers).sum();
        let rice: u64 = rows.iter().map(|r| r.rice_customers).sum();
        ratio_pct(billed, rice)
    })
}

pub fn weekly_lapsers_trend(records: &[SalesRecord], month: &str) -> Vec<WeeklyPoint> {
    weekly_series(records, month, |rows| {
        rows.iter().map(|r| r.funnel_lapsers).sum::<u64>() as f64
    })
}

pub fn supervisor_breakdown<F>(filtered: &[SalesRecord], value: F) -> Vec<SupervisorSlice>
where
    F: Fn(&SalesRecord) -> f64,
{
    let mut totals: HashMap<String, f64> = HashMap::new();
    for record in filtered {
        *totals.entry(record.supervisor.clone()).or_insert(0.0) += value(record);
    }

    let mut slices: Vec<SupervisorSlice> = totals
        .into_iter()
        .map(|(supervisor, value)| SupervisorSlice { supervisor, value })
        .collect();
    slices.sort_by(|a, b| a.supervisor.cmp(&b.supervisor));
    slices
}

pub fn bags_sold_by_supervisor(filtered: &[SalesRecord]) -> Vec<SupervisorSlice> {
    supervisor_breakdown(filtered, |record| record.total_bags_sold as f64)
}

// Sums raw weekly reach percentages per supervisor, matching the stacked
// bars the field team reads today. Switching to a per-supervisor mean is an
// open product question.
pub fn sampling_reach_by_supervisor(filtered: &[SalesRecord]) -> Vec<SupervisorSlice> {
    supervisor_breakdown(filtered, |record| record.sampling_reach_pct)
}

pub fn product_portfolio(filtered: &[SalesRecord]) -> Vec<PortfolioSlice> {
    let product_fields: [(&str, fn(&SalesRecord) -> u64); 5] = [
        ("premium", |r: &SalesRecord| r.samples_premium),
        ("select", |r: &SalesRecord| r.samples_select),
        ("everyday", |r: &SalesRecord| r.samples_everyday),
        ("sella", |r: &SalesRecord| r.samples_sella),
        ("sonamasoori", |r: &SalesRecord| r.samples_sonamasoori),
    ];

    product_fields
        .into_iter()
        .map(|(product, field)| PortfolioSlice {
            product: product.to_string(),
            samples: filtered.iter().map(field).sum(),
        })
        .collect()
}

pub fn evaluate_alerts(aggregate: &AggregateResult, filtered: &[SalesRecord]) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if filtered.is_empty() {
        return alerts;
    }

    if aggregate.month_repeat_rate_pct < REPEAT_RATE_FLOOR_PCT {
        alerts.push(Alert {
            kind: AlertKind::RetentionRisk,
            message: format!(
                "Repeat rate dropped to {:.1}% - customer retention risk!",
                aggregate.month_repeat_rate_pct
            ),
        });
    }

    let mut reach_totals: HashMap<String, (f64, usize)> = HashMap::new();
    for record in filtered {
        let entry = reach_totals
            .entry(record.supervisor.clone())
            .or_insert((0.0, 0));
        entry.0 += record.sampling_reach_pct;
        entry.1 += 1;
    }
    let lowest_group_mean = reach_totals
        .values()
        .map(|(total, count)| total / *count as f64)
        .fold(f64::INFINITY, f64::min);

    if lowest_group_mean < SAMPLING_REACH_FLOOR_PCT {
        // The alert names the supervisor on the single weakest row, which can
        // differ from the supervisor whose group mean tripped the threshold.
        let weakest_row = filtered.iter().min_by(|a, b| {
            a.sampling_reach_pct
                .partial_cmp(&b.sampling_reach_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(record) = weakest_row {
            alerts.push(Alert {
                kind: AlertKind::SamplingUnderperformance,
                message: format!(
                    "{} sampling reach is below team average and requires intervention.",
                    record.supervisor
                ),
            });
        }
    }

    alerts
}
