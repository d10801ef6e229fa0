use std::fmt::Write;

use chrono::Utc;

use crate::data;
use crate::engine;
use crate::models::{AggregateResult, DashboardPayload, FilterSelection, SalesRecord};

pub fn summary_text(month: &str, aggregate: &AggregateResult) -> String {
    format!(
        "For {month}, the team sold {} bags to {} billed customers at a conversion rate of {:.1}%. \
         Repeat rate averaged {:.1}% and sampling reach was {:.1}%. \
         Total lapsers recorded were {}.",
        aggregate.total_bags_sold,
        aggregate.billed_customers,
        aggregate.conversion_rate_pct,
        aggregate.month_repeat_rate_pct,
        aggregate.sampling_reach_pct,
        aggregate.funnel_lapsers
    )
}

pub fn build_dashboard(records: &[SalesRecord], selection: &FilterSelection) -> DashboardPayload {
    let filtered = engine::filter_records(records, selection);
    let kpis = engine::compute_aggregate(&filtered);
    let alerts = engine::evaluate_alerts(&kpis, &filtered);
    let summary = summary_text(&selection.month, &kpis);

    DashboardPayload {
        selection: selection.clone(),
        months: data::distinct_months(records),
        weeks: data::weeks_in_month(records, &selection.month),
        supervisors: data::distinct_supervisors(records),
        weekly_conversion_trend: engine::weekly_conversion_trend(records, &selection.month),
        weekly_lapsers_trend: engine::weekly_lapsers_trend(records, &selection.month),
        sampling_reach_by_supervisor: engine::sampling_reach_by_supervisor(&filtered),
        bags_sold_by_supervisor: engine::bags_sold_by_supervisor(&filtered),
        product_portfolio: engine::product_portfolio(&filtered),
        kpis,
        alerts,
        summary,
    }
}

pub fn build_report(records: &[SalesRecord], selection: &FilterSelection) -> String {
    let filtered = engine::filter_records(records, selection);
    let aggregate = engine::compute_aggregate(&filtered);
    let alerts = engine::evaluate_alerts(&aggregate, &filtered);

    let week_label = match selection.week {
        Some(week) => format!("week {week}"),
        None => "all weeks".to_string(),
    };
    let supervisor_label = selection.supervisor.as_deref().unwrap_or("all supervisors");

    let mut output = String::new();
    let _ = writeln!(output, "# Rice Sales Performance Report");
    let _ = writeln!(
        output,
        "Generated on {} for {} ({}, {}).",
        Utc::now().date_naive(),
        selection.month,
        week_label,
        supervisor_label
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Snapshot");

    if filtered.is_empty() {
        let _ = writeln!(output, "No sales records match this selection.");
        return output;
    }

    let _ = writeln!(output, "- Total bags sold: {}", aggregate.total_bags_sold);
    let _ = writeln!(output, "- Billed customers: {}", aggregate.billed_customers);
    let _ = writeln!(output, "- Conversion rate: {:.1}%", aggregate.conversion_rate_pct);
    let _ = writeln!(output, "- Repeat rate: {:.1}%", aggregate.month_repeat_rate_pct);
    let _ = writeln!(output, "- Sampling reach: {:.1}%", aggregate.sampling_reach_pct);
    let _ = writeln!(output, "- Lapsers: {}", aggregate.funnel_lapsers);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Trends");
    let conversion = engine::weekly_conversion_trend(records, &selection.month);
    let lapsers = engine::weekly_lapsers_trend(records, &selection.month);
    for (conversion_point, lapsers_point) in conversion.iter().zip(lapsers.iter()) {
        let _ = writeln!(
            output,
            "- Week {}: conversion {:.1}%, lapsers {}",
            conversion_point.week_in_month, conversion_point.value, lapsers_point.value as u64
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");
    if alerts.is_empty() {
        let _ = writeln!(output, "No active alerts.");
    } else {
        for alert in &alerts {
            let _ = writeln!(output, "- {}", alert.message);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Executive Summary");
    let _ = writeln!(output, "{}", summary_text(&selection.month, &aggregate));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(month: &str, week: Option<u32>, supervisor: Option<&str>) -> FilterSelection {
        FilterSelection {
            month: month.to_string(),
            week,
            supervisor: supervisor.map(str::to_string),
        }
    }

    #[test]
    fn summary_interpolates_every_kpi() {
        let aggregate = AggregateResult {
            record_count: 3,
            total_bags_sold: 480,
            billed_customers: 230,
            rice_customers: 460,
            conversion_rate_pct: 50.0,
            month_repeat_rate_pct: 80.5,
            sampling_reach_pct: 71.25,
            funnel_lapsers: 15,
        };
        let summary = summary_text("Jan", &aggregate);

        assert!(summary.contains("For Jan"));
        assert!(summary.contains("480 bags"));
        assert!(summary.contains("230 billed customers"));
        assert!(summary.contains("50.0%"));
        assert!(summary.contains("80.5%"));
        assert!(summary.contains("71.2%"));
        assert!(summary.contains("were 15."));
    }

    #[test]
    fn dashboard_payload_carries_every_surface() {
        let records = crate::data::seed_records();
        let payload = build_dashboard(&records, &selection("Feb", None, None));

        assert_eq!(payload.months, vec!["Jan", "Feb"]);
        assert_eq!(payload.weeks, vec![1, 2, 3, 4]);
        assert_eq!(payload.supervisors.len(), 3);
        assert_eq!(payload.weekly_conversion_trend.len(), 4);
        assert_eq!(payload.weekly_lapsers_trend.len(), 4);
        assert_eq!(payload.bags_sold_by_supervisor.len(), 3);
        assert_eq!(payload.product_portfolio.len(), 5);
        // Seeded February trips both thresholds.
        assert_eq!(payload.alerts.len(), 2);
        assert!(payload.summary.contains("For Feb"));
    }

    #[test]
    fn report_covers_snapshot_trends_and_alerts() {
        let records = crate::data::seed_records();
        let report = build_report(&records, &selection("Jan", None, None));

        assert!(report.contains("# Rice Sales Performance Report"));
        assert!(report.contains("## Performance Snapshot"));
        assert!(report.contains("- Week 1: conversion"));
        assert!(report.contains("No active alerts."));
        assert!(report.contains("## Executive Summary"));
    }

    #[test]
    fn empty_selections_render_a_no_data_report() {
        let records = vec![
            crate::data::seed_records().remove(0),
        ];
        let report = build_report(&records, &selection("Jan", Some(1), Some("Ramesh")));
        assert!(!report.contains("No sales records match this selection."));

        // Week 1 exists for Jan, but Priya has no week 1 row in this dataset.
        let records = crate::data::seed_records()
            .into_iter()
            .filter(|record| !(record.supervisor == "Priya" && record.week_in_month == 1))
            .collect::<Vec<_>>();
        let report = build_report(&records, &selection("Jan", Some(1), Some("Priya")));
        assert!(report.contains("No sales records match this selection."));
    }
}
