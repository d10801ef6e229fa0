use std::path::Path;

use anyhow::{bail, Context};

use crate::models::{FilterSelection, SalesRecord};

pub fn load_records(path: &Path) -> anyhow::Result<Vec<SalesRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open sales data at {}", path.display()))?;

    let mut records = Vec::new();
    for result in reader.deserialize::<SalesRecord>() {
        let record =
            result.with_context(|| format!("malformed sales row in {}", path.display()))?;
        records.push(record);
    }

    if records.is_empty() {
        bail!("no sales records found in {}", path.display());
    }

    Ok(records)
}

pub fn distinct_months(records: &[SalesRecord]) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for record in records {
        if !months.contains(&record.month) {
            months.push(record.month.clone());
        }
    }
    months
}

pub fn weeks_in_month(records: &[SalesRecord], month: &str) -> Vec<u32> {
    let mut weeks: Vec<u32> = records
        .iter()
        .filter(|record| record.month == month)
        .map(|record| record.week_in_month)
        .collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}

pub fn distinct_supervisors(records: &[SalesRecord]) -> Vec<String> {
    let mut supervisors: Vec<String> = Vec::new();
    for record in records {
        if !supervisors.contains(&record.supervisor) {
            supervisors.push(record.supervisor.clone());
        }
    }
    supervisors
}

pub fn validate_selection(
    records: &[SalesRecord],
    selection: &FilterSelection,
) -> anyhow::Result<()> {
    let months = distinct_months(records);
    if !months.contains(&selection.month) {
        bail!(
            "month {:?} is not in the dataset (available: {})",
            selection.month,
            months.join(", ")
        );
    }

    if let Some(week) = selection.week {
        let weeks = weeks_in_month(records, &selection.month);
        if !weeks.contains(&week) {
            let available: Vec<String> = weeks.iter().map(|w| w.to_string()).collect();
            bail!(
                "week {} is not in {} (available: {})",
                week,
                selection.month,
                available.join(", ")
            );
        }
    }

    if let Some(supervisor) = selection.supervisor.as_deref() {
        let supervisors = distinct_supervisors(records);
        if !supervisors.iter().any(|s| s == supervisor) {
            bail!(
                "supervisor {:?} is not in the dataset (available: {})",
                supervisor,
                supervisors.join(", ")
            );
        }
    }

    Ok(())
}

pub fn seed_records() -> Vec<SalesRecord> {
    // (month, week, supervisor, bags, billed, rice, repeat %, reach %,
    //  lapsers, premium, select, everyday, sella, sonamasoori)
    let rows = vec![
        ("Jan", 1, "Ramesh", 176, 118, 161, 81.2, 74.5, 19, 36, 28, 44, 13, 9),
        ("Jan", 1, "Priya", 158, 104, 149, 79.8, 70.2, 22, 31, 24, 38, 11, 8),
        ("Jan", 1, "Arjun", 142, 95, 138, 77.4, 68.9, 25, 27, 21, 35, 9, 7),
        ("Jan", 2, "Ramesh", 184, 124, 166, 82.5, 76.1, 17, 38, 30, 46, 14, 10),
        ("Jan", 2, "Priya", 161, 108, 151, 80.3, 71.8, 21, 32, 25, 40, 12, 8),
        ("Jan", 2, "Arjun", 149, 99, 141, 78.1, 69.4, 23, 28, 22, 36, 10, 7),
        ("Jan", 3, "Ramesh", 191, 129, 171, 83.0, 77.3, 15, 40, 31, 48, 15, 11),
        ("Jan", 3, "Priya", 167, 112, 155, 81.0, 72.6, 19, 33, 26, 41, 12, 9),
        ("Jan", 3, "Arjun", 152, 102, 144, 78.9, 70.0, 22, 29, 23, 37, 10, 8),
        ("Jan", 4, "Ramesh", 198, 134, 176, 84.2, 78.8, 14, 41, 33, 50, 16, 11),
        ("Jan", 4, "Priya", 172, 116, 158, 81.9, 73.4, 18, 34, 27, 42, 13, 9),
        ("Jan", 4, "Arjun", 157, 105, 147, 79.6, 70.9, 21, 30, 24, 38, 11, 8),
        ("Feb", 1, "Ramesh", 171, 112, 159, 74.8, 70.1, 24, 35, 27, 43, 13, 9),
        ("Feb", 1, "Priya", 150, 97, 145, 72.6, 66.3, 28, 30, 23, 37, 11, 7),
        ("Feb", 1, "Arjun", 131, 82, 132, 69.9, 61.7, 33, 25, 19, 32, 9, 6),
        ("Feb", 2, "Ramesh", 168, 110, 157, 74.1, 69.5, 25, 34, 26, 42, 13, 9),
        ("Feb", 2, "Priya", 147, 95, 143, 71.8, 65.8, 29, 29, 22, 36, 10, 7),
        ("Feb", 2, "Arjun", 126, 79, 129, 68.7, 60.4, 35, 24, 18, 31, 8, 6),
        ("Feb", 3, "Ramesh", 173, 114, 160, 75.2, 70.8, 23, 36, 28, 44, 13, 10),
        ("Feb", 3, "Priya", 151, 98, 146, 72.9, 66.7, 27, 30, 23, 37, 11, 7),
        ("Feb", 3, "Arjun", 129, 81, 131, 69.2, 59.8, 34, 24, 19, 31, 9, 6),
        ("Feb", 4, "Ramesh", 177, 117, 163, 75.6, 71.4, 22, 37, 29, 45, 14, 10),
        ("Feb", 4, "Priya", 154, 100, 148, 73.3, 67.2, 26, 31, 24, 38, 11, 8),
        ("Feb", 4, "Arjun", 133, 84, 134, 70.1, 62.3, 32, 26, 20, 33, 9, 6),
    ];

    rows.into_iter()
        .map(
            |(
                month,
                week_in_month,
                supervisor,
                total_bags_sold,
                billed_customers,
                rice_customers,
                month_repeat_rate_pct,
                sampling_reach_pct,
                funnel_lapsers,
                samples_premium,
                samples_select,
                samples_everyday,
                samples_sella,
                samples_sonamasoori,
            )| SalesRecord {
                month: month.to_string(),
                week_in_month,
                supervisor: supervisor.to_string(),
                total_bags_sold,
                billed_customers,
                rice_customers,
                month_repeat_rate_pct,
                sampling_reach_pct,
                funnel_lapsers,
                samples_premium,
                samples_select,
                samples_everyday,
                samples_sella,
                samples_sonamasoori,
            },
        )
        .collect()
}

pub fn write_seed_csv(path: &Path) -> anyhow::Result<usize> {
    let records = seed_records();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rice-dashboard-{}-{}.csv", name, std::process::id()))
    }

    #[test]
    fn seed_data_survives_a_write_load_round_trip() {
        let path = temp_csv("roundtrip");
        let written = write_seed_csv(&path).unwrap();
        let records = load_records(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(written, records.len());
        assert_eq!(records[0].month, "Jan");
        assert_eq!(records[0].supervisor, "Ramesh");
        assert_eq!(records[0].total_bags_sold, 176);
    }

    #[test]
    fn load_rejects_non_numeric_values() {
        let path = temp_csv("badvalue");
        std::fs::write(
            &path,
            "month,week_in_month,supervisor,total_bags_sold,billed_customers,rice_customers,\
             month_repeat_rate_pct,sampling_reach_pct,funnel_lapsers,samples_premium,\
             samples_select,samples_everyday,samples_sella,samples_sonamasoori\n\
             Jan,1,Ramesh,many,118,161,81.2,74.5,19,36,28,44,13,9\n",
        )
        .unwrap();
        let result = load_records(&path);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_missing_columns() {
        let path = temp_csv("badheader");
        std::fs::write(
            &path,
            "month,week_in_month,supervisor,total_bags_sold\nJan,1,Ramesh,176\n",
        )
        .unwrap();
        let result = load_records(&path);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
    }

    #[test]
    fn load_rejects_empty_datasets() {
        let path = temp_csv("empty");
        std::fs::write(
            &path,
            "month,week_in_month,supervisor,total_bags_sold,billed_customers,rice_customers,\
             month_repeat_rate_pct,sampling_reach_pct,funnel_lapsers,samples_premium,\
             samples_select,samples_everyday,samples_sella,samples_sonamasoori\n",
        )
        .unwrap();
        let result = load_records(&path);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
    }

    #[test]
    fn selector_options_follow_the_dataset() {
        let records = seed_records();
        assert_eq!(distinct_months(&records), vec!["Jan", "Feb"]);
        assert_eq!(weeks_in_month(&records, "Jan"), vec![1, 2, 3, 4]);
        assert_eq!(distinct_supervisors(&records), vec!["Ramesh", "Priya", "Arjun"]);
    }

    #[test]
    fn validation_rejects_values_outside_the_dataset() {
        let records = seed_records();

        let unknown_month = FilterSelection {
            month: "Mar".to_string(),
            week: None,
            supervisor: None,
        };
        assert!(validate_selection(&records, &unknown_month).is_err());

        let unknown_week = FilterSelection {
            month: "Jan".to_string(),
            week: Some(9),
            supervisor: None,
        };
        assert!(validate_selection(&records, &unknown_week).is_err());

        let unknown_supervisor = FilterSelection {
            month: "Jan".to_string(),
            week: None,
            supervisor: Some("Nadia".to_string()),
        };
        assert!(validate_selection(&records, &unknown_supervisor).is_err());

        let valid = FilterSelection {
            month: "Feb".to_string(),
            week: Some(2),
            supervisor: Some("Priya".to_string()),
        };
        assert!(validate_selection(&records, &valid).is_ok());
    }
}
