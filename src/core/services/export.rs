use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::domain::ExpenseRecord;
use crate::errors::Result;

pub const CSV_HEADER: &str = "Date,Description,Category,Amount";

/// Renders snapshots as comma-separated text.
pub struct CsvExporter;

impl CsvExporter {
    /// One row per record in snapshot order, newline separated, no trailing newline.
    pub fn to_csv(snapshot: &[ExpenseRecord]) -> String {
        let mut rows = Vec::with_capacity(snapshot.len() + 1);
        rows.push(CSV_HEADER.to_string());
        rows.extend(snapshot.iter().map(|expense| {
            format!(
                "{},{},{},{}",
                expense.date.format("%Y-%m-%d"),
                quote(&expense.description),
                expense.category,
                expense.amount.normalize()
            )
        }));
        rows.join("\n")
    }

    pub fn default_file_name(date: NaiveDate) -> String {
        format!("expenses_{}.csv", date.format("%Y-%m-%d"))
    }

    /// Writes the CSV to `path`, or to `<path>/<default name>` when `path` is a directory.
    pub fn write_to_path(
        snapshot: &[ExpenseRecord],
        path: &Path,
        today: NaiveDate,
    ) -> Result<PathBuf> {
        let target = if path.is_dir() {
            path.join(Self::default_file_name(today))
        } else {
            path.to_path_buf()
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, Self::to_csv(snapshot))?;
        tracing::info!(path = %target.display(), rows = snapshot.len(), "expenses exported");
        Ok(target)
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseId;
    use chrono::{TimeZone, Utc};

    fn record(description: &str, amount: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: ExpenseId(1),
            description: description.into(),
            amount: amount.parse().unwrap(),
            category: "Food".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 6, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_snapshot_is_just_the_header() {
        assert_eq!(CsvExporter::to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn descriptions_are_quoted_and_amounts_normalized() {
        let csv = CsvExporter::to_csv(&[
            record("Coffee at \"Joe's\", downtown", "6.50"),
            record("Gas", "65.00"),
        ]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[1], "2024-01-06,\"Coffee at \"\"Joe's\"\", downtown\",Food,6.5");
        assert_eq!(lines[2], "2024-01-06,\"Gas\",Food,65");
    }

    #[test]
    fn default_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CsvExporter::default_file_name(date), "expenses_2024-03-09.csv");
    }
}
