//! Aggregate figures over the record list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::certificate::{Certificate, Status};

/// Counts and progress across all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records.
    pub total: usize,
    /// Records with status earned.
    pub earned: usize,
    /// Records with status in-progress.
    pub in_progress: usize,
    /// Records with status planned.
    pub planned: usize,
    /// Mean progress across all records, 0 when there are none.
    pub average_progress: f64,
    /// Names of records whose expiry date has passed.
    pub expired: Vec<String>,
}

impl Summary {
    /// Summarize `records` as of `today`.
    #[must_use]
    pub fn from_records(records: &[Certificate], today: NaiveDate) -> Self {
        let count = |status: Status| records.iter().filter(|r| r.status == status).count();

        let progress_sum: u32 = records.iter().map(|r| u32::from(r.progress)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_progress = if records.is_empty() {
            0.0
        } else {
            f64::from(progress_sum) / records.len() as f64
        };

        Self {
            total: records.len(),
            earned: count(Status::Earned),
            in_progress: count(Status::InProgress),
            planned: count(Status::Planned),
            average_progress,
            expired: records
                .iter()
                .filter(|r| r.is_expired(today))
                .map(|r| r.name.clone())
                .collect(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Certifications")?;
        writeln!(f, "--------------")?;
        writeln!(f, "Total:            {}", self.total)?;
        writeln!(f, "Earned:           {}", self.earned)?;
        writeln!(f, "In progress:      {}", self.in_progress)?;
        writeln!(f, "Planned:          {}", self.planned)?;
        writeln!(f, "Average progress: {:.1}%", self.average_progress)?;
        if !self.expired.is_empty() {
            writeln!(f, "Expired:          {}", self.expired.join(", "))?;
        }
        Ok(())
    }
}
