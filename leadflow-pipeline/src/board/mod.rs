//! Board-wide commands and per-column summaries

mod get;
mod reset;

pub use get::GetBoard;
pub use reset::ResetBoard;

use crate::types::{Column, ColumnId, Lead};
use serde::{Deserialize, Serialize};

/// Lead count and pipeline value of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub id: ColumnId,
    pub title: String,
    pub count: usize,
    /// Sum of the leads' estimated values
    pub total_value: f64,
}

/// Summaries in column order; leads whose status matches no column are ignored
pub fn summarize(columns: &[Column], leads: &[Lead]) -> Vec<ColumnSummary> {
    columns
        .iter()
        .map(|column| {
            let (count, total_value) = leads
                .iter()
                .filter(|lead| lead.status == column.id)
                .fold((0, 0.0), |(n, sum), lead| (n + 1, sum + lead.value));
            ColumnSummary {
                id: column.id.clone(),
                title: column.title.clone(),
                count,
                total_value,
            }
        })
        .collect()
}
