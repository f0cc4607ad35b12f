//! Lead commands

mod activity;
mod create;
mod delete;
mod get;
mod import;
mod list;
mod update;

pub use activity::AddActivity;
pub use create::CreateLead;
pub use delete::DeleteLead;
pub use get::GetLead;
pub use import::ImportLeads;
pub use list::ListLeads;
pub use update::UpdateLead;

use crate::error::{PipelineError, Result};
use crate::types::{Column, ColumnId};
use serde_json::Value;

/// Fail unless `status` names one of `columns`
pub(crate) fn ensure_column(columns: &[Column], status: &ColumnId) -> Result<()> {
    if columns.iter().any(|c| c.id == *status) {
        Ok(())
    } else {
        Err(PipelineError::ColumnNotFound {
            id: status.to_string(),
        })
    }
}

/// The `id` field of a single-lead result
pub(crate) fn result_id(result: &Value) -> Vec<String> {
    result["id"]
        .as_str()
        .map(|id| vec![id.to_string()])
        .unwrap_or_default()
}
