//! AddActivity command

use super::result_id;
use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::{Activity, ActivityKind, LeadId};
use chrono::Utc;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Append a history entry to a lead
#[operation(
    verb = "add",
    noun = "activity",
    description = "Record a note, email, call or meeting on a lead"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddActivity {
    /// The lead ID
    pub lead_id: LeadId,
    /// Kind of interaction
    pub kind: ActivityKind,
    /// Free-form description
    pub description: String,
}

impl AddActivity {
    pub fn new(lead_id: impl Into<LeadId>, kind: ActivityKind, description: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.into(),
            kind,
            description: description.into(),
        }
    }

    /// Shorthand for a note
    pub fn note(lead_id: impl Into<LeadId>, description: impl Into<String>) -> Self {
        Self::new(lead_id, ActivityKind::Note, description)
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::ADD_ACTIVITY).await;

        if self.kind == ActivityKind::StatusChange {
            return Err(PipelineError::validation(
                "kind",
                "status changes are recorded by moving the lead",
            ));
        }
        if self.description.trim().is_empty() {
            return Err(PipelineError::validation("description", "must not be empty"));
        }

        let _lock = ctx.lock().await?;
        let mut leads = ctx.read_leads().await?;
        let lead = leads
            .iter_mut()
            .find(|lead| lead.id == self.lead_id)
            .ok_or_else(|| PipelineError::LeadNotFound {
                id: self.lead_id.to_string(),
            })?;

        lead.activities
            .push(Activity::new(self.kind, self.description.clone()));
        lead.updated_at = Utc::now();
        let lead = lead.clone();

        ctx.write_leads(&leads).await?;
        Ok(serde_json::to_value(&lead)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for AddActivity {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        let result = self.run(ctx).await;
        ExecutionResult::logged(
            self.op_string(),
            input,
            result,
            start.elapsed().as_millis() as u64,
        )
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result_id(result)
    }
}
