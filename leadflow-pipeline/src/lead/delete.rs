//! DeleteLead command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::LeadId;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Delete a lead; deleting an unknown id succeeds without changes
#[operation(verb = "delete", noun = "lead", description = "Delete a lead")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteLead {
    /// The lead ID to delete
    pub id: LeadId,
}

impl DeleteLead {
    pub fn new(id: impl Into<LeadId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::DELETE_LEAD).await;

        let _lock = ctx.lock().await?;
        let mut leads = ctx.read_leads().await?;
        let before = leads.len();
        leads.retain(|lead| lead.id != self.id);
        let deleted = leads.len() != before;
        ctx.write_leads(&leads).await?;

        Ok(json!({ "id": self.id, "deleted": deleted }))
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for DeleteLead {
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
}
