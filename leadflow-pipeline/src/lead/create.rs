//! CreateLead command

use super::{ensure_column, result_id};
use crate::context::PipelineContext;
use crate::defaults::DEFAULT_SOURCE;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::{Lead, NewLead};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Note recorded on every freshly created lead
pub const CREATED_NOTE: &str = "Lead created";

/// Create a lead in one of the board's columns
#[operation(verb = "create", noun = "lead", description = "Create a new lead")]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateLead {
    /// Contact data and starting column
    pub lead: NewLead,
}

impl CreateLead {
    pub fn new(lead: NewLead) -> Self {
        Self { lead }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::CREATE_LEAD).await;

        let mut new = self.lead.clone();
        new.validate()?;
        if new.source.trim().is_empty() {
            new.source = DEFAULT_SOURCE.to_string();
        }

        let _lock = ctx.lock().await?;
        let columns = ctx.read_columns().await?;
        ensure_column(&columns, &new.status)?;

        let lead = Lead::from_new(new, CREATED_NOTE);
        let mut leads = ctx.read_leads().await?;
        leads.push(lead.clone());
        ctx.write_leads(&leads).await?;

        tracing::debug!(id = %lead.id, status = %lead.status, "lead created");
        Ok(serde_json::to_value(&lead)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for CreateLead {
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
