//! GetLead command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::LeadId;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a lead by ID
#[operation(verb = "get", noun = "lead", description = "Retrieve a lead by ID")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetLead {
    /// The lead ID to retrieve
    pub id: LeadId,
}

impl GetLead {
    pub fn new(id: impl Into<LeadId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::GET_LEAD).await;
        let lead = ctx
            .find_lead(&self.id)
            .await?
            .ok_or_else(|| PipelineError::LeadNotFound {
                id: self.id.to_string(),
            })?;
        Ok(serde_json::to_value(&lead)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for GetLead {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        ExecutionResult::unlogged(self.run(ctx).await)
    }
}
