//! ListLeads command

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List every stored lead
#[operation(verb = "list", noun = "leads", description = "List all leads")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListLeads;

impl ListLeads {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::FETCH_LEADS).await;
        let leads = ctx.read_leads().await?;
        Ok(serde_json::to_value(&leads)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for ListLeads {
    async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
        ExecutionResult::unlogged(self.run(ctx).await)
    }
}
