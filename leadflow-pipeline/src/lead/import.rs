//! ImportLeads command

use super::ensure_column;
use crate::context::PipelineContext;
use crate::defaults::DEFAULT_SOURCE;
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::{Lead, NewLead};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Note recorded on every imported lead
pub const IMPORTED_NOTE: &str = "Lead imported";

/// Create a batch of leads in one write
///
/// The batch is checked as a whole before anything is stored: one invalid
/// record or unknown status rejects the import.
#[operation(verb = "import", noun = "leads", description = "Create many leads at once")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ImportLeads {
    /// Records to create, in order
    pub leads: Vec<NewLead>,
}

impl ImportLeads {
    pub fn new(leads: Vec<NewLead>) -> Self {
        Self { leads }
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::IMPORT_LEADS).await;

        let _lock = ctx.lock().await?;
        let columns = ctx.read_columns().await?;
        for new in &self.leads {
            new.validate()?;
            ensure_column(&columns, &new.status)?;
        }

        let created: Vec<Lead> = self
            .leads
            .iter()
            .cloned()
            .map(|mut new| {
                if new.source.trim().is_empty() {
                    new.source = DEFAULT_SOURCE.to_string();
                }
                Lead::from_new(new, IMPORTED_NOTE)
            })
            .collect();

        if !created.is_empty() {
            let mut leads = ctx.read_leads().await?;
            leads.extend(created.iter().cloned());
            ctx.write_leads(&leads).await?;
        }

        tracing::debug!(count = created.len(), "leads imported");
        Ok(serde_json::to_value(&created)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for ImportLeads {
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
        result
            .as_array()
            .map(|leads| {
                leads
                    .iter()
                    .filter_map(|lead| lead["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::{CreateLead, ListLeads};

    #[tokio::test]
    async fn test_import_appends_batch() {
        let ctx = PipelineContext::in_memory();
        CreateLead::new(NewLead::new("Existing", "e@example.com", "new"))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let op = ImportLeads::new(vec![
            NewLead::new("Ana", "ana@example.com", "new"),
            NewLead::new("Bruno", "bruno@example.com", "contacted").with_source("linkedin"),
        ]);
        let result = op.execute(&ctx).await.into_result().unwrap();

        let batch = result.as_array().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0]["activities"][0]["description"], IMPORTED_NOTE);
        assert_eq!(batch[1]["source"], "linkedin");
        assert_eq!(op.affected_resource_ids(&result).len(), 2);

        let all = ListLeads::new().execute(&ctx).await.into_result().unwrap();
        let names: Vec<_> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Existing", "Ana", "Bruno"]);
    }

    #[tokio::test]
    async fn test_import_rejects_whole_batch() {
        let ctx = PipelineContext::in_memory();
        let result = ImportLeads::new(vec![
            NewLead::new("Ana", "ana@example.com", "new"),
            NewLead::new("Bad", "", "new"),
        ])
        .execute(&ctx)
        .await
        .into_result();
        assert!(result.is_err());

        let all = ListLeads::new().execute(&ctx).await.into_result().unwrap();
        assert!(all.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_empty_batch() {
        let ctx = PipelineContext::in_memory();
        let result = ImportLeads::new(Vec::new())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result, serde_json::json!([]));
    }
}
