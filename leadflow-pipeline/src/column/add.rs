//! AddColumn command

use crate::context::PipelineContext;
use crate::defaults::{DEFAULT_COLUMN_COLOR, MAX_COLUMNS};
use crate::error::{PipelineError, Result};
use crate::latency::nominal;
use crate::types::validate_title;
use crate::types::{Column, ColumnId};
use leadflow_operations::{async_trait, operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Append a column after the last one
#[operation(
    verb = "add",
    noun = "column",
    description = "Add a new column at the end of the board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The column display title
    pub title: String,
    /// Optional display color
    pub color: Option<String>,
}

impl AddColumn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<Value> {
        ctx.simulate_latency(nominal::COLUMN_WRITE).await;
        validate_title(&self.title)?;

        let _lock = ctx.lock().await?;
        let mut columns = ctx.read_columns().await?;
        if columns.len() >= MAX_COLUMNS {
            return Err(PipelineError::capacity(format!(
                "the board already has {MAX_COLUMNS} columns"
            )));
        }

        let column = Column {
            id: ColumnId::new(),
            title: self.title.trim().to_string(),
            order: columns.len(),
            color: Some(
                self.color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COLUMN_COLOR.to_string()),
            ),
        };
        columns.push(column.clone());
        ctx.write_columns(&columns).await?;

        tracing::debug!(id = %column.id, order = column.order, "column added");
        Ok(serde_json::to_value(&column)?)
    }
}

#[async_trait]
impl Execute<PipelineContext, PipelineError> for AddColumn {
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
