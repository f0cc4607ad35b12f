//! Pipeline - the state container a board view binds to
//!
//! Holds the committed leads and columns, the active filter, the drag engine
//! and a queue of notices. Every mutation goes through a command; local state
//! changes only after the command succeeded, so a failed write leaves the
//! container exactly as it was and queues an error notice instead.

mod columns;
mod drag;
mod notice;

pub use notice::{Notice, NoticeLevel};

use crate::board::{summarize, ColumnSummary, ResetBoard};
use crate::context::PipelineContext;
use crate::drag::DragEngine;
use crate::error::{PipelineError, Result};
use crate::filter::LeadFilter;
use crate::import::{self, ImportFormat, ImportReport};
use crate::lead::{AddActivity, CreateLead, DeleteLead, ImportLeads, ListLeads, UpdateLead};
use crate::column::ListColumns;
use crate::processor::PipelineOperationProcessor;
use crate::types::{ActivityKind, Column, ColumnId, Lead, LeadId, LeadPatch, NewLead};
use leadflow_config::PipelineConfig;
use leadflow_operations::{Execute, LogEntry, OperationProcessor};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;

/// Domain state container with write-through persistence
#[derive(Debug)]
pub struct Pipeline {
    ctx: PipelineContext,
    processor: PipelineOperationProcessor,
    leads: Vec<Lead>,
    columns: Vec<Column>,
    filter: LeadFilter,
    drag: DragEngine,
    notices: VecDeque<Notice>,
}

impl Pipeline {
    /// Container over the given context; call [`load`](Self::load) before use
    pub fn new(ctx: PipelineContext) -> Self {
        Self {
            ctx,
            processor: PipelineOperationProcessor::new(),
            leads: Vec::new(),
            columns: Vec::new(),
            filter: LeadFilter::default(),
            drag: DragEngine::new(),
            notices: VecDeque::new(),
        }
    }

    /// Container as described by a loaded configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new(PipelineContext::from_config(config));
        if let Some(actor) = &config.actor {
            pipeline.processor = PipelineOperationProcessor::new().with_actor(actor);
        }
        pipeline
    }

    pub fn with_processor(mut self, processor: PipelineOperationProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Committed leads in stored order
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Committed columns in display order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == *id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == *id)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch leads and columns from storage
    pub async fn load(&mut self) -> Result<()> {
        self.refresh_columns().await?;
        self.refresh_leads().await?;
        tracing::info!(
            leads = self.leads.len(),
            columns = self.columns.len(),
            "pipeline loaded"
        );
        Ok(())
    }

    pub async fn refresh_leads(&mut self) -> Result<()> {
        match self.run_as::<_, Vec<Lead>>(&ListLeads::new()).await {
            Ok(leads) => {
                self.leads = leads;
                Ok(())
            }
            Err(error) => Err(self.fail("Could not load leads", error)),
        }
    }

    pub async fn refresh_columns(&mut self) -> Result<()> {
        match self.run_as::<_, Vec<Column>>(&ListColumns::new()).await {
            Ok(mut columns) => {
                columns.sort_by_key(|c| c.order);
                self.columns = columns;
                Ok(())
            }
            Err(error) => Err(self.fail("Could not load columns", error)),
        }
    }

    // =========================================================================
    // Leads
    // =========================================================================

    pub async fn create_lead(&mut self, lead: NewLead) -> Result<Lead> {
        match self.run_as::<_, Lead>(&CreateLead::new(lead)).await {
            Ok(lead) => {
                self.leads.push(lead.clone());
                self.notify(Notice::success("Lead created"));
                Ok(lead)
            }
            Err(error) => Err(self.fail("Could not create lead", error)),
        }
    }

    pub async fn update_lead(&mut self, id: &LeadId, patch: LeadPatch) -> Result<Lead> {
        match self.run_as::<_, Lead>(&UpdateLead::new(id, patch)).await {
            Ok(lead) => {
                self.replace_lead(lead.clone());
                self.notify(Notice::success("Lead updated"));
                Ok(lead)
            }
            Err(error) => Err(self.fail("Could not update lead", error)),
        }
    }

    pub async fn delete_lead(&mut self, id: &LeadId) -> Result<()> {
        match self.run(&DeleteLead::new(id)).await {
            Ok(_) => {
                self.leads.retain(|lead| lead.id != *id);
                self.notify(Notice::success("Lead deleted"));
                Ok(())
            }
            Err(error) => Err(self.fail("Could not delete lead", error)),
        }
    }

    /// Change a lead's column; the status update is the only write
    pub async fn move_lead_to_column(&mut self, id: &LeadId, column: &ColumnId) -> Result<Lead> {
        match self.run_as::<_, Lead>(&UpdateLead::move_to(id, column)).await {
            Ok(lead) => {
                self.replace_lead(lead.clone());
                Ok(lead)
            }
            Err(error) => Err(self.fail("Could not move lead", error)),
        }
    }

    pub async fn add_activity(
        &mut self,
        id: &LeadId,
        kind: ActivityKind,
        description: impl Into<String>,
    ) -> Result<Lead> {
        let op = AddActivity::new(id, kind, description);
        match self.run_as::<_, Lead>(&op).await {
            Ok(lead) => {
                self.replace_lead(lead.clone());
                self.notify(Notice::success("Activity added"));
                Ok(lead)
            }
            Err(error) => Err(self.fail("Could not add activity", error)),
        }
    }

    pub async fn import_leads(&mut self, leads: Vec<NewLead>) -> Result<Vec<Lead>> {
        match self.run_as::<_, Vec<Lead>>(&ImportLeads::new(leads)).await {
            Ok(created) => {
                self.leads.extend(created.iter().cloned());
                self.notify(Notice::success(format!(
                    "{} leads imported",
                    created.len()
                )));
                Ok(created)
            }
            Err(error) => Err(self.fail("Could not import leads", error)),
        }
    }

    /// Parse a CSV or JSON file and import its usable records.
    ///
    /// Skipped records are reported in the returned report and in a warning
    /// notice; only a file with no usable record at all is an error.
    pub async fn import_file(&mut self, content: &str, format: ImportFormat) -> Result<ImportReport> {
        if self.columns.is_empty() {
            self.refresh_columns().await?;
        }
        let report = match import::parse(content, format, &self.columns) {
            Ok(report) => report,
            Err(error) => return Err(self.fail("Could not process file", error)),
        };

        self.import_leads(report.leads.clone()).await?;
        if report.skipped_count() > 0 {
            self.notify(Notice::warning(format!(
                "{} records were skipped because of invalid data",
                report.skipped_count()
            )));
        }
        Ok(report)
    }

    /// Forget everything and reload the default board
    pub async fn reset(&mut self) -> Result<()> {
        if let Err(error) = self.run(&ResetBoard).await {
            return Err(self.fail("Could not reset data", error));
        }
        self.load().await
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub fn filter(&self) -> &LeadFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: LeadFilter) {
        self.filter = filter;
    }

    pub fn clear_filter(&mut self) {
        self.filter = LeadFilter::default();
    }

    /// Leads passing the current filter, in stored order
    pub fn filtered_leads(&self) -> Vec<&Lead> {
        self.filter.apply(&self.leads)
    }

    /// Columns to render: the drag preview during a column drag, otherwise
    /// the committed sequence
    pub fn display_columns(&self) -> &[Column] {
        self.drag.preview_columns().unwrap_or(&self.columns)
    }

    /// Filtered leads grouped under each displayed column
    pub fn leads_by_column(&self) -> Vec<(&Column, Vec<&Lead>)> {
        let visible = self.filtered_leads();
        self.display_columns()
            .iter()
            .map(|column| {
                let leads = visible
                    .iter()
                    .copied()
                    .filter(|lead| lead.status == column.id)
                    .collect();
                (column, leads)
            })
            .collect()
    }

    /// Count and total value of the filtered leads per displayed column
    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        let visible: Vec<Lead> = self.filtered_leads().into_iter().cloned().collect();
        summarize(self.display_columns(), &visible)
    }

    /// Audit log entries, newest first
    pub async fn activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        self.ctx.read_activity(limit).await
    }

    // =========================================================================
    // Notices
    // =========================================================================

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn run<O>(&self, op: &O) -> Result<serde_json::Value>
    where
        O: Execute<PipelineContext, PipelineError>,
    {
        self.processor.process(op, &self.ctx).await
    }

    async fn run_as<O, T>(&self, op: &O) -> Result<T>
    where
        O: Execute<PipelineContext, PipelineError>,
        T: DeserializeOwned,
    {
        let value = self.run(op).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn replace_lead(&mut self, lead: Lead) {
        match self.leads.iter_mut().find(|l| l.id == lead.id) {
            Some(slot) => *slot = lead,
            None => self.leads.push(lead),
        }
    }

    /// Queue an error notice and hand the error back unchanged
    fn fail(&mut self, message: &str, error: PipelineError) -> PipelineError {
        tracing::warn!(%error, "{message}");
        self.notify(Notice::error(message));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use crate::latency::Latency;
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryBackend>, Pipeline) {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = PipelineContext::new(backend.clone()).with_latency(Latency::None);
        let mut pipeline = Pipeline::new(ctx);
        pipeline.load().await.unwrap();
        (backend, pipeline)
    }

    #[tokio::test]
    async fn test_load_defaults() {
        let (_backend, pipeline) = setup().await;
        assert_eq!(pipeline.columns().len(), 7);
        assert!(pipeline.leads().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (_backend, mut pipeline) = setup().await;

        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new").with_value(100.0))
            .await
            .unwrap();
        assert_eq!(pipeline.leads().len(), 1);
        assert_eq!(
            pipeline.take_notices(),
            vec![Notice::success("Lead created")]
        );

        pipeline.refresh_leads().await.unwrap();
        assert_eq!(pipeline.lead(&lead.id), Some(&lead));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let (backend, mut pipeline) = setup().await;
        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();
        pipeline.take_notices();

        backend.set_read_only(true);
        let result = pipeline.move_lead_to_column(&lead.id, &"won".into()).await;
        assert!(matches!(result, Err(PipelineError::ReadOnly)));
        assert_eq!(pipeline.lead(&lead.id).unwrap().status, "new");
        assert_eq!(pipeline.take_notices(), vec![Notice::error("Could not move lead")]);

        let result = pipeline
            .create_lead(NewLead::new("Bruno", "bruno@example.com", "new"))
            .await;
        assert!(result.is_err());
        assert_eq!(pipeline.leads().len(), 1);
    }

    #[tokio::test]
    async fn test_move_logs_status_change() {
        let (_backend, mut pipeline) = setup().await;
        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();

        let moved = pipeline
            .move_lead_to_column(&lead.id, &"negotiation".into())
            .await
            .unwrap();
        assert_eq!(moved.status, "negotiation");
        assert_eq!(moved.activities.len(), 2);
        assert_eq!(pipeline.lead(&lead.id).unwrap().status, "negotiation");
    }

    #[tokio::test]
    async fn test_filtered_views() {
        let (_backend, mut pipeline) = setup().await;
        pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new").with_value(10.0))
            .await
            .unwrap();
        pipeline
            .create_lead(NewLead::new("Bruno", "bruno@example.com", "new").with_value(5.0))
            .await
            .unwrap();
        pipeline
            .create_lead(NewLead::new("Carla", "carla@example.com", "won").with_value(7.0))
            .await
            .unwrap();

        let grouped = pipeline.leads_by_column();
        assert_eq!(grouped[0].1.len(), 2);

        pipeline.set_filter(LeadFilter::new().with_query("ana"));
        assert_eq!(pipeline.filtered_leads().len(), 1);

        let summaries = pipeline.column_summaries();
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[0].total_value, 10.0);
        assert_eq!(summaries[5].count, 0);

        pipeline.clear_filter();
        assert_eq!(pipeline.column_summaries()[0].total_value, 15.0);
    }

    #[tokio::test]
    async fn test_add_activity_and_delete() {
        let (_backend, mut pipeline) = setup().await;
        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();

        let updated = pipeline
            .add_activity(&lead.id, ActivityKind::Meeting, "Demo booked")
            .await
            .unwrap();
        assert_eq!(updated.activities.len(), 2);

        pipeline.delete_lead(&lead.id).await.unwrap();
        assert!(pipeline.leads().is_empty());
    }

    #[tokio::test]
    async fn test_audit_log_records_mutations_only() {
        let (_backend, mut pipeline) = setup().await;
        pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();
        pipeline.refresh_leads().await.unwrap();

        let entries = pipeline.activity(None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, "create lead");
    }

    #[tokio::test]
    async fn test_load_always_yields_a_column() {
        let mut pipeline = Pipeline::new(PipelineContext::in_memory());
        pipeline.load().await.unwrap();
        assert!(!pipeline.columns().is_empty());
        let missing = pipeline.delete_column(&ColumnId::from("ghost")).await;
        assert!(matches!(missing, Err(PipelineError::ColumnNotFound { .. })));

        let temp = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig {
            data_dir: temp.path().join("data"),
            latency: leadflow_config::LatencySetting::None,
            actor: None,
        };
        let mut pipeline = Pipeline::from_config(&config);
        pipeline.load().await.unwrap();
        assert!(!pipeline.columns().is_empty());
        assert!(pipeline.columns().len() <= crate::defaults::MAX_COLUMNS);
    }

    #[tokio::test]
    async fn test_from_config_stamps_actor() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig {
            data_dir: temp.path().join("data"),
            latency: leadflow_config::LatencySetting::None,
            actor: Some("ops-team".into()),
        };
        let mut pipeline = Pipeline::from_config(&config);
        pipeline.load().await.unwrap();
        pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();

        let entries = pipeline.activity(None).await.unwrap();
        assert_eq!(entries[0].actor.as_deref(), Some("ops-team"));
    }

    #[tokio::test]
    async fn test_reset() {
        let (_backend, mut pipeline) = setup().await;
        pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "new"))
            .await
            .unwrap();

        pipeline.reset().await.unwrap();
        assert!(pipeline.leads().is_empty());
        assert_eq!(pipeline.columns().len(), 7);
    }
}
