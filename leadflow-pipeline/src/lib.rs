//! Sales-lead pipeline engine with write-through storage
//!
//! Leads move through an ordered set of columns (pipeline stages). Every
//! change is a command that is executed against a [`PipelineContext`] and
//! persisted before it becomes visible; the [`Pipeline`] container keeps the
//! committed state a board view renders, plus the drag-and-drop engine used
//! to move cards and reorder columns.
//!
//! ## Overview
//!
//! - **Dense column orders** - orders are always `0..n`, between 1 and 10 columns
//! - **Commands** - every read and write is an operation with a canonical op string
//! - **Write-through** - local state changes only after storage accepted the write
//! - **Audit trail** - mutations append JSONL entries to a global and a per-lead log
//! - **Two-layer drag** - hovering edits a preview; only the drop writes anything
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use leadflow_pipeline::{lead::CreateLead, types::NewLead, Execute, PipelineContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = PipelineContext::in_memory();
//!
//! let lead = CreateLead::new(NewLead::new("Ana Souza", "ana@example.com", "new").with_value(1200.0))
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created lead: {}", lead["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! .leadflow/
//! ├── leads_data.json        # All leads (JSON array)
//! ├── leads_columns.json     # All columns (JSON array)
//! ├── activity_log.jsonl     # Global operation log
//! └── lead_log_{id}.jsonl    # Per-lead operation log
//! ```

mod context;
pub mod defaults;
pub mod drag;
mod error;
pub mod filter;
pub mod import;
pub mod latency;
pub mod pipeline;
mod processor;
pub mod storage;
pub mod types;

// Command modules
pub mod board;
pub mod column;
pub mod lead;

// Re-export Execute trait and types from operations crate
pub use leadflow_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use context::PipelineContext;
pub use error::{PipelineError, Result};
pub use filter::LeadFilter;
pub use latency::Latency;
pub use pipeline::{Notice, NoticeLevel, Pipeline};
pub use processor::PipelineOperationProcessor;
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageLock};

// Re-export commonly used types
pub use types::{
    Activity, ActivityId, ActivityKind, Column, ColumnId, ColumnPatch, Lead, LeadId, LeadPatch,
    NewColumn, NewLead,
};
