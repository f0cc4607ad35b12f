//! # Leadflow Operations
//!
//! This crate provides the `Operation` trait for defining pipeline commands.
//! Operations are structs where the fields ARE the parameters - no duplication.
//!
//! ## Example
//!
//! ```ignore
//! use leadflow_operations::*;
//!
//! #[operation(verb = "create", noun = "lead", description = "Create a new lead")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct CreateLead {
//!     /// The lead's display name
//!     pub name: String,
//!     /// Optional phone number
//!     pub phone: Option<String>,
//! }
//!
//! #[async_trait]
//! impl Execute<PipelineContext, PipelineError> for CreateLead {
//!     async fn execute(&self, ctx: &PipelineContext) -> ExecutionResult<Value, PipelineError> {
//!         // implementation returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod parameter;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use parameter::{ParamMeta, ParamType};
pub use processor::OperationProcessor;

// Re-export proc macros
pub use leadflow_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
