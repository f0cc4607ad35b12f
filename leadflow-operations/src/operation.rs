//! The `Operation` metadata trait and the `Execute` trait commands implement

use crate::{ExecutionResult, ParamMeta};
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every command carries. Implemented by `#[operation]`.
pub trait Operation {
    /// Verb part of the op string ("create", "move", ...)
    fn verb(&self) -> &'static str;

    /// Noun part of the op string ("lead", "column", ...)
    fn noun(&self) -> &'static str;

    /// Human readable description
    fn description(&self) -> &'static str;

    /// Parameters derived from the struct fields
    fn parameters(&self) -> &'static [ParamMeta];

    /// Canonical op string, e.g. "create lead"
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// A command executed against a context `C`, failing with `E`.
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
{
    /// Run the command
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// Ids of the entities this command touched, used for per-entity logs
    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        Vec::new()
    }
}
