//! Core types for the pipeline engine

mod column;
mod ids;
mod lead;

pub(crate) use column::validate_title;
pub use column::{move_item, renumber, Column, ColumnPatch, NewColumn};
pub use ids::{ActivityId, ColumnId, LeadId};
pub use lead::{Activity, ActivityKind, Lead, LeadPatch, NewLead};
