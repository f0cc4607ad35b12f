//! Column (pipeline stage) types and ordering helpers

use super::ids::ColumnId;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// A pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Zero-based position; orders across the board are dense
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Color to render, falling back to the neutral default
    pub fn display_color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or(crate::defaults::DEFAULT_COLUMN_COLOR)
    }
}

/// Payload for appending a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewColumn {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewColumn {
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
}

/// Rename/recolor payload; order is never part of a patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub color: Option<String>,
}

impl ColumnPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            color: None,
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            title: None,
            color: Some(color.into()),
        }
    }
}

/// Ensure a column title is usable
pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PipelineError::validation("title", "must not be empty"));
    }
    Ok(())
}

/// Sort by current order and rewrite orders to `0..len`.
pub fn renumber(columns: &mut [Column]) {
    columns.sort_by_key(|c| c.order);
    for (index, column) in columns.iter_mut().enumerate() {
        column.order = index;
    }
}

/// Move the element at `from` so it ends up at `to`, shifting the rest.
///
/// Out-of-range indices leave the slice untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
