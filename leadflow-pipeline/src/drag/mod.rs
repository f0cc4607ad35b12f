//! Drag-and-drop reorder engine
//!
//! A gesture moves through `Idle → DraggingCard | DraggingColumn → Committed
//! → Idle`. The engine never writes anything itself: [`DragEngine::end`]
//! hands back a [`DragOutcome`] describing the single write to perform, and
//! the owner calls [`DragEngine::settle`] once that write has resolved.
//!
//! Column drags work on a preview copy of the committed columns. Hovering one
//! column over another moves it in the preview only, so cancelling simply
//! drops the copy. Card drags never reorder anything while hovering; they
//! only track which column would receive the card.
//!
//! The engine works on ids. Turning pointer geometry into an id or an index
//! is the view's job, and [`geometry`] holds the helpers for it:
//! [`closest_corners`] picks the drop target under a dragged box, and
//! [`column_index_for`] gives the slot a dragged column's center has reached
//! (see `Pipeline::drag_column_over`).

pub mod geometry;

pub use geometry::{closest_corners, column_index_for, corner_distance, Point, Rect};

use crate::error::{PipelineError, Result};
use crate::types::{move_item, Column, ColumnId, Lead, LeadId};
use serde::{Deserialize, Serialize};

/// Pointer travel, in logical units, a press must exceed to become a drag
pub const ACTIVATION_DISTANCE: f64 = 8.0;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragSource {
    /// A lead card, with the column it was picked up from
    Card { lead_id: LeadId, column_id: ColumnId },
    Column { column_id: ColumnId },
}

/// Where a gesture currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    DraggingCard,
    DraggingColumn,
    /// Dropped with a write pending; `settle` returns to idle
    Committed,
}

/// Highlight shown under a dragged card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropIndicator {
    /// Column that would receive the card
    pub column_id: ColumnId,
    /// Card being hovered, when the pointer is over one
    pub over_lead: Option<LeadId>,
}

/// The write a finished gesture asks for
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Click, cancel, drop outside any target, or column dropped where it began
    Nothing,
    /// Set the lead's status
    MoveLead { lead_id: LeadId, to: ColumnId },
    /// Persist this column sequence; orders already equal indices
    ReorderColumns(Vec<Column>),
}

impl DragOutcome {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

/// Gesture tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: ACTIVATION_DISTANCE,
        }
    }
}

#[derive(Debug, Clone)]
struct Gesture {
    source: DragSource,
    origin: Point,
    activated: bool,
    /// Committed order at start, compared against the preview on drop
    committed: Vec<Column>,
    /// Column drags only
    preview: Vec<Column>,
    /// Hover target of the previous move; a column only shifts when it changes
    last_over: Option<String>,
    indicator: Option<DropIndicator>,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Active(Box<Gesture>),
    Committed,
}

/// One-gesture-at-a-time drag state machine
#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    config: DragConfig,
    state: State,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DragConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> DragPhase {
        match &self.state {
            State::Idle => DragPhase::Idle,
            State::Active(gesture) => match gesture.source {
                DragSource::Card { .. } => DragPhase::DraggingCard,
                DragSource::Column { .. } => DragPhase::DraggingColumn,
            },
            State::Committed => DragPhase::Committed,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Whether the pointer has travelled far enough to count as a drag
    pub fn is_activated(&self) -> bool {
        matches!(&self.state, State::Active(g) if g.activated)
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            State::Active(gesture) => Some(&gesture.source),
            _ => None,
        }
    }

    /// Column sequence to render during a column drag
    pub fn preview_columns(&self) -> Option<&[Column]> {
        match &self.state {
            State::Active(gesture) if matches!(gesture.source, DragSource::Column { .. }) => {
                Some(&gesture.preview)
            }
            _ => None,
        }
    }

    /// Highlight for the current card hover
    pub fn indicator(&self) -> Option<&DropIndicator> {
        match &self.state {
            State::Active(gesture) => gesture.indicator.as_ref(),
            _ => None,
        }
    }

    /// Press on a card or column header.
    ///
    /// `columns` is the committed column sequence the gesture starts from.
    pub fn start(&mut self, source: DragSource, at: Point, columns: &[Column]) -> Result<()> {
        if !self.is_idle() {
            return Err(PipelineError::DragInProgress);
        }
        if let DragSource::Column { column_id } = &source {
            if !columns.iter().any(|c| c.id == *column_id) {
                return Err(PipelineError::ColumnNotFound {
                    id: column_id.to_string(),
                });
            }
        }

        let mut committed = columns.to_vec();
        committed.sort_by_key(|c| c.order);
        tracing::debug!(?source, "drag started");
        self.state = State::Active(Box::new(Gesture {
            source,
            origin: at,
            activated: false,
            preview: committed.clone(),
            committed,
            last_over: None,
            indicator: None,
        }));
        Ok(())
    }

    /// Pointer moved while hovering `over` (a column id, a card id, or nothing).
    ///
    /// `leads` are the cards currently visible, used to resolve a hovered
    /// card to its column.
    pub fn move_to(&mut self, at: Point, over: Option<&str>, leads: &[Lead]) -> Option<&DropIndicator> {
        let threshold = self.config.activation_distance;
        let State::Active(gesture) = &mut self.state else {
            return None;
        };
        if !gesture.activated {
            if gesture.origin.distance(at) <= threshold {
                return None;
            }
            gesture.activated = true;
            tracing::debug!("drag activated");
        }

        match &gesture.source {
            DragSource::Column { column_id } => {
                let column_id = column_id.clone();
                if let Some(over) = over {
                    if gesture.last_over.as_deref() != Some(over) {
                        hover_column(&mut gesture.preview, &column_id, over);
                    }
                }
                gesture.last_over = over.map(str::to_string);
            }
            DragSource::Card { .. } => {
                let indicator =
                    over.and_then(|over| resolve_card_target(&gesture.committed, leads, over));
                gesture.indicator = indicator;
            }
        }
        gesture.indicator.as_ref()
    }

    /// Move the dragged column straight to `index` of the preview, as
    /// computed by [`column_index_for`]. Ignored for card drags and before
    /// activation.
    pub fn move_column_to(&mut self, index: usize) {
        let State::Active(gesture) = &mut self.state else {
            return;
        };
        if !gesture.activated {
            return;
        }
        if let DragSource::Column { column_id } = &gesture.source {
            if let Some(from) = gesture.preview.iter().position(|c| c.id == *column_id) {
                move_item(&mut gesture.preview, from, index);
            }
        }
    }

    /// Release the pointer over `over`.
    ///
    /// Anything other than [`DragOutcome::Nothing`] leaves the engine in
    /// `Committed` until [`settle`](Self::settle) is called.
    pub fn end(&mut self, over: Option<&str>, leads: &[Lead]) -> DragOutcome {
        if !matches!(self.state, State::Active(_)) {
            return DragOutcome::Nothing;
        }
        let State::Active(gesture) = std::mem::take(&mut self.state) else {
            return DragOutcome::Nothing;
        };

        if !gesture.activated || over.is_none() {
            tracing::debug!(activated = gesture.activated, "drag ended without a drop");
            return DragOutcome::Nothing;
        }

        let outcome = match gesture.source.clone() {
            DragSource::Column { .. } => {
                let unchanged = gesture
                    .preview
                    .iter()
                    .map(|c| &c.id)
                    .eq(gesture.committed.iter().map(|c| &c.id));
                if unchanged {
                    DragOutcome::Nothing
                } else {
                    let mut columns = gesture.preview;
                    for (index, column) in columns.iter_mut().enumerate() {
                        column.order = index;
                    }
                    DragOutcome::ReorderColumns(columns)
                }
            }
            DragSource::Card { lead_id, .. } => {
                match over.and_then(|over| resolve_card_target(&gesture.committed, leads, over)) {
                    Some(target) => DragOutcome::MoveLead {
                        lead_id,
                        to: target.column_id,
                    },
                    None => DragOutcome::Nothing,
                }
            }
        };

        if !outcome.is_nothing() {
            self.state = State::Committed;
        }
        tracing::debug!(?outcome, "drag ended");
        outcome
    }

    /// Abandon the gesture; the preview is dropped and nothing is written
    pub fn cancel(&mut self) {
        if matches!(self.state, State::Active(_)) {
            tracing::debug!("drag cancelled");
            self.state = State::Idle;
        }
    }

    /// The committed write has resolved (either way); accept new gestures
    pub fn settle(&mut self) {
        if matches!(self.state, State::Committed) {
            self.state = State::Idle;
        }
    }
}

/// Move `dragged` to the hovered column's slot in the preview
fn hover_column(preview: &mut Vec<Column>, dragged: &ColumnId, over: &str) {
    let from = preview.iter().position(|c| c.id == *dragged);
    let to = preview.iter().position(|c| c.id == over);
    if let (Some(from), Some(to)) = (from, to) {
        move_item(preview, from, to);
    }
}

/// A hovered column id is its own target; a hovered card sends the drop to
/// the card's column.
fn resolve_card_target(columns: &[Column], leads: &[Lead], over: &str) -> Option<DropIndicator> {
    if let Some(column) = columns.iter().find(|c| c.id == over) {
        return Some(DropIndicator {
            column_id: column.id.clone(),
            over_lead: None,
        });
    }
    leads
        .iter()
        .find(|lead| lead.id == over)
        .map(|lead| DropIndicator {
            column_id: lead.status.clone(),
            over_lead: Some(lead.id.clone()),
        })
}
