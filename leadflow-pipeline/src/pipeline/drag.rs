//! Drag gestures bound to the committed state

use super::Pipeline;
use crate::drag::{
    column_index_for, DragOutcome, DragPhase, DragSource, DropIndicator, Point, Rect,
};
use crate::error::Result;

impl Pipeline {
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Press on a card or column header
    pub fn start_drag(&mut self, source: DragSource, at: Point) -> Result<()> {
        self.drag.start(source, at, &self.columns)
    }

    /// Pointer moved; returns the card drop highlight, if any
    pub fn drag_move(&mut self, at: Point, over: Option<&str>) -> Option<DropIndicator> {
        let visible: Vec<_> = self.filter.apply(&self.leads).into_iter().cloned().collect();
        self.drag.move_to(at, over, &visible).cloned()
    }

    /// Slide the dragged column to a preview index
    pub fn drag_column_to(&mut self, index: usize) {
        self.drag.move_column_to(index);
    }

    /// Slide the dragged column by where its center is, given the boxes of
    /// the columns as displayed. Returns the dragged column's preview index.
    pub fn drag_column_over(&mut self, center_x: f64, boxes: &[Rect]) -> Option<usize> {
        let Some(DragSource::Column { column_id }) = self.drag.source() else {
            return None;
        };
        let column_id = column_id.clone();
        let dragged = self.display_columns().iter().position(|c| c.id == column_id)?;
        self.drag.move_column_to(column_index_for(center_x, boxes, dragged));
        self.display_columns().iter().position(|c| c.id == column_id)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Release the pointer and perform the single write the gesture asks for.
    ///
    /// The engine is settled whether or not the write succeeds; on failure
    /// the committed state is untouched and the preview is gone.
    pub async fn end_drag(&mut self, over: Option<&str>) -> Result<DragOutcome> {
        let visible: Vec<_> = self.filter.apply(&self.leads).into_iter().cloned().collect();
        let outcome = self.drag.end(over, &visible);

        let result = match &outcome {
            DragOutcome::Nothing => Ok(()),
            DragOutcome::MoveLead { lead_id, to } => {
                self.move_lead_to_column(lead_id, to).await.map(|_| ())
            }
            DragOutcome::ReorderColumns(columns) => {
                self.update_columns(columns.clone()).await.map(|_| ())
            }
        };
        self.drag.settle();
        result.map(|()| outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::context::PipelineContext;
    use crate::drag::{DragOutcome, DragPhase, DragSource, Point, Rect};
    use crate::error::PipelineError;
    use crate::pipeline::Pipeline;
    use crate::storage::MemoryBackend;
    use crate::types::{Column, ColumnId, NewColumn, NewLead};
    use std::sync::Arc;

    const ORIGIN: Point = Point::new(0.0, 0.0);
    const FAR: Point = Point::new(50.0, 10.0);

    async fn board() -> (Arc<MemoryBackend>, Pipeline) {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = PipelineContext::new(backend.clone())
            .with_latency(crate::latency::Latency::None);
        let mut pipeline = Pipeline::new(ctx);
        pipeline.load().await.unwrap();
        pipeline
            .update_columns(vec![
                Column::new("a", "A", 0),
                Column::new("b", "B", 1),
                Column::new("c", "C", 2),
            ])
            .await
            .unwrap();
        (backend, pipeline)
    }

    fn ids(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(|c| c.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_column_drag_previews_then_commits() {
        let (_backend, mut pipeline) = board().await;

        pipeline
            .start_drag(DragSource::Column { column_id: "c".into() }, ORIGIN)
            .unwrap();
        pipeline.drag_move(FAR, Some("a"));
        assert_eq!(ids(pipeline.display_columns()), vec!["c", "a", "b"]);
        assert_eq!(ids(pipeline.columns()), vec!["a", "b", "c"]);

        let outcome = pipeline.end_drag(Some("a")).await.unwrap();
        assert!(matches!(outcome, DragOutcome::ReorderColumns(_)));
        assert_eq!(ids(pipeline.columns()), vec!["c", "a", "b"]);
        assert_eq!(pipeline.drag_phase(), DragPhase::Idle);
    }

    #[tokio::test]
    async fn test_cancel_restores_display() {
        let (_backend, mut pipeline) = board().await;
        pipeline
            .start_drag(DragSource::Column { column_id: "a".into() }, ORIGIN)
            .unwrap();
        pipeline.drag_move(FAR, Some("c"));
        pipeline.cancel_drag();
        assert_eq!(ids(pipeline.display_columns()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_card_drop_moves_lead() {
        let (_backend, mut pipeline) = board().await;
        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "a"))
            .await
            .unwrap();

        pipeline
            .start_drag(
                DragSource::Card {
                    lead_id: lead.id.clone(),
                    column_id: "a".into(),
                },
                ORIGIN,
            )
            .unwrap();
        let indicator = pipeline.drag_move(FAR, Some("c")).unwrap();
        assert_eq!(indicator.column_id, "c");

        pipeline.end_drag(Some("c")).await.unwrap();
        assert_eq!(pipeline.lead(&lead.id).unwrap().status, "c");
    }

    #[tokio::test]
    async fn test_column_follows_its_center() {
        let (_backend, mut pipeline) = board().await;
        let boxes = [
            Rect::new(0.0, 0.0, 100.0, 500.0),
            Rect::new(100.0, 0.0, 100.0, 500.0),
            Rect::new(200.0, 0.0, 100.0, 500.0),
        ];
        assert_eq!(pipeline.drag_column_over(260.0, &boxes), None);

        pipeline
            .start_drag(DragSource::Column { column_id: "a".into() }, ORIGIN)
            .unwrap();
        pipeline.drag_move(FAR, None);

        // not yet past b's midpoint at 150
        assert_eq!(pipeline.drag_column_over(140.0, &boxes), Some(0));
        assert_eq!(ids(pipeline.display_columns()), vec!["a", "b", "c"]);

        assert_eq!(pipeline.drag_column_over(260.0, &boxes), Some(2));
        assert_eq!(ids(pipeline.display_columns()), vec!["b", "c", "a"]);

        pipeline.end_drag(Some("c")).await.unwrap();
        assert_eq!(ids(pipeline.columns()), vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_layout_edits_wait_for_the_drop() {
        let (_backend, mut pipeline) = board().await;
        pipeline
            .start_drag(DragSource::Column { column_id: "a".into() }, ORIGIN)
            .unwrap();
        pipeline.drag_move(FAR, Some("c"));

        let deleted = pipeline.delete_column(&ColumnId::from("b")).await;
        assert!(matches!(deleted, Err(PipelineError::DragInProgress)));
        let added = pipeline.add_column(NewColumn::new("Extra")).await;
        assert!(matches!(added, Err(PipelineError::DragInProgress)));
        let renamed = pipeline.rename_column(&ColumnId::from("b"), "Bee").await;
        assert!(matches!(renamed, Err(PipelineError::DragInProgress)));
        assert_eq!(ids(pipeline.columns()), vec!["a", "b", "c"]);

        pipeline.end_drag(Some("c")).await.unwrap();
        let mut committed = ids(pipeline.columns());
        assert_eq!(committed, vec!["b", "c", "a"]);
        committed.sort_unstable();
        assert_eq!(committed, vec!["a", "b", "c"]);
        for (index, column) in pipeline.columns().iter().enumerate() {
            assert_eq!(column.order, index);
        }

        assert!(pipeline.delete_column(&ColumnId::from("b")).await.unwrap());
        assert_eq!(ids(pipeline.columns()), vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_failed_commit_settles_and_keeps_state() {
        let (backend, mut pipeline) = board().await;
        pipeline
            .start_drag(DragSource::Column { column_id: "a".into() }, ORIGIN)
            .unwrap();
        pipeline.drag_move(FAR, Some("c"));

        backend.set_read_only(true);
        assert!(pipeline.end_drag(Some("c")).await.is_err());
        assert_eq!(pipeline.drag_phase(), DragPhase::Idle);
        assert_eq!(ids(pipeline.display_columns()), vec!["a", "b", "c"]);
    }
}
