//! Column manager half of the container

use super::{Notice, Pipeline};
use crate::column::{AddColumn, DeleteColumn, SetColumns, UpdateColumn};
use crate::defaults::{MAX_COLUMNS, MIN_COLUMNS};
use crate::drag::DragPhase;
use crate::error::{PipelineError, Result};
use crate::types::{renumber, Column, ColumnId, ColumnPatch, NewColumn};
use std::collections::HashSet;

impl Pipeline {
    /// Replace the whole layout
    pub async fn update_columns(&mut self, columns: Vec<Column>) -> Result<Vec<Column>> {
        self.ensure_no_gesture("Could not update columns")?;
        match self.run_as::<_, Vec<Column>>(&SetColumns::new(columns)).await {
            Ok(columns) => {
                self.columns = columns.clone();
                self.notify(Notice::success("Columns updated"));
                Ok(columns)
            }
            Err(error) => Err(self.fail("Could not update columns", error)),
        }
    }

    /// Append a column; `None` when the board is already full
    pub async fn add_column(&mut self, column: NewColumn) -> Result<Option<Column>> {
        self.ensure_no_gesture("Could not add column")?;
        if self.columns.len() >= MAX_COLUMNS {
            self.notify(Notice::warning(format!(
                "A board holds at most {MAX_COLUMNS} columns"
            )));
            return Ok(None);
        }

        let mut op = AddColumn::new(column.title);
        op.color = column.color;
        match self.run_as::<_, Column>(&op).await {
            Ok(column) => {
                self.columns.push(column.clone());
                self.notify(Notice::success("Column added"));
                Ok(Some(column))
            }
            Err(error) => Err(self.fail("Could not add column", error)),
        }
    }

    /// Delete a column; `false` when it is the last one.
    ///
    /// Leads in the deleted column move to the new first column, so the lead
    /// list is reloaded afterwards.
    pub async fn delete_column(&mut self, id: &ColumnId) -> Result<bool> {
        self.ensure_no_gesture("Could not delete column")?;
        if self.columns.len() <= MIN_COLUMNS {
            self.notify(Notice::warning("A board needs at least one column"));
            return Ok(false);
        }

        if let Err(error) = self.run(&DeleteColumn::new(id)).await {
            return Err(self.fail("Could not delete column", error));
        }
        self.columns.retain(|c| c.id != *id);
        renumber(&mut self.columns);
        self.notify(Notice::success("Column deleted"));
        self.refresh_leads().await?;
        Ok(true)
    }

    /// Put the columns in the given id order.
    ///
    /// `order` must name every committed column exactly once. An unchanged
    /// order writes nothing.
    pub async fn reorder_columns(&mut self, order: &[ColumnId]) -> Result<()> {
        self.ensure_no_gesture("Could not update columns")?;
        let known: HashSet<&ColumnId> = self.columns.iter().map(|c| &c.id).collect();
        let requested: HashSet<&ColumnId> = order.iter().collect();
        if order.len() != self.columns.len() || requested.len() != order.len() || requested != known {
            return Err(PipelineError::validation(
                "order",
                "must list every column exactly once",
            ));
        }
        if order.iter().eq(self.columns.iter().map(|c| &c.id)) {
            return Ok(());
        }

        let columns = order
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                self.column(id).map(|c| Column {
                    order: index,
                    ..c.clone()
                })
            })
            .collect();
        self.update_columns(columns).await.map(|_| ())
    }

    pub async fn rename_column(&mut self, id: &ColumnId, title: impl Into<String>) -> Result<Column> {
        self.patch_column(id, ColumnPatch::title(title)).await
    }

    pub async fn recolor_column(&mut self, id: &ColumnId, color: impl Into<String>) -> Result<Column> {
        self.patch_column(id, ColumnPatch::color(color)).await
    }

    async fn patch_column(&mut self, id: &ColumnId, patch: ColumnPatch) -> Result<Column> {
        self.ensure_no_gesture("Could not update column")?;
        match self.run_as::<_, Column>(&UpdateColumn::new(id, patch)).await {
            Ok(column) => {
                if let Some(slot) = self.columns.iter_mut().find(|c| c.id == column.id) {
                    *slot = column.clone();
                }
                self.notify(Notice::success("Column updated"));
                Ok(column)
            }
            Err(error) => Err(self.fail("Could not update column", error)),
        }
    }

    /// Layout edits are refused while a card or column is held; the drop's
    /// own write happens in the committed phase and goes through.
    fn ensure_no_gesture(&mut self, message: &str) -> Result<()> {
        match self.drag.phase() {
            DragPhase::DraggingCard | DragPhase::DraggingColumn => {
                Err(self.fail(message, PipelineError::DragInProgress))
            }
            DragPhase::Idle | DragPhase::Committed => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::PipelineContext;
    use crate::error::PipelineError;
    use crate::pipeline::{Notice, NoticeLevel, Pipeline};
    use crate::types::{Column, ColumnId, NewColumn, NewLead};

    async fn pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new(PipelineContext::in_memory());
        pipeline.load().await.unwrap();
        pipeline
    }

    fn ids(pipeline: &Pipeline) -> Vec<&str> {
        pipeline.columns().iter().map(|c| c.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_until_full() {
        let mut pipeline = pipeline().await;
        for n in 0..3 {
            let added = pipeline
                .add_column(NewColumn::new(format!("Stage {n}")).with_color("#123456"))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(added.order, 7 + n);
            assert_eq!(added.color.as_deref(), Some("#123456"));
        }
        pipeline.take_notices();

        let refused = pipeline.add_column(NewColumn::new("Too many")).await.unwrap();
        assert!(refused.is_none());
        assert_eq!(pipeline.columns().len(), 10);
        assert_eq!(pipeline.take_notices()[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_delete_repoints_and_reloads() {
        let mut pipeline = pipeline().await;
        let lead = pipeline
            .create_lead(NewLead::new("Ana", "ana@example.com", "qualified"))
            .await
            .unwrap();

        assert!(pipeline.delete_column(&"qualified".into()).await.unwrap());
        assert_eq!(pipeline.columns().len(), 6);
        assert!(pipeline
            .columns()
            .iter()
            .enumerate()
            .all(|(index, c)| c.order == index));
        assert_eq!(pipeline.lead(&lead.id).unwrap().status, "new");
    }

    #[tokio::test]
    async fn test_last_column_is_kept() {
        let mut pipeline = pipeline().await;
        pipeline
            .update_columns(vec![Column::new("only", "Only", 0)])
            .await
            .unwrap();

        assert!(!pipeline.delete_column(&"only".into()).await.unwrap());
        assert_eq!(ids(&pipeline), vec!["only"]);
    }

    #[tokio::test]
    async fn test_reorder() {
        let mut pipeline = pipeline().await;
        pipeline
            .update_columns(vec![
                Column::new("a", "A", 0),
                Column::new("b", "B", 1),
                Column::new("c", "C", 2),
            ])
            .await
            .unwrap();
        let writes = pipeline.activity(None).await.unwrap().len();

        let order: Vec<ColumnId> = vec!["c".into(), "a".into(), "b".into()];
        pipeline.reorder_columns(&order).await.unwrap();
        assert_eq!(ids(&pipeline), vec!["c", "a", "b"]);
        assert_eq!(pipeline.activity(None).await.unwrap().len(), writes + 1);

        pipeline.reorder_columns(&order).await.unwrap();
        assert_eq!(pipeline.activity(None).await.unwrap().len(), writes + 1);

        pipeline.refresh_columns().await.unwrap();
        assert_eq!(ids(&pipeline), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_reorder_requires_permutation() {
        let mut pipeline = pipeline().await;
        let mut order: Vec<ColumnId> = pipeline.columns().iter().map(|c| c.id.clone()).collect();
        order.pop();
        let result = pipeline.reorder_columns(&order).await;
        assert!(matches!(result, Err(PipelineError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_rename_and_recolor() {
        let mut pipeline = pipeline().await;
        pipeline.rename_column(&"won".into(), "Closed").await.unwrap();
        pipeline.recolor_column(&"won".into(), "#ffffff").await.unwrap();

        let won = pipeline.column(&"won".into()).unwrap();
        assert_eq!(won.title, "Closed");
        assert_eq!(won.color.as_deref(), Some("#ffffff"));
        assert_eq!(won.order, 5);

        let notices = pipeline.take_notices();
        assert_eq!(notices.last(), Some(&Notice::success("Column updated")));
    }
}
