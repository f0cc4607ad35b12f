//! Column commands

mod add;
mod delete;
mod list;
mod set;
mod update;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use list::ListColumns;
pub use set::SetColumns;
pub use update::UpdateColumn;

use crate::defaults::{MAX_COLUMNS, MIN_COLUMNS};
use crate::error::{PipelineError, Result};
use crate::types::validate_title;
use crate::types::Column;
use std::collections::HashSet;

/// Check a complete column layout before it replaces the stored one.
///
/// The count must stay within `MIN_COLUMNS..=MAX_COLUMNS`, ids must be
/// unique, titles non-empty, and orders a permutation of `0..len`.
pub fn check_layout(columns: &[Column]) -> Result<()> {
    if columns.len() > MAX_COLUMNS {
        return Err(PipelineError::capacity(format!(
            "at most {MAX_COLUMNS} columns are allowed, got {}",
            columns.len()
        )));
    }
    if columns.len() < MIN_COLUMNS {
        return Err(PipelineError::capacity("a board needs at least one column"));
    }

    let mut ids = HashSet::new();
    let mut orders = vec![false; columns.len()];
    for column in columns {
        if !ids.insert(column.id.as_str()) {
            return Err(PipelineError::validation(
                "id",
                format!("duplicate column id {}", column.id),
            ));
        }
        validate_title(&column.title)?;
        match orders.get_mut(column.order) {
            Some(seen) if !*seen => *seen = true,
            _ => {
                return Err(PipelineError::validation(
                    "order",
                    format!("orders must be 0..{} without gaps", columns.len()),
                ))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;

    #[test]
    fn test_defaults_pass() {
        check_layout(&default_columns()).unwrap();
    }

    #[test]
    fn test_count_bounds() {
        assert!(matches!(
            check_layout(&[]),
            Err(PipelineError::CapacityExceeded { .. })
        ));

        let eleven: Vec<_> = (0..11)
            .map(|i| Column::new(format!("c{i}"), format!("C{i}"), i))
            .collect();
        assert!(matches!(
            check_layout(&eleven),
            Err(PipelineError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_order_gaps_rejected() {
        let columns = vec![Column::new("a", "A", 0), Column::new("b", "B", 2)];
        assert!(matches!(
            check_layout(&columns),
            Err(PipelineError::Validation { ref field, .. }) if field == "order"
        ));

        let columns = vec![Column::new("a", "A", 1), Column::new("b", "B", 1)];
        assert!(check_layout(&columns).is_err());
    }

    #[test]
    fn test_duplicate_ids_and_blank_titles() {
        let columns = vec![Column::new("a", "A", 0), Column::new("a", "B", 1)];
        assert!(check_layout(&columns).is_err());

        let columns = vec![Column::new("a", "  ", 0)];
        assert!(check_layout(&columns).is_err());
    }
}
