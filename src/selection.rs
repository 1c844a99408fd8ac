//! Per-row selection and evidence state.
//!
//! One instance per open rubric. This is the single source of truth for
//! which level is chosen in each row; the UI only reads it.
//!
//! Each row is either unselected (initial) or has exactly one selected
//! column. `select` always overwrites, and there is no way back to
//! unselected.

use std::collections::HashMap;

use crate::rubric::ItemId;

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selections: HashMap<ItemId, ItemId>,
    evidence: HashMap<ItemId, String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `column_id` the selected level for `row_id`, replacing any previous choice
    pub fn select(&mut self, row_id: impl Into<ItemId>, column_id: impl Into<ItemId>) {
        let row_id = row_id.into();
        let column_id = column_id.into();
        tracing::debug!("Row {} -> column {}", row_id, column_id);
        self.selections.insert(row_id, column_id);
    }

    /// Store free-text evidence for a row, overwriting the previous value
    pub fn set_evidence(&mut self, row_id: impl Into<ItemId>, text: impl Into<String>) {
        self.evidence.insert(row_id.into(), text.into());
    }

    pub fn selection(&self, row_id: impl Into<ItemId>) -> Option<&ItemId> {
        self.selections.get(&row_id.into())
    }

    /// Evidence for a row, "" if none was entered
    pub fn evidence(&self, row_id: impl Into<ItemId>) -> &str {
        self.evidence
            .get(&row_id.into())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether `column_id` is the current selection of `row_id`
    pub fn is_selected(&self, row_id: impl Into<ItemId>, column_id: impl Into<ItemId>) -> bool {
        self.selection(row_id) == Some(&column_id.into())
    }

    /// Number of rows with a selection
    pub fn selected_count(&self) -> usize {
        self.selections.len()
    }
}
