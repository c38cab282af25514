//! Operator approval over proposed row fixes.
//!
//! The gate is a pure in-memory selection over the fix preview. Rows with
//! validation errors can be toggled like any other row, but [`FixApprovalGate::approve`]
//! never lets them through: the approved set is always the intersection of
//! "selected" and "error-free".

use std::collections::BTreeSet;

use fleet_model::RowFix;

/// Selection state for the fix-approval step of one upload session.
#[derive(Debug, Clone)]
pub struct FixApprovalGate {
    rows: Vec<RowFix>,
    selected: BTreeSet<u32>,
    expanded: BTreeSet<u32>,
}

impl FixApprovalGate {
    /// Builds the gate with the default selection: every error-free row.
    pub fn new(rows: Vec<RowFix>) -> Self {
        let selected = rows
            .iter()
            .filter(|r| !r.has_errors())
            .map(|r| r.row_number)
            .collect();
        Self {
            rows,
            selected,
            expanded: BTreeSet::new(),
        }
    }

    pub fn rows(&self) -> &[RowFix] {
        &self.rows
    }

    pub fn is_selected(&self, row_number: u32) -> bool {
        self.selected.contains(&row_number)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flips the selection of one row. Unknown row numbers are ignored.
    pub fn toggle_row(&mut self, row_number: u32) {
        if !self.rows.iter().any(|r| r.row_number == row_number) {
            return;
        }
        if !self.selected.remove(&row_number) {
            self.selected.insert(row_number);
        }
    }

    /// Selects or clears every row at once.
    pub fn select_all(&mut self, selected: bool) {
        self.selected.clear();
        if selected {
            self.selected.extend(self.rows.iter().map(|r| r.row_number));
        }
    }

    /// Per-row detail disclosure for the preview. Display state only; it
    /// plays no part in what gets committed.
    pub fn toggle_details(&mut self, row_number: u32) {
        if !self.expanded.remove(&row_number) {
            self.expanded.insert(row_number);
        }
    }

    pub fn details_shown(&self, row_number: u32) -> bool {
        self.expanded.contains(&row_number)
    }

    /// The rows that are both selected and error-free, in source order.
    pub fn approve(&self) -> Vec<RowFix> {
        self.rows
            .iter()
            .filter(|r| self.selected.contains(&r.row_number) && !r.has_errors())
            .cloned()
            .collect()
    }
}
