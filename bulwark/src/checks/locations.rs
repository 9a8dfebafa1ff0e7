//! Collecting offending cells for violation messages.

use crate::core::Table;
use crate::logging::truncate_field;

/// At most this many locations are spelled out in a message.
const MAX_REPORTED: usize = 10;

/// Upper bound on the length of a violation message.
const MAX_MESSAGE_LENGTH: usize = 1024;

/// Offending `(row label, column)` pairs found by a cell-level scan.
#[derive(Debug, Default)]
pub(crate) struct BadLocations {
    cells: Vec<(String, String)>,
    total: usize,
}

impl BadLocations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, table: &Table, row: usize, column: &str) {
        self.total += 1;
        if self.cells.len() < MAX_REPORTED {
            self.cells.push((table.row_label(row), column.to_string()));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Renders `"{prefix}: 3 offending cell(s) at (row, column): (0, 'a'), ..."`.
    pub(crate) fn describe(&self, prefix: &str) -> String {
        let listed: Vec<String> = self
            .cells
            .iter()
            .map(|(row, column)| format!("({row}, '{column}')"))
            .collect();
        let mut message = format!(
            "{prefix}: {} offending cell(s) at (row, column): {}",
            self.total,
            listed.join(", ")
        );
        if self.total > self.cells.len() {
            message.push_str(&format!(" and {} more", self.total - self.cells.len()));
        }
        truncate_field(&message, MAX_MESSAGE_LENGTH)
    }
}
