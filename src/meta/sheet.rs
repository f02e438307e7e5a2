//! The table interface the display machinery consumes

use crate::error::Result;
use crate::undo::UndoRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub name: String,
    pub width: Option<usize>,
    pub key: bool,
}

impl ColumnHeader {
    pub fn is_hidden(&self) -> bool {
        self.width == Some(0)
    }
}

/// Presentation hint for a whole row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowHint {
    #[default]
    None,
    Warning,
    Error,
    Key,
    Hidden,
}

pub trait Sheet {
    fn name(&self) -> String;

    /// Owner context used to find the commands reachable from this sheet
    fn context(&self) -> &'static str;

    fn headers(&self) -> Vec<ColumnHeader>;

    fn row_count(&self) -> usize;

    fn cell_display(&self, row: usize, col: usize) -> String;

    /// Write user input into a cell, returning how to undo it
    fn set_cell(&mut self, row: usize, col: usize, input: &str) -> Result<UndoRecord>;

    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, row: usize);

    fn selection(&self) -> Vec<usize>;

    fn row_hint(&self, _row: usize) -> RowHint {
        RowHint::None
    }

    /// Rebuild the row set from the live source
    fn reload(&mut self);

    /// Tab separated dump of the shown columns, header first
    fn text_dump(&self, show_hidden: bool) -> String {
        let headers = self.headers();
        let shown: Vec<usize> = (0..headers.len())
            .filter(|&i| show_hidden || !headers[i].is_hidden())
            .collect();

        let mut lines = Vec::with_capacity(self.row_count() + 1);
        lines.push(
            shown
                .iter()
                .map(|&i| headers[i].name.as_str())
                .collect::<Vec<_>>()
                .join("\t"),
        );
        for row in 0..self.row_count() {
            let cells: Vec<String> = shown.iter().map(|&col| self.cell_display(row, col)).collect();
            lines.push(cells.join("\t").trim_end().to_string());
        }
        lines.join("\n")
    }
}
