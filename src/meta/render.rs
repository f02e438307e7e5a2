//! Bridge from any [`Sheet`] to a ratatui `Table`

use std::str::FromStr;

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table},
};

use super::sheet::{RowHint, Sheet};
use crate::options::{OptionRegistry, Scope};

/// Colours used for row and column hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub error: Color,
    pub warning: Color,
    pub key: Color,
    pub hidden: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warning: Color::Yellow,
            key: Color::Cyan,
            hidden: Color::DarkGray,
        }
    }
}

impl Palette {
    /// Read the `color_*` options at `scope`; unparseable colours keep the default
    pub fn from_options(options: &OptionRegistry, scope: Scope) -> Self {
        let defaults = Self::default();
        let color = |name: &str, fallback: Color| {
            options
                .get(name, scope)
                .ok()
                .and_then(|v| v.as_str().and_then(|s| Color::from_str(s).ok()))
                .unwrap_or(fallback)
        };
        Self {
            error: color("color_error", defaults.error),
            warning: color("color_warning", defaults.warning),
            key: color("color_key_col", defaults.key),
            hidden: color("color_hidden_col", defaults.hidden),
        }
    }

    pub fn row_style(&self, hint: RowHint) -> Style {
        match hint {
            RowHint::None => Style::default(),
            RowHint::Error => Style::default().fg(self.error),
            RowHint::Warning => Style::default().fg(self.warning),
            RowHint::Key => Style::default().fg(self.key),
            RowHint::Hidden => Style::default().fg(self.hidden),
        }
    }
}

/// Build a table widget for `sheet`.
///
/// Zero-width columns are left out unless the `visibility` option is 1 or
/// more. Columns without a width use `default_width`.
pub fn sheet_table(sheet: &dyn Sheet, options: &OptionRegistry, scope: Scope) -> Table<'static> {
    let palette = Palette::from_options(options, scope);
    let visibility = options
        .get("visibility", scope)
        .ok()
        .and_then(|v| v.as_int())
        .unwrap_or(0);
    let default_width = options
        .get("default_width", scope)
        .ok()
        .and_then(|v| v.as_int())
        .and_then(|w| u16::try_from(w).ok())
        .unwrap_or(20);

    let headers = sheet.headers();
    let shown: Vec<usize> = (0..headers.len())
        .filter(|&i| visibility >= 1 || !headers[i].is_hidden())
        .collect();

    let widths: Vec<Constraint> = shown
        .iter()
        .map(|&i| match headers[i].width {
            Some(w) if w > 0 => Constraint::Length(u16::try_from(w).unwrap_or(u16::MAX)),
            _ => Constraint::Length(default_width),
        })
        .collect();

    let header = Row::new(shown.iter().map(|&i| {
        let style = if headers[i].key {
            Style::default().fg(palette.key).add_modifier(Modifier::BOLD)
        } else if headers[i].is_hidden() {
            Style::default().fg(palette.hidden).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Cell::from(headers[i].name.clone()).style(style)
    }));

    let rows: Vec<Row<'static>> = (0..sheet.row_count())
        .map(|row| {
            let cells = shown.iter().map(|&col| {
                let cell = Cell::from(sheet.cell_display(row, col));
                if headers[col].key {
                    cell.style(Style::default().fg(palette.key))
                } else {
                    cell
                }
            });
            Row::new(cells.collect::<Vec<_>>()).style(palette.row_style(sheet.row_hint(row)))
        })
        .collect();

    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
}
