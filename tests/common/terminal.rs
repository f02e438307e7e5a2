//! Rendering meta views into ratatui's TestBackend

use metaview::{sheet_table, Scope, Sheet, SharedOptions};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Draw `sheet` full-screen into a `width` x `height` test terminal
pub fn render_sheet(
    sheet: &dyn Sheet,
    options: &SharedOptions,
    width: u16,
    height: u16,
) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
        .draw(|f| {
            let table = sheet_table(sheet, &options.read(), Scope::Global);
            f.render_widget(table, f.area());
        })
        .expect("Failed to draw sheet");
    terminal
}

/// Convert a buffer to a string, trimming trailing whitespace per line
pub fn buffer_to_trimmed_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Check if the buffer contains a string anywhere
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    buffer_to_trimmed_string(buffer).contains(text)
}
