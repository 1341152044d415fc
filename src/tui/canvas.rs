use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::style::Style;

/// Painter over a frame buffer that silently drops anything outside it.
///
/// Rows and columns are signed so animated content can drift off the edge.
pub struct Canvas<'a> {
    buf: &'a mut Buffer,
    cursor: Option<Position>,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf, cursor: None }
    }

    pub fn width(&self) -> u16 {
        self.buf.area.width
    }

    pub fn height(&self) -> u16 {
        self.buf.area.height
    }

    pub fn paint(&mut self, row: i32, col: i32, text: &str, style: Style) {
        let width = i32::from(self.width());
        if row < 0 || row >= i32::from(self.height()) {
            return;
        }
        let skip = if col < 0 { col.unsigned_abs() as usize } else { 0 };
        let col = col.max(0);
        if col >= width {
            return;
        }
        let available = (width - col) as usize;
        let visible: String = text.chars().skip(skip).take(available).collect();
        if visible.is_empty() {
            return;
        }
        let x = self.buf.area.x + col as u16;
        let y = self.buf.area.y + row as u16;
        self.buf.set_stringn(x, y, &visible, available, style);
    }

    /// Shows the text cursor at the given cell, pulling the column back
    /// inside the surface. Rows outside the surface are ignored.
    pub fn place_cursor(&mut self, row: i32, col: i32) {
        let width = i32::from(self.width());
        if row < 0 || row >= i32::from(self.height()) || width == 0 {
            return;
        }
        let col = col.clamp(0, width - 1);
        self.cursor = Some(Position::new(
            self.buf.area.x + col as u16,
            self.buf.area.y + row as u16,
        ));
    }

    pub fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::style::Modifier;

    use super::*;

    fn surface(width: u16, height: u16) -> Buffer {
        Buffer::empty(Rect::new(0, 0, width, height))
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn rows_outside_surface_leave_it_untouched() {
        let mut buf = surface(10, 3);
        let before = buf.clone();
        let mut canvas = Canvas::new(&mut buf);
        for row in [-5, -1, 3, 4, 100] {
            for col in [-20, -1, 0, 5, 9, 10, 50] {
                canvas.paint(row, col, "hello", Style::default());
            }
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn negative_column_trims_left_edge() {
        let mut buf = surface(10, 1);
        Canvas::new(&mut buf).paint(0, -2, "abcdef", Style::default());
        assert_eq!(row_text(&buf, 0), "cdef      ");
    }

    #[test]
    fn text_is_clipped_at_right_edge() {
        let mut buf = surface(6, 1);
        let mut canvas = Canvas::new(&mut buf);
        canvas.paint(0, 3, "abcdef", Style::default().add_modifier(Modifier::BOLD));
        canvas.paint(0, 6, "zzz", Style::default());
        assert_eq!(row_text(&buf, 0), "   abc");
        assert!(buf[(5, 0)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn cursor_column_is_clamped() {
        let mut buf = surface(8, 2);
        let mut canvas = Canvas::new(&mut buf);
        canvas.place_cursor(1, 40);
        assert_eq!(canvas.cursor(), Some(Position::new(7, 1)));
        canvas.place_cursor(0, -3);
        assert_eq!(canvas.cursor(), Some(Position::new(0, 0)));
        canvas.place_cursor(5, 1);
        assert_eq!(canvas.cursor(), Some(Position::new(0, 0)));
        canvas.hide_cursor();
        assert_eq!(canvas.cursor(), None);
    }
}
