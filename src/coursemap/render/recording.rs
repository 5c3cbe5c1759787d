use super::surface::{wrap, DrawingService, TableSpec, TextStyle};
use crate::error::{CourseMapError, Result};
use std::fs;
use std::path::Path;

/// One call made against a [`RecordingSurface`], tagged with its 1-based page.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Text {
        page: usize,
        lines: Vec<String>,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Table {
        page: usize,
        table: TableSpec,
        final_y: f32,
    },
    NewPage,
}

/// A surface that lays out nothing and remembers everything.
///
/// Text is one unit wide per column, so `max_width` is a column count.
/// Tables never paginate: a table is `(1 + tallest cell) * row_height` high.
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    pages: usize,
    row_height: f32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl RecordingSurface {
    pub fn new(row_height: f32) -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            row_height,
        }
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Every text op as `(page, y, lines)`.
    pub fn texts(&self) -> Vec<(usize, f32, &[String])> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Text { page, y, lines, .. } => Some((*page, *y, lines.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// The page and `y` of the first text op whose first line is `line`.
    pub fn find_text(&self, line: &str) -> Option<(usize, f32)> {
        self.texts()
            .into_iter()
            .find(|(_, _, lines)| lines.first().map(String::as_str) == Some(line))
            .map(|(page, y, _)| (page, y))
    }

    pub fn tables(&self) -> Vec<(usize, &TableSpec)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Table { page, table, .. } => Some((*page, table)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingService for RecordingSurface {
    fn measure_wrapped_lines(&self, text: &str, max_width: f32, _font_size: f32) -> Vec<String> {
        wrap(text, max_width.floor() as usize)
    }

    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, style: TextStyle) {
        self.ops.push(SurfaceOp::Text {
            page: self.pages,
            lines: lines.to_vec(),
            x,
            y,
            style,
        });
    }

    fn draw_table(&mut self, table: &TableSpec) -> f32 {
        let tallest = table
            .body
            .iter()
            .flatten()
            .map(|cell| cell.split('\n').count())
            .max()
            .unwrap_or(0);
        let final_y = table.start_y + (1 + tallest) as f32 * self.row_height;
        self.ops.push(SurfaceOp::Table {
            page: self.pages,
            table: table.clone(),
            final_y,
        });
        final_y
    }

    fn new_page(&mut self) {
        self.pages += 1;
        self.ops.push(SurfaceOp::NewPage);
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    /// Writes one line per op.
    fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::new();
        for op in &self.ops {
            let line = match op {
                SurfaceOp::Text { page, lines, x, y, .. } => {
                    format!("text page={} x={} y={} {:?}", page, x, y, lines)
                }
                SurfaceOp::Table {
                    page,
                    table,
                    final_y,
                } => format!(
                    "table page={} start_y={} final_y={} {:?}",
                    page, table.start_y, final_y, table.body
                ),
                SurfaceOp::NewPage => "new_page".to_string(),
            };
            out.push_str(&line);
            out.push('\n');
        }
        fs::write(path, out).map_err(CourseMapError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(body: &[&str]) -> TableSpec {
        TableSpec {
            header: vec!["H".into()],
            body: vec![body.iter().map(|s| s.to_string()).collect()],
            start_y: 40.0,
            column_widths: vec![10.0],
            font_size: 8.0,
        }
    }

    #[test]
    fn test_table_height_follows_tallest_cell() {
        let mut surface = RecordingSurface::default();
        assert_eq!(surface.draw_table(&table(&["a\nb\nc", "d"])), 60.0);
        assert_eq!(surface.draw_table(&table(&[""])), 50.0);
    }

    #[test]
    fn test_ops_are_tagged_with_pages() {
        let mut surface = RecordingSurface::default();
        let style = TextStyle {
            font_size: 11.0,
            line_height: 5.0,
            align: Default::default(),
        };
        surface.draw_text(&["one".into()], 14.0, 20.0, style);
        surface.new_page();
        surface.draw_text(&["two".into()], 14.0, 20.0, style);

        assert_eq!(surface.page_count(), 2);
        assert_eq!(surface.find_text("one"), Some((1, 20.0)));
        assert_eq!(surface.find_text("two"), Some((2, 20.0)));
        assert_eq!(surface.ops().len(), 3);
    }
}
