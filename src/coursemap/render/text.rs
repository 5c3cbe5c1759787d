//! Plain-text backend: every page is a fixed grid of monospace cells.

use super::layout::PageLayout;
use super::surface::{wrap, Align, DrawingService, TableSpec, TextStyle};
use crate::error::{CourseMapError, Result};
use log::debug;
use std::fs;
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of one character cell.
pub const CELL_WIDTH: f32 = 2.0;
/// Height of one text row.
pub const ROW_HEIGHT: f32 = 5.0;

const PAGE_BREAK: &str = "\u{c}";

/// `None` is the right half of a double-width character.
type Grid = Vec<Vec<Option<char>>>;

/// Draws onto character grids and saves them as text, one form feed between
/// pages. Font sizes are ignored. Tables are bordered and continue on a new
/// page, header repeated, once they reach the bottom margin, which mirrors
/// the layout's top margin.
pub struct TextSurface {
    columns: usize,
    rows: usize,
    /// Tables start here.
    left_col: usize,
    top_row: usize,
    bottom_row: usize,
    pages: Vec<Grid>,
}

impl TextSurface {
    pub fn new(layout: &PageLayout) -> Self {
        let columns = (layout.width / CELL_WIDTH).floor() as usize;
        let rows = (layout.height / ROW_HEIGHT).floor() as usize;
        let top_row = to_row(layout.top_margin);
        let bottom_row = to_row(layout.height - layout.top_margin).min(rows.saturating_sub(1));
        Self {
            columns,
            rows,
            left_col: to_col(layout.margin),
            top_row,
            bottom_row,
            pages: vec![blank(columns, rows)],
        }
    }

    /// Each page as text, trailing blanks trimmed.
    pub fn pages(&self) -> Vec<String> {
        self.pages.iter().map(page_text).collect()
    }

    pub fn to_text(&self) -> String {
        let mut text = self.pages().join(&format!("\n{}", PAGE_BREAK));
        text.push('\n');
        text
    }

    fn put(&mut self, col: usize, row: usize, text: &str) {
        if row >= self.rows {
            return;
        }
        let columns = self.columns;
        let Some(grid) = self.pages.last_mut() else {
            return;
        };
        let cells = &mut grid[row];
        let mut col = col;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col + w > columns {
                break;
            }
            cells[col] = Some(ch);
            if w == 2 {
                cells[col + 1] = None;
            }
            col += w;
        }
    }

    fn rule(&mut self, col: usize, row: usize, widths: &[usize]) {
        let mut line = String::new();
        for w in widths {
            line.push('+');
            line.push_str(&"-".repeat(w - 1));
        }
        line.push('+');
        self.put(col, row, &line);
    }

    fn cells(&mut self, col: usize, row: usize, widths: &[usize], cells: &[String]) {
        let mut line = String::new();
        for (w, cell) in widths.iter().zip(cells) {
            line.push_str("| ");
            line.push_str(cell);
            line.push_str(&" ".repeat((w - 2).saturating_sub(cell.width())));
        }
        line.push('|');
        self.put(col, row, &line);
    }

    /// Draws the header with its rules and returns the first body row.
    fn header(&mut self, col: usize, row: usize, widths: &[usize], header: &[Vec<String>]) -> usize {
        let mut row = row;
        self.rule(col, row, widths);
        row += 1;
        for line in header {
            self.cells(col, row, widths, line);
            row += 1;
        }
        self.rule(col, row, widths);
        row + 1
    }
}

impl DrawingService for TextSurface {
    fn measure_wrapped_lines(&self, text: &str, max_width: f32, _font_size: f32) -> Vec<String> {
        wrap(text, (max_width / CELL_WIDTH).floor() as usize)
    }

    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, style: TextStyle) {
        for (k, line) in lines.iter().enumerate() {
            let row = to_row(y + k as f32 * style.line_height);
            let col = match style.align {
                Align::Left => to_col(x),
                Align::Center => to_col(x).saturating_sub(line.width() / 2),
            };
            self.put(col, row, line);
        }
    }

    fn draw_table(&mut self, table: &TableSpec) -> f32 {
        let widths: Vec<usize> = table
            .column_widths
            .iter()
            .map(|w| ((w / CELL_WIDTH).floor() as usize).max(3))
            .collect();
        let col = self.left_col;
        let header = row_lines(&table.header, &widths);

        let mut row = to_row(table.start_y);
        if row > self.top_row && row + header.len() + 3 > self.bottom_row {
            self.new_page();
            row = self.top_row;
        }
        row = self.header(col, row, &widths, &header);

        for cells in &table.body {
            let mut placed = false;
            for line in row_lines(cells, &widths) {
                if placed && row + 1 > self.bottom_row {
                    self.rule(col, row, &widths);
                    self.new_page();
                    debug!(
                        "event=table_continued module=render page={}",
                        self.pages.len()
                    );
                    row = self.header(col, self.top_row, &widths, &header);
                }
                self.cells(col, row, &widths, &line);
                row += 1;
                placed = true;
            }
            self.rule(col, row, &widths);
            row += 1;
        }

        row as f32 * ROW_HEIGHT
    }

    fn new_page(&mut self) {
        self.pages.push(blank(self.columns, self.rows));
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text()).map_err(CourseMapError::Io)
    }
}

fn to_row(y: f32) -> usize {
    (y.max(0.0) / ROW_HEIGHT).floor() as usize
}

fn to_col(x: f32) -> usize {
    (x.max(0.0) / CELL_WIDTH).floor() as usize
}

fn blank(columns: usize, rows: usize) -> Grid {
    vec![vec![Some(' '); columns]; rows]
}

fn page_text(grid: &Grid) -> String {
    let mut lines: Vec<String> = grid
        .iter()
        .map(|row| {
            let line: String = row.iter().flatten().collect();
            line.trim_end().to_string()
        })
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Wraps every cell to its column and transposes into printable lines.
fn row_lines(cells: &[String], widths: &[usize]) -> Vec<Vec<String>> {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| wrap(cells.get(i).map(String::as_str).unwrap_or(""), w - 2))
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|k| {
            wrapped
                .iter()
                .map(|lines| lines.get(k).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> TextStyle {
        TextStyle {
            font_size: 11.0,
            line_height: 5.0,
            align: Align::Left,
        }
    }

    fn table(start_y: f32, objectives: usize) -> TableSpec {
        let cell = (1..=objectives)
            .map(|i| format!("1.{} Objective", i))
            .collect::<Vec<_>>()
            .join("\n");
        TableSpec {
            header: vec!["Objectives".into(), "Mapped SLOs".into()],
            body: vec![vec![cell, "A".into()]],
            start_y,
            column_widths: vec![50.0, 30.0],
            font_size: 8.0,
        }
    }

    #[test]
    fn test_text_lands_on_grid() {
        let mut surface = TextSurface::new(&PageLayout::default());
        surface.draw_text(&["Description:".into(), "About X".into()], 14.0, 35.0, style());

        let page = &surface.pages()[0];
        let lines: Vec<&str> = page.lines().collect();
        assert_eq!(lines[7], "       Description:");
        assert_eq!(lines[8], "       About X");
    }

    #[test]
    fn test_centered_text() {
        let mut surface = TextSurface::new(&PageLayout::default());
        let centered = TextStyle {
            align: Align::Center,
            ..style()
        };
        surface.draw_text(&["Course Map".into()], 148.5, 15.0, centered);

        let page = &surface.pages()[0];
        let line = page.lines().nth(3).unwrap();
        assert_eq!(line.trim(), "Course Map");
        assert_eq!(line.len() - line.trim_start().len(), 74 - 5);
    }

    #[test]
    fn test_short_table_fits_on_page() {
        let mut surface = TextSurface::new(&PageLayout::default());
        let final_y = surface.draw_table(&table(50.0, 3));

        assert_eq!(surface.page_count(), 1);
        // rule, header, rule, three lines, rule
        assert_eq!(final_y, (10 + 7) as f32 * ROW_HEIGHT);
        let page = &surface.pages()[0];
        assert!(page.contains("| Objectives"));
        assert!(page.contains("| 1.3 Objective"));
    }

    #[test]
    fn test_long_table_continues_with_header() {
        let mut surface = TextSurface::new(&PageLayout::default());
        let final_y = surface.draw_table(&table(100.0, 40));

        assert_eq!(surface.page_count(), 2);
        let pages = surface.pages();
        for page in &pages {
            assert_eq!(page.matches("| Objectives").count(), 1);
        }
        assert!(pages[0].contains("1.1 Objective"));
        assert!(!pages[0].contains("1.40 Objective"));
        assert!(pages[1].contains("1.40 Objective"));
        // Nothing below the bottom margin.
        assert!(pages[0].lines().count() <= 39);
        assert!(final_y < 210.0);
    }

    #[test]
    fn test_table_that_cannot_start_moves_to_next_page() {
        let mut surface = TextSurface::new(&PageLayout::default());
        surface.draw_table(&table(185.0, 1));

        assert_eq!(surface.page_count(), 2);
        assert!(!surface.pages()[0].contains("Objectives"));
        assert!(surface.pages()[1].contains("1.1 Objective"));
    }

    #[test]
    fn test_save_separates_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        let mut surface = TextSurface::new(&PageLayout::default());
        surface.draw_text(&["one".into()], 14.0, 20.0, style());
        surface.new_page();
        surface.draw_text(&["two".into()], 14.0, 20.0, style());
        surface.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let pages: Vec<&str> = text.split(PAGE_BREAK).collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("one"));
        assert!(pages[1].contains("two"));
    }
}
