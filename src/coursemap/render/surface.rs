//! The drawing boundary between the renderer and an output backend.

use crate::error::Result;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    /// `x` is the centre of the line.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Distance between successive lines of one `draw_text` call.
    pub line_height: f32,
    pub align: Align,
}

/// A single-row table: one header row and body rows whose cells may hold
/// several `\n`-separated lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub start_y: f32,
    pub column_widths: Vec<f32>,
    pub font_size: f32,
}

/// Output backend driven by [`crate::render::DocumentRenderer`].
///
/// A surface starts with one empty page. Coordinates are in the units of the
/// layout the renderer was given, with `y` growing down the page.
pub trait DrawingService {
    /// Word-wrap `text` to `max_width`. Embedded newlines always break.
    /// Empty text yields a single empty line.
    fn measure_wrapped_lines(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String>;

    /// Draw `lines` starting at baseline `y`, `style.line_height` apart.
    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, style: TextStyle);

    /// Draw a table starting at `start_y`, breaking pages as needed.
    /// Returns the `y` just below the table on the page where it ended.
    fn draw_table(&mut self, table: &TableSpec) -> f32;

    fn new_page(&mut self);

    fn page_count(&self) -> usize;

    /// Write the finished document.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Greedy word wrap to `columns` display columns. Words wider than a line
/// are split between characters.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    wrap_by(text, columns.max(1) as f32, |s| s.width() as f32)
}

/// Greedy word wrap to `limit`, in whatever unit `width_of` measures.
pub fn wrap_by<F: Fn(&str) -> f32>(text: &str, limit: f32, width_of: F) -> Vec<String> {
    let space = width_of(" ");
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = width_of(word);
            if !line.is_empty() && line_width + space + word_width > limit {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }

            if word_width > limit {
                let mut buf = [0; 4];
                for ch in word.chars() {
                    let w = width_of(ch.encode_utf8(&mut buf));
                    if !line.is_empty() && line_width + w > limit {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += w;
                }
                continue;
            }

            if !line.is_empty() {
                line.push(' ');
                line_width += space;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }

    lines
}
