//! PDF backend: text and bordered tables drawn with the standard Helvetica
//! font, written as an uncompressed PDF 1.4 file.
//!
//! Helvetica is one of the base fonts every viewer ships, so nothing is
//! embedded. Text goes out in WinAnsi encoding; characters outside Latin-1
//! are replaced with `?`.

use super::layout::PageLayout;
use super::surface::{wrap_by, Align, DrawingService, TableSpec, TextStyle};
use crate::error::{CourseMapError, Result};
use log::debug;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;
/// Space between a cell border and its text, in millimetres.
pub const CELL_PADDING: f32 = 2.0;
/// Table line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.15;

const HEADER_FILL: &str = "0.161 0.502 0.725 rg";
const GRID_STROKE: &str = "0.784 G";

/// Helvetica advance widths for `' '..='~'`, in thousandths of the font size.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];
const DEFAULT_WIDTH: u16 = 556;

/// Draws onto PDF content streams, one per page. Tables are bordered with a
/// filled header row and continue on a new page, header repeated, once they
/// reach the bottom margin. The bottom margin mirrors the layout's top margin.
pub struct PdfSurface {
    width: f32,
    height: f32,
    left: f32,
    top: f32,
    bottom: f32,
    pages: Vec<String>,
}

impl PdfSurface {
    pub fn new(layout: &PageLayout) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            left: layout.margin,
            top: layout.top_margin,
            bottom: layout.height - layout.top_margin,
            pages: vec![String::new()],
        }
    }

    /// The content stream of each page.
    pub fn page_streams(&self) -> &[String] {
        &self.pages
    }

    /// The complete file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = PdfWriter::default();
        let catalog = writer.reserve();
        let pages = writer.reserve();
        let font = writer.add(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .into(),
        );

        let mut kids = Vec::with_capacity(self.pages.len());
        for content in &self.pages {
            let stream = writer.add_stream(content);
            kids.push(writer.add(format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                pages,
                num(self.width * PT_PER_MM),
                num(self.height * PT_PER_MM),
                font,
                stream
            )));
        }

        let kids: Vec<String> = kids.iter().map(|id| format!("{} 0 R", id)).collect();
        writer.set(
            pages,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            ),
        );
        writer.set(catalog, format!("<< /Type /Catalog /Pages {} 0 R >>", pages));
        writer.finish(catalog)
    }

    fn out(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Writes one line with its left end at `x` and baseline at `y`.
    fn text(&mut self, line: &str, x: f32, y: f32, font_size: f32) {
        let x = num(x * PT_PER_MM);
        let y = num(self.pdf_y(y));
        let _ = writeln!(
            self.out(),
            "BT /F1 {} Tf {} {} Td ({}) Tj ET",
            num(font_size),
            x,
            y,
            escape(line)
        );
    }

    /// Emits a rectangle path whose top-left corner is at (`x`, `y`).
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, op: &str) {
        let (px, py) = (num(x * PT_PER_MM), num(self.pdf_y(y + h)));
        let _ = writeln!(
            self.out(),
            "{} {} {} {} re {}",
            px,
            py,
            num(w * PT_PER_MM),
            num(h * PT_PER_MM),
            op
        );
    }

    fn pdf_y(&self, y: f32) -> f32 {
        (self.height - y) * PT_PER_MM
    }

    /// Draws one band of cells, `lines` already wrapped and transposed, and
    /// returns the `y` below it.
    fn band(
        &mut self,
        y: f32,
        widths: &[f32],
        lines: &[Vec<String>],
        font_size: f32,
        header: bool,
    ) -> f32 {
        let lh = line_height(font_size);
        let h = lines.len() as f32 * lh + 2.0 * CELL_PADDING;

        let mut x = self.left;
        for w in widths {
            if header {
                self.out().push_str(HEADER_FILL);
                self.out().push('\n');
                self.rect(x, y, *w, h, "f");
            }
            self.out().push_str(GRID_STROKE);
            self.out().push('\n');
            self.rect(x, y, *w, h, "S");
            x += w;
        }

        self.out().push_str(if header { "1 g\n" } else { "0 g\n" });
        for (k, line) in lines.iter().enumerate() {
            let baseline = y + CELL_PADDING + k as f32 * lh + lh * 0.75;
            let mut x = self.left;
            for (w, cell) in widths.iter().zip(line) {
                if !cell.is_empty() {
                    self.text(cell, x + CELL_PADDING, baseline, font_size);
                }
                x += w;
            }
        }
        self.out().push_str("0 g\n");
        y + h
    }
}

impl DrawingService for PdfSurface {
    fn measure_wrapped_lines(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
        wrap_by(text, max_width, |s| text_width(s, font_size))
    }

    fn draw_text(&mut self, lines: &[String], x: f32, y: f32, style: TextStyle) {
        for (k, line) in lines.iter().enumerate() {
            let left = match style.align {
                Align::Left => x,
                Align::Center => x - text_width(line, style.font_size) / 2.0,
            };
            self.text(line, left, y + k as f32 * style.line_height, style.font_size);
        }
    }

    fn draw_table(&mut self, table: &TableSpec) -> f32 {
        let lh = line_height(table.font_size);
        let widths = &table.column_widths;
        let header = cell_lines(&table.header, widths, table.font_size);
        let header_height = header.len() as f32 * lh + 2.0 * CELL_PADDING;

        let mut y = table.start_y;
        if y > self.top && y + header_height + lh + 2.0 * CELL_PADDING > self.bottom {
            self.new_page();
            y = self.top;
        }
        y = self.band(y, widths, &header, table.font_size, true);

        for cells in &table.body {
            let lines = cell_lines(cells, widths, table.font_size);
            let mut remaining = lines.as_slice();
            let mut fresh = false;
            while !remaining.is_empty() {
                let room = ((self.bottom - y - 2.0 * CELL_PADDING) / lh).floor().max(0.0) as usize;
                let fit = if room == 0 && fresh { 1 } else { room };
                if fit == 0 {
                    self.new_page();
                    debug!(
                        "event=table_continued module=render backend=pdf page={}",
                        self.pages.len()
                    );
                    y = self.band(self.top, widths, &header, table.font_size, true);
                    fresh = true;
                    continue;
                }
                let (chunk, rest) = remaining.split_at(fit.min(remaining.len()));
                y = self.band(y, widths, chunk, table.font_size, false);
                remaining = rest;
                fresh = false;
            }
        }

        y
    }

    fn new_page(&mut self) {
        self.pages.push(String::new());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()).map_err(CourseMapError::Io)
    }
}

/// Width of `text` in millimetres at `font_size` points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * font_size / PT_PER_MM
}

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 0x20],
        _ => DEFAULT_WIDTH,
    }
}

fn line_height(font_size: f32) -> f32 {
    font_size * LINE_SPACING / PT_PER_MM
}

/// Wraps every cell to its column, less padding, and transposes into lines.
fn cell_lines(cells: &[String], widths: &[f32], font_size: f32) -> Vec<Vec<String>> {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            wrap_by(text, w - 2.0 * CELL_PADDING, |s| text_width(s, font_size))
        })
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

/// A literal string body in WinAnsi.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Numbers objects from 1 and records their byte offsets for the xref table.
#[derive(Default)]
struct PdfWriter {
    objects: Vec<String>,
}

impl PdfWriter {
    fn reserve(&mut self) -> usize {
        self.add(String::new())
    }

    fn add(&mut self, body: String) -> usize {
        self.objects.push(body);
        self.objects.len()
    }

    fn set(&mut self, id: usize, body: String) {
        self.objects[id - 1] = body;
    }

    fn add_stream(&mut self, content: &str) -> usize {
        self.add(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ))
    }

    fn finish(self, root: usize) -> Vec<u8> {
        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(self.objects.len());
        for (i, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, body);
        }

        let xref = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", self.objects.len() + 1);
        for offset in offsets {
            let _ = writeln!(out, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.objects.len() + 1,
            root,
            xref
        );
        out.into_bytes()
    }
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
    fn test_helvetica_metrics() {
        // 'i' is 222 units, 'M' 833.
        assert!(text_width("iiii", 10.0) < text_width("MM", 10.0));
        let one_em = text_width("W", 1000.0 * PT_PER_MM / 944.0);
        assert!((one_em - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_wrapping_follows_glyph_widths() {
        let surface = PdfSurface::new(&PageLayout::default());
        let narrow = surface.measure_wrapped_lines("iiii iiii iiii", 20.0, 11.0);
        let wide = surface.measure_wrapped_lines("MMMM MMMM MMMM", 20.0, 11.0);
        assert_eq!(narrow.len(), 1);
        assert_eq!(wide.len(), 3);
        assert_eq!(surface.measure_wrapped_lines("", 20.0, 11.0), vec![""]);
    }

    #[test]
    fn test_text_is_escaped_and_placed() {
        let mut surface = PdfSurface::new(&PageLayout::default());
        surface.draw_text(&["f(x) \\ café ✓".into()], 10.0, 20.0, style());

        let stream = &surface.page_streams()[0];
        assert!(stream.contains("(f\\(x\\) \\\\ caf\\351 ?) Tj"));
        // 10 mm in, 20 mm below the top of a 210 mm page.
        assert!(stream.contains("BT /F1 11 Tf 28.35 538.58 Td"));
    }

    #[test]
    fn test_centered_text() {
        let mut surface = PdfSurface::new(&PageLayout::default());
        let centered = TextStyle {
            align: Align::Center,
            ..style()
        };
        surface.draw_text(&["Course Map".into()], 148.5, 15.0, centered);

        let left = 148.5 - text_width("Course Map", 11.0) / 2.0;
        let expected = format!("BT /F1 11 Tf {} ", num(left * PT_PER_MM));
        assert!(surface.page_streams()[0].contains(&expected));
    }

    #[test]
    fn test_short_table_fits_on_page() {
        let mut surface = PdfSurface::new(&PageLayout::default());
        let final_y = surface.draw_table(&table(50.0, 3));

        assert_eq!(surface.page_count(), 1);
        let lh = line_height(8.0);
        let expected = 50.0 + (1.0 + 3.0) * lh + 4.0 * CELL_PADDING;
        assert!((final_y - expected).abs() < 0.001);
        let stream = &surface.page_streams()[0];
        assert_eq!(stream.matches("(Objectives) Tj").count(), 1);
        assert!(stream.contains("(1.3 Objective) Tj"));
        assert!(stream.contains(HEADER_FILL));
    }

    #[test]
    fn test_long_table_continues_with_header() {
        let mut surface = PdfSurface::new(&PageLayout::default());
        let final_y = surface.draw_table(&table(100.0, 60));

        assert_eq!(surface.page_count(), 2);
        let pages = surface.page_streams();
        for page in pages {
            assert_eq!(page.matches("(Objectives) Tj").count(), 1);
        }
        assert!(pages[0].contains("(1.1 Objective)"));
        assert!(!pages[0].contains("(1.60 Objective)"));
        assert!(pages[1].contains("(1.60 Objective)"));
        assert!(final_y <= 190.0);
    }

    #[test]
    fn test_table_that_cannot_start_moves_to_next_page() {
        let mut surface = PdfSurface::new(&PageLayout::default());
        surface.draw_table(&table(185.0, 1));

        assert_eq!(surface.page_count(), 2);
        assert!(!surface.page_streams()[0].contains("Objectives"));
        assert!(surface.page_streams()[1].contains("(1.1 Objective)"));
    }

    #[test]
    fn test_saved_file_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.pdf");
        let mut surface = PdfSurface::new(&PageLayout::default());
        surface.draw_text(&["one".into()], 14.0, 20.0, style());
        surface.new_page();
        surface.draw_text(&["two".into()], 14.0, 20.0, style());
        surface.save(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/MediaBox [0 0 841.89 595.28]"));

        // Every xref entry points at the start of its object.
        let xref = text.find("xref\n").unwrap();
        let startxref: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert_eq!(startxref, xref);
        let entries: Vec<&str> = text[xref..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .collect();
        assert_eq!(entries.len(), 7);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(text[offset..].starts_with(&format!("{} 0 obj\n", i + 1)));
        }
    }
}
