use serde::{Deserialize, Serialize};

/// Page geometry and typography for the course report.
///
/// Units are millimetres (font sizes are points). Defaults describe a
/// landscape A4 page. Every field can be overridden from `config.json`;
/// missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    /// Left margin for headings, description and tables.
    pub margin: f32,
    pub outcome_indent: f32,
    /// Where the cursor lands after a page break.
    pub top_margin: f32,
    pub title_y: f32,
    pub course_line_y: f32,
    pub description_y: f32,
    pub description_width: f32,
    pub line_height: f32,
    pub description_bottom_margin: f32,
    pub outcome_bottom_margin: f32,
    pub outcome_gap: f32,
    /// Space between the outcomes header lines.
    pub outcomes_header_gap: f32,
    pub section_gap: f32,
    /// A module starts a new page once the cursor passes this fraction of
    /// the page height.
    pub module_break_ratio: f32,
    pub heading_gap: f32,
    pub table_gap: f32,
    pub column_widths: Vec<f32>,
    pub title_font_size: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub table_font_size: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 297.0,
            height: 210.0,
            margin: 14.0,
            outcome_indent: 20.0,
            top_margin: 20.0,
            title_y: 15.0,
            course_line_y: 25.0,
            description_y: 35.0,
            description_width: 260.0,
            line_height: 5.0,
            description_bottom_margin: 40.0,
            outcome_bottom_margin: 20.0,
            outcome_gap: 2.0,
            outcomes_header_gap: 10.0,
            section_gap: 10.0,
            module_break_ratio: 6.0 / 7.0,
            heading_gap: 10.0,
            table_gap: 15.0,
            column_widths: vec![50.0, 30.0, 55.0, 55.0, 55.0],
            title_font_size: 18.0,
            header_font_size: 12.0,
            body_font_size: 11.0,
            table_font_size: 8.0,
        }
    }
}

impl PageLayout {
    /// Width available to outcome text.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn module_break_y(&self) -> f32 {
        self.height * self.module_break_ratio
    }
}
