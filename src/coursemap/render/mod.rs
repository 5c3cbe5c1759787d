//! # Document Renderer
//!
//! Projects a [`Course`] into a paginated report through a [`DrawingService`].
//!
//! The report is laid out in one top-to-bottom pass over a vertical cursor:
//!
//! 1. Title and course line.
//! 2. The description block (label plus wrapped text).
//! 3. The outcomes header, then one lettered block per outcome.
//! 4. Per module: a heading and a single-row table with the columns
//!    Objectives, Mapped SLOs, Resources, Activities and Assessments.
//!
//! Text blocks never straddle a page: a block that would cross the bottom
//! margin moves to a new page whole. Only a block taller than an entire page is
//! split, at line boundaries, after it has moved. Modules use a coarser rule:
//! once the cursor passes a fixed fraction of the page height the module starts
//! a new page. Table height is unknown until the surface has drawn it, so
//! tables paginate inside the surface.
//!
//! ## Labels
//!
//! Outcome letters and objective numbers are resolved here, from the current
//! order. Labels that cannot be resolved (stale references, outcomes past the
//! last letter) are left out of the output, logged, and returned as
//! [`RenderWarning`]s. Rendering itself never fails.
//!
//! ## Backends
//!
//! - [`TextSurface`]: monospace pages saved as plain text.
//! - [`PdfSurface`]: Helvetica pages saved as PDF.
//! - [`RecordingSurface`]: keeps the stream of calls, for tests.

mod layout;
pub mod pdf;
pub mod recording;
pub mod surface;
pub mod text;

pub use layout::PageLayout;
pub use pdf::PdfSurface;
pub use recording::{RecordingSurface, SurfaceOp};
pub use surface::{Align, DrawingService, TableSpec, TextStyle};
pub use text::TextSurface;

use crate::error::{CourseMapError, Result};
use crate::index::{objective_label, outcome_letter, resolve_labels, OUTCOME_LETTERS};
use crate::model::{Course, ItemKind, Module, Ref};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

pub const TITLE: &str = "Course Map";
pub const OUTCOMES_HEADING: &str = "Student Learning Outcomes:";
pub const OUTCOMES_INTRO: &str = "At the end of this course, the learner will be able to:";
pub const TABLE_HEADER: [&str; 5] = [
    "Objectives",
    "Mapped SLOs",
    "Resources",
    "Activities",
    "Assessments",
];

/// The five table cells of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRow {
    pub objectives: String,
    pub mapped_slos: String,
    pub resources: String,
    pub activities: String,
    pub assessments: String,
}

impl ModuleRow {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.objectives.clone(),
            self.mapped_slos.clone(),
            self.resources.clone(),
            self.activities.clone(),
            self.assessments.clone(),
        ]
    }
}

/// A label left out of the report. Positions are 0-based; `None` means a
/// dangling id rather than a stale position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    StaleOutcomeRef {
        module: usize,
        position: Option<usize>,
    },
    StaleObjectiveRef {
        module: usize,
        kind: ItemKind,
        item: usize,
        position: Option<usize>,
    },
    /// The outcome has no letter. `module` is set when the outcome was
    /// mapped from a module, unset for the outcome list itself.
    OutcomeLetterOverflow {
        module: Option<usize>,
        position: usize,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::StaleOutcomeRef { module, position } => write!(
                f,
                "module {} maps a missing outcome{}",
                module + 1,
                describe(*position)
            ),
            RenderWarning::StaleObjectiveRef {
                module,
                kind,
                item,
                position,
            } => write!(
                f,
                "{} {} of module {} links a missing objective{}",
                kind,
                item + 1,
                module + 1,
                describe(*position)
            ),
            RenderWarning::OutcomeLetterOverflow {
                module: Some(module),
                position,
            } => write!(
                f,
                "module {} maps outcome {} which has no letter (only {} outcomes are lettered)",
                module + 1,
                position + 1,
                OUTCOME_LETTERS.len()
            ),
            RenderWarning::OutcomeLetterOverflow {
                module: None,
                position,
            } => write!(
                f,
                "outcome {} has no letter (only {} outcomes are lettered)",
                position + 1,
                OUTCOME_LETTERS.len()
            ),
        }
    }
}

fn describe(position: Option<usize>) -> String {
    match position {
        Some(p) => format!(" (position {})", p),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub pages: usize,
    pub warnings: Vec<RenderWarning>,
}

/// Cells for module `index`, with unresolvable labels left out.
pub fn module_row(course: &Course, index: usize) -> Result<ModuleRow> {
    let module = course
        .modules
        .get(index)
        .ok_or_else(|| CourseMapError::out_of_range("module", index, course.modules.len()))?;
    Ok(build_row(course, index, module, &mut Vec::new()))
}

fn build_row(
    course: &Course,
    index: usize,
    module: &Module,
    warnings: &mut Vec<RenderWarning>,
) -> ModuleRow {
    let objectives = module
        .objectives
        .iter()
        .enumerate()
        .map(|(j, objective)| format!("{} {}", objective_label(index, j), objective.text))
        .collect::<Vec<_>>()
        .join("\n");

    ModuleRow {
        objectives,
        mapped_slos: mapped_outcomes(course, index, &module.related_slos, warnings),
        resources: item_cell(index, module, ItemKind::Resource, warnings),
        activities: item_cell(index, module, ItemKind::Activity, warnings),
        assessments: item_cell(index, module, ItemKind::Assessment, warnings),
    }
}

fn mapped_outcomes(
    course: &Course,
    module: usize,
    refs: &BTreeSet<Ref>,
    warnings: &mut Vec<RenderWarning>,
) -> String {
    let mut positions = BTreeSet::new();
    for reference in refs {
        match course.outcome_position(reference) {
            Some(p) => {
                positions.insert(p);
            }
            None => omit(
                warnings,
                RenderWarning::StaleOutcomeRef {
                    module,
                    position: stale_position(reference),
                },
            ),
        }
    }

    let (lettered, overflow): (Vec<usize>, Vec<usize>) = positions
        .into_iter()
        .partition(|&p| p < OUTCOME_LETTERS.len());
    for position in overflow {
        omit(
            warnings,
            RenderWarning::OutcomeLetterOverflow {
                module: Some(module),
                position,
            },
        );
    }

    resolve_labels(lettered, outcome_letter)
        .map(|letters| letters.join(", "))
        .unwrap_or_default()
}

fn item_cell(
    index: usize,
    module: &Module,
    kind: ItemKind,
    warnings: &mut Vec<RenderWarning>,
) -> String {
    module
        .items(kind)
        .iter()
        .enumerate()
        .map(|(item, entry)| {
            let mut positions = Vec::new();
            for reference in &entry.related_objectives {
                match module.objective_position(reference) {
                    Some(p) => positions.push(p),
                    None => omit(
                        warnings,
                        RenderWarning::StaleObjectiveRef {
                            module: index,
                            kind,
                            item,
                            position: stale_position(reference),
                        },
                    ),
                }
            }
            let labels = resolve_labels(positions, |p| Ok(objective_label(index, p)))
                .map(|labels| labels.join(", "))
                .unwrap_or_default();
            format!("{} (Obj: {})", entry.content, labels)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn stale_position(reference: &Ref) -> Option<usize> {
    match reference {
        Ref::Stale(p) => Some(*p),
        Ref::Live(_) => None,
    }
}

fn omit(warnings: &mut Vec<RenderWarning>, warning: RenderWarning) {
    warn!("event=label_omitted module=render reason=\"{}\"", warning);
    warnings.push(warning);
}

/// Vertical cursor over a drawing surface.
struct Pen<'a, D: DrawingService> {
    surface: &'a mut D,
    layout: &'a PageLayout,
    y: f32,
    /// Nothing has been drawn since the last page break.
    fresh: bool,
}

impl<'a, D: DrawingService> Pen<'a, D> {
    fn break_page(&mut self) {
        self.surface.new_page();
        self.y = self.layout.top_margin;
        self.fresh = true;
        debug!(
            "event=page_break module=render page={}",
            self.surface.page_count()
        );
    }

    fn style(&self, font_size: f32) -> TextStyle {
        TextStyle {
            font_size,
            line_height: self.layout.line_height,
            align: Align::Left,
        }
    }

    fn text(&mut self, line: String, x: f32, font_size: f32) {
        let style = self.style(font_size);
        self.surface.draw_text(&[line], x, self.y, style);
        self.fresh = false;
    }

    /// Draws `lines` at the cursor, moving them to a new page first when they
    /// would cross `bottom_margin`. On a fresh page an oversized block is
    /// split between lines instead.
    fn block(&mut self, lines: &[String], x: f32, bottom_margin: f32, font_size: f32) {
        let lh = self.layout.line_height;
        let limit = self.layout.height - bottom_margin;
        if !self.fresh && self.y + lines.len() as f32 * lh > limit {
            self.break_page();
        }

        let style = self.style(font_size);
        let mut rest = lines;
        while !rest.is_empty() {
            let room = ((limit - self.y) / lh).floor().max(1.0) as usize;
            let (now, later) = rest.split_at(room.min(rest.len()));
            self.surface.draw_text(now, x, self.y, style);
            self.y += now.len() as f32 * lh;
            self.fresh = false;
            rest = later;
            if !rest.is_empty() {
                debug!(
                    "event=block_split module=render lines_left={}",
                    rest.len()
                );
                self.break_page();
            }
        }
    }
}

/// Lays out a course onto a [`DrawingService`].
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    layout: PageLayout,
}

impl DocumentRenderer {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn render<D: DrawingService>(&self, course: &Course, surface: &mut D) -> RenderReport {
        let layout = &self.layout;
        let mut warnings = Vec::new();
        let mut pen = Pen {
            surface,
            layout,
            y: layout.title_y,
            fresh: false,
        };

        let title_style = TextStyle {
            font_size: layout.title_font_size,
            line_height: layout.line_height,
            align: Align::Center,
        };
        pen.surface
            .draw_text(&[TITLE.to_string()], layout.width / 2.0, layout.title_y, title_style);
        pen.y = layout.course_line_y;
        pen.text(
            format!("Course: {}", course.heading()),
            layout.margin,
            layout.header_font_size,
        );

        // Description
        pen.y = layout.description_y;
        let mut description = vec!["Description:".to_string()];
        description.extend(pen.surface.measure_wrapped_lines(
            &course.description,
            layout.description_width,
            layout.body_font_size,
        ));
        pen.block(
            &description,
            layout.margin,
            layout.description_bottom_margin,
            layout.body_font_size,
        );

        // Outcomes
        let header_height = layout.outcomes_header_gap + layout.line_height;
        if !pen.fresh && pen.y + header_height > layout.height - layout.description_bottom_margin {
            pen.break_page();
        }
        pen.text(OUTCOMES_HEADING.to_string(), layout.margin, layout.body_font_size);
        pen.y += layout.outcomes_header_gap;
        pen.text(OUTCOMES_INTRO.to_string(), layout.margin, layout.body_font_size);
        pen.y += layout.line_height;

        for (position, outcome) in course.learning_outcomes.iter().enumerate() {
            let text = match outcome_letter(position) {
                Ok(letter) => format!("{}. {}", letter, outcome.text),
                Err(_) => {
                    omit(
                        &mut warnings,
                        RenderWarning::OutcomeLetterOverflow {
                            module: None,
                            position,
                        },
                    );
                    outcome.text.clone()
                }
            };
            let lines = pen.surface.measure_wrapped_lines(
                &text,
                layout.content_width(),
                layout.body_font_size,
            );
            pen.block(
                &lines,
                layout.outcome_indent,
                layout.outcome_bottom_margin,
                layout.body_font_size,
            );
            pen.y += layout.outcome_gap;
        }

        // Modules
        pen.y += layout.section_gap;
        for (index, module) in course.modules.iter().enumerate() {
            if pen.y > layout.module_break_y() {
                pen.break_page();
            }
            pen.text(
                format!("Module {}: {}", index + 1, module.title),
                layout.margin,
                layout.header_font_size,
            );
            pen.y += layout.heading_gap;

            let row = build_row(course, index, module, &mut warnings);
            let table = TableSpec {
                header: TABLE_HEADER.iter().map(|h| h.to_string()).collect(),
                body: vec![row.cells()],
                start_y: pen.y,
                column_widths: layout.column_widths.clone(),
                font_size: layout.table_font_size,
            };
            let final_y = pen.surface.draw_table(&table);
            pen.y = final_y + layout.table_gap;
            pen.fresh = false;
        }

        let pages = pen.surface.page_count();
        debug!(
            "event=render_complete module=render pages={} modules={} warnings={}",
            pages,
            course.modules.len(),
            warnings.len()
        );
        RenderReport { pages, warnings }
    }

    /// Renders and hands the result to the surface to write out.
    pub fn export<D: DrawingService>(
        &self,
        course: &Course,
        surface: &mut D,
        path: &Path,
    ) -> Result<RenderReport> {
        let report = self.render(course, surface);
        surface.save(path)?;
        info!(
            "event=document_exported module=render path={} pages={} warnings={}",
            path.display(),
            report.pages,
            report.warnings.len()
        );
        Ok(report)
    }
}
