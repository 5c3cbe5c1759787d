//! # API Facade
//!
//! The single entry point for every coursemap operation, whatever the UI.
//!
//! The facade:
//! - **Normalizes inputs**: user-facing labels (`"B"`, `"2.3"`, 1-based
//!   numbers) become 0-based positions through [`crate::index`].
//! - **Loads, applies, saves**: the current course is loaded from the store,
//!   handed to a command, and the result saved. A failed command saves nothing.
//! - **Returns structured types**: `Result<CmdResult>`, never printed text.
//!
//! Import, export and rendering also live here, since they are the only
//! operations that touch files other than the store.
//!
//! `CourseMapApi<S: DataStore>` is generic over the storage backend:
//! `FileStore` in the binary, `InMemoryStore` in tests.

use crate::commands::{self, CmdMessage, CmdResult, CourseField, ModuleField};
use crate::config::{ConfigAction, CourseMapConfig};
use crate::document;
use crate::error::{CourseMapError, Result};
use crate::index::{
    objective_label, outcome_letter, parse_objective_label, parse_objective_list,
    parse_outcome_label, parse_outcome_list, parse_position,
};
use crate::model::{Course, ItemKind, Ref};
use crate::render::{DocumentRenderer, PdfSurface, TextSurface};
use crate::store::DataStore;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CourseMapApi<S: DataStore> {
    store: S,
    config_dir: PathBuf,
}

impl<S: DataStore> CourseMapApi<S> {
    pub fn new(store: S, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            config_dir: config_dir.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the course, applies `change` and saves the result. `describe`
    /// builds the success message from the new course.
    fn apply<F, M>(&mut self, change: F, describe: M) -> Result<CmdResult>
    where
        F: FnOnce(&Course) -> Result<Course>,
        M: FnOnce(&Course) -> String,
    {
        let current = self.store.load()?;
        let next = change(&current)?;
        self.store.save(&next)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(describe(&next)));
        Ok(result.with_course(next))
    }

    // --- Course ---

    /// Writes an empty course unless the store already holds one with content.
    pub fn init(&mut self) -> Result<CmdResult> {
        let current = self.store.load()?;
        let mut result = CmdResult::default();
        if current != Course::default() {
            result.add_message(CmdMessage::warning(
                "Course already has content; use `reset` to start over",
            ));
            return Ok(result.with_course(current));
        }
        self.store.save(&current)?;
        result.add_message(CmdMessage::success("Initialized an empty course"));
        Ok(result.with_course(current))
    }

    pub fn reset(&mut self) -> Result<CmdResult> {
        self.apply(|_| Ok(Course::default()), |_| "Course reset".to_string())
    }

    pub fn show(&self) -> Result<CmdResult> {
        Ok(CmdResult::default().with_course(self.store.load()?))
    }

    pub fn update_course(&mut self, field: CourseField, value: &str) -> Result<CmdResult> {
        let name = match field {
            CourseField::Number => "Course number",
            CourseField::Name => "Course name",
            CourseField::Description => "Description",
        };
        self.apply(
            |c| commands::course::update_field(c, field, value),
            |_| format!("{} updated", name),
        )
    }

    // --- Outcomes ---

    pub fn add_outcome(&mut self, text: &str) -> Result<CmdResult> {
        self.apply(
            |c| {
                let next = commands::outcomes::add(c)?;
                let last = next.learning_outcomes.len() - 1;
                commands::outcomes::update(&next, last, text)
            },
            |c| {
                format!(
                    "Added outcome {}",
                    outcome_display(c.learning_outcomes.len() - 1)
                )
            },
        )
    }

    pub fn update_outcome(&mut self, label: &str, text: &str) -> Result<CmdResult> {
        let position = parse_outcome_label(label)?;
        self.apply(
            |c| commands::outcomes::update(c, position, text),
            |_| format!("Updated outcome {}", outcome_display(position)),
        )
    }

    pub fn remove_outcome(&mut self, label: &str) -> Result<CmdResult> {
        let position = parse_outcome_label(label)?;
        self.apply(
            |c| commands::outcomes::remove(c, position),
            |_| format!("Removed outcome {}", outcome_display(position)),
        )
    }

    // --- Modules ---

    pub fn add_module(&mut self, title: &str) -> Result<CmdResult> {
        self.apply(
            |c| {
                let next = commands::modules::add(c)?;
                let last = next.modules.len() - 1;
                commands::modules::update_field(&next, last, ModuleField::Title(title.to_string()))
            },
            |c| format!("Added module {}", c.modules.len()),
        )
    }

    pub fn update_module_title(&mut self, module: &str, title: &str) -> Result<CmdResult> {
        let m = parse_position(module)?;
        self.apply(
            |c| commands::modules::update_field(c, m, ModuleField::Title(title.to_string())),
            |_| format!("Renamed module {}", m + 1),
        )
    }

    /// `letters` is a comma separated list such as `"A,C"`; `"-"` clears.
    pub fn update_module_slos(&mut self, module: &str, letters: &str) -> Result<CmdResult> {
        let m = parse_position(module)?;
        let positions = parse_outcome_list(letters)?;
        self.apply(
            |c| commands::modules::update_field(c, m, ModuleField::RelatedSlos(positions)),
            |_| format!("Updated outcomes mapped to module {}", m + 1),
        )
    }

    pub fn remove_module(&mut self, module: &str) -> Result<CmdResult> {
        let m = parse_position(module)?;
        self.apply(
            |c| commands::modules::remove(c, m),
            |_| format!("Removed module {}", m + 1),
        )
    }

    // --- Objectives ---

    pub fn add_objective(&mut self, module: &str, text: &str) -> Result<CmdResult> {
        let m = parse_position(module)?;
        self.apply(
            |c| {
                let next = commands::objectives::add(c, m)?;
                let last = next.modules[m].objectives.len() - 1;
                commands::objectives::update(&next, m, last, text)
            },
            |c| {
                format!(
                    "Added objective {}",
                    objective_label(m, c.modules[m].objectives.len() - 1)
                )
            },
        )
    }

    pub fn update_objective(&mut self, label: &str, text: &str) -> Result<CmdResult> {
        let (m, j) = parse_objective_label(label)?;
        self.apply(
            |c| commands::objectives::update(c, m, j, text),
            |_| format!("Updated objective {}", objective_label(m, j)),
        )
    }

    pub fn remove_objective(&mut self, label: &str) -> Result<CmdResult> {
        let (m, j) = parse_objective_label(label)?;
        self.apply(
            |c| commands::objectives::remove(c, m, j),
            |_| format!("Removed objective {}", objective_label(m, j)),
        )
    }

    // --- Items ---

    /// `objectives` is a list of this module's objective labels (`"1.1,1.3"`).
    pub fn add_item(
        &mut self,
        module: &str,
        kind: ItemKind,
        content: &str,
        objectives: Option<&str>,
    ) -> Result<CmdResult> {
        let m = parse_position(module)?;
        let related = objectives
            .map(|list| parse_objective_list(m, list))
            .transpose()?;
        self.apply(
            |c| {
                let next = commands::items::add(c, m, kind)?;
                let last = next.modules[m].items(kind).len() - 1;
                commands::items::update(&next, m, kind, last, content, related)
            },
            |c| {
                format!(
                    "Added {} {} to module {}",
                    kind,
                    c.modules[m].items(kind).len(),
                    m + 1
                )
            },
        )
    }

    /// `None` leaves that part of the item alone. An objective list of `"-"`
    /// unlinks every objective.
    pub fn update_item(
        &mut self,
        module: &str,
        kind: ItemKind,
        item: &str,
        content: Option<&str>,
        objectives: Option<&str>,
    ) -> Result<CmdResult> {
        let m = parse_position(module)?;
        let i = parse_position(item)?;
        let related = objectives
            .map(|list| parse_objective_list(m, list))
            .transpose()?;
        self.apply(
            |c| {
                let content = match content {
                    Some(text) => text.to_string(),
                    None => c
                        .modules
                        .get(m)
                        .and_then(|module| module.items(kind).get(i))
                        .map(|entry| entry.content.clone())
                        .unwrap_or_default(),
                };
                commands::items::update(c, m, kind, i, content, related)
            },
            |_| format!("Updated {} {} of module {}", kind, i + 1, m + 1),
        )
    }

    pub fn remove_item(&mut self, module: &str, kind: ItemKind, item: &str) -> Result<CmdResult> {
        let m = parse_position(module)?;
        let i = parse_position(item)?;
        self.apply(
            |c| commands::items::remove(c, m, kind, i),
            |_| format!("Removed {} {} from module {}", kind, i + 1, m + 1),
        )
    }

    // --- Files ---

    /// Replaces the course with the document at `path`. Nothing is saved
    /// unless the whole document decodes.
    pub fn import_json(&mut self, path: &Path) -> Result<CmdResult> {
        let bytes = fs::read(path).map_err(CourseMapError::Io)?;
        let course = document::decode(&bytes)?;
        self.store.save(&course)?;

        let stale = count_stale(&course);
        info!(
            "event=course_imported module=api path={} outcomes={} modules={} stale_refs={}",
            path.display(),
            course.learning_outcomes.len(),
            course.modules.len(),
            stale
        );

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Imported {} ({} outcomes, {} modules)",
            path.display(),
            course.learning_outcomes.len(),
            course.modules.len()
        )));
        if stale > 0 {
            result.add_message(CmdMessage::warning(format!(
                "{} reference(s) point past the end of their lists; they are left out of rendered documents and dropped once an element is added at that position",
                stale
            )));
        }
        Ok(result.with_course(course))
    }

    pub fn export_json(&self, path: &Path) -> Result<CmdResult> {
        let course = self.store.load()?;
        let bytes = document::encode(&course)?;
        fs::write(path, &bytes).map_err(CourseMapError::Io)?;
        info!(
            "event=course_exported module=api path={} bytes={}",
            path.display(),
            bytes.len()
        );

        let mut result = CmdResult::default().with_written(path.to_path_buf());
        result.add_message(CmdMessage::success(format!(
            "Exported course to {}",
            path.display()
        )));
        Ok(result)
    }

    /// Renders the course as a paginated document: PDF when the path ends in
    /// `.pdf`, plain text otherwise. Without `output` the configured
    /// `document_file` is used.
    pub fn render_document(&self, output: Option<&Path>) -> Result<CmdResult> {
        let config = CourseMapConfig::load(&self.config_dir)?;
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.document_file.clone());
        let course = self.store.load()?;

        let renderer = DocumentRenderer::new(config.layout);
        let report = if is_pdf(&path) {
            let mut surface = PdfSurface::new(renderer.layout());
            renderer.export(&course, &mut surface, &path)?
        } else {
            let mut surface = TextSurface::new(renderer.layout());
            renderer.export(&course, &mut surface, &path)?
        };

        let mut result = CmdResult::default();
        for warning in &report.warnings {
            result.add_message(CmdMessage::warning(warning.to_string()));
        }
        result.add_message(CmdMessage::success(format!(
            "Rendered {} page(s) to {}",
            report.pages,
            path.display()
        )));
        Ok(result.with_report(report).with_written(path))
    }

    // --- Config ---

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        let mut config = CourseMapConfig::load(&self.config_dir)?;
        match action {
            ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config)),
            ConfigAction::ShowKey(key) => {
                let value = config
                    .get(&key)
                    .ok_or_else(|| CourseMapError::Api(format!("Unknown config key: {}", key)))?;
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::info(value));
                Ok(result)
            }
            ConfigAction::Set(key, value) => {
                config.set(&key, &value).map_err(CourseMapError::Api)?;
                config.save(&self.config_dir)?;
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
                Ok(result.with_config(config))
            }
        }
    }
}

/// Letter when there is one, otherwise the 1-based number.
fn outcome_display(position: usize) -> String {
    outcome_letter(position).unwrap_or_else(|_| format!("#{}", position + 1))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn count_stale(course: &Course) -> usize {
    let is_stale = |r: &&Ref| matches!(r, Ref::Stale(_));
    course
        .modules
        .iter()
        .map(|module| {
            let slos = module.related_slos.iter().filter(is_stale).count();
            let items: usize = ItemKind::all()
                .iter()
                .flat_map(|kind| module.items(*kind))
                .map(|item| item.related_objectives.iter().filter(is_stale).count())
                .sum();
            slos + items
        })
        .sum()
}
