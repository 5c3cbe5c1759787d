//! # Command Layer
//!
//! Structural mutations of a [`Course`]. Every operation takes the current
//! course by reference and returns a brand new value; the input is never
//! touched. All index arguments are validated before anything is built, so an
//! error means nothing changed.
//!
//! Removing an outcome or objective also drops its id from every reference set
//! that points at it, in the same step. Surviving references keep pointing at
//! the same elements and their displayed labels shift with the new order.

use crate::config::CourseMapConfig;
use crate::error::{CourseMapError, Result};
use crate::model::{Course, Ref};
use crate::render::RenderReport;
use log::debug;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

pub mod course;
pub mod items;
pub mod modules;
pub mod objectives;
pub mod outcomes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub course: Option<Course>,
    pub config: Option<CourseMapConfig>,
    pub report: Option<RenderReport>,
    pub written: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.course = Some(course);
        self
    }

    pub fn with_config(mut self, config: CourseMapConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_report(mut self, report: RenderReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_written(mut self, path: PathBuf) -> Self {
        self.written = Some(path);
        self
    }
}

/// Scalar fields of the course header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Number,
    Name,
    Description,
}

impl FromStr for CourseField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" | "course-number" => Ok(CourseField::Number),
            "name" | "course-name" => Ok(CourseField::Name),
            "description" => Ok(CourseField::Description),
            other => Err(format!(
                "Unknown course field: {} (expected number, name or description)",
                other
            )),
        }
    }
}

/// A replacement value for one module field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleField {
    Title(String),
    /// Outcome positions; replaces the whole set.
    RelatedSlos(BTreeSet<usize>),
}

pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(CourseMapError::out_of_range(what, index, len))
    }
}

/// Drops stale positions that `len` elements now cover. Once the target list
/// grows that far, the position would name an unrelated element after the next
/// save and load.
pub(crate) fn drop_covered_stale(refs: &mut BTreeSet<Ref>, len: usize) -> usize {
    let before = refs.len();
    refs.retain(|r| !matches!(r, Ref::Stale(n) if *n < len));
    let dropped = before - refs.len();
    if dropped > 0 {
        debug!(
            "event=stale_dropped module=commands count={} len={}",
            dropped, len
        );
    }
    dropped
}
