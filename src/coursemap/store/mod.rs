//! # Storage Layer
//!
//! The [`DataStore`] trait is the only place a [`Course`] is persisted. The
//! command layer never touches it: commands return new course values and the
//! [`crate::api`] facade decides whether to save them.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: the course as a single JSON document on disk, in the
//!   format of [`crate::document`]. A missing file reads as an empty course.
//! - [`memory::InMemoryStore`]: keeps the last saved course in memory. Used by
//!   tests, along with [`memory::fixtures::CourseFixture`] for building courses.

use crate::error::Result;
use crate::model::Course;

pub mod fs;
pub mod memory;

/// Abstract interface for course storage.
pub trait DataStore {
    /// Load the current course. An empty store yields `Course::default()`.
    fn load(&self) -> Result<Course>;

    /// Replace the stored course.
    fn save(&mut self, course: &Course) -> Result<()>;
}
