use super::DataStore;
use crate::document;
use crate::error::{CourseMapError, Result};
use crate::model::Course;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(CourseMapError::Io)?;
            }
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load(&self) -> Result<Course> {
        if !self.path.exists() {
            debug!(
                "event=load_missing module=store path={}",
                self.path.display()
            );
            return Ok(Course::default());
        }
        let bytes = fs::read(&self.path).map_err(CourseMapError::Io)?;
        document::decode(&bytes)
    }

    fn save(&mut self, course: &Course) -> Result<()> {
        self.ensure_parent()?;
        let bytes = document::encode(course)?;
        fs::write(&self.path, &bytes).map_err(CourseMapError::Io)?;
        info!(
            "event=course_saved module=store path={} bytes={}",
            self.path.display(),
            bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::CourseFixture;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_course() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("course_data.json"));
        assert_eq!(store.load().unwrap(), Course::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("course.json"));
        let course = CourseFixture::new()
            .with_header("CS101", "Intro", "About X")
            .with_outcomes(&["Explain X"])
            .with_module("Basics", &[0], &["Define X"])
            .with_item(0, crate::model::ItemKind::Resource, "Textbook", &[0])
            .build();

        store.save(&course).unwrap();
        assert_eq!(store.load().unwrap(), course);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("course.json");
        fs::write(&path, "[1, 2]").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(CourseMapError::MalformedDocument(_))
        ));
    }
}
