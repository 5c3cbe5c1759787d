use crate::error::{CourseMapError, Result};
use crate::render::{PageLayout, TABLE_HEADER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_COURSE_FILE: &str = "course_data.json";
const DEFAULT_DOCUMENT_FILE: &str = "course_map.txt";

/// Settable keys, in display order.
pub const CONFIG_KEYS: [&str; 2] = ["course_file", "document_file"];

/// What `config` should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Configuration for coursemap, stored in `<config dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseMapConfig {
    /// Course document used when `--file` is not given. Relative paths are
    /// resolved against the working directory.
    #[serde(default = "default_course_file")]
    pub course_file: PathBuf,

    /// Where `render` writes when no output path is given.
    #[serde(default = "default_document_file")]
    pub document_file: PathBuf,

    #[serde(default)]
    pub layout: PageLayout,
}

fn default_course_file() -> PathBuf {
    PathBuf::from(DEFAULT_COURSE_FILE)
}

fn default_document_file() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENT_FILE)
}

impl Default for CourseMapConfig {
    fn default() -> Self {
        Self {
            course_file: default_course_file(),
            document_file: default_document_file(),
            layout: PageLayout::default(),
        }
    }
}

impl CourseMapConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CourseMapError::Io)?;
        let config: CourseMapConfig =
            serde_json::from_str(&content).map_err(CourseMapError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// The layout needs one positive width per table column.
    fn validate(&self) -> Result<()> {
        let widths = &self.layout.column_widths;
        if widths.len() != TABLE_HEADER.len() {
            return Err(CourseMapError::Api(format!(
                "layout.column_widths has {} entries, expected {}",
                widths.len(),
                TABLE_HEADER.len()
            )));
        }
        if widths.iter().any(|w| w.is_nan() || *w <= 0.0) {
            return Err(CourseMapError::Api(
                "layout.column_widths must all be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CourseMapError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CourseMapError::Serialization)?;
        fs::write(config_path, content).map_err(CourseMapError::Io)?;
        Ok(())
    }

    pub fn path<P: AsRef<Path>>(config_dir: P) -> PathBuf {
        config_dir.as_ref().join(CONFIG_FILENAME)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "course_file" => Some(self.course_file.display().to_string()),
            "document_file" => Some(self.document_file.display().to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        if value.trim().is_empty() {
            return Err(format!("{} cannot be empty", key));
        }
        match key {
            "course_file" => self.course_file = PathBuf::from(value),
            "document_file" => self.document_file = PathBuf::from(value),
            other => {
                return Err(format!(
                    "Unknown config key: {} (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = CourseMapConfig::default();
        assert_eq!(config.course_file, PathBuf::from("course_data.json"));
        assert_eq!(config.document_file, PathBuf::from("course_map.txt"));
        assert_eq!(config.layout, PageLayout::default());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = CourseMapConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, CourseMapConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"document_file": "out/map.txt", "layout": {"margin": 10.0}}"#,
        )
        .unwrap();

        let config = CourseMapConfig::load(dir.path()).unwrap();
        assert_eq!(config.course_file, PathBuf::from("course_data.json"));
        assert_eq!(config.document_file, PathBuf::from("out/map.txt"));
        assert_eq!(config.layout.margin, 10.0);
        assert_eq!(config.layout.height, 210.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = CourseMapConfig::default();
        config.set("course_file", "cs101.json").unwrap();
        config.save(dir.path().join("nested")).unwrap();

        let loaded = CourseMapConfig::load(dir.path().join("nested")).unwrap();
        assert_eq!(loaded.course_file, PathBuf::from("cs101.json"));
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = CourseMapConfig::default();
        assert_eq!(config.get("document_file").as_deref(), Some("course_map.txt"));
        assert_eq!(config.get("layout"), None);

        assert!(config.set("nope", "x").is_err());
        assert!(config.set("course_file", " ").is_err());
        config.set("document_file", "report.txt").unwrap();
        assert_eq!(config.document_file, PathBuf::from("report.txt"));
    }

    #[test]
    fn test_column_widths_must_match_table() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"layout": {"column_widths": [50.0, 30.0]}}"#,
        )
        .unwrap();
        let err = CourseMapConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("has 2 entries, expected 5"));

        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"layout": {"column_widths": [50.0, 30.0, 0.0, 55.0, 55.0]}}"#,
        )
        .unwrap();
        assert!(matches!(
            CourseMapConfig::load(dir.path()),
            Err(CourseMapError::Api(_))
        ));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            CourseMapConfig::load(dir.path()),
            Err(CourseMapError::Serialization(_))
        ));
    }
}
