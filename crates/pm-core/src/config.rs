//! Configuration structures for pydantic-mermaid.
//!
//! This module provides configuration types for every stage of the pipeline:
//!
//! - [`ScanConfig`] - Source discovery (root directory, skipped directories)
//! - [`ExtractConfig`] - Sentinel identifiers the model extractor matches on
//! - [`RenderConfig`] - Diagram output and relationship matching
//! - [`ReadmeConfig`] - Documentation splicing (markers and headings)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] tuned for a
//! `src/data_archive` package layout, and deserialize with `#[serde(default)]` so a
//! config file only needs to name what it overrides.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the renderer decides that a field type references another model.
///
/// # Examples
///
/// ```
/// use pm_core::RelationMatch;
///
/// assert_eq!(RelationMatch::default(), RelationMatch::Substring);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RelationMatch {
    /// The model name appears anywhere in the rendered type expression.
    ///
    /// A model named `Item` matches inside `LineItem`.
    #[default]
    Substring,

    /// The model name appears with identifier boundaries on both sides.
    Identifier,
}

/// Configuration for source discovery.
///
/// # Examples
///
/// ```
/// use pm_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.source_dir, "src/data_archive");
/// assert!(!config.respect_gitignore);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root directory containing the model sources.
    pub source_dir: Utf8PathBuf,

    /// Additional directory names to skip during traversal.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links.
    pub follow_links: bool,

    /// Whether `.gitignore`/`.ignore` files and hidden entries are honoured.
    pub respect_gitignore: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_dir: Utf8PathBuf::from("src/data_archive"),
            skip_dirs: Vec::new(),
            follow_links: false,
            respect_gitignore: false,
        }
    }
}

impl ScanConfig {
    /// Checks that [`source_dir`](Self::source_dir) exists and is a directory.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingDirectory`] if the directory does not exist
    /// - [`ConfigError::InvalidPath`] if the path is not a directory
    pub fn validate_source_dir(&self) -> Result<(), ConfigError> {
        if !self.source_dir.exists() {
            return Err(ConfigError::MissingDirectory(self.source_dir.clone()));
        }
        if !self.source_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.source_dir.clone(),
                reason: "not a directory".to_owned(),
            });
        }
        Ok(())
    }
}

/// Sentinel identifiers the model extractor matches on.
///
/// Both are exact-name matches; import aliases are not resolved.
///
/// # Examples
///
/// ```
/// use pm_core::ExtractConfig;
///
/// let config = ExtractConfig::default();
/// assert_eq!(config.base_class, "BaseModel");
/// assert_eq!(config.field_factory, "Field");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Base class name that marks a class as a model.
    pub base_class: String,

    /// Factory function whose `description` keyword documents a field.
    pub field_factory: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            base_class: "BaseModel".to_owned(),
            field_factory: "Field".to_owned(),
        }
    }
}

/// Configuration for the standalone diagram artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// File the rendered diagram is written to.
    pub output_path: Utf8PathBuf,

    /// Relationship inference mode.
    pub relation_match: RelationMatch,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: Utf8PathBuf::from("data_archive_models.mmd"),
            relation_match: RelationMatch::Substring,
        }
    }
}

/// Configuration for splicing the diagram into a documentation file.
///
/// # Examples
///
/// ```
/// use pm_core::ReadmeConfig;
///
/// let config = ReadmeConfig::default();
/// assert_eq!(config.begin_marker, "<!-- BEGIN_MERMAID_DIAGRAM -->");
/// assert_eq!(config.anchor_heading, "## Core Functionality");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeConfig {
    /// Documentation file to update.
    pub path: Utf8PathBuf,

    /// Line opening the managed region.
    pub begin_marker: String,

    /// Line closing the managed region.
    pub end_marker: String,

    /// Heading whose section receives the diagram when markers are absent.
    pub anchor_heading: String,

    /// Heading written above a newly inserted diagram section.
    pub section_heading: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("README.md"),
            begin_marker: "<!-- BEGIN_MERMAID_DIAGRAM -->".to_owned(),
            end_marker: "<!-- END_MERMAID_DIAGRAM -->".to_owned(),
            anchor_heading: "## Core Functionality".to_owned(),
            section_heading: "## Data Model Diagram".to_owned(),
        }
    }
}

/// Root configuration for pydantic-mermaid.
///
/// # Examples
///
/// ```
/// use pm_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("BaseModel"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source discovery configuration.
    pub scan: ScanConfig,

    /// Model extraction configuration.
    pub extract: ExtractConfig,

    /// Diagram rendering configuration.
    pub render: RenderConfig,

    /// Documentation splicing configuration.
    pub readme: ReadmeConfig,
}

impl Config {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Io`] if the file cannot be read
    /// - [`ConfigError::Parse`] if the file is not valid JSON for this schema
    /// - [`ConfigError::InvalidOption`] if validation fails
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// Same as [`from_json_file`](Self::from_json_file), minus I/O.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates option values that serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for empty sentinel names,
    /// empty markers, or identical begin and end markers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("extract.base_class", &self.extract.base_class),
            ("extract.field_factory", &self.extract.field_factory),
            ("readme.begin_marker", &self.readme.begin_marker),
            ("readme.end_marker", &self.readme.end_marker),
        ];
        for (option, value) in non_empty {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_option(option, "must not be empty"));
            }
        }

        if self.readme.begin_marker == self.readme.end_marker {
            return Err(ConfigError::invalid_option(
                "readme.end_marker",
                "must differ from readme.begin_marker",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.source_dir, "src/data_archive");
        assert!(config.skip_dirs.is_empty());
        assert!(!config.follow_links);
    }

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.output_path, "data_archive_models.mmd");
        assert_eq!(config.relation_match, RelationMatch::Substring);
    }

    #[test]
    fn test_readme_config_defaults() {
        let config = ReadmeConfig::default();
        assert_eq!(config.path, "README.md");
        assert_eq!(config.end_marker, "<!-- END_MERMAID_DIAGRAM -->");
        assert_eq!(config.section_heading, "## Data Model Diagram");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"extract": {"base_class": "Schema"}, "render": {"relation_match": "identifier"}}"#;
        let config = Config::from_json_str(json).unwrap();
        assert_eq!(config.extract.base_class, "Schema");
        assert_eq!(config.extract.field_factory, "Field");
        assert_eq!(config.render.relation_match, RelationMatch::Identifier);
        assert_eq!(config.readme.anchor_heading, "## Core Functionality");
    }

    #[test]
    fn test_config_rejects_empty_sentinel() {
        let json = r#"{"extract": {"field_factory": "  "}}"#;
        let err = Config::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("extract.field_factory"));
    }

    #[test]
    fn test_config_rejects_identical_markers() {
        let mut config = Config::default();
        config.readme.end_marker.clone_from(&config.readme.begin_marker);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_config_invalid_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pm.json");
        fs::write(&path, r#"{"scan": {"skip_dirs": ["migrations"]}}"#).unwrap();

        let utf8 = Utf8Path::from_path(&path).unwrap();
        let config = Config::from_json_file(utf8).unwrap();
        assert_eq!(config.scan.skip_dirs, vec!["migrations"]);
    }

    #[test]
    fn test_validate_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();

        let mut config = ScanConfig::default();
        config.source_dir = root.to_owned();
        assert!(config.validate_source_dir().is_ok());

        config.source_dir = root.join("missing");
        assert!(matches!(
            config.validate_source_dir(),
            Err(ConfigError::MissingDirectory(_))
        ));

        let file = root.join("models.py");
        fs::write(&file, "").unwrap();
        config.source_dir = file;
        assert!(matches!(
            config.validate_source_dir(),
            Err(ConfigError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_relation_match_serialization() {
        assert_eq!(
            serde_json::to_string(&RelationMatch::Substring).unwrap(),
            r#""substring""#
        );
        assert_eq!(
            serde_json::to_string(&RelationMatch::Identifier).unwrap(),
            r#""identifier""#
        );
    }
}
