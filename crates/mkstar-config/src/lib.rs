//! Configuration management for mkstar.
//!
//! Parses `mkstar.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. When no file is
//! found, a built-in single-section default is used.
//!
//! ```toml
//! [[sections]]
//! slug = "docs"
//! name = "Documentation"
//! source_dir = "input/docs"
//! content_dir = "output/content/docs"
//! assets_dir = "output/assets/docs"
//! public_path = "/assets/docs/"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Directory fields and `public_path` support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mkstar.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Sections as parsed from TOML (paths are relative strings).
    #[serde(rename = "sections", default)]
    sections_raw: Vec<SectionConfigRaw>,

    /// Resolved sections (set after loading).
    #[serde(skip)]
    pub sections: Vec<SectionConfig>,
    /// Path to the config file, `None` for the built-in default.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw section configuration as parsed from TOML.
#[derive(Clone, Debug, Deserialize)]
struct SectionConfigRaw {
    slug: String,
    name: String,
    source_dir: String,
    content_dir: String,
    assets_dir: String,
    public_path: String,
}

/// Resolved configuration of one documentation section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionConfig {
    /// Unique identifier (`^[a-z0-9-]+$`).
    pub slug: String,
    /// Human-readable name.
    pub name: String,
    /// Directory holding the original Material MkDocs sources.
    pub source_dir: PathBuf,
    /// Output directory for converted markdown.
    pub content_dir: PathBuf,
    /// Output directory for optimisable (image) assets.
    pub assets_dir: PathBuf,
    /// Public URL prefix under which assets are served (e.g. `/assets/docs/`).
    pub public_path: String,
    /// Local directory for assets served as-is: `public_path` without its
    /// leading slash, resolved like the other directories.
    pub public_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sections[0].source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a slug made of lowercase letters, digits and hyphens.
fn require_slug(value: &str, field: &str) -> Result<(), ConfigError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must contain only lowercase letters, numbers, and hyphens"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mkstar.toml` in the current directory and
    /// parents, falling back to [`Config::default_with_cwd`].
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default_with_cwd()),
        }
    }

    /// Parse configuration text, resolving relative paths against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn parse(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before validation and path resolution
        config.expand_env_vars()?;
        config.validate()?;
        config.resolve_paths(config_dir);

        Ok(config)
    }

    /// Whether this is the built-in default rather than a loaded file.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.config_path.is_none()
    }

    /// Validate configuration values.
    ///
    /// At least one section is required; every field must be non-empty,
    /// slugs must follow the slug grammar and be unique.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections_raw.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[sections]] entry must be configured".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for (index, section) in self.sections_raw.iter().enumerate() {
            let field = |name: &str| format!("sections[{index}].{name}");

            require_non_empty(&section.slug, &field("slug"))?;
            require_slug(&section.slug, &field("slug"))?;
            require_non_empty(&section.name, &field("name"))?;
            require_non_empty(&section.source_dir, &field("source_dir"))?;
            require_non_empty(&section.content_dir, &field("content_dir"))?;
            require_non_empty(&section.assets_dir, &field("assets_dir"))?;
            require_non_empty(&section.public_path, &field("public_path"))?;

            if !seen.insert(section.slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "{}: duplicate section slug \"{}\"",
                    field("slug"),
                    section.slug
                )));
            }
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    #[must_use]
    pub fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            sections_raw: vec![SectionConfigRaw {
                slug: "docs".to_owned(),
                name: "Documentation".to_owned(),
                source_dir: "input/docs".to_owned(),
                content_dir: "output/content/docs".to_owned(),
                assets_dir: "output/assets/docs".to_owned(),
                public_path: "/assets/docs/".to_owned(),
            }],
            sections: Vec::new(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));

        let mut config = Self::parse(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in section fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (index, section) in self.sections_raw.iter_mut().enumerate() {
            let field = |name: &str| format!("sections[{index}].{name}");

            section.source_dir = expand::expand_env(&section.source_dir, &field("source_dir"))?;
            section.content_dir =
                expand::expand_env(&section.content_dir, &field("content_dir"))?;
            section.assets_dir = expand::expand_env(&section.assets_dir, &field("assets_dir"))?;
            section.public_path =
                expand::expand_env(&section.public_path, &field("public_path"))?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.sections = self
            .sections_raw
            .iter()
            .map(|raw| SectionConfig {
                slug: raw.slug.clone(),
                name: raw.name.clone(),
                source_dir: config_dir.join(&raw.source_dir),
                content_dir: config_dir.join(&raw.content_dir),
                assets_dir: config_dir.join(&raw.assets_dir),
                public_path: raw.public_path.clone(),
                public_dir: config_dir.join(raw.public_path.trim_start_matches('/')),
            })
            .collect();
    }
}
