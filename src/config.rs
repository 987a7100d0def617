//! Build configuration module.
//!
//! Handles loading and validating `resume-forge.toml`. Configuration is
//! sparse: stock defaults are overridden only by the keys a user writes, and
//! CLI flags override the file in turn (`--output`, `--theme`, `--format`).
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! source = "resume.yml"        # Résumé source document (.yml/.yaml/.json)
//! output = "dist"              # Output directory for built files
//! templates = "templates"      # Theme template overrides (optional dir)
//!
//! [build]
//! formats = ["html", "pdf", "json", "markdown"]
//! theme = "modern"             # Theme for template-driven formats
//!
//! [pdf]
//! backend = "auto"             # auto | draw | layout | disabled
//! fonts_dir = "fonts"          # TTF family dir for the layout backend
//! font_family = "LiberationSans"
//!
//! [enhance]
//! model = "claude-sonnet-4-5"  # Text-completion model id
//! timeout_secs = 30            # Hard cap on each API call
//! max_retries = 2              # Retries on 429/5xx before falling back
//! ```
//!
//! The enhancement API key is read from the `ANTHROPIC_API_KEY` environment
//! variable only — it never lives in the config file.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `resume-forge.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Input/output locations.
    pub paths: PathsConfig,
    /// What to build by default.
    pub build: BuildConfig,
    /// PDF backend selection.
    pub pdf: PdfConfig,
    /// AI enhancement settings.
    pub enhance: EnhanceConfig,
}

impl AppConfig {
    /// Load config from `path`, or return stock defaults when the file does
    /// not exist. A file that exists but fails to parse or validate is an
    /// error — silently ignoring a broken config hides typos.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.formats.is_empty() {
            return Err(ConfigError::Validation(
                "build.formats must not be empty".into(),
            ));
        }
        if self.build.theme.trim().is_empty() {
            return Err(ConfigError::Validation(
                "build.theme must not be empty".into(),
            ));
        }
        if !matches!(
            self.pdf.backend.as_str(),
            "auto" | "draw" | "layout" | "disabled"
        ) {
            return Err(ConfigError::Validation(format!(
                "pdf.backend must be one of auto, draw, layout, disabled; got {:?}",
                self.pdf.backend
            )));
        }
        if self.enhance.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "enhance.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Input/output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Résumé source document.
    pub source: PathBuf,
    /// Directory where built files land.
    pub output: PathBuf,
    /// Directory searched for theme templates before the embedded stock
    /// themes.
    pub templates: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("resume.yml"),
            output: PathBuf::from("dist"),
            templates: PathBuf::from("templates"),
        }
    }
}

/// What to build when the CLI doesn't say.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Formats built by a bare `resume-forge build`.
    pub formats: Vec<String>,
    /// Theme for template-driven formats. The markdown builder maps the
    /// stock default to its own "github" theme.
    pub theme: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            formats: vec![
                "html".to_string(),
                "pdf".to_string(),
                "json".to_string(),
                "markdown".to_string(),
            ],
            theme: "modern".to_string(),
        }
    }
}

/// PDF backend selection, resolved once at startup (see
/// [`crate::builders::pdf::resolve_backend`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    /// `auto` picks the self-contained drawing backend; `layout` requires
    /// the font family below to exist on disk; `disabled` makes pdf builds
    /// fail with a no-backend error.
    pub backend: String,
    /// Directory holding `<family>-Regular.ttf` etc. for the layout backend.
    pub fonts_dir: PathBuf,
    /// Font family name for the layout backend.
    pub font_family: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
            fonts_dir: PathBuf::from("fonts"),
            font_family: "LiberationSans".to_string(),
        }
    }
}

/// AI enhancement settings. Enhancement only runs when `build --enhance`
/// is passed *and* `ANTHROPIC_API_KEY` is set; everything here bounds that
/// call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Text-completion model id.
    pub model: String,
    /// Hard cap on each API call, seconds.
    pub timeout_secs: u64,
    /// Retries on 429/5xx before falling back to the original text.
    pub max_retries: u32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// The stock config with every option documented, printed by `gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = AppConfig::default();
    format!(
        "\
# resume-forge configuration. All options are optional — this file shows
# the stock defaults. Delete any line you don't want to override.

[paths]
# Résumé source document (.yml, .yaml, or .json)
source = {source:?}
# Output directory for built files
output = {output:?}
# Theme template overrides; <templates>/html/<theme>.html.tera and
# <templates>/markdown/<theme>.md.tera take priority over the built-in
# themes of the same name
templates = {templates:?}

[build]
# Formats built by a bare `resume-forge build`
formats = [\"html\", \"pdf\", \"json\", \"markdown\"]
# Theme for template-driven formats (markdown falls back to \"github\")
theme = {theme:?}

[pdf]
# auto     → self-contained drawing backend (built-in Helvetica)
# layout   → genpdf flow engine; requires the font family below on disk
# draw     → force the drawing backend
# disabled → pdf builds fail with a no-backend error
backend = {backend:?}
# TTF family directory for the layout backend
fonts_dir = {fonts_dir:?}
font_family = {font_family:?}

[enhance]
# Used only with `build --enhance`; the API key comes from the
# ANTHROPIC_API_KEY environment variable, never from this file.
model = {model:?}
timeout_secs = {timeout_secs}
max_retries = {max_retries}
",
        source = defaults.paths.source.display().to_string(),
        output = defaults.paths.output.display().to_string(),
        templates = defaults.paths.templates.display().to_string(),
        theme = defaults.build.theme,
        backend = defaults.pdf.backend,
        fonts_dir = defaults.pdf.fonts_dir.display().to_string(),
        font_family = defaults.pdf.font_family,
        model = defaults.enhance.model,
        timeout_secs = defaults.enhance.timeout_secs,
        max_retries = defaults.enhance.max_retries,
    )
}
