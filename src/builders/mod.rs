//! The builder contract and factory.
//!
//! A builder turns the validated [`ResumeData`] plus a theme into exactly one
//! output file, `resume.<ext>`, in the output directory. Builders are
//! independent of each other: each renders from the shared context
//! ([`crate::context::prepare_context`]) and writes its own file, so the
//! build stage may run them in parallel and one format's failure never
//! blocks the others.
//!
//! ## Factory
//!
//! [`BuilderRegistry`] maps format names to constructor functions. The
//! registry is an explicit instance created in `main` and handed to the
//! build stage — there is no process-wide builder table, and additional
//! formats can be registered at runtime before the build starts.
//!
//! ## Themes and templates
//!
//! Template-driven formats (html, markdown) resolve
//! `<templates>/<format>/<theme>.<ext>.tera` from the templates directory
//! first, then fall back to the stock themes embedded at compile time. A
//! theme with neither yields [`BuildError::TemplateNotFound`] naming the
//! path that was tried.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ResumeData;

mod filters;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;

pub use pdf::PdfBackend;

/// Theme used when the caller doesn't pick one.
pub const DEFAULT_THEME: &str = "modern";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{format}: template not found: {}", .path.display())]
    TemplateNotFound { format: &'static str, path: PathBuf },

    #[error("{format}: rendering failed: {source}")]
    RenderFailed {
        format: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("pdf: no backend available: {reason}")]
    NoBackendAvailable { reason: String },

    #[error("unknown format {requested:?} (available: {available})")]
    UnknownFormat { requested: String, available: String },

    #[error("{format}: IO error: {source}")]
    Io {
        format: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Wrap any rendering failure with its format name.
    pub fn render(format: &'static str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        BuildError::RenderFailed {
            format,
            source: Box::new(source),
        }
    }
}

/// A successfully built output file, for reporting.
#[derive(Debug, Clone)]
pub struct BuiltFile {
    pub format: &'static str,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Everything a builder constructor needs besides the résumé itself.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Directory where `resume.<ext>` lands; created if absent.
    pub output_dir: PathBuf,
    /// Directory searched for theme templates before the embedded ones.
    pub templates_dir: PathBuf,
    /// Theme for template-driven formats.
    pub theme: String,
    /// PDF backend, resolved once at startup and injected here.
    pub pdf_backend: PdfBackend,
}

/// The contract every output format implements.
///
/// `Send + Sync` because the build stage fans formats out over a rayon pool;
/// builders hold only configuration, never mutable state.
pub trait Builder: Send + Sync + std::fmt::Debug {
    /// Format key, also the template subdirectory name.
    fn format_name(&self) -> &'static str;

    /// Output file extension, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Output filename: always `resume.<ext>`.
    fn output_filename(&self) -> String {
        format!("resume.{}", self.file_extension())
    }

    /// Render and write `resume.<ext>`, returning the written file.
    fn build(&self, resume: &ResumeData) -> Result<BuiltFile, BuildError>;
}

/// Constructor signature stored in the registry.
pub type BuilderCtor = fn(&BuilderOptions) -> Result<Box<dyn Builder>, BuildError>;

/// Maps format names to builder constructors.
///
/// `with_defaults` registers the four stock formats; `register` accepts more
/// at runtime (re-registering a name replaces the previous entry, loudly).
pub struct BuilderRegistry {
    builders: BTreeMap<String, BuilderCtor>,
}

impl BuilderRegistry {
    /// An empty registry. Useful in tests; the CLI wants `with_defaults`.
    pub fn new() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// A registry with the four stock formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("html", html::create);
        registry.register("pdf", pdf::create);
        registry.register("json", json::create);
        registry.register("markdown", markdown::create);
        registry
    }

    /// Register a builder constructor under a format name.
    pub fn register(&mut self, name: &str, ctor: BuilderCtor) {
        let key = normalize(name);
        if self.builders.insert(key.clone(), ctor).is_some() {
            tracing::warn!("replacing registered builder for format {key:?}");
        }
    }

    /// Instantiate the builder for `format`, or fail with an unknown-format
    /// error listing every registered name.
    pub fn create(
        &self,
        format: &str,
        opts: &BuilderOptions,
    ) -> Result<Box<dyn Builder>, BuildError> {
        let key = normalize(format);
        match self.builders.get(&key) {
            Some(ctor) => ctor(opts),
            None => Err(BuildError::UnknownFormat {
                requested: format.trim().to_string(),
                available: self.formats().join(", "),
            }),
        }
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, format: &str) -> bool {
        self.builders.contains_key(&normalize(format))
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

// ============================================================================
// Shared builder plumbing
// ============================================================================

/// Stock themes compiled into the binary, per format. A file in the
/// templates directory with the same resolved name takes priority.
fn embedded_template(format: &str, theme: &str) -> Option<&'static str> {
    match (format, theme) {
        ("html", "modern") => Some(include_str!("../../templates/html/modern.html.tera")),
        ("html", "compact") => Some(include_str!("../../templates/html/compact.html.tera")),
        ("markdown", "github") => Some(include_str!("../../templates/markdown/github.md.tera")),
        _ => None,
    }
}

/// Template filename for a format/theme pair: `<theme>.<ext>.tera`.
fn template_filename(theme: &str, extension: &str) -> String {
    format!("{theme}.{extension}.tera")
}

/// Resolve a theme's template source: templates directory first, embedded
/// stock themes second, template-not-found naming the on-disk path last.
pub(crate) fn resolve_template(
    templates_dir: &Path,
    format: &'static str,
    theme: &str,
    extension: &str,
) -> Result<String, BuildError> {
    let path = templates_dir
        .join(format)
        .join(template_filename(theme, extension));
    if path.is_file() {
        return fs::read_to_string(&path).map_err(|source| BuildError::Io { format, source });
    }
    if let Some(embedded) = embedded_template(format, theme) {
        return Ok(embedded.to_string());
    }
    Err(BuildError::TemplateNotFound { format, path })
}

/// Themes available for a format: embedded stock themes plus any
/// `<templates>/<format>/*.tera` files on disk, sorted and deduplicated.
pub fn available_themes(templates_dir: &Path, format: &str) -> Vec<String> {
    let mut themes: Vec<String> = match format {
        "html" => vec!["compact".to_string(), "modern".to_string()],
        "markdown" => vec!["github".to_string()],
        _ => Vec::new(),
    };

    let dir = templates_dir.join(format);
    if dir.is_dir() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            // <theme>.<ext>.tera → <theme>
            if let Some(stem) = name.strip_suffix(".tera")
                && let Some((theme, _ext)) = stem.split_once('.')
                && !theme.is_empty()
            {
                themes.push(theme.to_string());
            }
        }
    }

    themes.sort();
    themes.dedup();
    themes
}

/// Create the output directory and write `resume.<ext>`, returning the
/// [`BuiltFile`] record for reporting.
pub(crate) fn write_output(
    opts: &BuilderOptions,
    format: &'static str,
    extension: &str,
    contents: &[u8],
) -> Result<BuiltFile, BuildError> {
    fs::create_dir_all(&opts.output_dir).map_err(|source| BuildError::Io { format, source })?;
    let path = opts.output_dir.join(format!("resume.{extension}"));
    fs::write(&path, contents).map_err(|source| BuildError::Io { format, source })?;
    Ok(BuiltFile {
        format,
        path,
        size_bytes: contents.len() as u64,
    })
}

#[cfg(test)]
pub(crate) fn test_options(output_dir: &Path) -> BuilderOptions {
    BuilderOptions {
        output_dir: output_dir.to_path_buf(),
        templates_dir: output_dir.join("templates"),
        theme: DEFAULT_THEME.to_string(),
        pdf_backend: PdfBackend::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_resume;
    use tempfile::TempDir;

    #[test]
    fn default_registry_has_four_formats() {
        let registry = BuilderRegistry::with_defaults();
        assert_eq!(registry.formats(), vec!["html", "json", "markdown", "pdf"]);
    }

    #[test]
    fn unknown_format_lists_available() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let err = registry
            .create("docx", &test_options(tmp.path()))
            .unwrap_err();
        match &err {
            BuildError::UnknownFormat { requested, available } => {
                assert_eq!(requested, "docx");
                assert_eq!(available, "html, json, markdown, pdf");
            }
            other => panic!("expected UnknownFormat, got {other}"),
        }
        assert!(err.to_string().contains("html, json, markdown, pdf"));
    }

    #[test]
    fn create_normalizes_format_names() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let builder = registry.create("  HTML ", &test_options(tmp.path())).unwrap();
        assert_eq!(builder.format_name(), "html");
    }

    #[test]
    fn output_filenames_follow_the_extension() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let opts = test_options(tmp.path());
        let expected = [
            ("html", "resume.html"),
            ("pdf", "resume.pdf"),
            ("json", "resume.json"),
            ("markdown", "resume.md"),
        ];
        for (format, filename) in expected {
            let builder = registry.create(format, &opts).unwrap();
            assert_eq!(builder.output_filename(), filename);
        }
    }

    #[test]
    fn runtime_registration_extends_the_registry() {
        #[derive(Debug)]
        struct NullBuilder;
        impl Builder for NullBuilder {
            fn format_name(&self) -> &'static str {
                "null"
            }
            fn file_extension(&self) -> &'static str {
                "null"
            }
            fn build(&self, _resume: &ResumeData) -> Result<BuiltFile, BuildError> {
                Ok(BuiltFile {
                    format: "null",
                    path: PathBuf::from("/dev/null"),
                    size_bytes: 0,
                })
            }
        }
        fn create_null(_opts: &BuilderOptions) -> Result<Box<dyn Builder>, BuildError> {
            Ok(Box::new(NullBuilder))
        }

        let tmp = TempDir::new().unwrap();
        let mut registry = BuilderRegistry::with_defaults();
        registry.register("null", create_null);
        assert!(registry.contains("null"));
        let built = registry
            .create("null", &test_options(tmp.path()))
            .unwrap()
            .build(&sample_resume())
            .unwrap();
        assert_eq!(built.format, "null");
    }

    #[test]
    fn resolve_template_prefers_disk_over_embedded() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("html");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("modern.html.tera"), "custom {{ personal_info.name }}").unwrap();
        let src = resolve_template(tmp.path(), "html", "modern", "html").unwrap();
        assert!(src.starts_with("custom "));
    }

    #[test]
    fn resolve_template_falls_back_to_embedded() {
        let tmp = TempDir::new().unwrap();
        let src = resolve_template(tmp.path(), "html", "modern", "html").unwrap();
        assert!(src.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn resolve_template_missing_theme_names_path() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_template(tmp.path(), "html", "sparkle", "html").unwrap_err();
        match &err {
            BuildError::TemplateNotFound { format, path } => {
                assert_eq!(*format, "html");
                assert!(path.ends_with("html/sparkle.html.tera"));
            }
            other => panic!("expected TemplateNotFound, got {other}"),
        }
        assert!(err.to_string().contains("sparkle.html.tera"));
    }

    #[test]
    fn available_themes_merges_disk_and_embedded() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("html");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("brutalist.html.tera"), "x").unwrap();
        fs::write(dir.join("modern.html.tera"), "x").unwrap(); // shadows embedded
        let themes = available_themes(tmp.path(), "html");
        assert_eq!(themes, vec!["brutalist", "compact", "modern"]);
    }
}
