//! Source document loading.
//!
//! Stage 1 of the build pipeline: read `resume.yml` (or `.yaml`/`.json`) into
//! a validated [`ResumeData`]. The format is chosen by file extension —
//! YAML is the canonical hand-edited source, JSON is accepted for
//! machine-generated data.
//!
//! Any failure here — unreadable file, parse error, or validation errors —
//! aborts the run before a single builder starts. Partial-failure tolerance
//! only applies *between* builders, never to bad input.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::ResumeData;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported source extension {extension:?} (expected yml, yaml, or json)")]
    UnsupportedExtension { extension: String },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("resume data failed validation with {} problem(s)", .errors.len())]
    Validation { errors: Vec<String> },
}

/// Load and validate a résumé document.
///
/// This is the only constructor for [`ResumeData`] the CLI uses, so a value
/// of that type in the build stage is always a validated one.
pub fn load(path: &Path) -> Result<ResumeData, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let resume: ResumeData = match extension.as_str() {
        "yml" | "yaml" => serde_yml::from_str(&content).map_err(|e| SourceError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        "json" => serde_json::from_str(&content).map_err(|e| SourceError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        other => {
            return Err(SourceError::UnsupportedExtension {
                extension: other.to_string(),
            });
        }
    };

    let errors = resume.validate();
    if !errors.is_empty() {
        return Err(SourceError::Validation { errors });
    }

    Ok(resume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_resume_json, sample_resume_yaml};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_yaml_source() {
        let tmp = TempDir::new().unwrap();
        let path = write_source(&tmp, "resume.yml", &sample_resume_yaml());
        let resume = load(&path).unwrap();
        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.experience[0].company, "Acme");
    }

    #[test]
    fn loads_json_source() {
        let tmp = TempDir::new().unwrap();
        let path = write_source(&tmp, "resume.json", &sample_resume_json());
        let resume = load(&path).unwrap();
        assert_eq!(resume.experience[0].role, "Engineer");
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load(&tmp.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_source(&tmp, "resume.toml", "version = 1");
        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            SourceError::UnsupportedExtension { extension } if extension == "toml"
        ));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let mut yaml = sample_resume_yaml();
        yaml.push_str("\nshoe_size: 42\n");
        let path = write_source(&tmp, "resume.yml", &yaml);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn invalid_document_reports_all_errors() {
        let tmp = TempDir::new().unwrap();
        let yaml = sample_resume_yaml()
            .replace("jane@example.com", "nope")
            .replace("version: 1.0.0", "version: one");
        let path = write_source(&tmp, "resume.yml", &yaml);
        match load(&path).unwrap_err() {
            SourceError::Validation { errors } => {
                assert_eq!(errors.len(), 2, "errors: {errors:?}");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
