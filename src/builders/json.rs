//! JSON builder.
//!
//! The identity transform of the pipeline: the model serializes as-is —
//! every input field survives, which makes this output both a machine-
//! readable export and the golden reference for what the other formats
//! should contain — with a `build_info` block recording when, how, and by
//! what it was produced.

use serde_json::{Value, json};

use crate::context::{BuildMeta, GENERATOR};
use crate::model::ResumeData;
use crate::builders::{BuildError, Builder, BuilderOptions, BuiltFile, write_output};

const FORMAT: &str = "json";

#[derive(Debug)]
pub struct JsonBuilder {
    opts: BuilderOptions,
}

/// Registry constructor.
pub fn create(opts: &BuilderOptions) -> Result<Box<dyn Builder>, BuildError> {
    Ok(Box::new(JsonBuilder { opts: opts.clone() }))
}

impl JsonBuilder {
    fn build_info(&self, resume: &ResumeData, meta: &BuildMeta) -> Value {
        json!({
            "build_date": meta.build_date.to_rfc3339(),
            "build_date_formatted": meta.build_date.format("%B %-d, %Y").to_string(),
            "generator": GENERATOR,
            "generator_version": env!("CARGO_PKG_VERSION"),
            "format": FORMAT,
            "theme": meta.theme,
            "resume_version": resume.version,
            "last_updated": resume.last_updated.to_rfc3339(),
            "counts": {
                "experience_entries": resume.experience.len(),
                "skill_categories": resume.skills.len(),
                "total_skills": resume.total_skills(),
                "education_entries": resume.education.len(),
            },
            "has_certifications": resume.certifications.as_ref().is_some_and(|v| !v.is_empty()),
            "has_projects": resume.projects.as_ref().is_some_and(|v| !v.is_empty()),
            "has_awards": resume.awards.as_ref().is_some_and(|v| !v.is_empty()),
            "has_publications": resume.publications.as_ref().is_some_and(|v| !v.is_empty()),
            "has_languages": resume.languages.as_ref().is_some_and(|v| !v.is_empty()),
        })
    }
}

impl Builder for JsonBuilder {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn build(&self, resume: &ResumeData) -> Result<BuiltFile, BuildError> {
        let meta = BuildMeta::new(&self.opts.theme, FORMAT);

        let mut document =
            serde_json::to_value(resume).map_err(|e| BuildError::render(FORMAT, e))?;
        document
            .as_object_mut()
            .ok_or_else(|| {
                BuildError::render(FORMAT, std::io::Error::other("resume serialized to non-object"))
            })?
            .insert("build_info".to_string(), self.build_info(resume, &meta));

        let mut rendered =
            serde_json::to_string_pretty(&document).map_err(|e| BuildError::render(FORMAT, e))?;
        rendered.push('\n');

        write_output(&self.opts, FORMAT, "json", rendered.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_options;
    use crate::test_helpers::sample_resume;
    use std::fs;
    use tempfile::TempDir;

    fn build_json() -> Value {
        let tmp = TempDir::new().unwrap();
        let builder = JsonBuilder {
            opts: test_options(tmp.path()),
        };
        let built = builder.build(&sample_resume()).unwrap();
        serde_json::from_str(&fs::read_to_string(built.path).unwrap()).unwrap()
    }

    #[test]
    fn round_trips_every_input_field() {
        let output = build_json();
        // Parsing the output back into the model proves nothing was lost
        // or renamed; build_info must be removed first since the model
        // rejects unknown fields.
        let mut trimmed = output.clone();
        trimmed.as_object_mut().unwrap().remove("build_info");
        let reparsed: ResumeData = serde_json::from_value(trimmed).unwrap();
        assert_eq!(reparsed.personal_info.name, "Jane Doe");
        assert_eq!(reparsed.experience.len(), 1);
        assert_eq!(reparsed.skills[0].skills[0].name, "Rust");
        assert_eq!(reparsed.languages.unwrap().len(), 1);
    }

    #[test]
    fn open_ended_experience_has_no_end_date() {
        let output = build_json();
        let exp = &output["experience"][0];
        assert_eq!(exp["company"], "Acme");
        assert!(exp.get("end_date").is_none_or(Value::is_null));
    }

    #[test]
    fn build_info_block_is_present() {
        let output = build_json();
        let info = &output["build_info"];
        assert_eq!(info["generator"], GENERATOR);
        assert_eq!(info["format"], "json");
        assert_eq!(info["counts"]["experience_entries"], 1);
        assert_eq!(info["counts"]["total_skills"], 3);
        assert_eq!(info["has_languages"], true);
        assert_eq!(info["has_projects"], false);
    }

    #[test]
    fn output_file_is_resume_json() {
        let tmp = TempDir::new().unwrap();
        let builder = JsonBuilder {
            opts: test_options(tmp.path()),
        };
        let built = builder.build(&sample_resume()).unwrap();
        assert!(built.path.ends_with("resume.json"));
        assert_eq!(
            built.size_bytes,
            fs::metadata(&built.path).unwrap().len()
        );
    }
}
