//! The shared template context.
//!
//! [`prepare_context`] is the one transform from [`ResumeData`] to the field
//! mapping templates see. Every builder goes through it with the same field
//! names, which is what makes themes interchangeable across formats: an
//! `{{ personal_info.name }}` lookup means the same thing in an HTML theme
//! and a markdown theme, and the JSON builder's output mirrors the same
//! shape.
//!
//! The transform is pure — data in, `serde_json::Value` out, no I/O — so the
//! cross-format consistency property is directly testable.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::model::ResumeData;

/// Generator identity recorded in every output's metadata block.
pub const GENERATOR: &str = "resume-forge";

/// Per-build facts that accompany the résumé fields: what was built, when,
/// and with which theme.
#[derive(Debug, Clone)]
pub struct BuildMeta {
    pub theme: String,
    pub format: &'static str,
    pub build_date: DateTime<Utc>,
}

impl BuildMeta {
    pub fn new(theme: &str, format: &'static str) -> Self {
        Self {
            theme: theme.to_string(),
            format,
            build_date: Utc::now(),
        }
    }
}

/// Produce the uniform field mapping for template rendering.
///
/// Core sections appear under their model names; optional sections are
/// always present as arrays (empty when absent) so templates can iterate
/// without null checks. `metadata` carries the build facts and `utils` the
/// derived values templates shouldn't compute themselves.
pub fn prepare_context(resume: &ResumeData, meta: &BuildMeta) -> Value {
    let now = meta.build_date;

    json!({
        "personal_info": resume.personal_info,
        "professional_summary": resume.professional_summary,
        "experience": resume.experience,
        "skills": resume.skills,
        "education": resume.education,
        "certifications": resume.certifications.clone().unwrap_or_default(),
        "projects": resume.projects.clone().unwrap_or_default(),
        "awards": resume.awards.clone().unwrap_or_default(),
        "publications": resume.publications.clone().unwrap_or_default(),
        "languages": resume.languages.clone().unwrap_or_default(),
        "metadata": {
            "build_date": now.to_rfc3339(),
            "build_date_formatted": now.format("%B %Y").to_string(),
            "resume_version": resume.version,
            "last_updated": resume.last_updated.to_rfc3339(),
            "last_updated_formatted": resume.last_updated.format("%B %Y").to_string(),
            "theme": meta.theme,
            "format": meta.format,
            "generator": GENERATOR,
            "generator_version": env!("CARGO_PKG_VERSION"),
        },
        "utils": {
            "total_experience_years": resume.total_experience_years(now),
            "current_role": resume.current_role(),
            "has_certifications": resume.certifications.as_ref().is_some_and(|v| !v.is_empty()),
            "has_projects": resume.projects.as_ref().is_some_and(|v| !v.is_empty()),
            "has_awards": resume.awards.as_ref().is_some_and(|v| !v.is_empty()),
            "has_publications": resume.publications.as_ref().is_some_and(|v| !v.is_empty()),
            "has_languages": resume.languages.as_ref().is_some_and(|v| !v.is_empty()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_resume;

    #[test]
    fn common_fields_are_identical_across_formats() {
        let resume = sample_resume();
        let html = prepare_context(&resume, &BuildMeta::new("modern", "html"));
        let pdf = prepare_context(&resume, &BuildMeta::new("modern", "pdf"));
        let md = prepare_context(&resume, &BuildMeta::new("github", "markdown"));
        let json = prepare_context(&resume, &BuildMeta::new("modern", "json"));

        for field in ["personal_info", "experience", "professional_summary", "skills"] {
            assert_eq!(html[field], pdf[field], "{field} differs html vs pdf");
            assert_eq!(html[field], md[field], "{field} differs html vs markdown");
            assert_eq!(html[field], json[field], "{field} differs html vs json");
        }
    }

    #[test]
    fn optional_sections_default_to_empty_arrays() {
        let resume = sample_resume();
        let ctx = prepare_context(&resume, &BuildMeta::new("modern", "html"));
        assert!(ctx["projects"].as_array().unwrap().is_empty());
        assert!(ctx["awards"].as_array().unwrap().is_empty());
        // languages is present in the fixture
        assert_eq!(ctx["languages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn metadata_block_records_build_facts() {
        let resume = sample_resume();
        let ctx = prepare_context(&resume, &BuildMeta::new("compact", "html"));
        let meta = &ctx["metadata"];
        assert_eq!(meta["theme"], "compact");
        assert_eq!(meta["format"], "html");
        assert_eq!(meta["generator"], GENERATOR);
        assert_eq!(meta["resume_version"], "1.0.0");
        assert!(meta["build_date"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn open_ended_experience_serializes_without_end_date() {
        let resume = sample_resume();
        let ctx = prepare_context(&resume, &BuildMeta::new("modern", "html"));
        let entry = &ctx["experience"][0];
        assert_eq!(entry["company"], "Acme");
        // skip_serializing_if drops the field entirely
        assert!(entry.get("end_date").is_none());
    }

    #[test]
    fn utils_expose_derived_values() {
        let resume = sample_resume();
        let ctx = prepare_context(&resume, &BuildMeta::new("modern", "html"));
        assert_eq!(ctx["utils"]["total_experience_years"], 10);
        assert_eq!(ctx["utils"]["current_role"]["company"], "Acme");
        assert_eq!(ctx["utils"]["has_languages"], true);
        assert_eq!(ctx["utils"]["has_projects"], false);
    }
}
