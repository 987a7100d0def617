//! CLI output formatting for the pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, format) is its semantic identity — name and
//! positional index — with filesystem paths and sizes as trailing context.
//! The build report reads as "what do I have now", not as a log of writes.
//!
//! # Output Format
//!
//! ## Validate
//!
//! ```text
//! Résumé
//! 001 Jane Doe — Staff Engineer
//!     Version: 1.0.0
//!     Updated: June 2025
//!
//! Sections
//! 001 Experience (1 entry)
//! 002 Skills (2 categories, 3 skills)
//! 003 Education (1 entry)
//! 004 Languages (1 entry)
//! ```
//!
//! ## Build
//!
//! ```text
//! Formats
//! 001 html → dist/resume.html (6.1 KB)
//! 002 json → dist/resume.json (2.4 KB)
//! 003 markdown → dist/resume.md (1.8 KB)
//! 004 pdf → FAILED: pdf: no backend available: disabled in config
//!
//! Built 3 of 4 formats
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use std::path::Path;

use crate::builders::{BuildError, BuiltFile};
use crate::model::ResumeData;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable file size: bytes under 1 KiB, otherwise one decimal KiB.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Validate output
// ============================================================================

/// Format the validation summary: who the résumé is for, then a section
/// inventory with entry counts. Optional sections appear only when present.
pub fn format_validate_output(resume: &ResumeData, source: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Résumé".to_string());
    lines.push(format!(
        "001 {} — {}",
        resume.personal_info.name, resume.personal_info.title
    ));
    lines.push(format!("    Source: {}", source.display()));
    lines.push(format!("    Version: {}", resume.version));
    lines.push(format!(
        "    Updated: {}",
        resume.last_updated.format("%B %Y")
    ));
    lines.push(String::new());

    lines.push("Sections".to_string());
    let mut pos = 0;
    let mut section = |label: String| {
        pos += 1;
        format!("{} {}", format_index(pos), label)
    };

    lines.push(section(format!(
        "Experience ({})",
        count_noun(resume.experience.len(), "entry", "entries")
    )));
    lines.push(section(format!(
        "Skills ({}, {})",
        count_noun(resume.skills.len(), "category", "categories"),
        count_noun(resume.total_skills(), "skill", "skills")
    )));
    lines.push(section(format!(
        "Education ({})",
        count_noun(resume.education.len(), "entry", "entries")
    )));

    let optional: [(&str, Option<usize>); 5] = [
        ("Certifications", resume.certifications.as_ref().map(Vec::len)),
        ("Projects", resume.projects.as_ref().map(Vec::len)),
        ("Awards", resume.awards.as_ref().map(Vec::len)),
        ("Publications", resume.publications.as_ref().map(Vec::len)),
        ("Languages", resume.languages.as_ref().map(Vec::len)),
    ];
    for (label, len) in optional {
        if let Some(len) = len
            && len > 0
        {
            lines.push(section(format!(
                "{label} ({})",
                count_noun(len, "entry", "entries")
            )));
        }
    }

    lines
}

pub fn print_validate_output(resume: &ResumeData, source: &Path) {
    for line in format_validate_output(resume, source) {
        println!("{line}");
    }
}

// ============================================================================
// Build output
// ============================================================================

/// One requested format's outcome, in request order.
pub type FormatOutcome = (String, Result<BuiltFile, BuildError>);

/// Format the build report: one line per requested format, then the
/// partial-success summary. Failures stay in their positional slot so the
/// report always covers everything that was asked for.
pub fn format_build_output(outcomes: &[FormatOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Formats".to_string());

    for (i, (format, outcome)) in outcomes.iter().enumerate() {
        let index = format_index(i + 1);
        match outcome {
            Ok(built) => lines.push(format!(
                "{index} {format} → {} ({})",
                built.path.display(),
                format_size(built.size_bytes)
            )),
            Err(e) => lines.push(format!("{index} {format} → FAILED: {e}")),
        }
    }

    let succeeded = outcomes.iter().filter(|(_, o)| o.is_ok()).count();
    lines.push(String::new());
    lines.push(format!("Built {succeeded} of {} formats", outcomes.len()));

    lines
}

pub fn print_build_output(outcomes: &[FormatOutcome]) {
    for line in format_build_output(outcomes) {
        println!("{line}");
    }
}

// ============================================================================
// Formats listing
// ============================================================================

/// Format the `formats` command output: registered formats with their
/// available themes.
pub fn format_formats_output(formats: &[&str], themes: &[(String, Vec<String>)]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Formats".to_string());
    for (i, format) in formats.iter().enumerate() {
        let themes_for: Vec<&str> = themes
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, t)| t.iter().map(String::as_str).collect())
            .unwrap_or_default();
        if themes_for.is_empty() {
            lines.push(format!("{} {format}", format_index(i + 1)));
        } else {
            lines.push(format!(
                "{} {format} (themes: {})",
                format_index(i + 1),
                themes_for.join(", ")
            ));
        }
    }
    lines
}

pub fn print_formats_output(formats: &[&str], themes: &[(String, Vec<String>)]) {
    for line in format_formats_output(formats, themes) {
        println!("{line}");
    }
}
