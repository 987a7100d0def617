//! The build stage.
//!
//! Fans the requested formats out over the rayon pool. Builders are pure
//! functions over a shared immutable snapshot writing distinct files, so
//! parallelism needs no synchronization; outcomes come back in request
//! order either way.
//!
//! Failure policy: each format's outcome is independent. A format that
//! fails — unknown name, missing template, no PDF backend — occupies its
//! slot in the result with its error and the remaining formats still build.
//! The caller decides what partial success means for the exit code.

use rayon::prelude::*;

use crate::builders::{BuildError, BuilderOptions, BuilderRegistry, BuiltFile};
use crate::model::ResumeData;

/// Build every requested format, one outcome per request, in request order.
pub fn build_formats(
    registry: &BuilderRegistry,
    formats: &[String],
    resume: &ResumeData,
    opts: &BuilderOptions,
) -> Vec<(String, Result<BuiltFile, BuildError>)> {
    formats
        .par_iter()
        .map(|format| {
            let outcome = registry
                .create(format, opts)
                .and_then(|builder| builder.build(resume));
            if let Err(e) = &outcome {
                tracing::warn!("{format} build failed: {e}");
            }
            (format.clone(), outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{PdfBackend, test_options};
    use crate::test_helpers::sample_resume;
    use tempfile::TempDir;

    fn all_formats() -> Vec<String> {
        ["html", "pdf", "json", "markdown"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn builds_all_four_formats() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let outcomes = build_formats(
            &registry,
            &all_formats(),
            &sample_resume(),
            &test_options(tmp.path()),
        );
        assert_eq!(outcomes.len(), 4);
        for (format, outcome) in &outcomes {
            assert!(outcome.is_ok(), "{format} failed: {outcome:?}");
        }
        for name in ["resume.html", "resume.pdf", "resume.json", "resume.md"] {
            assert!(tmp.path().join(name).is_file(), "{name} missing");
        }
    }

    #[test]
    fn outcomes_preserve_request_order() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let formats: Vec<String> = vec!["json".into(), "html".into()];
        let outcomes = build_formats(
            &registry,
            &formats,
            &sample_resume(),
            &test_options(tmp.path()),
        );
        assert_eq!(outcomes[0].0, "json");
        assert_eq!(outcomes[1].0, "html");
    }

    #[test]
    fn pdf_backend_failure_does_not_block_siblings() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let mut opts = test_options(tmp.path());
        opts.pdf_backend = PdfBackend::Unavailable {
            reason: "no backend in this environment".to_string(),
        };
        let outcomes = build_formats(&registry, &all_formats(), &sample_resume(), &opts);

        let by_format = |name: &str| {
            outcomes
                .iter()
                .find(|(f, _)| f == name)
                .map(|(_, o)| o)
                .unwrap()
        };
        assert!(matches!(
            by_format("pdf"),
            Err(BuildError::NoBackendAvailable { .. })
        ));
        assert!(by_format("html").is_ok());
        assert!(by_format("json").is_ok());
        assert!(by_format("markdown").is_ok());
    }

    #[test]
    fn unknown_format_fails_in_place() {
        let tmp = TempDir::new().unwrap();
        let registry = BuilderRegistry::with_defaults();
        let formats: Vec<String> = vec!["json".into(), "docx".into()];
        let outcomes = build_formats(
            &registry,
            &formats,
            &sample_resume(),
            &test_options(tmp.path()),
        );
        assert!(outcomes[0].1.is_ok());
        assert!(matches!(
            &outcomes[1].1,
            Err(BuildError::UnknownFormat { .. })
        ));
    }
}
