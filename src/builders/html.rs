//! HTML builder.
//!
//! Renders the theme template into a single self-contained document — CSS
//! lives inside the template, nothing is linked externally, so the file can
//! be mailed or dropped on any static host as-is. Stock themes: "modern"
//! and "compact".

use tera::Tera;

use crate::context::{BuildMeta, prepare_context};
use crate::model::ResumeData;
use crate::builders::{
    BuildError, Builder, BuilderOptions, BuiltFile, filters, resolve_template, write_output,
};

const FORMAT: &str = "html";

#[derive(Debug)]
pub struct HtmlBuilder {
    opts: BuilderOptions,
}

/// Registry constructor.
pub fn create(opts: &BuilderOptions) -> Result<Box<dyn Builder>, BuildError> {
    Ok(Box::new(HtmlBuilder { opts: opts.clone() }))
}

impl Builder for HtmlBuilder {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn build(&self, resume: &ResumeData) -> Result<BuiltFile, BuildError> {
        let template = resolve_template(&self.opts.templates_dir, FORMAT, &self.opts.theme, "html")?;

        let mut tera = Tera::default();
        filters::register_common(&mut tera);
        tera.register_filter("skill_level_class", filters::skill_level_class);
        tera.register_filter("markdown", filters::markdown);
        tera.add_raw_template("resume.html", &template)
            .map_err(|e| BuildError::render(FORMAT, e))?;

        let meta = BuildMeta::new(&self.opts.theme, FORMAT);
        let context = tera::Context::from_value(prepare_context(resume, &meta))
            .map_err(|e| BuildError::render(FORMAT, e))?;
        let rendered = tera
            .render("resume.html", &context)
            .map_err(|e| BuildError::render(FORMAT, e))?;

        write_output(&self.opts, FORMAT, "html", rendered.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_options;
    use crate::test_helpers::sample_resume;
    use std::fs;
    use tempfile::TempDir;

    fn build_html(theme: &str) -> Result<String, BuildError> {
        let tmp = TempDir::new().unwrap();
        let mut opts = test_options(tmp.path());
        opts.theme = theme.to_string();
        let builder = HtmlBuilder { opts };
        let built = builder.build(&sample_resume())?;
        Ok(fs::read_to_string(built.path).unwrap())
    }

    #[test]
    fn renders_core_content() {
        let html = build_html("modern").unwrap();
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Acme"));
        assert!(html.contains("Engineer"));
    }

    #[test]
    fn open_ended_position_shows_present() {
        let html = build_html("modern").unwrap();
        assert!(html.contains("Present"));
    }

    #[test]
    fn output_is_self_contained() {
        let html = build_html("modern").unwrap();
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link rel=\"stylesheet\""));
    }

    #[test]
    fn proficiency_maps_to_css_class() {
        let html = build_html("modern").unwrap();
        assert!(html.contains("skill-expert"));
        assert!(html.contains("skill-intermediate"));
    }

    #[test]
    fn phone_is_formatted() {
        let html = build_html("modern").unwrap();
        assert!(html.contains("(555) 867-5309"));
    }

    #[test]
    fn compact_theme_renders() {
        let html = build_html("compact").unwrap();
        assert!(html.contains("Jane Doe"));
    }

    #[test]
    fn missing_theme_is_template_not_found() {
        let err = build_html("sparkle").unwrap_err();
        match err {
            BuildError::TemplateNotFound { format, path } => {
                assert_eq!(format, "html");
                assert!(path.to_string_lossy().contains("sparkle"));
            }
            other => panic!("expected TemplateNotFound, got {other}"),
        }
    }

    #[test]
    fn disk_template_overrides_embedded() {
        let tmp = TempDir::new().unwrap();
        let opts = test_options(tmp.path());
        let dir = opts.templates_dir.join("html");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("modern.html.tera"), "<p>{{ personal_info.name }}</p>").unwrap();
        let builder = HtmlBuilder { opts };
        let built = builder.build(&sample_resume()).unwrap();
        assert_eq!(
            fs::read_to_string(built.path).unwrap(),
            "<p>Jane Doe</p>"
        );
    }

    #[test]
    fn broken_template_is_render_failed() {
        let tmp = TempDir::new().unwrap();
        let opts = test_options(tmp.path());
        let dir = opts.templates_dir.join("html");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("modern.html.tera"), "{{ personal_info.name }").unwrap();
        let builder = HtmlBuilder { opts };
        assert!(matches!(
            builder.build(&sample_resume()).unwrap_err(),
            BuildError::RenderFailed { format: "html", .. }
        ));
    }
}
