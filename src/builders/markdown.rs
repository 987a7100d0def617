//! Markdown builder.
//!
//! GitHub-flavored output for profile READMEs and documentation platforms.
//! Skills render as shields.io badge images colored by proficiency. The
//! stock theme is "github"; the global default theme ("modern") maps to it
//! so a bare `build` works without a markdown-specific flag, while any other
//! missing theme still fails loudly.

use tera::Tera;

use crate::context::{BuildMeta, prepare_context};
use crate::model::ResumeData;
use crate::builders::{
    BuildError, Builder, BuilderOptions, BuiltFile, DEFAULT_THEME, filters, resolve_template,
    write_output,
};

const FORMAT: &str = "markdown";
const STOCK_THEME: &str = "github";

#[derive(Debug)]
pub struct MarkdownBuilder {
    opts: BuilderOptions,
}

/// Registry constructor.
pub fn create(opts: &BuilderOptions) -> Result<Box<dyn Builder>, BuildError> {
    Ok(Box::new(MarkdownBuilder { opts: opts.clone() }))
}

impl MarkdownBuilder {
    /// Resolve the theme template, mapping the global default to the stock
    /// markdown theme when no markdown template of that name exists.
    fn resolve(&self) -> Result<(String, String), BuildError> {
        match resolve_template(&self.opts.templates_dir, FORMAT, &self.opts.theme, "md") {
            Ok(template) => Ok((self.opts.theme.clone(), template)),
            Err(BuildError::TemplateNotFound { .. }) if self.opts.theme == DEFAULT_THEME => {
                let template =
                    resolve_template(&self.opts.templates_dir, FORMAT, STOCK_THEME, "md")?;
                Ok((STOCK_THEME.to_string(), template))
            }
            Err(e) => Err(e),
        }
    }
}

impl Builder for MarkdownBuilder {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn build(&self, resume: &ResumeData) -> Result<BuiltFile, BuildError> {
        let (theme, template) = self.resolve()?;

        let mut tera = Tera::default();
        filters::register_common(&mut tera);
        tera.register_filter("skill_badge", filters::skill_badge);
        tera.register_filter("markdown_escape", filters::markdown_escape);
        tera.add_raw_template("resume.md", &template)
            .map_err(|e| BuildError::render(FORMAT, e))?;

        let meta = BuildMeta::new(&theme, FORMAT);
        let context = tera::Context::from_value(prepare_context(resume, &meta))
            .map_err(|e| BuildError::render(FORMAT, e))?;
        let rendered = tera
            .render("resume.md", &context)
            .map_err(|e| BuildError::render(FORMAT, e))?;

        write_output(&self.opts, FORMAT, "md", rendered.as_bytes())
    }
}
