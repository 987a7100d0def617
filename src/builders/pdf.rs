//! PDF builder.
//!
//! Two rendering backends sit behind a capability enum that is resolved
//! once at startup and injected through [`BuilderOptions`] — the builder
//! itself never probes the environment:
//!
//! - **Draw** (`printpdf`): positions text directly with the built-in
//!   Helvetica faces. No font files, no system libraries — this is the
//!   default because it works in any container or CI runner.
//! - **Layout** (`genpdf`): a flow-layout engine with proper wrapping and
//!   pagination. Richer output, but it needs a TTF family on disk, so it is
//!   only used when the config asks for it and the fonts resolve.
//!
//! When neither backend is usable the build fails with
//! [`BuildError::NoBackendAvailable`] instead of silently producing nothing;
//! sibling formats in the same invocation are unaffected.

use std::path::{Path, PathBuf};

use genpdf::Element as _;
use genpdf::{Alignment, elements, style};

use crate::context::{BuildMeta, GENERATOR};
use crate::format::{format_date_range, format_phone};
use crate::model::{Experience, ResumeData};
use crate::builders::{BuildError, Builder, BuilderOptions, BuiltFile, write_output};

const FORMAT: &str = "pdf";

// US letter.
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 19.0;

/// PDF rendering capability, resolved once by [`resolve_backend`].
#[derive(Debug, Clone)]
pub enum PdfBackend {
    /// printpdf with built-in Helvetica.
    Draw,
    /// genpdf flow layout with an on-disk TTF family.
    Layout { fonts_dir: PathBuf, family: String },
    /// Nothing usable; carries the reason for the error message.
    Unavailable { reason: String },
}

/// Map the configured backend choice to an actual capability.
///
/// `auto` picks the self-contained drawing backend. `layout` insists on the
/// flow engine and resolves to `Unavailable` when the font family is
/// incomplete — failing loudly beats silently downgrading the output the
/// user asked for.
pub fn resolve_backend(requested: &str, fonts_dir: &Path, family: &str) -> PdfBackend {
    match requested {
        "auto" | "draw" => PdfBackend::Draw,
        "layout" => {
            let missing = missing_font_files(fonts_dir, family);
            if missing.is_empty() {
                PdfBackend::Layout {
                    fonts_dir: fonts_dir.to_path_buf(),
                    family: family.to_string(),
                }
            } else {
                PdfBackend::Unavailable {
                    reason: format!(
                        "layout backend requested but font files are missing: {}",
                        missing.join(", ")
                    ),
                }
            }
        }
        "disabled" => PdfBackend::Unavailable {
            reason: "pdf backend disabled in config".to_string(),
        },
        other => PdfBackend::Unavailable {
            reason: format!("unrecognized pdf backend {other:?}"),
        },
    }
}

/// The four faces genpdf expects: `<family>-<face>.ttf`.
fn missing_font_files(fonts_dir: &Path, family: &str) -> Vec<String> {
    ["Regular", "Bold", "Italic", "BoldItalic"]
        .iter()
        .map(|face| format!("{family}-{face}.ttf"))
        .filter(|name| !fonts_dir.join(name).is_file())
        .collect()
}

#[derive(Debug)]
pub struct PdfBuilder {
    opts: BuilderOptions,
}

/// Registry constructor.
pub fn create(opts: &BuilderOptions) -> Result<Box<dyn Builder>, BuildError> {
    Ok(Box::new(PdfBuilder { opts: opts.clone() }))
}

impl Builder for PdfBuilder {
    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    fn build(&self, resume: &ResumeData) -> Result<BuiltFile, BuildError> {
        let meta = BuildMeta::new(&self.opts.theme, FORMAT);
        let bytes = match &self.opts.pdf_backend {
            PdfBackend::Draw => render_draw(resume, &meta)?,
            PdfBackend::Layout { fonts_dir, family } => {
                render_layout(resume, &meta, fonts_dir, family)?
            }
            PdfBackend::Unavailable { reason } => {
                return Err(BuildError::NoBackendAvailable {
                    reason: reason.clone(),
                });
            }
        };
        write_output(&self.opts, FORMAT, "pdf", &bytes)
    }
}

// ============================================================================
// Draw backend (printpdf, built-in Helvetica)
// ============================================================================

/// Cursor-based page writer over printpdf. Tracks the baseline from the
/// top of the page and starts a new page when a block won't fit.
struct DrawPage {
    doc: printpdf::PdfDocumentReference,
    layer: printpdf::PdfLayerReference,
    regular: printpdf::IndirectFontRef,
    bold: printpdf::IndirectFontRef,
    oblique: printpdf::IndirectFontRef,
    /// Baseline height from the page bottom, mm.
    y: f64,
}

impl DrawPage {
    fn new(title: &str) -> Result<Self, BuildError> {
        let (doc, page, layer) = printpdf::PdfDocument::new(
            title,
            printpdf::Mm(PAGE_WIDTH_MM),
            printpdf::Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let regular = doc
            .add_builtin_font(printpdf::BuiltinFont::Helvetica)
            .map_err(|e| BuildError::render(FORMAT, e))?;
        let bold = doc
            .add_builtin_font(printpdf::BuiltinFont::HelveticaBold)
            .map_err(|e| BuildError::render(FORMAT, e))?;
        let oblique = doc
            .add_builtin_font(printpdf::BuiltinFont::HelveticaOblique)
            .map_err(|e| BuildError::render(FORMAT, e))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            oblique,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    /// Start a new page when fewer than `needed` mm remain.
    fn ensure_space(&mut self, needed: f64) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self.doc.add_page(
                printpdf::Mm(PAGE_WIDTH_MM),
                printpdf::Mm(PAGE_HEIGHT_MM),
                "content",
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn gap(&mut self, mm: f64) {
        self.y -= mm;
    }

    /// One line at the left margin.
    fn line(&mut self, text: &str, size: f64, font: Font) {
        self.ensure_space(line_height(size));
        let font = self.font_ref(font);
        self.layer.use_text(
            text,
            size,
            printpdf::Mm(MARGIN_MM),
            printpdf::Mm(self.y),
            font,
        );
        self.y -= line_height(size);
    }

    /// Centered line (approximate Helvetica metrics — close enough for a
    /// header block).
    fn centered_line(&mut self, text: &str, size: f64, font: Font) {
        self.ensure_space(line_height(size));
        let width_mm = text.chars().count() as f64 * char_width_mm(size);
        let x = ((PAGE_WIDTH_MM - width_mm) / 2.0).max(MARGIN_MM);
        let font = self.font_ref(font);
        self.layer
            .use_text(text, size, printpdf::Mm(x), printpdf::Mm(self.y), font);
        self.y -= line_height(size);
    }

    /// Greedy-wrapped paragraph with a hanging indent.
    fn wrapped(&mut self, text: &str, size: f64, font: Font, indent: f64) {
        let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - indent;
        let max_chars = (usable / char_width_mm(size)).max(10.0) as usize;
        for line in wrap_text(text, max_chars) {
            self.ensure_space(line_height(size));
            let font = self.font_ref(font);
            self.layer.use_text(
                line,
                size,
                printpdf::Mm(MARGIN_MM + indent),
                printpdf::Mm(self.y),
                font,
            );
            self.y -= line_height(size);
        }
    }

    fn section_header(&mut self, title: &str) {
        self.ensure_space(14.0);
        self.gap(4.0);
        self.line(&title.to_ascii_uppercase(), 12.0, Font::Bold);
        self.gap(1.0);
    }

    fn font_ref(&self, font: Font) -> &printpdf::IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
            Font::Oblique => &self.oblique,
        }
    }
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Oblique,
}

fn line_height(size: f64) -> f64 {
    // Points to mm, with leading.
    size * 0.3528 * 1.35
}

fn char_width_mm(size: f64) -> f64 {
    // Average Helvetica glyph width ≈ 0.5 em.
    size * 0.5 * 0.3528
}

/// Greedy word wrap at a character budget. Words longer than the budget get
/// a line of their own rather than being split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn achievement_line(description: &str, metrics: Option<&[crate::model::Metric]>) -> String {
    let mut line = format!("•  {description}");
    if let Some(metrics) = metrics
        && !metrics.is_empty()
    {
        let rendered: Vec<String> = metrics
            .iter()
            .map(|m| format!("{}{}", m.value, m.unit))
            .collect();
        line.push_str(&format!(" ({})", rendered.join(", ")));
    }
    line
}

fn experience_heading(exp: &Experience) -> String {
    format!(
        "{} — {}   ({})",
        exp.role,
        exp.company,
        format_date_range(&exp.start_date, exp.end_date.as_deref())
    )
}

fn contact_line(resume: &ResumeData) -> String {
    let info = &resume.personal_info;
    let mut parts = vec![info.email.clone()];
    if let Some(phone) = &info.phone {
        parts.push(format_phone(phone));
    }
    let mut location = format!("{}, {}", info.location.city, info.location.state);
    if info.location.remote_friendly {
        location.push_str(" • Remote Friendly");
    }
    parts.push(location);
    parts.join(" • ")
}

fn render_draw(resume: &ResumeData, meta: &BuildMeta) -> Result<Vec<u8>, BuildError> {
    let title = format!("{} — Resume", resume.personal_info.name);
    let mut page = DrawPage::new(&title)?;

    // Header
    page.centered_line(&resume.personal_info.name, 22.0, Font::Bold);
    page.centered_line(&resume.personal_info.title, 13.0, Font::Regular);
    page.centered_line(&contact_line(resume), 9.0, Font::Regular);

    // Summary
    page.section_header("Professional Summary");
    page.wrapped(&resume.professional_summary.overview, 10.0, Font::Regular, 0.0);
    if !resume.professional_summary.key_strengths.is_empty() {
        page.gap(1.5);
        for strength in &resume.professional_summary.key_strengths {
            page.wrapped(&format!("•  {strength}"), 10.0, Font::Regular, 3.0);
        }
    }

    // Experience
    page.section_header("Professional Experience");
    for exp in &resume.experience {
        page.ensure_space(20.0);
        page.line(&experience_heading(exp), 11.0, Font::Bold);
        if let Some(desc) = &exp.company_description {
            page.wrapped(desc, 9.0, Font::Oblique, 0.0);
        }
        for ach in &exp.achievements {
            page.wrapped(
                &achievement_line(&ach.description, ach.metrics.as_deref()),
                10.0,
                Font::Regular,
                3.0,
            );
        }
        page.gap(3.0);
    }

    // Skills
    if !resume.skills.is_empty() {
        page.section_header("Technical Skills");
        for category in &resume.skills {
            let names: Vec<&str> = category.skills.iter().map(|s| s.name.as_str()).collect();
            page.wrapped(
                &format!("{}: {}", category.display_name, names.join(" • ")),
                10.0,
                Font::Regular,
                0.0,
            );
        }
    }

    // Education
    page.section_header("Education");
    for edu in &resume.education {
        let mut heading = edu.degree.clone();
        if let Some(field) = &edu.field_of_study {
            heading.push_str(&format!(" in {field}"));
        }
        page.line(
            &format!("{} — {}   ({})", heading, edu.institution, edu.graduation_date),
            10.0,
            Font::Bold,
        );
        if let Some(gpa) = edu.gpa {
            page.line(&format!("GPA: {gpa}"), 9.0, Font::Regular);
        }
    }

    // Optional sections
    if let Some(certs) = resume.certifications.as_deref()
        && !certs.is_empty()
    {
        page.section_header("Certifications");
        for cert in certs {
            page.line(
                &format!(
                    "{} — {} ({})",
                    cert.name,
                    cert.issuer,
                    crate::format::format_date(&cert.date_earned)
                ),
                10.0,
                Font::Regular,
            );
        }
    }
    if let Some(projects) = resume.projects.as_deref()
        && !projects.is_empty()
    {
        page.section_header("Featured Projects");
        for project in projects {
            page.line(&project.name, 10.0, Font::Bold);
            page.wrapped(&project.description, 10.0, Font::Regular, 0.0);
            if !project.technologies.is_empty() {
                page.wrapped(
                    &format!("Technologies: {}", project.technologies.join(", ")),
                    9.0,
                    Font::Oblique,
                    0.0,
                );
            }
            page.gap(2.0);
        }
    }
    if let Some(awards) = resume.awards.as_deref()
        && !awards.is_empty()
    {
        page.section_header("Awards");
        for award in awards {
            page.line(
                &format!(
                    "{} — {} ({})",
                    award.title,
                    award.issuer,
                    crate::format::format_date(&award.date)
                ),
                10.0,
                Font::Regular,
            );
        }
    }

    // Footer
    page.gap(6.0);
    page.centered_line(
        &format!(
            "Generated by {} {} • {}",
            GENERATOR,
            env!("CARGO_PKG_VERSION"),
            meta.build_date.format("%B %-d, %Y")
        ),
        8.0,
        Font::Oblique,
    );

    page.doc
        .save_to_bytes()
        .map_err(|e| BuildError::render(FORMAT, e))
}

// ============================================================================
// Layout backend (genpdf, on-disk TTF family)
// ============================================================================

fn render_layout(
    resume: &ResumeData,
    meta: &BuildMeta,
    fonts_dir: &Path,
    family: &str,
) -> Result<Vec<u8>, BuildError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, family, None)
        .map_err(|e| BuildError::render(FORMAT, e))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("{} — Resume", resume.personal_info.name));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    let header = style::Style::new().bold().with_font_size(22);
    let section = style::Style::new().bold().with_font_size(12);
    let emphasis = style::Style::new().bold().with_font_size(11);
    let note = style::Style::new().italic().with_font_size(9);

    doc.push(
        elements::Paragraph::new(&resume.personal_info.name)
            .aligned(Alignment::Center)
            .styled(header),
    );
    doc.push(
        elements::Paragraph::new(&resume.personal_info.title).aligned(Alignment::Center),
    );
    doc.push(
        elements::Paragraph::new(contact_line(resume))
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(9)),
    );
    doc.push(elements::Break::new(1));

    doc.push(elements::Paragraph::new("PROFESSIONAL SUMMARY").styled(section));
    doc.push(elements::Paragraph::new(&resume.professional_summary.overview));
    if !resume.professional_summary.key_strengths.is_empty() {
        let mut list = elements::UnorderedList::new();
        for strength in &resume.professional_summary.key_strengths {
            list.push(elements::Paragraph::new(strength));
        }
        doc.push(list);
    }
    doc.push(elements::Break::new(1));

    doc.push(elements::Paragraph::new("PROFESSIONAL EXPERIENCE").styled(section));
    for exp in &resume.experience {
        doc.push(elements::Paragraph::new(experience_heading(exp)).styled(emphasis));
        if let Some(desc) = &exp.company_description {
            doc.push(elements::Paragraph::new(desc).styled(note));
        }
        let mut list = elements::UnorderedList::new();
        for ach in &exp.achievements {
            // The list element draws its own bullets.
            let mut line = ach.description.clone();
            if let Some(metrics) = ach.metrics.as_deref()
                && !metrics.is_empty()
            {
                let rendered: Vec<String> = metrics
                    .iter()
                    .map(|m| format!("{}{}", m.value, m.unit))
                    .collect();
                line.push_str(&format!(" ({})", rendered.join(", ")));
            }
            list.push(elements::Paragraph::new(line));
        }
        doc.push(list);
        doc.push(elements::Break::new(1));
    }

    if !resume.skills.is_empty() {
        doc.push(elements::Paragraph::new("TECHNICAL SKILLS").styled(section));
        for category in &resume.skills {
            let names: Vec<&str> = category.skills.iter().map(|s| s.name.as_str()).collect();
            doc.push(elements::Paragraph::new(format!(
                "{}: {}",
                category.display_name,
                names.join(" • ")
            )));
        }
        doc.push(elements::Break::new(1));
    }

    doc.push(elements::Paragraph::new("EDUCATION").styled(section));
    for edu in &resume.education {
        let mut heading = edu.degree.clone();
        if let Some(field) = &edu.field_of_study {
            heading.push_str(&format!(" in {field}"));
        }
        doc.push(
            elements::Paragraph::new(format!(
                "{} — {} ({})",
                heading, edu.institution, edu.graduation_date
            ))
            .styled(emphasis),
        );
    }

    doc.push(elements::Break::new(1));
    doc.push(
        elements::Paragraph::new(format!(
            "Generated by {} {} • {}",
            GENERATOR,
            env!("CARGO_PKG_VERSION"),
            meta.build_date.format("%B %-d, %Y")
        ))
        .aligned(Alignment::Center)
        .styled(note),
    );

    let mut bytes = Vec::new();
    doc.render(&mut bytes)
        .map_err(|e| BuildError::render(FORMAT, e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_options;
    use crate::test_helpers::sample_resume;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn draw_backend_produces_a_pdf() {
        let tmp = TempDir::new().unwrap();
        let builder = PdfBuilder {
            opts: test_options(tmp.path()),
        };
        let built = builder.build(&sample_resume()).unwrap();
        assert!(built.path.ends_with("resume.pdf"));
        let bytes = fs::read(&built.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "not a PDF header");
        assert_eq!(built.size_bytes, bytes.len() as u64);
    }

    #[test]
    fn unavailable_backend_fails_loudly() {
        let tmp = TempDir::new().unwrap();
        let mut opts = test_options(tmp.path());
        opts.pdf_backend = PdfBackend::Unavailable {
            reason: "disabled for the test".to_string(),
        };
        let builder = PdfBuilder { opts };
        let err = builder.build(&sample_resume()).unwrap_err();
        assert!(matches!(err, BuildError::NoBackendAvailable { .. }));
        assert!(err.to_string().contains("disabled for the test"));
    }

    #[test]
    fn resolve_auto_is_draw() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            resolve_backend("auto", tmp.path(), "LiberationSans"),
            PdfBackend::Draw
        ));
    }

    #[test]
    fn resolve_layout_without_fonts_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        match resolve_backend("layout", tmp.path(), "LiberationSans") {
            PdfBackend::Unavailable { reason } => {
                assert!(reason.contains("LiberationSans-Regular.ttf"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn resolve_layout_with_full_family() {
        let tmp = TempDir::new().unwrap();
        for face in ["Regular", "Bold", "Italic", "BoldItalic"] {
            fs::write(tmp.path().join(format!("Lib-{face}.ttf")), b"stub").unwrap();
        }
        assert!(matches!(
            resolve_backend("layout", tmp.path(), "Lib"),
            PdfBackend::Layout { .. }
        ));
    }

    #[test]
    fn resolve_disabled_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            resolve_backend("disabled", tmp.path(), "LiberationSans"),
            PdfBackend::Unavailable { .. }
        ));
    }

    #[test]
    fn wrap_text_respects_budget() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn wrap_text_keeps_long_words_whole() {
        let lines = wrap_text("a extraordinarily b", 5);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn achievement_line_inlines_metrics() {
        let metrics = vec![crate::model::Metric {
            value: "40".into(),
            unit: "%".into(),
        }];
        assert_eq!(
            achievement_line("Cut deploy time", Some(&metrics)),
            "•  Cut deploy time (40%)"
        );
        assert_eq!(achievement_line("Did a thing", None), "•  Did a thing");
    }
}
