//! # Resume Forge
//!
//! A résumé-as-data build pipeline. One structured YAML (or JSON) document
//! is the source of truth; every deliverable format is generated from it,
//! never edited by hand.
//!
//! # Architecture: Load → Enhance → Build → Report
//!
//! ```text
//! 1. Load      resume.yml  →  ResumeData       (parse + validate, or abort)
//! 2. Enhance   ResumeData  →  ResumeData       (optional, best-effort AI pass)
//! 3. Build     ResumeData  →  dist/resume.*    (one builder per format, parallel)
//! 4. Report    outcomes    →  stdout           (paths, sizes, partial failures)
//! ```
//!
//! The stages are deliberately independent:
//!
//! - **Abort early, degrade late**: bad input kills the run before any file
//!   is written, but once building starts, one format's failure never takes
//!   the others down — the report says "3 of 4 formats" and the exit code
//!   says something went wrong.
//! - **One context, many formats**: every builder renders from the same
//!   field mapping ([`context::prepare_context`]), so themes are
//!   interchangeable and the JSON export is the golden reference for what
//!   the other formats contain.
//! - **Testability**: stages are pure functions over the model, so unit
//!   tests exercise pipeline logic without a network or a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Stage 1 — reads and validates the résumé document |
//! | [`enhance`] | Stage 2 — optional AI rewrite with hard fallback to the original |
//! | [`build`] | Stage 3 — fans formats out over the builder registry |
//! | [`builders`] | The builder contract, factory registry, and the four stock builders |
//! | [`context`] | The shared field mapping all templates consume |
//! | [`model`] | The `ResumeData` aggregate and its validation |
//! | [`format`] | Presentation helpers: dates, phones, durations, badges |
//! | [`config`] | `resume-forge.toml` loading, validation, stock config |
//! | [`output`] | CLI output formatting — information-first display of results |
//!
//! # Design Decisions
//!
//! ## Runtime Templates Over Compile-Time HTML
//!
//! HTML and Markdown render through [Tera](https://keats.github.io/tera/)
//! templates selected by theme name at runtime. Stock themes are embedded
//! in the binary so it works standalone, and a same-named file in the
//! templates directory overrides its embedded copy — users can restyle
//! their résumé without recompiling. A theme with no template anywhere is
//! a hard error naming the missing path, not a silent fallback.
//!
//! ## Two PDF Backends Behind One Enum
//!
//! PDF generation resolves to a capability once at startup: the default
//! drawing backend (printpdf, built-in Helvetica) needs no font files and
//! works in any container; the flow-layout backend (genpdf) produces
//! richer typography when a TTF family is on disk and the config asks for
//! it. The builder receives the resolved capability and never probes —
//! and when nothing is usable it fails loudly rather than skipping output.
//!
//! ## Enhancement Is Expendable
//!
//! The AI pass is the only network call in the pipeline and the pipeline
//! must never need it: bounded timeout, bounded retries, and a per-piece
//! fallback to the original text. Losing the network costs polish, not
//! artifacts.

pub mod build;
pub mod builders;
pub mod config;
pub mod context;
pub mod enhance;
pub mod format;
pub mod model;
pub mod output;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
