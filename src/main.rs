use clap::{Parser, Subcommand};
use resume_forge::builders::{BuilderOptions, BuilderRegistry, available_themes, pdf};
use resume_forge::{build, config, enhance, output, source};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    if env!("BUILD_ON_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    let commit = env!("BUILD_COMMIT");
    if commit.is_empty() {
        "dev@unknown"
    } else {
        // Leaked once at startup, called exactly once
        Box::leak(format!("dev@{commit}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "resume-forge")]
#[command(about = "Résumé build pipeline: one YAML source, many output formats")]
#[command(long_about = "\
Résumé build pipeline: one YAML source, many output formats

Your résumé is data. Edit resume.yml, then build every deliverable from it:

  resume.yml ──build──▶ dist/resume.html   self-contained page, themed
                        dist/resume.pdf    printpdf (no fonts needed) or genpdf
                        dist/resume.json   machine-readable export + build_info
                        dist/resume.md     GitHub-flavored, proficiency badges

Theme resolution (first match wins):
  Templates:   <templates>/<format>/<theme>.<ext>.tera
  Built-ins:   html: modern, compact · markdown: github

Validation runs before every build; a document that fails the schema stops
the run before any file is written. Once building starts, formats fail
independently: the report shows e.g. 'Built 3 of 4 formats' and the exit
code is non-zero if anything failed.

Optional AI polish: `build --enhance` rewrites the summary and achievement
bullets through the Anthropic API (ANTHROPIC_API_KEY). Strictly best-effort:
any failure keeps the original text and the build proceeds.

Run 'resume-forge gen-config' to generate a documented resume-forge.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "resume-forge.toml", global = true)]
    config: PathBuf,

    /// Résumé source document (overrides config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the résumé in one or more formats
    Build {
        /// Formats to build (default: all configured)
        #[arg(short, long = "format")]
        formats: Vec<String>,

        /// Theme for template-driven formats
        #[arg(long)]
        theme: Option<String>,

        /// Rewrite summary and achievements through the AI enhancement pass
        #[arg(long)]
        enhance: bool,

        /// Remove previously built resume.* files first
        #[arg(long)]
        clean: bool,
    },
    /// Validate the source document without building
    Validate,
    /// List registered formats and their available themes
    Formats,
    /// Print a stock resume-forge.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut app_config = config::AppConfig::load(&cli.config)?;
    if let Some(source) = cli.source {
        app_config.paths.source = source;
    }
    if let Some(output) = cli.output {
        app_config.paths.output = output;
    }

    match cli.command {
        Command::Build {
            formats,
            theme,
            enhance: enhance_flag,
            clean,
        } => {
            let resume = source::load(&app_config.paths.source).map_err(|e| render_source_error(e))?;

            let resume = if enhance_flag {
                match enhance::EnhanceClient::from_env(&app_config.enhance) {
                    Some(client) => {
                        println!("==> Enhancing content");
                        enhance::enhance_resume(&client, &resume)
                    }
                    None => {
                        eprintln!(
                            "enhancement skipped: {} is not set",
                            enhance::API_KEY_VAR
                        );
                        resume
                    }
                }
            } else {
                resume
            };

            let registry = BuilderRegistry::with_defaults();
            let requested = if formats.is_empty() {
                app_config.build.formats.clone()
            } else {
                formats
            };
            let opts = BuilderOptions {
                output_dir: app_config.paths.output.clone(),
                templates_dir: app_config.paths.templates.clone(),
                theme: theme.unwrap_or_else(|| app_config.build.theme.clone()),
                pdf_backend: pdf::resolve_backend(
                    &app_config.pdf.backend,
                    &app_config.pdf.fonts_dir,
                    &app_config.pdf.font_family,
                ),
            };

            if clean {
                clean_output(&app_config.paths.output)?;
            }

            println!(
                "==> Building {} format{} → {}",
                requested.len(),
                if requested.len() == 1 { "" } else { "s" },
                app_config.paths.output.display()
            );
            let outcomes = build::build_formats(&registry, &requested, &resume, &opts);
            output::print_build_output(&outcomes);

            // Non-zero when any requested format failed, even on partial
            // success — CI should notice a missing artifact.
            if outcomes.iter().any(|(_, o)| o.is_err()) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Validate => {
            let resume = source::load(&app_config.paths.source).map_err(|e| render_source_error(e))?;
            output::print_validate_output(&resume, &app_config.paths.source);
            println!();
            println!("==> Document is valid");
            Ok(ExitCode::SUCCESS)
        }
        Command::Formats => {
            let registry = BuilderRegistry::with_defaults();
            let formats = registry.formats();
            let themes: Vec<(String, Vec<String>)> = formats
                .iter()
                .map(|f| {
                    (
                        f.to_string(),
                        available_themes(&app_config.paths.templates, f),
                    )
                })
                .collect();
            output::print_formats_output(&formats, &themes);
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Flatten a source error into one printable message; validation errors get
/// one line per problem.
fn render_source_error(error: source::SourceError) -> String {
    match error {
        source::SourceError::Validation { errors } => {
            let mut message = String::from("resume data failed validation:");
            for error in errors {
                message.push_str("\n  - ");
                message.push_str(&error);
            }
            message
        }
        other => other.to_string(),
    }
}

/// Remove previously built `resume.*` files, leaving everything else in the
/// output directory alone.
fn clean_output(output_dir: &std::path::Path) -> std::io::Result<()> {
    if !output_dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(output_dir)? {
        let path = entry?.path();
        let is_built = path
            .file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("resume"));
        if is_built && path.is_file() {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}
