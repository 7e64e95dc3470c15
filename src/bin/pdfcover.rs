//! CLI binary for pdfcover.
//!
//! Runs the HTTP service, or performs the same operations one-shot from the
//! command line.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfcover::config::DEFAULT_MAX_BODY_BYTES;
use pdfcover::{
    extract_first_page, normalize_filename, AppState, OptionOverrides, PdfiumLibrary,
    RenderOptions, ServerConfig, TemplateTable,
};
use pdfium_auto::{LibrarySource, PdfiumLocator};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const MIB: usize = 1024 * 1024;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the web service with the built client bundle
  pdfcover serve --port 5000 --static-root frontend/build

  # Render page 1 of a PDF to <normalized-name>.jpg
  pdfcover extract "Spring Brochure (final).pdf"

  # Letterbox onto an Instagram-sized canvas
  pdfcover extract flyer.pdf --template instagram_post --scale -o flyer.jpg

  # Slug a few names
  pdfcover normalize "My Report 2023.pdf" "hello_world"

ENVIRONMENT VARIABLES:
  HOST, PORT              Listen address for `serve`
  PDFCOVER_STATIC_ROOT    Client bundle directory
  PDFCOVER_TEMPLATES      JSON file replacing the built-in template table
  PDFIUM_LIB_PATH         Path to an existing libpdfium; skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG                Tracing filter (overrides -v / -q)
"#;

/// Render PDF first pages to JPEG, locally or over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pdfcover",
    version,
    about = "Render the first page of a PDF to JPEG, locally or over HTTP",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFCOVER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFCOVER_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Render the first page of a local PDF to a JPEG file.
    Extract(ExtractArgs),
    /// Print the normalized `.jpg` name for each input.
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the template table as JSON.
    Templates {
        #[arg(long, env = "PDFCOVER_TEMPLATES")]
        templates: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory holding the built client (index.html + assets).
    #[arg(long, env = "PDFCOVER_STATIC_ROOT", default_value = "frontend/build")]
    static_root: PathBuf,

    /// JSON file replacing the built-in template table.
    #[arg(long, env = "PDFCOVER_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Maximum request body size in MiB.
    #[arg(
        long,
        env = "PDFCOVER_MAX_BODY_MIB",
        default_value_t = DEFAULT_MAX_BODY_BYTES / MIB
    )]
    max_body_mib: usize,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Local PDF file.
    input: PathBuf,

    /// Output JPEG path. Default: the normalized input name.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template key supplying width / height / bgcolor.
    #[arg(long)]
    template: Option<String>,

    #[arg(long)]
    width: Option<String>,

    #[arg(long)]
    height: Option<String>,

    /// Canvas colour (`#rrggbb`, `rgb(r,g,b)` or a CSS name).
    #[arg(long)]
    bgcolor: Option<String>,

    /// JSON file replacing the built-in template table.
    #[arg(long, env = "PDFCOVER_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Shrink the render to fit WIDTH×HEIGHT and center it on the canvas.
    #[arg(long)]
    scale: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => serve(args, cli.quiet).await,
        Command::Extract(args) => extract(args, cli.quiet).await,
        Command::Normalize { names } => {
            for name in names {
                println!("{}", normalize_filename(&name));
            }
            Ok(())
        }
        Command::Templates { templates } => {
            let table = load_templates(templates.as_deref())?;
            let json = serde_json::to_string_pretty(&table)
                .context("Failed to serialize templates")?;
            println!("{json}");
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs, quiet: bool) -> Result<()> {
    // The server can still fall back to the system loader path.
    let pdfium = match locate_pdfium(quiet) {
        Ok(lib) => lib,
        Err(e) => {
            warn!("{:#}; falling back to the system pdfium library", e);
            PdfiumLibrary::System
        }
    };

    let mut builder = ServerConfig::builder()
        .host(args.host)
        .port(args.port)
        .static_root(args.static_root)
        .max_body_bytes(args.max_body_mib.saturating_mul(MIB))
        .pdfium(pdfium);
    if let Some(path) = args.templates {
        builder = builder.templates_path(path);
    }
    let config = builder.build().context("Invalid server configuration")?;

    if !config.static_root.join("index.html").exists() {
        warn!(
            "No index.html under {}; only the API routes will be useful",
            config.static_root.display()
        );
    }

    let state = AppState::from_config(&config).context("Failed to load templates")?;
    pdfcover::serve(&config, state)
        .await
        .context("Server error")
}

async fn extract(args: ExtractArgs, quiet: bool) -> Result<()> {
    let pdfium = locate_pdfium(quiet)?;
    let table = load_templates(args.templates.as_deref())?;

    let overrides = OptionOverrides {
        template: args.template,
        width: args.width,
        height: args.height,
        bgcolor: args.bgcolor,
    };
    let options = RenderOptions::resolve(&table, &overrides)?;

    let bytes = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let source_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = extract_first_page(bytes, source_name, &options, args.scale, &pdfium)
        .await
        .with_context(|| format!("Failed to extract first page of {}", args.input.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(normalize_filename(&image.filename)));
    tokio::fs::write(&output, &image.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Wrote {} ({}x{} render, landscape={})",
        output.display(),
        image.pixel_width,
        image.pixel_height,
        image.is_landscape
    );
    if !quiet {
        println!("{}", output.display());
    }
    Ok(())
}

fn load_templates(path: Option<&Path>) -> Result<TemplateTable> {
    match path {
        Some(p) => TemplateTable::from_json_file(p)
            .with_context(|| format!("Failed to load templates from {}", p.display())),
        None => Ok(TemplateTable::builtin()),
    }
}

/// Find (or download) libpdfium and return it as an explicit library path.
fn locate_pdfium(quiet: bool) -> Result<PdfiumLibrary> {
    let locator = PdfiumLocator::from_env();

    if let Some(path) = locator.cached_library() {
        return Ok(PdfiumLibrary::from_path(path));
    }

    let located = if quiet {
        tokio::task::block_in_place(|| locator.locate(None))
    } else {
        let bar = download_bar();
        let progress = bar.clone();
        // block_in_place lets the callback borrow `progress` without 'static.
        let result = tokio::task::block_in_place(|| {
            locator.locate(Some(&|downloaded, total| {
                if let Some(t) = total {
                    if progress.length().unwrap_or(0) != t {
                        progress.set_length(t);
                    }
                }
                progress.set_position(downloaded);
            }))
        });
        match &result {
            Ok(_) => bar.finish_with_message("ready"),
            Err(_) => bar.abandon_with_message("failed"),
        }
        result
    }
    .context("Failed to locate PDFium engine")?;

    if located.source == LibrarySource::Downloaded {
        info!("PDFium engine installed at {}", located.path.display());
    }
    Ok(PdfiumLibrary::from_path(located.path))
}

fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("PDF engine");
    bar.set_message("downloading");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
