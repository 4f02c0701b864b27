//! reflow CLI - reading-order text reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reflow::{
    load_document, sync_directory, CleanupPreset, HeaderFooterPolicy, JsonFormat, LayoutAnalyzer,
    LayoutOptions, PageSelection, Reflow, RenderOptions, SyncOptions,
};

#[derive(Parser)]
#[command(name = "reflow")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild reading-order text from positioned page blocks", long_about = None)]
struct Cli {
    /// Input block dump (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct plain text
    Text {
        /// Input block dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Reconstruct text with per-page diagnostics as JSON
    Json {
        /// Input block dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show document and layout information
    Info {
        /// Input block dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Mirror a directory of block dumps to text files
    Sync {
        /// Directory of block dumps
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for text files
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Regenerate every text file
        #[arg(long)]
        force: bool,

        /// Extension of block dump files
        #[arg(long, default_value = "json")]
        extension: String,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every reconstructing command.
#[derive(Args, Clone, Default)]
struct LayoutArgs {
    /// Text cleanup preset
    #[arg(long, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Header/footer removal policy
    #[arg(long, value_enum)]
    policy: Option<PolicyMode>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Layout options file (JSON)
    #[arg(long, value_name = "FILE", env = "REFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Fail on malformed blocks instead of skipping them
    #[arg(long)]
    strict: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Whitespace normalization only
    Minimal,
    /// Captions and references removed (default)
    Standard,
    /// Standard plus junk characters and blank runs
    Aggressive,
    /// No cleanup at all
    None,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolicyMode {
    /// Drop blocks in the top and bottom page margins (default)
    Margin,
    /// Drop text repeating at the top or bottom of most pages
    Frequency,
    /// Keep every block
    None,
}

impl From<PolicyMode> for HeaderFooterPolicy {
    fn from(mode: PolicyMode) -> Self {
        match mode {
            PolicyMode::Margin => HeaderFooterPolicy::Margin,
            PolicyMode::Frequency => HeaderFooterPolicy::Frequency,
            PolicyMode::None => HeaderFooterPolicy::Disabled,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

impl LayoutArgs {
    fn layout_options(&self) -> CliResult<LayoutOptions> {
        let mut options = match &self.config {
            Some(path) => LayoutOptions::from_json(&fs::read_to_string(path)?)?,
            None => LayoutOptions::default(),
        };
        if let Some(policy) = self.policy {
            options = options.with_header_footer_policy(policy.into());
        }
        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }
        if self.strict {
            options = options.strict();
        }
        Ok(options)
    }

    fn render_options(&self) -> RenderOptions {
        match self.cleanup {
            Some(CleanupLevel::Minimal) => {
                RenderOptions::new().with_cleanup_preset(CleanupPreset::Minimal)
            }
            Some(CleanupLevel::Aggressive) => {
                RenderOptions::new().with_cleanup_preset(CleanupPreset::Aggressive)
            }
            Some(CleanupLevel::None) => RenderOptions::new().without_cleanup(),
            Some(CleanupLevel::Standard) | None => RenderOptions::new(),
        }
    }

    fn reflow(&self) -> CliResult<Reflow> {
        Ok(Reflow::new()
            .with_layout_options(self.layout_options()?)
            .with_render_options(self.render_options()))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            layout,
        }) => cmd_text(&input, output.as_deref(), &layout),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
        }) => cmd_json(&input, output.as_deref(), compact, &layout),
        Some(Commands::Info { input, layout }) => cmd_info(&input, &layout),
        Some(Commands::Sync {
            input,
            output,
            force,
            extension,
            layout,
        }) => cmd_sync(&input, &output, force, extension, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: text if input is provided
            if let Some(input) = cli.input {
                cmd_text(&input, cli.output.as_deref(), &LayoutArgs::default())
            } else {
                println!("{}", "Usage: reflow <FILE> [OUTPUT]".yellow());
                println!("       reflow --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, layout: &LayoutArgs) -> CliResult<()> {
    let result = layout.reflow()?.process_file(input)?;
    if result.is_empty() {
        log::warn!("{} has no usable text blocks", input.display());
    }
    write_output(output, result.text())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> CliResult<()> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = layout.reflow()?.process_file(input)?.to_json(format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path, layout: &LayoutArgs) -> CliResult<()> {
    let doc = load_document(input)?;
    let reflow = layout.reflow()?;
    let result = reflow.process(&doc)?;
    let stats = result.stats();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref source) = doc.source {
        println!("{}: {}", "Source".bold(), source);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Blocks".bold(), doc.block_count());

    let analyzer = LayoutAnalyzer::new(reflow.layout_options().clone())?;
    if let Some(set) = analyzer.header_footer_set(&doc) {
        println!("{}: {}", "Repeated header/footer texts".bold(), set.len());
    }

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Pages laid out".bold(), stats.page_count);
    println!("{}: {}", "Empty pages".bold(), stats.empty_pages);
    println!("{}: {}", "Headers/footers removed".bold(), stats.header_footer_removed);
    println!("{}: {}", "Malformed blocks skipped".bold(), stats.blocks_skipped);
    println!("{}: {}", "Zones".bold(), stats.zone_count);
    println!("{}: {}", "Two-column zones".bold(), stats.two_column_zones);
    println!("{}: {}", "Full-width blocks dropped".bold(), stats.nontext_full_dropped);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in result.pages() {
        let d = &page.diagnostics;
        println!(
            "  {} {:>4}  {} blocks, {} zones ({} two-column), {} prose",
            "page".dimmed(),
            page.number,
            d.block_count,
            d.assembly.zones,
            d.assembly.two_column_zones,
            d.prose_blocks
        );
    }

    Ok(())
}

fn cmd_sync(
    input: &Path,
    output: &Path,
    force: bool,
    extension: String,
    layout: &LayoutArgs,
) -> CliResult<()> {
    let mut options = SyncOptions::new()
        .with_input_extension(extension)
        .with_layout(layout.layout_options()?)
        .with_render(layout.render_options());
    if force {
        options = options.force();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Syncing {} ...", input.display()));

    let report = sync_directory(input, output, &options)?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Sync summary:".green().bold());
    println!(
        "  {} {} extracted ({} pages, {} words)",
        "├─".dimmed(),
        report.extracted,
        report.stats.page_count,
        report.stats.word_count
    );
    println!("  {} {} up to date", "├─".dimmed(), report.skipped);
    println!("  {} {} without text", "├─".dimmed(), report.empty);
    println!("  {} {} stale or orphan files deleted", "├─".dimmed(), report.deleted);
    println!("  {} {} orphan folders removed", "├─".dimmed(), report.removed_dirs);
    println!("  {} {} failed", "└─".dimmed(), report.failed.len());

    for failure in &report.failed {
        eprintln!(
            "{} {}: {}",
            "Failed".red(),
            failure.path.display(),
            failure.message
        );
    }

    if report.is_noop() && report.failed.is_empty() {
        println!("{}", "Everything is up to date".green());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "reflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order text reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/reflow".dimmed());
    println!("License: MIT");
}
