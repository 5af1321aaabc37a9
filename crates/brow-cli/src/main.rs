//! brow - eyebrow and hair recoloring from the command line
//!
//! Drives the recoloring pipeline from PNG photos, PNG mattes and YAML
//! landmark files.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "brow")]
#[command(author, version, about = "Eyebrow and hair recoloring")]
#[command(long_about = "
Recolors eyebrows and hair in a photo using hair/skin segmentation mattes and
recorded eyebrow landmarks.

Examples:
  brow recolor --photo p.png --hair h.png --skin s.png --landmarks face.yaml -o out.png
  brow recolor ... --config brow.yaml --thicken --min 1a120c --mode 4a3020 --max 8c6a50
  brow matte --hair h.png --skin s.png --landmarks face.yaml -o brows.png
  brow lightness photo.png --matte h.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of worker threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write the log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the recolored photo
    #[command(visible_alias = "r")]
    Recolor(RecolorArgs),

    /// Write the eyebrow matte only
    #[command(visible_alias = "m")]
    Matte(MatteArgs),

    /// Print the (min, mode, max) lightness of an image or cutout
    #[command(visible_alias = "l")]
    Lightness(LightnessArgs),
}

#[derive(Args)]
struct RecolorArgs {
    /// Photo
    #[arg(long)]
    photo: PathBuf,

    /// Hair matte
    #[arg(long)]
    hair: PathBuf,

    /// Skin matte
    #[arg(long)]
    skin: PathBuf,

    /// Portrait (person) matte
    #[arg(long)]
    portrait: Option<PathBuf>,

    /// Landmark file (YAML: roll, size, right, left)
    #[arg(long)]
    landmarks: PathBuf,

    /// Pipeline configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build the thickened eyebrow layer
    #[arg(long)]
    thicken: bool,

    /// Darkest target color, hex RRGGBB
    #[arg(long, value_parser = commands::parse_hex_color)]
    min: Option<[f32; 4]>,

    /// Most common target color, hex RRGGBB
    #[arg(long, value_parser = commands::parse_hex_color)]
    mode: Option<[f32; 4]>,

    /// Brightest target color, hex RRGGBB
    #[arg(long, value_parser = commands::parse_hex_color)]
    max: Option<[f32; 4]>,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct MatteArgs {
    /// Hair matte
    #[arg(long)]
    hair: PathBuf,

    /// Skin matte
    #[arg(long)]
    skin: PathBuf,

    /// Portrait (person) matte
    #[arg(long)]
    portrait: Option<PathBuf>,

    /// Landmark file (YAML)
    #[arg(long)]
    landmarks: PathBuf,

    /// Pipeline configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// One region per eyebrow instead of one stitched region
    #[arg(long)]
    per_side: bool,

    /// Output matte
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct LightnessArgs {
    /// Input image
    input: PathBuf,

    /// Cut the image out with this matte first
    #[arg(long)]
    matte: Option<PathBuf>,

    /// Longest side analysed
    #[arg(short, long, default_value = "500")]
    batch_size: u32,
}

/// Installs the stderr subscriber and, with `--log-file`, a non-blocking
/// file writer. The returned guard flushes the file on drop.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_ref())?;

    let threads = (cli.threads > 0).then_some(cli.threads);
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Recolor(args) => commands::recolor::run(args, cli.verbose, threads),
        Commands::Matte(args) => commands::matte::run(args, cli.verbose),
        Commands::Lightness(args) => commands::lightness::run(args, cli.verbose),
    }
}
