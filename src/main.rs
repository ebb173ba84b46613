use clap::{Parser, Subcommand};
use picpress::compress::{CompressOptions, compress_to_target};
use picpress::config::ToolConfig;
use picpress::cutout::{CutoutOptions, MaskFile, cutout};
use picpress::imaging::{encode_png_best, load_image, resize_exact};
use picpress::{config, output, pipeline};
use std::path::{Path, PathBuf};

/// Compression knobs shared by `compress` and `batch`. Unset flags
/// fall back to `picpress.toml`, then to the stock defaults.
#[derive(clap::Args, Clone, Copy)]
struct CompressArgs {
    /// Byte budget in kilobytes
    #[arg(long)]
    target_kb: Option<u32>,

    /// Maximum downscale attempts after the initial encode
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Minimum width/height the loop will shrink to
    #[arg(long)]
    min_dimension: Option<u32>,

    /// Per-step scale factor, strictly between 0 and 1
    #[arg(long)]
    shrink_factor: Option<f64>,
}

impl CompressArgs {
    /// Layer CLI overrides on top of config-derived options.
    fn resolve(&self, base: CompressOptions) -> CompressOptions {
        CompressOptions {
            target_kb: self.target_kb.unwrap_or(base.target_kb),
            max_attempts: self.max_attempts.unwrap_or(base.max_attempts),
            min_dimension: self.min_dimension.unwrap_or(base.min_dimension),
            shrink_factor: self.shrink_factor.unwrap_or(base.shrink_factor),
        }
    }
}

#[derive(Parser)]
#[command(name = "picpress")]
#[command(about = "Compress images toward a byte budget; apply mattes; resize")]
#[command(long_about = "\
Compress images toward a byte budget; apply mattes; resize

The compressor encodes at maximum lossless PNG compression and, only if
the result is over budget, repeatedly downscales by 10% and re-encodes.
It stops at the attempt limit or the 50px dimension floor and always
returns the best encoding produced, reporting whether the budget was met.

Run 'picpress gen-config' to generate a documented picpress.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to picpress.toml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress one image toward the byte budget
    Compress {
        /// Source image (JPEG, PNG, TIFF, WebP)
        input: PathBuf,
        /// Output PNG path (defaults to the input with a .png extension,
        /// or a .compressed.png suffix when that would overwrite the input)
        output: Option<PathBuf>,
        #[command(flatten)]
        opts: CompressArgs,
        /// Print the compression report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resize one image to exact dimensions
    Resize {
        input: PathBuf,
        /// Output PNG path
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Apply an alpha matte, optionally resizing the result
    Cutout {
        input: PathBuf,
        /// Output PNG path
        output: PathBuf,
        /// Grayscale matte image (white keeps, black removes)
        #[arg(long)]
        mask: PathBuf,
        #[arg(long, requires = "height")]
        width: Option<u32>,
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// Compress every image under a directory, in parallel
    Batch {
        /// Input directory (walked recursively)
        input_dir: PathBuf,
        /// Output directory (mirrors the input tree, plus manifest.json)
        output_dir: PathBuf,
        #[command(flatten)]
        opts: CompressArgs,
    },
    /// Print a stock picpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let tool_config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::load_or_default(Path::new("."))?,
    };
    let base_opts = tool_config.compression.to_options();

    match cli.command {
        Command::Compress {
            input,
            output,
            opts,
            json,
        } => {
            let opts = opts.resolve(base_opts);
            let out_path = output.unwrap_or_else(|| default_output_path(&input));

            let img = load_image(&input)?;
            let compressed = compress_to_target(&img, &opts)?;
            std::fs::write(&out_path, &compressed.bytes)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&compressed.report)?);
            } else {
                output::print_compress_output(
                    &input.display().to_string(),
                    &out_path.display().to_string(),
                    &compressed.report,
                );
            }
        }
        Command::Resize {
            input,
            output,
            width,
            height,
        } => {
            let img = load_image(&input)?;
            let resized = resize_exact(&img, width, height);
            std::fs::write(&output, encode_png_best(&resized)?)?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                output.display(),
                width,
                height
            );
        }
        Command::Cutout {
            input,
            output,
            mask,
            width,
            height,
        } => {
            let img = load_image(&input)?;
            let opts = CutoutOptions {
                resize_to: width.zip(height),
            };
            let cut = cutout(&img, &MaskFile::new(&mask), &opts)?;
            std::fs::write(&output, encode_png_best(&cut)?)?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                output.display(),
                cut.width(),
                cut.height()
            );
        }
        Command::Batch {
            input_dir,
            output_dir,
            opts,
        } => {
            init_thread_pool(&tool_config.processing);
            let opts = opts.resolve(base_opts);
            let manifest = pipeline::run_batch(&input_dir, &output_dir, &opts)?;
            output::print_batch_output(&manifest);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Default output path for `compress`: the input with a .png extension.
///
/// For inputs that are already .png that default would silently
/// overwrite the source in place, so those get a `.compressed.png`
/// suffix instead. An explicit output argument is always honored as-is.
fn default_output_path(input: &Path) -> PathBuf {
    let is_png = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        input.with_extension("compressed.png")
    } else {
        input.with_extension("png")
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
