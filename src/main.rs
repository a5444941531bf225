use clap::{Parser, Subcommand};
use lighttable::imaging::{ImageBackend, MediumParams, Quality, RustBackend, ThumbnailParams};
use lighttable::{config, credentials, extension, gps, output, process};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lighttable")]
#[command(about = "Thumbnail resampling and photo metadata helpers")]
#[command(long_about = "\
Thumbnail resampling and photo metadata helpers

Image commands read their sizes and quality from lighttable.toml when it
exists. The resample quality trades accuracy for speed: 5 and above
averages every source pixel; lower values allow a fast nearest-pixel
pre-shrink for large reductions.

Examples:

  lighttable thumb IMG_0001.JPG thumb.jpg --quality 2
  lighttable batch photos/ out/
  lighttable gps --ref S 40/1 30/1 0/1
  lighttable ext 'https://cdn.example.com/a/photo.JPG?x=1' --uri
  echo -n secret | lighttable hash

Run 'lighttable gen-config' to generate a documented lighttable.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults when absent)
    #[arg(long, default_value = "lighttable.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Center-crop and resample a single thumbnail
    Thumb {
        source: PathBuf,
        out: PathBuf,
        /// Resample quality (overrides thumbnails.quality)
        #[arg(long)]
        quality: Option<f64>,
    },
    /// Shrink a single image to fit the medium bounding box
    Medium {
        source: PathBuf,
        out: PathBuf,
        /// Resample quality (overrides medium.quality)
        #[arg(long)]
        quality: Option<f64>,
    },
    /// Thumbnails and mediums for every supported image under a directory
    Batch { source: PathBuf, out_dir: PathBuf },
    /// Convert an EXIF degrees/minutes/seconds triple to decimal degrees
    Gps {
        /// Hemisphere reference (N, S, E, W)
        #[arg(long = "ref", default_value = "")]
        reference: String,
        /// Rationals as num/den, e.g. 40/1 30/1 0/1
        #[arg(allow_hyphen_values = true)]
        parts: Vec<String>,
    },
    /// Print the extension token of a path or URI
    Ext {
        path: String,
        /// Treat the input as a URI and only look at its path
        #[arg(long)]
        uri: bool,
    },
    /// Hash a password read from stdin
    Hash,
    /// Check a password read from stdin against a stored record (exit 1 on mismatch)
    Verify { record: String },
    /// Print a stock lighttable.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Thumb {
            source,
            out,
            quality,
        } => {
            let config = config::load_config(&cli.config)?;
            let thumb = config.thumbnail_config();
            let dims = RustBackend::new().thumbnail(&ThumbnailParams {
                source,
                output: out.clone(),
                width: thumb.width,
                height: thumb.height,
                quality: quality.map(Quality::new).unwrap_or(thumb.quality),
                encode_quality: thumb.encode_quality,
            })?;
            println!("{}", output::format_written(&out, dims));
        }
        Command::Medium {
            source,
            out,
            quality,
        } => {
            let config = config::load_config(&cli.config)?;
            let medium = config.medium_config();
            let dims = RustBackend::new().medium(&MediumParams {
                source,
                output: out.clone(),
                max_width: medium.max_width,
                max_height: medium.max_height,
                quality: quality.map(Quality::new).unwrap_or(medium.quality),
                encode_quality: medium.encode_quality,
            })?;
            println!("{}", output::format_written(&out, dims));
        }
        Command::Batch { source, out_dir } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let manifest = process::process(
                &source,
                &out_dir,
                &process::BatchConfig::from_config(&config),
                Some(tx),
            )?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let manifest_path = process::write_manifest(&manifest, &out_dir)?;
            output::print_batch_summary(&manifest, &manifest_path);
        }
        Command::Gps { reference, parts } => {
            let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
            println!("{}", gps::to_decimal_degrees_from_strs(&parts, &reference));
        }
        Command::Ext { path, uri } => {
            println!("{}", extension::extract_extension(&path, uri));
        }
        Command::Hash => {
            let password = read_password()?;
            println!("{}", credentials::hash_password(&password)?);
        }
        Command::Verify { record } => {
            let password = read_password()?;
            if !credentials::verify_password(&password, &record) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// First line of stdin without its line terminator.
fn read_password() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}
