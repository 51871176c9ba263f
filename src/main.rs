use clap::{Parser, Subcommand};
use lumacrop::config::{
    self, CropConfig, parse_open_percentage, parse_percentage, parse_thread_count,
};
use lumacrop::imaging::{Corner, CropMode, RustBackend};
use lumacrop::{batch, output};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lumacrop")]
#[command(about = "Crop unevenly lit borders from a directory of images")]
#[command(long_about = "\
Crop unevenly lit borders from a directory of images

Every JPEG and PNG under the input directory is checked for edges that are
darker or brighter than its center. Offending edges are trimmed step by step
until brightness is uniform within the tolerance or the crop budget is used.

Outputs land flat in the output directory:

  photo.jpg           uniform already, copied byte-for-byte
  scan_cropped.png    borders removed

Run 'lumacrop gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML). Command-line flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every command that processes images.
#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Directory containing images to process
    #[arg(long)]
    input: PathBuf,

    /// Output directory [default: cropped]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of parallel workers [default: 4]
    #[arg(long, value_parser = parse_thread_count)]
    threads: Option<usize>,
}

impl RunArgs {
    fn apply(&self, config: &mut CropConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(threads) = self.threads {
            config.processing.threads = threads;
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Crop borders until edge brightness matches the center
    Uniform {
        #[command(flatten)]
        run: RunArgs,

        /// Brightness variation tolerance percentage (0-100) [default: 15]
        #[arg(long, value_parser = parse_percentage)]
        tolerance: Option<f64>,

        /// Maximum crop percentage per dimension (0-100) [default: 30]
        #[arg(long, value_parser = parse_percentage)]
        max_crop: Option<f64>,
    },
    /// Remove a fixed percentage at one corner of every JPEG
    Corner {
        #[command(flatten)]
        run: RunArgs,

        /// Corner whose two adjacent edges are trimmed
        #[arg(long, value_enum)]
        corner: Option<Corner>,

        /// Percentage of width and height to remove (exclusive 0-100)
        #[arg(long, value_parser = parse_open_percentage)]
        percent: Option<f64>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lumacrop=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let (run, config, mode) = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Uniform {
            run,
            tolerance,
            max_crop,
        } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            run.apply(&mut config);
            if let Some(tolerance) = tolerance {
                config.uniform.tolerance = tolerance;
            }
            if let Some(max_crop) = max_crop {
                config.uniform.max_crop = max_crop;
            }
            config.validate()?;
            let mode = config.uniform_mode();
            (run, config, mode)
        }
        Command::Corner {
            run,
            corner,
            percent,
        } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            run.apply(&mut config);
            if corner.is_some() {
                config.corner.corner = corner;
            }
            if percent.is_some() {
                config.corner.percent = percent;
            }
            config.validate()?;
            let mode = config.corner_mode()?;
            (run, config, mode)
        }
    };

    process_directory(&run.input, &config, mode)
}

fn process_directory(
    input: &Path,
    config: &CropConfig,
    mode: CropMode,
) -> Result<(), Box<dyn Error>> {
    let threads = config.processing.threads;
    batch::prepare_directories(input, &config.output)?;
    let jobs = batch::collect_jobs(input, &config.output, mode)?;

    output::print_batch_header(jobs.len(), threads);
    if jobs.is_empty() {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_batch_event(&event);
        }
    });
    let report = batch::run_batch(&RustBackend::new(), &jobs, threads, Some(tx))?;
    printer.join().map_err(|_| "output printer thread panicked")?;

    output::print_summary(&report.summary);
    Ok(())
}
