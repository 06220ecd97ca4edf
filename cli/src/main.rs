//! noisefix CLI - noisy headline detection and restoration tool
//!
//! A command-line tool for finding corrupted rows in Korean headline
//! datasets and restoring them through a chat model.

use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use noisefix::{
    clean_dataset_with_progress, load_dataset, save_dataset, save_results, AsciiRatioDetector,
    ConvertOptions, DetectOptions, HttpBackend, HttpBackendConfig, NoiseConverter, NoiseDetector,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Noise detection and LLM restoration for Korean headline datasets
#[derive(Parser)]
#[command(
    name = "noisefix",
    author = "iyulab",
    version,
    about = "Detect and restore noisy rows in Korean headline datasets",
    long_about = "noisefix - Heuristic noise detection and LLM-based restoration.\n\n\
                  Reads CSV or JSON Lines datasets with ID, text and target columns.\n\n\
                  Usage:\n  \
                  noisefix detect <file>             Split rows into noised and clean\n  \
                  noisefix convert <file> -o <out>   Restore every row through the model\n  \
                  noisefix clean <file> -o <out>     Detect, restore and merge"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a dataset into noised and clean rows
    Detect {
        /// Input dataset (.csv or .jsonl)
        input: PathBuf,

        #[command(flatten)]
        detect: DetectArgs,

        /// Write noised rows here
        #[arg(long)]
        noised: Option<PathBuf>,

        /// Write clean rows here
        #[arg(long)]
        clean: Option<PathBuf>,
    },

    /// Restore every row of an already-noised dataset
    Convert {
        /// Input dataset (.csv or .jsonl)
        input: PathBuf,

        /// Output path for conversion results
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Detect noised rows, restore them and merge them back
    Clean {
        /// Input dataset (.csv or .jsonl)
        input: PathBuf,

        /// Output path for the cleaned dataset
        #[arg(short, long)]
        output: PathBuf,

        /// Also write per-row conversion results here
        #[arg(long)]
        results: Option<PathBuf>,

        #[command(flatten)]
        detect: DetectArgs,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Show dataset statistics and the noise split
    Stats {
        /// Input dataset (.csv or .jsonl)
        input: PathBuf,

        #[command(flatten)]
        detect: DetectArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct DetectArgs {
    /// Ratio of ASCII-band characters at which a row is noised
    #[arg(long, default_value_t = noisefix::options::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Divide by the row's field count instead of the text length
    #[arg(long)]
    legacy_ratio: bool,

    /// Classify rows on a single thread
    #[arg(long)]
    sequential: bool,
}

impl DetectArgs {
    fn to_options(&self) -> DetectOptions {
        let mut options = DetectOptions::new().with_threshold(self.threshold);
        if self.legacy_ratio {
            options = options.legacy_ratio();
        }
        if self.sequential {
            options = options.sequential();
        }
        options
    }
}

#[derive(Args)]
struct BackendArgs {
    /// OpenAI-compatible endpoint root
    #[arg(long, env = "NOISEFIX_BASE_URL", default_value = noisefix::backend::DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token for the endpoint
    #[arg(long, env = "NOISEFIX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// JSON file with generation options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Nucleus sampling probability mass
    #[arg(long)]
    top_p: Option<f32>,

    /// Maximum number of generated tokens
    #[arg(long)]
    max_new_tokens: Option<u32>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl BackendArgs {
    /// Defaults, then the config file, then explicit flags.
    fn convert_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => ConvertOptions::default(),
        };

        if let Some(ref model) = self.model {
            options = options.with_model(model);
        }
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(top_p) = self.top_p {
            options = options.with_top_p(top_p);
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            options = options.with_max_new_tokens(max_new_tokens);
        }
        Ok(options)
    }

    fn backend_config(&self) -> HttpBackendConfig {
        let mut config = HttpBackendConfig::default().with_base_url(&self.base_url);
        if let Some(ref key) = self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    fn converter(&self) -> Result<NoiseConverter<HttpBackend>, Box<dyn std::error::Error>> {
        let options = self.convert_options()?;
        let backend = HttpBackend::new(self.backend_config())?;
        log::info!("using {} at {}", options.model, backend.config().endpoint());
        Ok(NoiseConverter::new(backend, options)?)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Detect {
            input,
            detect,
            noised,
            clean,
        } => {
            let pb = create_spinner("Loading dataset...");
            let detector = AsciiRatioDetector::new(detect.to_options())?;
            let dataset = load_dataset(&input)?;

            pb.set_message("Detecting noise...");
            let (noised_rows, clean_rows) = detector.partition(&dataset);
            pb.finish_and_clear();

            println!("{}", "Detection Complete".green().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Rows".bold(), dataset.len());
            println!("{}: {}", "Noised".bold(), noised_rows.len());
            println!("{}: {}", "Clean".bold(), clean_rows.len());

            if let Some(path) = noised {
                save_dataset(&path, &noised_rows)?;
                println!("  {} {}", "✓".green(), path.display());
            }
            if let Some(path) = clean {
                save_dataset(&path, &clean_rows)?;
                println!("  {} {}", "✓".green(), path.display());
            }
        }

        Commands::Convert {
            input,
            output,
            backend,
        } => {
            let converter = backend.converter()?;
            let dataset = load_dataset(&input)?;

            let pb = create_progress(dataset.len() as u64, "Restoring rows");
            let results = converter.convert_with_progress(&dataset, |done, _| pb.set_position(done as u64))?;
            pb.finish_and_clear();

            save_results(&output, &results)?;

            let restored = results.iter().filter(|r| !r.text.is_empty()).count();
            println!("{}", "Conversion Complete".green().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Output".bold(), output.display());
            println!("{}: {}", "Rows".bold(), results.len());
            println!("{}: {}", "Restored".bold(), restored);
            if restored < results.len() {
                println!(
                    "{} {} rows had no parseable reply",
                    "!".yellow().bold(),
                    results.len() - restored
                );
            }
        }

        Commands::Clean {
            input,
            output,
            results,
            detect,
            backend,
        } => {
            run_clean(&input, &output, results.as_deref(), &detect, &backend)?;
        }

        Commands::Stats { input, detect } => {
            let pb = create_spinner("Analyzing dataset...");
            let options = detect.to_options();
            let detector = AsciiRatioDetector::new(options.clone())?;
            let dataset = load_dataset(&input)?;
            let flags = detector.classify(&dataset);
            pb.finish_and_clear();

            let noised = flags.iter().filter(|&&f| f).count();
            let mean_ratio = if dataset.is_empty() {
                0.0
            } else {
                dataset
                    .iter()
                    .map(|row| detector.ratio_in(row, dataset.field_count))
                    .sum::<f64>() / dataset.len() as f64
            };

            let mut labels: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
            for (row, is_noised) in dataset.iter().zip(&flags) {
                let entry = labels.entry(row.target).or_default();
                entry.0 += 1;
                if *is_noised {
                    entry.1 += 1;
                }
            }

            println!("{}", "Dataset Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), noisefix::detect_format_from_path(&input)?);
            println!("{}: {}", "Rows".bold(), dataset.len());
            println!("{}: {}", "Threshold".bold(), options.threshold);
            println!("{}: {}", "Noised".bold(), noised);
            println!("{}: {}", "Clean".bold(), dataset.len() - noised);
            println!("{}: {:.4}", "Mean ratio".bold(), mean_ratio);

            println!("\n{}", "Labels".cyan().bold());
            println!("{}", "─".repeat(40));
            for (label, (total, noised)) in &labels {
                println!("{}: {} ({} noised)", label.to_string().bold(), total, noised);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Run the full pipeline: detect, restore noised rows, merge and save.
fn run_clean(
    input: &Path,
    output: &Path,
    results_path: Option<&Path>,
    detect: &DetectArgs,
    backend: &BackendArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let detector = AsciiRatioDetector::new(detect.to_options())?;
    let converter = backend.converter()?;
    let dataset = load_dataset(input)?;
    let total = dataset.len();

    let pb = create_progress(0, "Restoring rows");
    let report = clean_dataset_with_progress(dataset, &detector, &converter, |done, noised| {
        pb.set_length(noised as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    save_dataset(output, &report.dataset)?;
    if let Some(path) = results_path {
        save_results(path, &report.results)?;
    }

    println!("{}", "Cleaning Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output.display());
    if let Some(path) = results_path {
        println!("  {} {}", "✓".green(), path.display());
    }

    println!("\n{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Rows".bold(), total);
    println!("{}: {}", "Clean".bold(), report.clean_rows);
    println!("{}: {}", "Noised".bold(), report.results.len());
    println!("{}: {}", "Updated".bold(), report.merge.updated);
    if report.merge.skipped > 0 {
        println!(
            "{} {} rows kept their original text",
            "!".yellow().bold(),
            report.merge.skipped
        );
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "noisefix".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Noise detection and LLM restoration for Korean headline datasets");
    println!();
    println!("Supported formats: CSV, JSON Lines");
    println!("Default model: {}", noisefix::options::DEFAULT_MODEL);
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn create_progress(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb
}
