//! agri-forecast: hazard risk, crop and price forecasting tool
//!
//! Scores flood and drought risk, recommends crops and forecasts crop prices
//! from JSON feature vectors.

#![allow(
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

use agri_forecast::{
    cli,
    config::{AppConfig, ConfigPreset, OutputConfig},
    model::HazardType,
    pipeline::{exit_codes, OutputFormat},
    price::RegressionKind,
    service::ForecastService,
};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agri-forecast")]
#[command(version)]
#[command(about = "Hazard risk, crop and price forecasting for smallholder agriculture", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  High severity result with --fail-on-high
    3  Error occurred

EXAMPLES:
    # Flood risk from a JSON feature file
    agri-forecast flood --input field.json

    # Drought risk from inline features, summary output
    agri-forecast drought --set rainfall30d=4 --set soilMoisture=8 -o summary

    # Reproducible price forecast
    agri-forecast price --crop maize --set supply=800 --set demand=1200 --seed 42

    # Score a batch of inputs and fail CI on any high risk
    agri-forecast batch --hazard flood inputs.json --fail-on-high")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding trained model artifacts
    #[arg(long, global = true, env = "AGRI_FORECAST_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Severity breakpoint preset (default, early-warning, conservative)
    #[arg(long, global = true, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Feature input shared by the prediction subcommands
#[derive(Parser)]
struct FeatureArgs {
    /// JSON file holding one object of numeric features
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Set a feature, e.g. `--set rainfall24h=120` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Country of the predicted location
    #[arg(long)]
    country: Option<String>,

    /// Region of the predicted location
    #[arg(long)]
    region: Option<String>,

    /// Latitude of the predicted location
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the predicted location
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,
}

/// Output options shared by all record-producing subcommands
#[derive(Parser)]
struct OutputArgs {
    /// Output format (json, summary)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `flood`, `drought` and `crops` subcommands
#[derive(Parser)]
struct PredictArgs {
    #[command(flatten)]
    features: FeatureArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Exit with code 1 if the result is high severity
    #[arg(long)]
    fail_on_high: bool,
}

/// Arguments for the `price` subcommand
#[derive(Parser)]
struct PriceArgs {
    /// Crop to forecast
    #[arg(long)]
    crop: String,

    /// Forecast horizon in days (config default when omitted)
    #[arg(
        long,
        value_parser = clap::value_parser!(u32)
            .range(1..=i64::from(agri_forecast::config::MAX_HORIZON_DAYS))
    )]
    days_ahead: Option<u32>,

    /// Forecast method
    #[arg(long, value_enum, default_value = "trend")]
    method: cli::PriceMethod,

    /// Regression kind for the regression method
    #[arg(long, value_enum, default_value = "multivariate")]
    kind: RegressionKind,

    /// JSON array of price points to fit (synthetic history when omitted)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Seed for the random trend and synthetic history
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    features: FeatureArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `batch` subcommand
#[derive(Parser)]
struct BatchArgs {
    /// What to score (flood, drought, crop)
    #[arg(long, value_parser = parse_hazard)]
    hazard: HazardType,

    /// JSON file holding an array of feature objects
    input: PathBuf,

    /// Emit full prediction records instead of bare assessments
    #[arg(long)]
    records: bool,

    #[command(flatten)]
    output: OutputArgs,

    /// Exit with code 1 if any result is high severity
    #[arg(long)]
    fail_on_high: bool,
}

/// Arguments for the `validate` subcommand
#[derive(Parser)]
struct ValidateArgs {
    /// Stored prediction record (JSON)
    record: PathBuf,

    /// Observed outcome; JSON, or plain text stored as a string
    #[arg(long)]
    actual: String,

    /// Accuracy of the prediction against the outcome (0.0-1.0)
    #[arg(long)]
    accuracy: f64,

    /// Who validated the prediction
    #[arg(long = "by")]
    validated_by: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Score flood risk
    Flood(PredictArgs),

    /// Score drought risk
    Drought(PredictArgs),

    /// Recommend crops for soil and climate conditions
    Crops(PredictArgs),

    /// Forecast a crop price
    Price(PriceArgs),

    /// Score a JSON array of inputs in parallel
    Batch(BatchArgs),

    /// Attach an observed outcome to a stored prediction record
    Validate(ValidateArgs),

    /// Show which models are loaded and how
    Status {
        /// Output format (json, summary)
        #[arg(short, long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Write trained flood and drought model artifacts
    Train {
        /// Target directory (configured model directory when omitted)
        #[arg(long)]
        into: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .agri-forecast.yaml in the current directory
    Init,
}

fn parse_hazard(raw: &str) -> Result<HazardType, String> {
    HazardType::from_name(raw).ok_or_else(|| format!("unknown hazard '{raw}'"))
}

fn parse_preset(raw: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(raw).ok_or_else(|| {
        let names: Vec<_> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{raw}' (expected one of: {})", names.join(", "))
    })
}

/// Defaults (or preset), then the config file, then CLI flags.
fn load_config(cli: &Cli) -> AppConfig {
    let mut overrides = AppConfig::builder().no_color(cli.no_color).build();
    if let Some(dir) = &cli.model_dir {
        overrides.models.model_dir.clone_from(dir);
    }

    let (file_config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let config = match cli.preset {
        Some(preset) => {
            let mut config = AppConfig::from_preset(preset);
            config.merge(&file_config);
            config
        }
        None => file_config,
    };

    config
}

fn output_config(args: OutputArgs, config: &AppConfig) -> OutputConfig {
    OutputConfig {
        format: args.output.unwrap_or(config.output.format),
        file: args.output_file.or_else(|| config.output.file.clone()),
        no_color: config.output.no_color,
    }
}

fn features_and_location(
    args: FeatureArgs,
) -> Result<(agri_forecast::FeatureVector, Option<agri_forecast::Location>)> {
    let features = cli::load_features(args.input.as_deref(), &args.assignments)?;
    let location = cli::location_from(args.country, args.region, args.lat, args.lng);
    Ok((features, location))
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for results
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli);
    let inspects_config = matches!(
        cli.command,
        Commands::Completions { .. } | Commands::ConfigSchema { .. } | Commands::Config { .. }
    );
    if !inspects_config {
        config.ensure_valid()?;
    }
    let now = Utc::now();
    let quiet = cli.quiet;

    // Dispatch to command handlers
    match cli.command {
        Commands::Flood(args) => run_predict(&config, HazardType::Flood, args, quiet, now),
        Commands::Drought(args) => run_predict(&config, HazardType::Drought, args, quiet, now),
        Commands::Crops(args) => run_predict(&config, HazardType::Crop, args, quiet, now),

        Commands::Price(args) => {
            let (features, location) = features_and_location(args.features)?;
            let command = cli::PriceCommand {
                crop: args.crop,
                features,
                location,
                days_ahead: args.days_ahead.unwrap_or(config.price.default_days_ahead),
                method: args.method,
                kind: args.kind,
                history: args.history,
                seed: args.seed.or(config.price.seed),
                output: output_config(args.output, &config),
                quiet,
            };
            let mut service = ForecastService::new(&config);
            cli::run_price(&mut service, command, now)
        }

        Commands::Batch(args) => {
            let batch = cli::BatchConfig {
                hazard: args.hazard,
                input: args.input,
                records: args.records,
                output: output_config(args.output, &config),
                fail_on_high: args.fail_on_high,
                quiet,
            };
            cli::run_batch(&ForecastService::new(&config), batch, now)
        }

        Commands::Validate(args) => {
            let validate = cli::ValidateConfig {
                record: args.record,
                actual: args.actual,
                accuracy: args.accuracy,
                validated_by: args.validated_by,
                output: output_config(args.output, &config),
                quiet,
            };
            cli::run_validate(validate, now)
        }

        Commands::Status { output } => cli::run_status(&ForecastService::new(&config), output),

        Commands::Train { into } => {
            let dir = into.unwrap_or_else(|| config.models.model_dir.clone());
            cli::run_train(&dir, now, quiet)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "agri-forecast", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = agri_forecast::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config(action, cli.config.as_deref(), &config),
    }
}

fn run_predict(
    config: &AppConfig,
    hazard: HazardType,
    args: PredictArgs,
    quiet: bool,
    now: chrono::DateTime<Utc>,
) -> Result<i32> {
    let (features, location) = features_and_location(args.features)?;
    let predict = cli::PredictConfig {
        hazard,
        features,
        location,
        output: output_config(args.output, config),
        fail_on_high: args.fail_on_high,
        quiet,
    };
    cli::run_predict(&ForecastService::new(config), predict, now)
}

fn run_config(
    action: ConfigAction,
    explicit: Option<&std::path::Path>,
    effective: &AppConfig,
) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            match agri_forecast::config::discover_config_file(explicit) {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml_ng::to_string(effective).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                agri_forecast::config::user_config_dir().map(|p| p.display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in agri_forecast::config::file::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match agri_forecast::config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".agri-forecast.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = agri_forecast::config::generate_full_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(exit_codes::SUCCESS)
}
