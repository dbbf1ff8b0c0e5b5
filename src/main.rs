use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use categories::{Category, MetricKind};
use reshape::LongRecord;
use utils::NumberFormatOptions;

mod aggregate;
mod categories;
mod config;
mod dashboard;
mod error;
mod loader;
mod reshape;
mod table;
mod utils;

#[derive(Parser)]
#[command(name = "ivrboard")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the dataset (overrides the configured data path)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Comma-separated category labels to plot (overrides config defaults)
    #[arg(long)]
    categories: Option<String>,

    /// Plot a single metric instead of both
    #[arg(long, value_enum)]
    metric: Option<MetricKind>,

    /// Output metrics and chart data as JSON instead of rendering
    #[arg(long)]
    json: bool,

    /// Use comma-separated number formatting
    #[arg(long)]
    number_comma: bool,

    /// Use human-readable number formatting (k, m, b, t)
    #[arg(short = 'H', long)]
    number_human: bool,

    /// Locale for number formatting (en, de, fr, es, it, ja, ko, zh)
    #[arg(long)]
    locale: Option<String>,

    /// Number of decimal places for human-readable formatting
    #[arg(long)]
    decimal_places: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Output metrics and chart data as JSON
    Stats(StatsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct StatsArgs {
    /// Pretty-print JSON instead of a single line
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (data-path, default-categories, number-comma, number-human, locale, decimal-places)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Load config file to get defaults
    let config = config::Config::load().unwrap_or(None).unwrap_or_default();

    // Create format options merging config defaults with CLI overrides
    let format_options = NumberFormatOptions {
        use_comma: cli.number_comma || config.formatting.number_comma,
        use_human: cli.number_human || config.formatting.number_human,
        locale: cli.locale.clone().unwrap_or(config.formatting.locale.clone()),
        decimal_places: cli
            .decimal_places
            .unwrap_or(config.formatting.decimal_places),
    };

    match cli.command {
        None => {
            if cli.json {
                if let Err(e) = run_stats(&cli, &config, true) {
                    eprintln!("Error generating JSON stats: {e:#}");
                    std::process::exit(1);
                }
            } else if let Err(e) = run_dashboard(&cli, &config, &format_options) {
                eprintln!("Error rendering dashboard: {e:#}");
                std::process::exit(1);
            }
        }
        Some(Commands::Stats(ref args)) => {
            if let Err(e) = run_stats(&cli, &config, args.pretty) {
                eprintln!("Error generating JSON stats: {e:#}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config(ref config_args)) => {
            handle_config_subcommand(config_args);
        }
    }
}

/// Resolve the dataset path: CLI flag over config default.
fn data_path(cli: &Cli, config: &config::Config) -> PathBuf {
    cli.data.clone().unwrap_or_else(|| config.data.path.clone())
}

/// Resolve the category selection: CLI labels over config defaults. Every
/// label must be one of the 12 registered categories.
fn selected_categories(cli: &Cli, config: &config::Config) -> Result<Vec<&'static Category>> {
    let labels: Vec<String> = match &cli.categories {
        Some(raw) => raw
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        None => config.display.default_categories.clone(),
    };

    labels
        .iter()
        .map(|label| categories::lookup(label).map_err(anyhow::Error::from))
        .collect::<Result<Vec<_>>>()
        .context("Invalid category selection")
}

fn metric_kinds(cli: &Cli) -> Vec<MetricKind> {
    match cli.metric {
        Some(kind) => vec![kind],
        None => vec![MetricKind::Sessions, MetricKind::Messages],
    }
}

fn run_dashboard(
    cli: &Cli,
    config: &config::Config,
    format_options: &NumberFormatOptions,
) -> Result<()> {
    let path = data_path(cli, config);
    let table = loader::load(&path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    let selected = selected_categories(cli, config)?;

    dashboard::render(table, &selected, &metric_kinds(cli), format_options)
}

#[derive(Serialize)]
struct StatsOutput {
    total_sessions: u64,
    total_messages: u64,
    categories: Vec<&'static str>,
    sessions: Vec<LongRecord>,
    messages: Vec<LongRecord>,
}

fn run_stats(cli: &Cli, config: &config::Config, pretty: bool) -> Result<()> {
    let path = data_path(cli, config);
    let table = loader::load(&path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    let selected = selected_categories(cli, config)?;

    let stats = StatsOutput {
        total_sessions: aggregate::sum(table, "overall_sessions")?,
        total_messages: aggregate::sum(table, "overall_messages")?,
        categories: selected.iter().map(|c| c.label).collect(),
        sessions: reshape::reshape(table, &selected, MetricKind::Sessions)?,
        messages: reshape::reshape(table, &selected, MetricKind::Messages)?,
    };

    if pretty {
        let json = simd_json::to_string_pretty(&stats)?;
        println!("{json}");
    } else {
        let json = simd_json::to_string(&stats)?;
        println!("{json}");
    }

    Ok(())
}

fn handle_config_subcommand(config_args: &ConfigArgs) {
    match &config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => {
            if let Err(e) = config::create_default_config(*overwrite) {
                eprintln!("Error creating config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Show => {
            if let Err(e) = config::show_config() {
                eprintln!("Error showing config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Set { key, value } => {
            if let Err(e) = config::set_config_value(key, value) {
                eprintln!("Error setting config: {e}");
                std::process::exit(1);
            }
        }
    }
}
