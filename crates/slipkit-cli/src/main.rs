//! CLI application for Amazon packing slips and manufacturing labels.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, gift_cards, labels, parse, summary};

/// slipkit - Turn Amazon packing slips into 4x6 manufacturing labels
#[derive(Parser)]
#[command(name = "slipkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract line items from packing slips
    Parse(parse::ParseArgs),

    /// Render 4x6 labels, one page per line item
    Labels(labels::LabelsArgs),

    /// Render portrait gift cards for gift messages
    GiftCards(gift_cards::GiftCardsArgs),

    /// Show production totals per towel color and thread
    Summary(summary::SummaryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Parse(args) => parse::run(args, config_path),
        Commands::Labels(args) => labels::run(args, config_path),
        Commands::GiftCards(args) => gift_cards::run(args, config_path),
        Commands::Summary(args) => summary::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
