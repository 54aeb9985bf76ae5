//! Pixel CLI - Command line tool for the pixel-art print storefront.
//!
//! Commands:
//! - `pixel products` - Filter, sort and page the catalog
//! - `pixel cart` - Price a cart file with shipping and coupon
//! - `pixel validate` - Check a JSON payload against a schema
//! - `pixel dashboard` - Admin stats, best sellers and recent orders
//! - `pixel config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pixel_observability::LogLevel;

use commands::{CartArgs, ConfigArgs, DashboardArgs, ProductsArgs, ValidateArgs};

/// Pixel CLI - Browse and administer the pixel-art print storefront
#[derive(Parser)]
#[command(name = "pixel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use the built-in demo catalog instead of the provider
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products(ProductsArgs),

    /// Price a cart file
    Cart(CartArgs),

    /// Validate a JSON payload
    Validate(ValidateArgs),

    /// Show the admin dashboard
    Dashboard(DashboardArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output, cli.offline)?;

    let mut logging = ctx.config.logging.clone();
    if cli.verbose {
        logging.level = LogLevel::Debug;
    }
    pixel_observability::init(&logging);

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Validate(args) => commands::validate::run(args, &ctx),
        Commands::Dashboard(args) => commands::dashboard::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
