//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod dashboard;
pub mod products;
pub mod validate;

use clap::{Args, Subcommand};
use pixel_commerce::dashboard::{DEFAULT_RECENT_ORDERS, DEFAULT_TOP_PRODUCTS};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Text matched against name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category (e.g. decorative, miniatures, functional).
    #[arg(long)]
    pub category: Option<String>,

    /// Material (e.g. PLA, PETG, ABS).
    #[arg(long)]
    pub material: Option<String>,

    /// Minimum price, e.g. 19.90.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price, e.g. 49.90.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Featured products only.
    #[arg(long)]
    pub featured: bool,

    /// Sort order: newest, name or price.
    #[arg(long, default_value = "newest")]
    pub sort: String,

    /// Page number (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: i64,

    /// Products per page (default: catalog.page_size).
    #[arg(short, long)]
    pub limit: Option<i64>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    /// Cart file: {"items": [{"product_id", "quantity"}], "coupon": {...}}.
    pub file: String,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Schema name (e.g. product, order, register, coupon).
    pub schema: String,

    /// JSON payload file.
    pub file: String,
}

/// Arguments for the dashboard command.
#[derive(Args)]
pub struct DashboardArgs {
    /// Number of best sellers to show.
    #[arg(long, default_value_t = DEFAULT_TOP_PRODUCTS)]
    pub top: usize,

    /// Number of recent orders to show.
    #[arg(long, default_value_t = DEFAULT_RECENT_ORDERS)]
    pub recent: usize,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
