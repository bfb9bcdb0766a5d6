//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod quote;
pub mod vouchers;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Cart fixture (JSON array of snapshots, or a saved get-cart response).
    pub cart: PathBuf,

    /// Restaurant to price (required when the cart holds several).
    #[arg(short, long)]
    pub restaurant: Option<String>,

    /// Voucher catalog fixture.
    #[arg(long)]
    pub vouchers: Option<PathBuf>,

    /// Code of the voucher to apply (looked up in --vouchers).
    #[arg(long, requires = "vouchers")]
    pub voucher: Option<String>,

    /// Tip in minor units.
    #[arg(long, default_value_t = 0)]
    pub tip: i64,

    /// Delivery option ID.
    #[arg(short, long)]
    pub delivery: Option<String>,

    /// Quoted shipping fee in minor units, replacing the delivery option price.
    #[arg(long)]
    pub shipping_fee: Option<i64>,

    /// Distance of the shipping quote, in km.
    #[arg(long, default_value_t = 0.0)]
    pub distance: f64,
}

/// Arguments for the vouchers command.
#[derive(Args)]
pub struct VouchersArgs {
    /// Cart fixture.
    pub cart: PathBuf,

    /// Voucher catalog fixture.
    pub vouchers: PathBuf,

    /// Restaurant whose subtotal decides eligibility.
    #[arg(short, long)]
    pub restaurant: Option<String>,

    /// Delivery option used to preview shipping vouchers.
    #[arg(short, long)]
    pub delivery: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,

    /// Bearer token (defaults to $DASH_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the locally persisted cart.
    Show,
    /// Re-read the cart from the backend.
    Refresh,
    /// Add food to a restaurant's cart.
    Add {
        /// Restaurant ID.
        restaurant: String,
        /// Food ID.
        food: String,
        /// Quantity to add.
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line item.
    Remove {
        /// Line item ID.
        line_item: String,
    },
    /// Step a line item's quantity up or down.
    Step {
        /// Line item ID.
        line_item: String,
        /// Direction of the step.
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Empty the cart across all restaurants.
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Increase,
    Decrease,
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
