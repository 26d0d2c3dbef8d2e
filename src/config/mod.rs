pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "shipweight")]
#[command(about = "Shipping weight calculator: products plus pallet")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "shipweight.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List selectable product identifiers with their unit weight
    Products,

    /// List selectable pallet identifiers with their weight
    Pallets,

    /// Calculate a shipment for one product and quantity
    Single {
        #[arg(long)]
        product: String,

        #[arg(long, default_value_t = 10)]
        quantity: i64,

        #[arg(long)]
        pallet: String,
    },

    /// Calculate a shipment from an uploaded list (column A code, column B quantity)
    Bulk {
        #[arg(long)]
        upload: String,

        #[arg(long)]
        pallet: String,

        /// Write the result table and summary to the configured output path
        #[arg(long)]
        write_report: bool,
    },
}
