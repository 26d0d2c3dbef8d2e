pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{CsvLoader, ReportWriter};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    aggregator::AggregateOutcome,
    master_data::MasterDataStore,
    resolver::NotFound,
    session::{ShipmentOutcome, ShipmentReport, ShipmentSession},
    shipment::ShipmentCalculation,
};
pub use domain::model::{BulkInputRow, MasterSchema};
pub use utils::error::{Result, ShipError};
