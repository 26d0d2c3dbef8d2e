pub mod aggregator;
pub mod master_data;
pub mod merger;
pub mod resolver;
pub mod session;
pub mod shipment;

pub use crate::domain::model::{BulkInputRow, MasterSchema, Record, Table, TableKind};
pub use crate::domain::ports::{ConfigProvider, MasterDataSource, Storage, UploadSource};
pub use crate::utils::error::Result;
