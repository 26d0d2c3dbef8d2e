use crate::core::master_data::MasterDataStore;
use crate::domain::model::{BulkInputRow, MasterSchema};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn products_path(&self) -> &str;
    fn pallets_path(&self) -> &str;
    fn schema(&self) -> MasterSchema;
    fn delimiter(&self) -> u8;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

/// Produces a fully built store or fails; a partially usable store is never returned.
#[async_trait]
pub trait MasterDataSource: Send + Sync {
    async fn load_master_data(&self) -> Result<MasterDataStore>;
}

#[async_trait]
pub trait UploadSource: Send + Sync {
    async fn read_upload(&self, path: &str) -> Result<Vec<BulkInputRow>>;
}
