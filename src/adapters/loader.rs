use crate::adapters::csv_table::{parse_positional, parse_table};
use crate::core::master_data::MasterDataStore;
use crate::core::{BulkInputRow, ConfigProvider, MasterDataSource, Result, Storage, UploadSource};
use crate::utils::error::ShipError;

/// Reads master tables and upload lists as delimited text through a [`Storage`].
pub struct CsvLoader<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvLoader<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> MasterDataSource for CsvLoader<S, C> {
    async fn load_master_data(&self) -> Result<MasterDataStore> {
        let delimiter = self.config.delimiter();

        tracing::info!("Loading product master from {}", self.config.products_path());
        let products = parse_table(
            &self.storage.read_file(self.config.products_path()).await?,
            delimiter,
        )?;

        tracing::info!("Loading pallet master from {}", self.config.pallets_path());
        let pallets = parse_table(
            &self.storage.read_file(self.config.pallets_path()).await?,
            delimiter,
        )?;

        MasterDataStore::build(&products, &pallets, &self.config.schema())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> UploadSource for CsvLoader<S, C> {
    async fn read_upload(&self, path: &str) -> Result<Vec<BulkInputRow>> {
        tracing::info!("Reading upload list from {}", path);
        let data = self.storage.read_file(path).await?;
        let rows = parse_positional(&data, self.config.delimiter())?;

        let mut inputs = Vec::with_capacity(rows.len());
        for (line, cells) in rows {
            let identifier = cells.first().cloned().unwrap_or_default();
            let quantity_text = cells.get(1).map(String::as_str).unwrap_or("");
            let quantity = parse_quantity(quantity_text).ok_or_else(|| ShipError::UploadError {
                row: line,
                message: format!("quantity '{}' for '{}' is not an integer", quantity_text, identifier),
            })?;
            inputs.push(BulkInputRow::new(identifier, quantity));
        }

        tracing::info!("Read {} upload rows", inputs.len());
        Ok(inputs)
    }
}

/// Accepts `4` as well as `4.0`, which spreadsheet exports produce.
fn parse_quantity(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(quantity) = text.parse::<i64>() {
        return Some(quantity);
    }
    let value = text.parse::<f64>().ok()?;
    let in_range = value.is_finite() && value.abs() < i64::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MasterSchema;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_files(files: &[(&str, &str)]) -> Self {
            Self {
                files: Arc::new(Mutex::new(
                    files
                        .iter()
                        .map(|(path, body)| (path.to_string(), body.as_bytes().to_vec()))
                        .collect(),
                )),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ShipError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_formats: Vec<String>,
    }

    impl ConfigProvider for MockConfig {
        fn products_path(&self) -> &str {
            "products.csv"
        }

        fn pallets_path(&self) -> &str {
            "pallets.csv"
        }

        fn schema(&self) -> MasterSchema {
            MasterSchema::default()
        }

        fn delimiter(&self) -> u8 {
            b','
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }
    }

    fn loader(files: &[(&str, &str)]) -> CsvLoader<MockStorage, MockConfig> {
        CsvLoader::new(
            MockStorage::with_files(files),
            MockConfig {
                output_formats: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_load_master_data() {
        let loader = loader(&[
            ("products.csv", "品名,1ポリ重量 \nP1,2.5\nP2,1.25\n"),
            ("pallets.csv", " パレット名,重量kg\nPAL1,15.0\n"),
        ]);

        let store = loader.load_master_data().await.unwrap();

        assert_eq!(store.list_product_identifiers(), vec!["P1", "P2"]);
        assert_eq!(store.find_pallet("PAL1").unwrap().weight, 15.0);
    }

    #[tokio::test]
    async fn test_load_master_data_schema_error() {
        let loader = loader(&[
            ("products.csv", "品名,1ポリ重量\nP1,2.5\n"),
            ("pallets.csv", "name,weight\nPAL1,15.0\n"),
        ]);

        let err = loader.load_master_data().await.unwrap_err();
        assert!(matches!(err, ShipError::SchemaError { .. }));
    }

    #[tokio::test]
    async fn test_missing_master_file_is_io_error() {
        let loader = loader(&[("products.csv", "品名,1ポリ重量\n")]);

        let err = loader.load_master_data().await.unwrap_err();
        assert!(matches!(err, ShipError::IoError(_)));
    }

    #[tokio::test]
    async fn test_read_upload_is_positional() {
        let loader = loader(&[(
            "orders.csv",
            "型番,数量,備考\nP1,4,urgent\nP2,3.0\n",
        )]);

        let rows = loader.read_upload("orders.csv").await.unwrap();

        assert_eq!(rows, vec![BulkInputRow::new("P1", 4), BulkInputRow::new("P2", 3)]);
    }

    #[test]
    fn test_read_upload_rejects_bad_quantity() {
        let loader = loader(&[("orders.csv", "code,qty\nP1,4\nP2,lots\n")]);

        let err = tokio_test::block_on(loader.read_upload("orders.csv")).unwrap_err();
        match err {
            ShipError::UploadError { row, message } => {
                assert_eq!(row, 3);
                assert!(message.contains("lots"));
            }
            other => panic!("expected UploadError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("10"), Some(10));
        assert_eq!(parse_quantity(" 4.0 "), Some(4));
        assert_eq!(parse_quantity("-2"), Some(-2));
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("NaN"), None);
    }
}
