use crate::core::merger::ResultTableRow;
use crate::core::session::{ShipmentOutcome, ShipmentReport};
use crate::core::shipment::ShipmentSummary;
use crate::core::{Result, Storage};
use crate::utils::error::ShipError;
use serde::Serialize;

pub const RESULT_TABLE_FILE: &str = "result_table.csv";
pub const SUMMARY_FILE: &str = "shipment_summary.json";

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SummaryDocument {
    Calculated(ShipmentSummary),
    Unresolved {
        pallet: String,
        unresolved_identifiers: Vec<String>,
    },
    PalletNotFound {
        pallet: String,
    },
}

/// Writes the per-row result table and the shipment summary.
pub struct ReportWriter<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Self {
        Self { storage, formats }
    }

    /// Returns the names of the files written.
    pub async fn write(&self, report: &ShipmentReport<'_>) -> Result<Vec<String>> {
        let mut written = Vec::new();

        if self.wants("csv") {
            let csv_data = result_table_csv(&report.entry.table())?;
            tracing::debug!("Writing result table ({} bytes)", csv_data.len());
            self.storage.write_file(RESULT_TABLE_FILE, &csv_data).await?;
            written.push(RESULT_TABLE_FILE.to_string());
        }

        if self.wants("json") {
            let json_data = serde_json::to_string_pretty(&summary_document(report))?;
            self.storage
                .write_file(SUMMARY_FILE, json_data.as_bytes())
                .await?;
            written.push(SUMMARY_FILE.to_string());
        }

        Ok(written)
    }

    fn wants(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f == format)
    }
}

pub fn result_table_csv(rows: &[ResultTableRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ShipError::IoError(e.into_error()))
}

fn summary_document(report: &ShipmentReport<'_>) -> SummaryDocument {
    match &report.outcome {
        ShipmentOutcome::Calculated(calculation) => {
            SummaryDocument::Calculated(ShipmentSummary::new(report.pallet.clone(), calculation))
        }
        ShipmentOutcome::Unresolved { identifiers } => SummaryDocument::Unresolved {
            pallet: report.pallet.clone(),
            unresolved_identifiers: identifiers.clone(),
        },
        ShipmentOutcome::PalletNotFound(_) => SummaryDocument::PalletNotFound {
            pallet: report.pallet.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::master_data::MasterDataStore;
    use crate::core::session::ShipmentSession;
    use crate::domain::model::{BulkInputRow, PalletRecord, ProductRecord};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).await.ok_or_else(|| {
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

    fn session() -> ShipmentSession {
        ShipmentSession::new(
            MasterDataStore::from_records(
                vec![ProductRecord {
                    identifier: "P1".to_string(),
                    unit_weight: Some(2.5),
                    pack_size: None,
                }],
                vec![PalletRecord {
                    identifier: "PAL1".to_string(),
                    weight: 15.0,
                }],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_result_table_csv_leaves_unresolved_cells_empty() {
        let session = session();
        let entry = session.bulk(vec![BulkInputRow::new("P1", 4), BulkInputRow::new("P2", 3)]);

        let csv_data = String::from_utf8(result_table_csv(&entry.table()).unwrap()).unwrap();
        let lines: Vec<&str> = csv_data.lines().collect();

        assert_eq!(lines[0], "identifier,quantity,unit_weight,subtotal,status");
        assert_eq!(lines[1], "P1,4,2.5,10.0,ok");
        assert_eq!(lines[2], "P2,3,,,not_found");
    }

    #[tokio::test]
    async fn test_write_both_formats() {
        let session = session();
        let report = session.calculate_shipment(BulkInputRow::single("P1", 10), "PAL1");
        let storage = MockStorage::default();
        let writer = ReportWriter::new(storage.clone(), vec!["csv".into(), "json".into()]);

        let written = writer.write(&report).await.unwrap();

        assert_eq!(written, vec![RESULT_TABLE_FILE, SUMMARY_FILE]);
        let summary: serde_json::Value =
            serde_json::from_slice(&storage.get_file(SUMMARY_FILE).await.unwrap()).unwrap();
        assert_eq!(summary["status"], "calculated");
        assert_eq!(summary["total_weight"], 40.0);
        assert_eq!(summary["total_weight_display"], "40.00 kg");
    }

    #[tokio::test]
    async fn test_unresolved_summary_has_no_total() {
        let session = session();
        let report = session.calculate_shipment(
            vec![BulkInputRow::new("P1", 4), BulkInputRow::new("P2", 3)],
            "PAL1",
        );
        let storage = MockStorage::default();
        let writer = ReportWriter::new(storage.clone(), vec!["json".into()]);

        writer.write(&report).await.unwrap();

        let summary: serde_json::Value =
            serde_json::from_slice(&storage.get_file(SUMMARY_FILE).await.unwrap()).unwrap();
        assert_eq!(summary["status"], "unresolved");
        assert_eq!(summary["unresolved_identifiers"], serde_json::json!(["P2"]));
        assert!(summary.get("total_weight").is_none());
        assert!(storage.get_file(RESULT_TABLE_FILE).await.is_none());
    }
}
