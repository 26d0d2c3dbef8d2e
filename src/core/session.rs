use crate::core::aggregator::{aggregate, AggregateOutcome};
use crate::core::master_data::MasterDataStore;
use crate::core::merger::{merge, BulkResultRow, Resolution, ResultTableRow, UnresolvedReason};
use crate::core::resolver::{resolve_pallet, resolve_product, NotFound};
use crate::core::shipment::{calculate, ShipmentCalculation};
use crate::domain::model::BulkInputRow;
use std::sync::Arc;

/// Merged rows plus their aggregate, for either entry mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryResult<'a> {
    pub rows: Vec<BulkResultRow<'a>>,
    pub outcome: AggregateOutcome,
}

impl EntryResult<'_> {
    pub fn table(&self) -> Vec<ResultTableRow> {
        self.rows.iter().map(BulkResultRow::to_table_row).collect()
    }

    /// Trimmed identifier and reason of each unresolved row, in input order.
    pub fn unresolved(&self) -> Vec<(&str, UnresolvedReason)> {
        self.rows
            .iter()
            .filter_map(|row| match row.resolution {
                Resolution::Unresolved(reason) => Some((row.input.identifier.trim(), reason)),
                Resolution::Resolved { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShipmentOutcome {
    Calculated(ShipmentCalculation),
    /// Product rows did not all resolve; no total is computed.
    Unresolved { identifiers: Vec<String> },
    PalletNotFound(NotFound),
}

impl ShipmentOutcome {
    pub fn calculation(&self) -> Option<&ShipmentCalculation> {
        match self {
            ShipmentOutcome::Calculated(calc) => Some(calc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentReport<'a> {
    pub entry: EntryResult<'a>,
    pub pallet: String,
    pub outcome: ShipmentOutcome,
}

/// Per-session context owning the master data reference.
///
/// Every calculation borrows the store through the session, so `reload`
/// (which needs `&mut self`) cannot run while results still point into the
/// previous store.
#[derive(Debug, Clone)]
pub struct ShipmentSession {
    store: Arc<MasterDataStore>,
}

impl ShipmentSession {
    pub fn new(store: MasterDataStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Shares an already built store between independent sessions.
    pub fn from_shared(store: Arc<MasterDataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MasterDataStore {
        &self.store
    }

    pub fn shared_store(&self) -> Arc<MasterDataStore> {
        Arc::clone(&self.store)
    }

    /// Replaces the whole store. Other sessions holding the old `Arc` keep
    /// reading the old contents.
    pub fn reload(&mut self, store: MasterDataStore) {
        tracing::info!(
            "Reloading master data ({} products, {} pallets)",
            store.product_count(),
            store.pallet_count()
        );
        self.store = Arc::new(store);
    }

    pub fn product_identifiers(&self) -> Vec<&str> {
        self.store.list_product_identifiers()
    }

    pub fn pallet_identifiers(&self) -> Vec<&str> {
        self.store.list_pallet_identifiers()
    }

    /// Unit weight of a selected product for display. `Ok(None)` means the
    /// product exists but has no usable weight.
    pub fn unit_weight(&self, identifier: &str) -> Result<Option<f64>, NotFound> {
        resolve_product(&self.store, identifier).map(|record| record.unit_weight)
    }

    pub fn single_entry(&self, identifier: &str, quantity: i64) -> EntryResult<'_> {
        self.bulk(BulkInputRow::single(identifier, quantity))
    }

    pub fn bulk(&self, rows: Vec<BulkInputRow>) -> EntryResult<'_> {
        tracing::debug!("Merging {} input rows", rows.len());
        let rows = merge(&self.store, rows);
        let outcome = aggregate(&rows);
        EntryResult { rows, outcome }
    }

    /// Combines an entry outcome with the selected pallet. Unresolved
    /// product rows take precedence over an unknown pallet.
    pub fn finalize(&self, entry: &EntryResult<'_>, pallet: &str) -> ShipmentOutcome {
        let product_weight = match &entry.outcome {
            AggregateOutcome::Success { total_weight } => *total_weight,
            AggregateOutcome::PartialFailure {
                unresolved_identifiers,
            } => {
                return ShipmentOutcome::Unresolved {
                    identifiers: unresolved_identifiers.clone(),
                }
            }
        };

        match resolve_pallet(&self.store, pallet) {
            Ok(record) => {
                let calculation = calculate(product_weight, record.weight);
                tracing::info!(
                    "Shipment total {:.2} kg (products {:.2} kg, pallet '{}' {:.2} kg)",
                    calculation.total_weight,
                    calculation.product_weight,
                    record.identifier,
                    calculation.pallet_weight
                );
                ShipmentOutcome::Calculated(calculation)
            }
            Err(not_found) => {
                tracing::warn!("{}", not_found);
                ShipmentOutcome::PalletNotFound(not_found)
            }
        }
    }

    pub fn calculate_shipment(&self, rows: Vec<BulkInputRow>, pallet: &str) -> ShipmentReport<'_> {
        let entry = self.bulk(rows);
        let outcome = self.finalize(&entry, pallet);
        ShipmentReport {
            entry,
            pallet: pallet.trim().to_string(),
            outcome,
        }
    }
}
