use crate::domain::model::{MasterSchema, PalletRecord, ProductRecord, Record, Table, TableKind};
use crate::utils::error::{Result, ShipError};
use serde_json::Value;
use std::collections::HashMap;

/// Immutable reference tables for products and pallets.
///
/// Built once from the loader's tables and never mutated afterwards. A
/// reload builds a new store and swaps the whole value (see
/// [`crate::core::session::ShipmentSession::reload`]).
#[derive(Debug, Clone, Default)]
pub struct MasterDataStore {
    products: Vec<ProductRecord>,
    product_index: HashMap<String, usize>,
    pallets: Vec<PalletRecord>,
    pallet_index: HashMap<String, usize>,
}

impl MasterDataStore {
    /// Builds the store from two normalized tables.
    ///
    /// Fails with `SchemaError` when a required column is missing, and with
    /// `DuplicateIdentifier`/`InvalidWeight` when a row breaks the table
    /// invariants. Rows with a blank identifier are skipped.
    pub fn build(products: &Table, pallets: &Table, schema: &MasterSchema) -> Result<Self> {
        require_column(products, TableKind::Product, &schema.product_identifier)?;
        require_column(products, TableKind::Product, &schema.product_unit_weight)?;
        require_column(pallets, TableKind::Pallet, &schema.pallet_identifier)?;
        require_column(pallets, TableKind::Pallet, &schema.pallet_weight)?;

        let pack_column = schema
            .product_pack_size
            .as_deref()
            .filter(|column| products.has_column(column));

        let mut product_records = Vec::with_capacity(products.records.len());
        for (index, record) in products.records.iter().enumerate() {
            let Some(identifier) = identifier_cell(record, &schema.product_identifier) else {
                tracing::warn!("Skipping product row {} with blank identifier", index + 1);
                continue;
            };
            let unit_weight = weight_cell(record, &schema.product_unit_weight);
            if unit_weight.is_none() {
                tracing::warn!("Product '{}' has no usable unit weight", identifier);
            }
            let pack_size = pack_column.and_then(|column| pack_size_cell(record, column));
            product_records.push(ProductRecord {
                identifier,
                unit_weight,
                pack_size,
            });
        }

        let mut pallet_records = Vec::with_capacity(pallets.records.len());
        for (index, record) in pallets.records.iter().enumerate() {
            let Some(identifier) = identifier_cell(record, &schema.pallet_identifier) else {
                tracing::warn!("Skipping pallet row {} with blank identifier", index + 1);
                continue;
            };
            let weight = weight_cell(record, &schema.pallet_weight).ok_or_else(|| {
                ShipError::InvalidWeight {
                    table: TableKind::Pallet.to_string(),
                    identifier: identifier.clone(),
                    value: cell_text(record.data.get(&schema.pallet_weight)),
                }
            })?;
            pallet_records.push(PalletRecord { identifier, weight });
        }

        Self::from_records(product_records, pallet_records)
    }

    /// Builds the store from already typed records. Identifiers are trimmed
    /// and blank ones skipped, so the same rules as [`Self::build`] apply;
    /// uniqueness is checked on the trimmed form.
    pub fn from_records(products: Vec<ProductRecord>, pallets: Vec<PalletRecord>) -> Result<Self> {
        let products = normalize(TableKind::Product, products, |p| &mut p.identifier);
        let pallets = normalize(TableKind::Pallet, pallets, |p| &mut p.identifier);

        let mut product_index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if let Some(weight) = product.unit_weight {
                check_weight(TableKind::Product, &product.identifier, weight)?;
            }
            if product_index
                .insert(product.identifier.clone(), position)
                .is_some()
            {
                return Err(duplicate(TableKind::Product, &product.identifier));
            }
        }

        let mut pallet_index = HashMap::with_capacity(pallets.len());
        for (position, pallet) in pallets.iter().enumerate() {
            check_weight(TableKind::Pallet, &pallet.identifier, pallet.weight)?;
            if pallet_index
                .insert(pallet.identifier.clone(), position)
                .is_some()
            {
                return Err(duplicate(TableKind::Pallet, &pallet.identifier));
            }
        }

        tracing::info!(
            "Master data loaded: {} products, {} pallets",
            products.len(),
            pallets.len()
        );

        Ok(Self {
            products,
            product_index,
            pallets,
            pallet_index,
        })
    }

    pub fn find_product(&self, identifier: &str) -> Option<&ProductRecord> {
        self.product_index
            .get(identifier)
            .map(|&position| &self.products[position])
    }

    pub fn find_pallet(&self, identifier: &str) -> Option<&PalletRecord> {
        self.pallet_index
            .get(identifier)
            .map(|&position| &self.pallets[position])
    }

    /// Product identifiers in master-table order.
    pub fn list_product_identifiers(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.identifier.as_str()).collect()
    }

    /// Pallet identifiers in master-table order.
    pub fn list_pallet_identifiers(&self) -> Vec<&str> {
        self.pallets.iter().map(|p| p.identifier.as_str()).collect()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn pallet_count(&self) -> usize {
        self.pallets.len()
    }
}

fn normalize<T>(
    kind: TableKind,
    records: Vec<T>,
    identifier: impl Fn(&mut T) -> &mut String,
) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut record)| {
            let id = identifier(&mut record);
            let trimmed = id.trim();
            if trimmed.is_empty() {
                tracing::warn!("Skipping {} record {} with blank identifier", kind, index + 1);
                return None;
            }
            if trimmed.len() != id.len() {
                *id = trimmed.to_string();
            }
            Some(record)
        })
        .collect()
}

fn require_column(table: &Table, kind: TableKind, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(ShipError::SchemaError {
            table: kind.to_string(),
            column: column.to_string(),
            found: table.columns.clone(),
        })
    }
}

fn duplicate(kind: TableKind, identifier: &str) -> ShipError {
    ShipError::DuplicateIdentifier {
        table: kind.to_string(),
        identifier: identifier.to_string(),
    }
}

fn check_weight(kind: TableKind, identifier: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        return Ok(());
    }
    Err(ShipError::InvalidWeight {
        table: kind.to_string(),
        identifier: identifier.to_string(),
        value: weight.to_string(),
    })
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn identifier_cell(record: &Record, column: &str) -> Option<String> {
    let text = cell_text(record.data.get(column));
    (!text.is_empty()).then_some(text)
}

fn weight_cell(record: &Record, column: &str) -> Option<f64> {
    match record.data.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|w| w.is_finite()),
        _ => None,
    }
}

fn pack_size_cell(record: &Record, column: &str) -> Option<u32> {
    let size = match record.data.get(column)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    size.filter(|&n| n > 0)
}
