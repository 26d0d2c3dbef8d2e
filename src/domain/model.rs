use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One row of a loaded table, keyed by normalized column name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

/// A tabular collection as handed over by the loader. Column names are
/// already trimmed; `columns` keeps the header order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Product,
    Pallet,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Product => write!(f, "product"),
            TableKind::Pallet => write!(f, "pallet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub identifier: String,
    /// Kilograms per unit. `None` when the master cell is blank or not a number.
    pub unit_weight: Option<f64>,
    pub pack_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletRecord {
    pub identifier: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkInputRow {
    pub identifier: String,
    pub quantity: i64,
}

impl BulkInputRow {
    pub fn new(identifier: impl Into<String>, quantity: i64) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
        }
    }

    /// Wraps a single-entry selection so it can go through the bulk path.
    pub fn single(identifier: impl Into<String>, quantity: i64) -> Vec<Self> {
        vec![Self::new(identifier, quantity)]
    }
}

/// Column mapping for the two master tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterSchema {
    pub product_identifier: String,
    pub product_unit_weight: String,
    pub product_pack_size: Option<String>,
    pub pallet_identifier: String,
    pub pallet_weight: String,
}

impl Default for MasterSchema {
    fn default() -> Self {
        Self {
            product_identifier: "品名".to_string(),
            product_unit_weight: "1ポリ重量".to_string(),
            product_pack_size: Some("入数".to_string()),
            pallet_identifier: "パレット名".to_string(),
            pallet_weight: "重量kg".to_string(),
        }
    }
}
