use crate::core::master_data::MasterDataStore;
use crate::core::resolver::resolve_product;
use crate::domain::model::{BulkInputRow, ProductRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No product record carries the identifier.
    NotFound,
    /// The record exists but its unit weight is blank or not a number.
    MissingWeight,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::NotFound => write!(f, "not found in product master"),
            UnresolvedReason::MissingWeight => write!(f, "no unit weight in product master"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Resolved {
        record: &'a ProductRecord,
        subtotal: f64,
    },
    Unresolved(UnresolvedReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkResultRow<'a> {
    pub input: BulkInputRow,
    pub resolution: Resolution<'a>,
}

impl BulkResultRow<'_> {
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved { .. })
    }

    pub fn unit_weight(&self) -> Option<f64> {
        match &self.resolution {
            Resolution::Resolved { record, .. } => record.unit_weight,
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn subtotal(&self) -> Option<f64> {
        match &self.resolution {
            Resolution::Resolved { subtotal, .. } => Some(*subtotal),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn to_table_row(&self) -> ResultTableRow {
        ResultTableRow {
            identifier: self.input.identifier.clone(),
            quantity: self.input.quantity,
            unit_weight: self.unit_weight(),
            subtotal: self.subtotal(),
            status: match &self.resolution {
                Resolution::Resolved { .. } => "ok",
                Resolution::Unresolved(UnresolvedReason::NotFound) => "not_found",
                Resolution::Unresolved(UnresolvedReason::MissingWeight) => "missing_weight",
            },
        }
    }
}

/// Flat, owned view of one result row for display and CSV output.
/// Unresolved rows leave `unit_weight` and `subtotal` empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTableRow {
    pub identifier: String,
    pub quantity: i64,
    pub unit_weight: Option<f64>,
    pub subtotal: Option<f64>,
    pub status: &'static str,
}

/// Left outer join of the input rows against the product table.
///
/// Emits exactly one row per input row, in input order. Duplicate input
/// identifiers are resolved independently.
pub fn merge<'a>(store: &'a MasterDataStore, rows: Vec<BulkInputRow>) -> Vec<BulkResultRow<'a>> {
    rows.into_iter()
        .map(|input| {
            let resolution = match resolve_product(store, &input.identifier) {
                Ok(record) => match record.unit_weight {
                    Some(unit_weight) => Resolution::Resolved {
                        record,
                        subtotal: input.quantity as f64 * unit_weight,
                    },
                    None => Resolution::Unresolved(UnresolvedReason::MissingWeight),
                },
                Err(not_found) => {
                    tracing::debug!("{}", not_found);
                    Resolution::Unresolved(UnresolvedReason::NotFound)
                }
            };
            BulkResultRow { input, resolution }
        })
        .collect()
}
