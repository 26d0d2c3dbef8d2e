use crate::core::master_data::MasterDataStore;
use crate::domain::model::{PalletRecord, ProductRecord, TableKind};
use serde::Serialize;
use thiserror::Error;

/// An identifier with no master record. Returned as data, never coerced to
/// a zero weight.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("'{identifier}' was not found in the {table} master")]
pub struct NotFound {
    pub table: TableKind,
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Product(&'a ProductRecord),
    Pallet(&'a PalletRecord),
}

/// Exact, case-sensitive lookup after trimming surrounding whitespace.
pub fn resolve<'a>(
    store: &'a MasterDataStore,
    table: TableKind,
    identifier: &str,
) -> Result<Resolved<'a>, NotFound> {
    match table {
        TableKind::Product => resolve_product(store, identifier).map(Resolved::Product),
        TableKind::Pallet => resolve_pallet(store, identifier).map(Resolved::Pallet),
    }
}

pub fn resolve_product<'a>(
    store: &'a MasterDataStore,
    identifier: &str,
) -> Result<&'a ProductRecord, NotFound> {
    let key = identifier.trim();
    store
        .find_product(key)
        .ok_or_else(|| not_found(TableKind::Product, key))
}

pub fn resolve_pallet<'a>(
    store: &'a MasterDataStore,
    identifier: &str,
) -> Result<&'a PalletRecord, NotFound> {
    let key = identifier.trim();
    store
        .find_pallet(key)
        .ok_or_else(|| not_found(TableKind::Pallet, key))
}

fn not_found(table: TableKind, key: &str) -> NotFound {
    NotFound {
        table,
        identifier: key.to_string(),
    }
}
