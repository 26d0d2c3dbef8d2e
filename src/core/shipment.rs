use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// The three figures of one calculation, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShipmentCalculation {
    pub product_weight: f64,
    pub pallet_weight: f64,
    pub total_weight: f64,
}

pub fn calculate(product_weight: f64, pallet_weight: f64) -> ShipmentCalculation {
    ShipmentCalculation {
        product_weight,
        pallet_weight,
        total_weight: product_weight + pallet_weight,
    }
}

/// Two-decimal display form, e.g. `25.00 kg`.
pub fn display_kg(weight: f64) -> String {
    format!("{:.2} kg", weight)
}

impl fmt::Display for ShipmentCalculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product weight:  {}", display_kg(self.product_weight))?;
        writeln!(f, "Pallet weight:   {}", display_kg(self.pallet_weight))?;
        write!(f, "Shipment total:  {}", display_kg(self.total_weight))
    }
}

/// Written alongside the result table when a report is requested.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentSummary {
    pub pallet: String,
    pub product_weight: f64,
    pub pallet_weight: f64,
    pub total_weight: f64,
    pub product_weight_display: String,
    pub pallet_weight_display: String,
    pub total_weight_display: String,
    pub calculated_at: DateTime<Utc>,
}

impl ShipmentSummary {
    pub fn new(pallet: impl Into<String>, calculation: &ShipmentCalculation) -> Self {
        Self {
            pallet: pallet.into(),
            product_weight: calculation.product_weight,
            pallet_weight: calculation.pallet_weight,
            total_weight: calculation.total_weight,
            product_weight_display: display_kg(calculation.product_weight),
            pallet_weight_display: display_kg(calculation.pallet_weight),
            total_weight_display: display_kg(calculation.total_weight),
            calculated_at: Utc::now(),
        }
    }
}
