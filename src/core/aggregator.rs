use crate::core::merger::BulkResultRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AggregateOutcome {
    Success { total_weight: f64 },
    /// At least one row did not resolve. No total is produced.
    PartialFailure { unresolved_identifiers: Vec<String> },
}

impl AggregateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AggregateOutcome::Success { .. })
    }

    pub fn total_weight(&self) -> Option<f64> {
        match self {
            AggregateOutcome::Success { total_weight } => Some(*total_weight),
            AggregateOutcome::PartialFailure { .. } => None,
        }
    }
}

/// Sums resolved subtotals. Any unresolved row turns the whole outcome into
/// `PartialFailure`, listing one identifier per unresolved row in input order.
/// Identifiers are reported trimmed, the same key the resolver looked up.
pub fn aggregate(results: &[BulkResultRow<'_>]) -> AggregateOutcome {
    let unresolved_identifiers: Vec<String> = results
        .iter()
        .filter(|row| !row.is_resolved())
        .map(|row| row.input.identifier.trim().to_string())
        .collect();

    if !unresolved_identifiers.is_empty() {
        tracing::warn!(
            "{} of {} rows unresolved: {:?}",
            unresolved_identifiers.len(),
            results.len(),
            unresolved_identifiers
        );
        return AggregateOutcome::PartialFailure {
            unresolved_identifiers,
        };
    }

    // Starts from +0.0 so an empty list reports 0.00 kg rather than -0.00 kg.
    let total_weight = results
        .iter()
        .filter_map(BulkResultRow::subtotal)
        .fold(0.0_f64, |acc, subtotal| acc + subtotal);
    AggregateOutcome::Success { total_weight }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::master_data::MasterDataStore;
    use crate::core::merger::merge;
    use crate::domain::model::{BulkInputRow, ProductRecord};

    fn store() -> MasterDataStore {
        MasterDataStore::from_records(
            vec![
                ProductRecord {
                    identifier: "P1".to_string(),
                    unit_weight: Some(2.5),
                    pack_size: None,
                },
                ProductRecord {
                    identifier: "P4".to_string(),
                    unit_weight: Some(0.125),
                    pack_size: None,
                },
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_all_resolved_sums_subtotals() {
        let store = store();
        let rows = merge(
            &store,
            vec![BulkInputRow::new("P1", 4), BulkInputRow::new("P4", 8)],
        );

        assert_eq!(aggregate(&rows), AggregateOutcome::Success { total_weight: 11.0 });
    }

    #[test]
    fn test_total_is_order_independent() {
        let store = store();
        let forward = vec![
            BulkInputRow::new("P1", 3),
            BulkInputRow::new("P4", 7),
            BulkInputRow::new("P1", 1),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = aggregate(&merge(&store, forward)).total_weight().unwrap();
        let b = aggregate(&merge(&store, backward)).total_weight().unwrap();
        assert!((a - b).abs() < 1e-9);
        assert!((a - 10.875).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_identifiers_add_up() {
        let store = store();
        let rows = merge(
            &store,
            vec![BulkInputRow::new("P1", 4), BulkInputRow::new("P1", 6)],
        );

        assert_eq!(aggregate(&rows).total_weight(), Some(25.0));
    }

    #[test]
    fn test_unresolved_rows_withhold_total() {
        let store = store();
        let rows = merge(
            &store,
            vec![
                BulkInputRow::new("P1", 4),
                BulkInputRow::new("P2", 3),
                BulkInputRow::new("P9", 1),
                BulkInputRow::new("P2", 2),
            ],
        );

        let outcome = aggregate(&rows);
        assert_eq!(
            outcome,
            AggregateOutcome::PartialFailure {
                unresolved_identifiers: vec!["P2".into(), "P9".into(), "P2".into()]
            }
        );
        assert_eq!(outcome.total_weight(), None);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_empty_input_is_positive_zero() {
        let total = aggregate(&[]).total_weight().unwrap();

        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
        assert_eq!(crate::core::shipment::display_kg(total), "0.00 kg");
    }

    #[test]
    fn test_unresolved_identifiers_are_trimmed() {
        let store = store();
        let rows = merge(&store, vec![BulkInputRow::new("  P2\t", 1), BulkInputRow::new(" P1 ", 1)]);

        assert_eq!(
            aggregate(&rows),
            AggregateOutcome::PartialFailure {
                unresolved_identifiers: vec!["P2".to_string()]
            }
        );
    }
}
