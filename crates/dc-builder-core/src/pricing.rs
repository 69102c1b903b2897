//! Server-confirmed price snapshots and the cart line derived from them.

use dc_api_types::{Calculation, CartAddRequest, ItemType, OptionRef, SnapshotItem};
use std::collections::BTreeMap;

use crate::selection::Selection;

/// Result of the last successful calculation.
///
/// This is the only source for what gets submitted: size, base and items
/// come from here, never from the live selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceSnapshot {
    pub subtotal: u64,
    pub size: OptionRef,
    pub base: OptionRef,
    pub items: Vec<SnapshotItem>,
    pub warnings: Vec<String>,
    revision: u64,
}

impl PriceSnapshot {
    /// Wrap a calculation requested at selection `revision`.
    pub fn new(calc: Calculation, revision: u64) -> Self {
        Self {
            subtotal: calc.subtotal.0,
            size: calc.snapshot.size,
            base: calc.snapshot.base,
            items: calc.snapshot.items,
            warnings: calc.warnings,
            revision,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// False once the selection has changed after this snapshot was requested.
    pub fn is_current_for(&self, selection: &Selection) -> bool {
        self.revision == selection.revision()
    }
}

/// One builder item for the cart, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: u32,
    pub size_id: u32,
    pub base_id: u32,
    pub items: Vec<SnapshotItem>,
}

impl CartLine {
    pub fn from_snapshot(product_id: u32, snapshot: &PriceSnapshot) -> Self {
        Self {
            product_id,
            size_id: snapshot.size.id,
            base_id: snapshot.base.id,
            items: snapshot.items.clone(),
        }
    }

    pub fn to_request(&self) -> CartAddRequest {
        CartAddRequest {
            item_type: ItemType::Builder,
            quantity: 1,
            product_id: self.product_id,
            size_id: self.size_id,
            base_id: self.base_id,
            ingredient_ids: self.items.iter().map(|item| item.id).collect(),
            quantities: self
                .items
                .iter()
                .map(|item| (item.id.to_string(), item.qty))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_api_types::{Amount, BuildSnapshot};

    fn calculation() -> Calculation {
        Calculation {
            subtotal: Amount(1870),
            snapshot: BuildSnapshot {
                size: OptionRef { id: 2 },
                base: OptionRef { id: 1 },
                items: vec![SnapshotItem { id: 42, qty: 1 }, SnapshotItem { id: 40, qty: 2 }],
            },
            warnings: vec![],
        }
    }

    #[test]
    fn cart_line_uses_snapshot_fields_only() {
        let mut selection = Selection::default();
        selection.select_product(7);
        selection.set_size(2);
        selection.set_base(1);
        let snapshot = PriceSnapshot::new(calculation(), selection.revision());
        assert!(snapshot.is_current_for(&selection));

        // Selection drifts without a new calculation.
        selection.set_size(3);
        selection.toggle_addon(99);
        assert!(!snapshot.is_current_for(&selection));

        let req = CartLine::from_snapshot(7, &snapshot).to_request();
        assert_eq!(req.item_type, ItemType::Builder);
        assert_eq!(req.quantity, 1);
        assert_eq!(req.product_id, 7);
        assert_eq!(req.size_id, 2);
        assert_eq!(req.base_id, 1);
        assert_eq!(req.ingredient_ids, vec![42, 40]);
        assert_eq!(req.quantities.get("40"), Some(&2));
        assert_eq!(req.quantities.get("42"), Some(&1));
    }
}
