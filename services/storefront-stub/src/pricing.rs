//! Server-side build pricing. The server is the source of truth for prices.
//!
//! Subtotal = product × size multiplier + base + add-ons. The first
//! `free_sauces` sauce units are free. Arithmetic is done in tenths and
//! rounded half-to-even to whole units.

use dc_api_types::CalculateRequest;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, IngredientKind};

const MAX_ITEM_QTY: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("product_id is invalid")]
    InvalidProduct,
    #[error("size_id is required/invalid")]
    InvalidSize,
    #[error("base_id is required/invalid")]
    InvalidBase,
    #[error("build breaks the rules: {}", .errors.join("; "))]
    Rules {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductRef {
    pub id: u32,
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SizeRef {
    pub id: u32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BaseRef {
    pub id: u32,
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PricedItem {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientKind,
    pub qty: u32,
    pub unit_price: u64,
    pub added_price: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildSnapshotBody {
    pub product: ProductRef,
    pub size: SizeRef,
    pub base: BaseRef,
    pub items: Vec<PricedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedBuild {
    pub subtotal: u64,
    pub warnings: Vec<String>,
    pub snapshot: BuildSnapshotBody,
}

pub fn calculate_build(catalog: &Catalog, req: &CalculateRequest) -> Result<PricedBuild, BuildError> {
    let product = catalog
        .available_product(req.product_id)
        .ok_or(BuildError::InvalidProduct)?;
    let size = catalog.sizes.get(&req.size_id).ok_or(BuildError::InvalidSize)?;
    let base = catalog
        .bases
        .get(&req.base_id)
        .filter(|b| b.available)
        .ok_or(BuildError::InvalidBase)?;

    // Unknown or unavailable add-ons are skipped, not rejected.
    let normalized: Vec<_> = req
        .ingredient_ids
        .iter()
        .filter_map(|id| catalog.ingredients.get(id).filter(|i| i.available))
        .map(|ing| {
            let qty = req
                .quantities
                .get(&ing.id.to_string())
                .copied()
                .unwrap_or(1)
                .clamp(1, MAX_ITEM_QTY);
            (ing, qty)
        })
        .collect();

    let rules = catalog.rules;
    let count_of = |kind: IngredientKind| -> u32 {
        normalized
            .iter()
            .filter(|(ing, _)| ing.kind == kind)
            .map(|(_, qty)| qty)
            .sum()
    };
    let sauce_count = count_of(IngredientKind::Sauce);
    let meat_count = count_of(IngredientKind::Meat);

    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    if sauce_count > rules.max_sauces_total {
        errors.push(format!(
            "{sauce_count} sauces selected, maximum {}",
            rules.max_sauces_total
        ));
    }
    if meat_count > rules.max_meat_items {
        errors.push(format!(
            "{meat_count} meat items selected, maximum {}",
            rules.max_meat_items
        ));
    }
    if !errors.is_empty() {
        return Err(BuildError::Rules { errors, warnings });
    }

    let mut total_tenths = product.price * size.multiplier_tenths + base.price * 10;
    let mut free_sauces_left = rules.free_sauces;
    let mut items = Vec::with_capacity(normalized.len());

    for (ing, qty) in normalized {
        let paid_qty = if ing.kind == IngredientKind::Sauce {
            let free_now = free_sauces_left.min(qty);
            free_sauces_left -= free_now;
            qty - free_now
        } else {
            qty
        };
        let added = ing.price * u64::from(paid_qty);
        total_tenths += added * 10;

        items.push(PricedItem {
            id: ing.id,
            name: ing.name.clone(),
            kind: ing.kind,
            qty,
            unit_price: ing.price,
            added_price: added,
        });
    }

    if sauce_count > rules.free_sauces {
        warnings.push(format!(
            "{sauce_count} sauces selected, {} free, {} paid",
            rules.free_sauces,
            sauce_count - rules.free_sauces
        ));
    }

    Ok(PricedBuild {
        subtotal: round_half_even_tenths(total_tenths),
        warnings,
        snapshot: BuildSnapshotBody {
            product: ProductRef {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
            },
            size: SizeRef {
                id: size.id,
                code: size.code.clone(),
                name: size.name.clone(),
            },
            base: BaseRef {
                id: base.id,
                name: base.name.clone(),
                price: base.price,
            },
            items,
        },
    })
}

fn round_half_even_tenths(tenths: u64) -> u64 {
    let (units, rem) = (tenths / 10, tenths % 10);
    if rem > 5 || (rem == 5 && units % 2 == 1) {
        units + 1
    } else {
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request(size_id: u32, base_id: u32, ingredient_ids: Vec<u32>) -> CalculateRequest {
        CalculateRequest {
            product_id: 7,
            size_id,
            base_id,
            ingredient_ids,
            quantities: BTreeMap::new(),
        }
    }

    #[test]
    fn plain_doner_costs_product_price() {
        let priced = calculate_build(&Catalog::seeded(), &request(1, 1, vec![])).unwrap();
        assert_eq!(priced.subtotal, 1500);
        assert!(priced.snapshot.items.is_empty());
        assert_eq!(priced.snapshot.size.id, 1);
        assert_eq!(priced.snapshot.base.id, 1);
    }

    #[test]
    fn size_multiplier_base_and_addons_add_up() {
        let priced = calculate_build(&Catalog::seeded(), &request(2, 2, vec![42, 32])).unwrap();
        // 1500 × 1.5 + 100 + 150 + 80
        assert_eq!(priced.subtotal, 2580);
        let ids: Vec<u32> = priced.snapshot.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![42, 32]);
    }

    #[test]
    fn first_two_sauces_are_free() {
        let mut req = request(1, 1, vec![40, 41]);
        req.quantities.insert("40".into(), 2);
        let priced = calculate_build(&Catalog::seeded(), &req).unwrap();
        // Three sauce units, two free: one paid at 70.
        assert_eq!(priced.subtotal, 1570);
        assert_eq!(priced.snapshot.items[0].added_price, 0);
        assert_eq!(priced.snapshot.items[1].added_price, 70);
        assert_eq!(priced.warnings.len(), 1);
    }

    #[test]
    fn too_much_meat_is_rejected() {
        let mut req = request(1, 1, vec![30, 31]);
        req.quantities.insert("30".into(), 2);
        let err = calculate_build(&Catalog::seeded(), &req).unwrap_err();
        assert!(matches!(err, BuildError::Rules { ref errors, .. } if errors.len() == 1));
    }

    #[test]
    fn quantities_are_clamped_and_unknown_addons_skipped() {
        let mut req = request(1, 1, vec![32, 999]);
        req.quantities.insert("32".into(), 40);
        let priced = calculate_build(&Catalog::seeded(), &req).unwrap();
        assert_eq!(priced.snapshot.items.len(), 1);
        assert_eq!(priced.snapshot.items[0].qty, 5);
        assert_eq!(priced.subtotal, 1500 + 5 * 80);
    }

    #[test]
    fn invalid_references_fail_in_order() {
        let catalog = Catalog::seeded();
        let mut req = request(1, 1, vec![]);
        req.product_id = 8;
        assert_eq!(calculate_build(&catalog, &req), Err(BuildError::InvalidProduct));
        assert_eq!(
            calculate_build(&catalog, &request(0, 1, vec![])),
            Err(BuildError::InvalidSize)
        );
        assert_eq!(
            calculate_build(&catalog, &request(1, 9, vec![])),
            Err(BuildError::InvalidBase)
        );
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_half_even_tenths(19365), 1936);
        assert_eq!(round_half_even_tenths(19375), 1938);
        assert_eq!(round_half_even_tenths(19366), 1937);
    }
}
