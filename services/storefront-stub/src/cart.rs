//! Single in-memory cart.

use dc_api_types::{CalculateRequest, CartAddRequest, ItemType};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::pricing::{BuildError, BuildSnapshotBody, calculate_build};

const MAX_LINE_QTY: u32 = 20;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Invalid build: {0}")]
    InvalidBuild(#[from] BuildError),
    #[error("Product not found/available")]
    ProductUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: Uuid,
    pub item_type: ItemType,
    pub title: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub total_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<BuildSnapshotBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub ok: bool,
    pub subtotal: u64,
    pub items: Vec<CartLine>,
}

#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Re-price the build server-side and append it as one line.
    pub fn add_builder(&mut self, catalog: &Catalog, req: &CartAddRequest) -> Result<&CartLine, CartError> {
        let calc_request = CalculateRequest {
            product_id: req.product_id,
            size_id: req.size_id,
            base_id: req.base_id,
            ingredient_ids: req.ingredient_ids.clone(),
            quantities: req.quantities.clone(),
        };
        let priced = calculate_build(catalog, &calc_request)?;
        let snap = priced.snapshot;
        let title = format!("{} ({}, {})", snap.product.name, snap.size.code, snap.base.name);
        Ok(self.push(ItemType::Builder, title, req.quantity, priced.subtotal, Some(snap)))
    }

    pub fn add_product(&mut self, catalog: &Catalog, req: &CartAddRequest) -> Result<&CartLine, CartError> {
        let product = catalog
            .available_product(req.product_id)
            .ok_or(CartError::ProductUnavailable)?;
        let title = product.name.clone();
        let price = product.price;
        Ok(self.push(ItemType::Product, title, req.quantity, price, None))
    }

    fn push(
        &mut self,
        item_type: ItemType,
        title: String,
        quantity: u32,
        unit_price: u64,
        snapshot: Option<BuildSnapshotBody>,
    ) -> &CartLine {
        let quantity = quantity.clamp(1, MAX_LINE_QTY);
        self.lines.push(CartLine {
            id: Uuid::new_v4(),
            item_type,
            title,
            quantity,
            unit_price,
            total_price: unit_price * u64::from(quantity),
            snapshot,
        });
        &self.lines[self.lines.len() - 1]
    }

    pub fn subtotal(&self) -> u64 {
        self.lines.iter().map(|l| l.total_price).sum()
    }

    pub fn view(&self) -> CartView {
        CartView {
            ok: true,
            subtotal: self.subtotal(),
            items: self.lines.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn builder_request(quantity: u32) -> CartAddRequest {
        CartAddRequest {
            item_type: ItemType::Builder,
            quantity,
            product_id: 7,
            size_id: 2,
            base_id: 2,
            ingredient_ids: vec![42],
            quantities: BTreeMap::from([("42".to_owned(), 1)]),
        }
    }

    #[test]
    fn builder_line_is_repriced_and_titled() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::default();
        let line = cart.add_builder(&catalog, &builder_request(1)).unwrap();
        assert_eq!(line.title, "Донер классический (1.5, Пита)");
        assert_eq!(line.unit_price, 2500);
        assert!(line.snapshot.is_some());
        assert_eq!(cart.subtotal(), 2500);
    }

    #[test]
    fn quantity_is_clamped() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::default();
        let line = cart.add_builder(&catalog, &builder_request(99)).unwrap();
        assert_eq!(line.quantity, 20);
        assert_eq!(line.total_price, 2500 * 20);
    }

    #[test]
    fn unavailable_product_is_refused() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::default();
        let mut req = builder_request(1);
        req.item_type = ItemType::Product;
        req.product_id = 8;
        assert!(matches!(
            cart.add_product(&catalog, &req),
            Err(CartError::ProductUnavailable)
        ));
        assert!(cart.view().items.is_empty());
    }
}
