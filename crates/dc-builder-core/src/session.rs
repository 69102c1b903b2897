//! Per-open session: the selection plus the last trusted price.
//!
//! A fresh session is created for every `open`; nothing carries over between
//! products.

use crate::pricing::PriceSnapshot;
use crate::selection::Selection;

#[derive(Clone, Debug)]
pub struct BuilderSession {
    id: u64,
    selection: Selection,
    snapshot: Option<PriceSnapshot>,
}

impl BuilderSession {
    pub fn new(id: u64, product_id: u32) -> Self {
        let mut session = Self {
            id,
            selection: Selection::default(),
            snapshot: None,
        };
        session.select_product(product_id);
        session
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn snapshot(&self) -> Option<&PriceSnapshot> {
        self.snapshot.as_ref()
    }

    /// Switch product: add-ons and any held price are dropped.
    pub fn select_product(&mut self, product_id: u32) {
        self.selection.select_product(product_id);
        self.snapshot = None;
    }

    pub fn store_snapshot(&mut self, snapshot: PriceSnapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
    }
}
