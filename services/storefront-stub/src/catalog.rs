//! In-memory demo catalog.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientKind {
    Meat,
    Veg,
    Sauce,
    Extra,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: u64,
    pub available: bool,
}

/// `multiplier_tenths` scales the product price: 10 = ×1.0, 15 = ×1.5.
#[derive(Debug, Clone)]
pub struct SizeOption {
    pub id: u32,
    pub code: String,
    pub name: String,
    pub multiplier_tenths: u64,
}

#[derive(Debug, Clone)]
pub struct BaseOption {
    pub id: u32,
    pub name: String,
    pub price: u64,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: u32,
    pub name: String,
    pub kind: IngredientKind,
    pub price: u64,
    pub available: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub free_sauces: u32,
    pub max_sauces_total: u32,
    pub max_meat_items: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            free_sauces: 2,
            max_sauces_total: 4,
            max_meat_items: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: BTreeMap<u32, Product>,
    pub sizes: BTreeMap<u32, SizeOption>,
    pub bases: BTreeMap<u32, BaseOption>,
    pub ingredients: BTreeMap<u32, Ingredient>,
    pub rules: RuleSet,
}

impl Catalog {
    pub fn seeded() -> Self {
        let mut catalog = Catalog::default();

        for (id, name, price, available) in [
            (1, "Cola 0.5", 390, true),
            (2, "Вода 0.5", 250, true),
            (7, "Донер классический", 1500, true),
            (8, "Донер сезонный", 1900, false),
        ] {
            catalog.products.insert(
                id,
                Product {
                    id,
                    name: name.into(),
                    price,
                    available,
                },
            );
        }

        for (id, code, name, multiplier_tenths) in [
            (1, "1.0", "Small", 10),
            (2, "1.5", "Medium", 15),
            (3, "2.0", "Large", 20),
        ] {
            catalog.sizes.insert(
                id,
                SizeOption {
                    id,
                    code: code.into(),
                    name: name.into(),
                    multiplier_tenths,
                },
            );
        }

        for (id, name, price) in [(1, "Лаваш", 0), (2, "Пита", 100)] {
            catalog.bases.insert(
                id,
                BaseOption {
                    id,
                    name: name.into(),
                    price,
                    available: true,
                },
            );
        }

        use IngredientKind::*;
        for (id, name, kind, price) in [
            (30, "Курица", Meat, 300),
            (31, "Говядина", Meat, 350),
            (32, "Помидор", Veg, 80),
            (33, "Огурец", Veg, 80),
            (40, "Чесночный соус", Sauce, 70),
            (41, "Острый соус", Sauce, 70),
            (42, "Сыр", Extra, 150),
        ] {
            catalog.ingredients.insert(
                id,
                Ingredient {
                    id,
                    name: name.into(),
                    kind,
                    price,
                    available: true,
                },
            );
        }

        catalog
    }

    pub fn available_product(&self, id: u32) -> Option<&Product> {
        self.products.get(&id).filter(|p| p.available)
    }
}
