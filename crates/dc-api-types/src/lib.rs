use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Builder,
    Product,
}

/// Whole currency units.
///
/// Deserializes from a JSON number or a decimal string (`"1500"`, `"1500.00"`);
/// fractional values are rounded to the nearest unit.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative amount as number or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                u64::try_from(v)
                    .map(Amount)
                    .map_err(|_| E::custom(format!("negative amount {v}")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
                if !v.is_finite() || v < 0.0 {
                    return Err(E::custom(format!("invalid amount {v}")));
                }
                Ok(Amount(v.round() as u64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                let parsed: f64 = v
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid amount string '{v}'")))?;
                self.visit_f64(parsed)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

// ── Product lookup ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

// ── Builder calculation ──

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalculateRequest {
    #[serde(default)]
    pub product_id: u32,
    #[serde(default)]
    pub size_id: u32,
    #[serde(default)]
    pub base_id: u32,
    #[serde(default)]
    pub ingredient_ids: Vec<u32>,
    /// Keyed by ingredient id as a string, mirroring the JSON object form.
    #[serde(default)]
    pub quantities: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionRef {
    pub id: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotItem {
    pub id: u32,
    pub qty: u32,
}

/// The server's confirmation of what was priced. Extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildSnapshot {
    pub size: OptionRef,
    pub base: OptionRef,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateResponse {
    pub ok: bool,
    #[serde(default)]
    pub subtotal: Option<Amount>,
    #[serde(default)]
    pub snapshot: Option<BuildSnapshot>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful calculation with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub subtotal: Amount,
    pub snapshot: BuildSnapshot,
    pub warnings: Vec<String>,
}

impl CalculateResponse {
    /// Split into a complete calculation or the server's reason for refusing.
    pub fn into_calculation(self) -> Result<Calculation, String> {
        if !self.ok {
            return Err(rejection_message(self.error, &self.errors));
        }
        match (self.subtotal, self.snapshot) {
            (Some(subtotal), Some(snapshot)) => Ok(Calculation {
                subtotal,
                snapshot,
                warnings: self.warnings,
            }),
            (None, _) => Err("ok response without subtotal".to_owned()),
            (_, None) => Err("ok response without snapshot".to_owned()),
        }
    }
}

// ── Cart ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartAddRequest {
    pub item_type: ItemType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub product_id: u32,
    #[serde(default)]
    pub size_id: u32,
    #[serde(default)]
    pub base_id: u32,
    #[serde(default)]
    pub ingredient_ids: Vec<u32>,
    #[serde(default)]
    pub quantities: BTreeMap<String, u32>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartAddResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl CartAddResponse {
    pub fn into_result(self) -> Result<(), String> {
        if self.ok {
            Ok(())
        } else {
            Err(rejection_message(self.error, &[]))
        }
    }
}

fn rejection_message(error: Option<String>, errors: &[String]) -> String {
    match error {
        Some(e) if !e.trim().is_empty() => e,
        _ if !errors.is_empty() => errors.join("; "),
        _ => "server reported ok=false".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numbers_and_decimal_strings() {
        let from_int: Amount = serde_json::from_str("1500").unwrap();
        let from_str: Amount = serde_json::from_str("\"1500\"").unwrap();
        let from_decimal: Amount = serde_json::from_str("\"1499.6\"").unwrap();
        assert_eq!(from_int, Amount(1500));
        assert_eq!(from_str, Amount(1500));
        assert_eq!(from_decimal, Amount(1500));
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn calculate_response_with_backend_extras_parses() {
        let raw = r#"{
            "ok": true,
            "subtotal": "1720",
            "warnings": [],
            "calories": 310,
            "snapshot": {
                "product": {"id": 7, "name": "Doner", "price": "1500"},
                "size": {"id": 1, "code": "1.0", "name": "Small"},
                "base": {"id": 2, "name": "Pita", "price": "100"},
                "items": [{"id": 42, "qty": 1, "unit_price": "120"}]
            }
        }"#;
        let calc = serde_json::from_str::<CalculateResponse>(raw)
            .unwrap()
            .into_calculation()
            .unwrap();
        assert_eq!(calc.subtotal, Amount(1720));
        assert_eq!(calc.snapshot.size, OptionRef { id: 1 });
        assert_eq!(calc.snapshot.base, OptionRef { id: 2 });
        assert_eq!(calc.snapshot.items, vec![SnapshotItem { id: 42, qty: 1 }]);
    }

    #[test]
    fn not_ok_response_carries_reason() {
        let resp: CalculateResponse =
            serde_json::from_str(r#"{"ok": false, "errors": ["too many sauces", "too much meat"]}"#)
                .unwrap();
        assert_eq!(
            resp.into_calculation().unwrap_err(),
            "too many sauces; too much meat"
        );

        let bare: CalculateResponse = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        assert_eq!(bare.into_calculation().unwrap_err(), "server reported ok=false");
    }

    #[test]
    fn ok_without_snapshot_is_not_a_calculation() {
        let resp: CalculateResponse = serde_json::from_str(r#"{"ok": true, "subtotal": 10}"#).unwrap();
        assert!(resp.into_calculation().is_err());
    }

    #[test]
    fn cart_add_request_serializes_builder_tag() {
        let req = CartAddRequest {
            item_type: ItemType::Builder,
            quantity: 1,
            product_id: 7,
            size_id: 1,
            base_id: 1,
            ingredient_ids: vec![42],
            quantities: BTreeMap::from([("42".to_owned(), 1)]),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["item_type"], "BUILDER");
        assert_eq!(value["quantities"]["42"], 1);
    }
}
