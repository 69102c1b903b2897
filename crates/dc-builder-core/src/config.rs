//! Builder configuration.
//!
//! Every field has a default matching the storefront's stock copy, so an
//! empty JSON object (`{}`) deserializes to a usable config. Hosts override
//! individual fields only.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Quiet interval before a burst of selection changes is priced.
    pub debounce_ms: u64,
    pub currency_suffix: String,
    pub cart_url: String,
    /// Modal title used when the product name lookup fails.
    pub default_title: String,
    pub toast_visible_ms: u64,
    pub toast_fade_ms: u64,
    pub labels: Labels,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 120,
            currency_suffix: "тг.".into(),
            cart_url: "/cart/".into(),
            default_title: "Донер".into(),
            toast_visible_ms: 1200,
            toast_fade_ms: 250,
            labels: Labels::default(),
        }
    }
}

impl BuilderConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Text for the subtotal display, e.g. `1500 тг.`.
    pub fn format_total(&self, subtotal: u64) -> String {
        format!("{} {}", subtotal, self.currency_suffix)
    }

    /// Add-to-cart label echoing the subtotal.
    pub fn format_add_for(&self, subtotal: u64) -> String {
        self.labels
            .add_for
            .replace("{amount}", &subtotal.to_string())
            .replace("{currency}", &self.currency_suffix)
    }
}

/// User-facing copy for the submit control, total display and toast.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Labels {
    pub idle: String,
    pub calculating: String,
    pub unavailable: String,
    pub total_error: String,
    /// Template; `{amount}` and `{currency}` are substituted.
    pub add_for: String,
    pub submitting: String,
    pub submit_failed: String,
    pub added: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            idle: "В корзину".into(),
            calculating: "Считаю...".into(),
            unavailable: "Нельзя".into(),
            total_error: "Ошибка".into(),
            add_for: "В корзину за {amount} {currency}".into(),
            submitting: "Добавляю...".into(),
            submit_failed: "Не получилось".into(),
            added: "Добавлено в корзину ✓".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg: BuilderConfig =
            serde_json::from_str(r#"{"debounce_ms": 50, "labels": {"idle": "Add"}}"#).unwrap();
        assert_eq!(cfg.debounce(), Duration::from_millis(50));
        assert_eq!(cfg.labels.idle, "Add");
        assert_eq!(cfg.labels.calculating, "Считаю...");
        assert_eq!(cfg.cart_url, "/cart/");
    }

    #[test]
    fn formats_total_and_label() {
        let cfg = BuilderConfig::default();
        assert_eq!(cfg.format_total(1500), "1500 тг.");
        assert_eq!(cfg.format_add_for(1500), "В корзину за 1500 тг.");
    }
}
