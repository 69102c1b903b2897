//! DonerCraft builder modal, browser front end.
//!
//! Binds the modal's DOM, reads optional config from the container and hands
//! everything to [`BuilderController`].

pub mod api;
pub mod dom;
pub mod events;
pub mod navigation;
pub mod scheduler;
pub mod toast;
pub mod view;

use dc_builder_core::{BuilderConfig, BuilderController, Collaborators};
use dc_storefront_client::StorefrontClient;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::api::CookieCredentials;
use crate::dom::Elements;
use crate::navigation::LocationNavigator;
use crate::scheduler::GlooScheduler;
use crate::toast::ToastService;
use crate::view::DomView;

const CONFIG_ATTR: &str = "data-builder-config";

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init()
}

fn init() -> Result<(), JsValue> {
    // Pages without the modal are fine: report and attach nothing.
    let els = match Elements::bind() {
        Ok(els) => els,
        Err(err) => {
            gloo_console::error!(err.to_string());
            return Ok(());
        }
    };

    let config = load_config(&els);
    let client = StorefrontClient::new(api::client_config(), Rc::new(CookieCredentials::default()));
    let controller = BuilderController::new(
        config.clone(),
        Collaborators {
            api: Rc::new(client),
            view: Rc::new(DomView::new(els.clone())),
            notifier: Rc::new(ToastService::new(&config)),
            navigator: Rc::new(LocationNavigator),
            scheduler: Rc::new(GlooScheduler),
        },
    );

    events::bind_events(&els, &controller)
}

fn load_config(els: &Elements) -> BuilderConfig {
    let Some(raw) = els.container.get_attribute(CONFIG_ATTR) else {
        return BuilderConfig::default();
    };
    parse_config(&raw).unwrap_or_else(|err| {
        gloo_console::warn!(format!("ignoring {CONFIG_ATTR}: {err}"));
        BuilderConfig::default()
    })
}

fn parse_config(raw: &str) -> Result<BuilderConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config(r#"{"debounce_ms": 300, "cart_url": "/basket/"}"#).unwrap();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.cart_url, "/basket/");
        assert_eq!(config.default_title, "Донер");
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(parse_config("{debounce_ms:").is_err());
    }
}
