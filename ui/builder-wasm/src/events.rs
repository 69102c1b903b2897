//! Event binding.
//!
//! Size, base and add-on clicks are delegated to their containers, so cards
//! rendered after startup work too. Open triggers are delegated to the
//! document.

use dc_builder_core::{BuilderController, SubmitError};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent};

use crate::dom::{self, Elements};

/// Attach `handler` for `event` on `target` for the lifetime of the page.
fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    dyn FnMut(E): WasmClosure,
    F: FnMut(E) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Delegated click: runs `on_id` with the numeric `attr` of the nearest
/// `selector` match.
fn on_delegated_click(
    parent: &EventTarget,
    selector: &'static str,
    attr: &'static str,
    mut on_id: impl FnMut(u32) + 'static,
) -> Result<(), JsValue> {
    listen(parent, "click", move |event: Event| {
        if let Some(el) = dom::closest_from_event(&event, selector) {
            on_id(dom::data_id(&el, attr));
        }
    })
}

/// Bind all builder listeners. Call once after init.
pub fn bind_events(els: &Elements, controller: &BuilderController) -> Result<(), JsValue> {
    let document = dom::document().ok_or_else(|| JsValue::from_str("no document"))?;

    // ── Open triggers ──
    {
        let controller = controller.clone();
        listen(&document, "click", move |event: Event| {
            let Some(trigger) = dom::closest_from_event(&event, ".js-open-modal") else {
                return;
            };
            event.prevent_default();
            let product_id = dom::data_id(&trigger, "data-product-id");
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                controller.open(product_id).await;
            });
        })?;
    }

    // ── Selection ──
    {
        let controller = controller.clone();
        on_delegated_click(&els.seg_size, ".seg__btn", "data-size-id", move |id| {
            controller.select_size(id)
        })?;
    }
    {
        let controller = controller.clone();
        on_delegated_click(&els.seg_base, ".seg__btn", "data-base-id", move |id| {
            controller.select_base(id)
        })?;
    }
    {
        let controller = controller.clone();
        on_delegated_click(&els.addons_grid, ".addon-card", "data-addon-id", move |id| {
            controller.toggle_addon(id)
        })?;
    }

    // ── Close ──
    {
        let controller = controller.clone();
        listen(&els.close, "click", move |_: Event| controller.close())?;
    }
    {
        let controller = controller.clone();
        let container = els.container.clone();
        listen(&els.container, "click", move |event: Event| {
            // Backdrop only; clicks inside the dialog bubble up with another target.
            let on_backdrop = event
                .target()
                .is_some_and(|t| t.loose_eq(container.as_ref()));
            if on_backdrop {
                controller.close();
            }
        })?;
    }
    {
        let controller = controller.clone();
        listen(&document, "keydown", move |event: KeyboardEvent| {
            if event.key() == "Escape" && controller.is_open() {
                controller.close();
            }
        })?;
    }

    // ── Submit ──
    {
        let controller = controller.clone();
        listen(&els.add_to_cart, "click", move |_: Event| {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match controller.submit().await {
                    Ok(_) | Err(SubmitError::Busy) => {}
                    Err(err) => gloo_console::warn!(format!("add to cart failed: {err}")),
                }
            });
        })?;
    }

    Ok(())
}
