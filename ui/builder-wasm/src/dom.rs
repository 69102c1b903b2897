//! DOM element bindings.
//!
//! All modal nodes are resolved once at startup. A page that lacks any of
//! them gets no builder behaviour at all.

use dc_builder_core::ConfigError;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

// ── Helpers ──

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let Ok(nl) = parent.query_selector_all(selector) else {
        return Vec::new();
    };
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

/// Numeric `data-*` id. Absent or malformed reads as `0`.
pub fn data_id(el: &Element, attr: &str) -> u32 {
    el.get_attribute(attr)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Nearest ancestor-or-self of the event target matching `selector`.
pub fn closest_from_event(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok()?
}

// ── Elements struct ──

pub const MODAL_CONTAINER: &str = "modal_container";
pub const CLOSE: &str = "close";
pub const SEG_SIZE: &str = "segSize";
pub const SEG_BASE: &str = "segBase";
pub const ADDONS_GRID: &str = "addonsGrid";
pub const MODAL_TITLE: &str = "modalTitle";
pub const MODAL_TOTAL: &str = "modalTotal";
pub const MODAL_ADD_TO_CART: &str = "modalAddToCart";

/// Modal nodes. Clone-friendly (all inner types are JS handles).
#[derive(Clone)]
pub struct Elements {
    pub container: Element,
    pub close: Element,
    pub seg_size: Element,
    pub seg_base: Element,
    pub addons_grid: Element,
    pub title: Element,
    pub total: Element,
    pub add_to_cart: HtmlButtonElement,
}

impl Elements {
    /// Resolve every modal node, reporting all missing ids at once.
    pub fn bind() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut get = |id: &'static str| {
            let el = by_id(id);
            if el.is_none() {
                missing.push(id);
            }
            el
        };

        let container = get(MODAL_CONTAINER);
        let close = get(CLOSE);
        let seg_size = get(SEG_SIZE);
        let seg_base = get(SEG_BASE);
        let addons_grid = get(ADDONS_GRID);
        let title = get(MODAL_TITLE);
        let total = get(MODAL_TOTAL);
        let add_to_cart = by_id_typed::<HtmlButtonElement>(MODAL_ADD_TO_CART);
        if add_to_cart.is_none() {
            missing.push(MODAL_ADD_TO_CART);
        }

        match (
            container,
            close,
            seg_size,
            seg_base,
            addons_grid,
            title,
            total,
            add_to_cart,
        ) {
            (
                Some(container),
                Some(close),
                Some(seg_size),
                Some(seg_base),
                Some(addons_grid),
                Some(title),
                Some(total),
                Some(add_to_cart),
            ) => Ok(Self {
                container,
                close,
                seg_size,
                seg_base,
                addons_grid,
                title,
                total,
                add_to_cart,
            }),
            _ => Err(ConfigError::MissingElements(missing)),
        }
    }
}
