//! `BuilderView` over the modal's DOM nodes.

use dc_builder_core::{BuilderView, OptionGroup};
use web_sys::Element;

use crate::dom::{self, Elements};

const SEG_BUTTON: &str = ".seg__btn";
const ADDON_CARD: &str = ".addon-card";
const ACTIVE: &str = "is-active";
const SELECTED: &str = "is-selected";
const SHOW: &str = "show";
const NO_SCROLL: &str = "no-scroll";

pub struct DomView {
    els: Elements,
}

impl DomView {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }

    fn group(segment: &Element, attr: &str) -> OptionGroup {
        let buttons = dom::query_all_within(segment, SEG_BUTTON);
        let options = buttons.iter().map(|b| dom::data_id(b, attr)).collect();
        let active = buttons
            .iter()
            .find(|b| dom::has_class(b, ACTIVE))
            .map(|b| dom::data_id(b, attr));
        OptionGroup::new(options, active)
    }

    fn activate(segment: &Element, attr: &str, id: u32) {
        for button in dom::query_all_within(segment, SEG_BUTTON) {
            dom::toggle_class(&button, ACTIVE, dom::data_id(&button, attr) == id);
        }
    }
}

impl BuilderView for DomView {
    fn size_group(&self) -> OptionGroup {
        Self::group(&self.els.seg_size, "data-size-id")
    }

    fn base_group(&self) -> OptionGroup {
        Self::group(&self.els.seg_base, "data-base-id")
    }

    fn activate_size(&self, id: u32) {
        Self::activate(&self.els.seg_size, "data-size-id", id);
    }

    fn activate_base(&self, id: u32) {
        Self::activate(&self.els.seg_base, "data-base-id", id);
    }

    fn mark_addon(&self, id: u32, selected: bool) {
        for card in dom::query_all_within(&self.els.addons_grid, ADDON_CARD) {
            if dom::data_id(&card, "data-addon-id") == id {
                dom::toggle_class(&card, SELECTED, selected);
            }
        }
    }

    fn clear_addon_marks(&self) {
        for card in dom::query_all_within(&self.els.addons_grid, ADDON_CARD) {
            dom::remove_class(&card, SELECTED);
        }
    }

    fn set_title(&self, title: &str) {
        self.els.title.set_text_content(Some(title));
    }

    fn set_total(&self, text: &str) {
        self.els.total.set_text_content(Some(text));
    }

    fn set_submit(&self, enabled: bool, label: &str) {
        self.els.add_to_cart.set_disabled(!enabled);
        self.els.add_to_cart.set_text_content(Some(label));
    }

    fn show(&self) {
        dom::add_class(&self.els.container, SHOW);
        let _ = self.els.container.set_attribute("aria-hidden", "false");
        if let Some(body) = dom::body() {
            dom::add_class(&body, NO_SCROLL);
        }
    }

    fn hide(&self) {
        dom::remove_class(&self.els.container, SHOW);
        let _ = self.els.container.set_attribute("aria-hidden", "true");
        if let Some(body) = dom::body() {
            dom::remove_class(&body, NO_SCROLL);
        }
    }
}
