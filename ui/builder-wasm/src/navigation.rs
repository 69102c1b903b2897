use dc_builder_core::Navigator;

use crate::dom;

pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, url: &str) {
        let Some(window) = dom::window() else {
            return;
        };
        if window.location().set_href(url).is_err() {
            gloo_console::warn!(format!("navigation to {url} failed"));
        }
    }
}
