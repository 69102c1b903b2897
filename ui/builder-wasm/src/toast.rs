//! Transient "added to cart" toast.
//!
//! The node is appended hidden, gets `show` on the next tick so the CSS
//! transition runs, loses it after `visible`, and is removed after `fade`.

use dc_builder_core::{BuilderConfig, Notifier};
use gloo_timers::future::TimeoutFuture;

use crate::dom;

const TOAST_CLASS: &str = "toast-added";

pub struct ToastService {
    visible_ms: u32,
    fade_ms: u32,
}

impl ToastService {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            visible_ms: u32::try_from(config.toast_visible_ms).unwrap_or(u32::MAX),
            fade_ms: u32::try_from(config.toast_fade_ms).unwrap_or(u32::MAX),
        }
    }
}

impl Notifier for ToastService {
    fn notify(&self, message: &str) {
        let (Some(doc), Some(body)) = (dom::document(), dom::body()) else {
            return;
        };
        let Ok(toast) = doc.create_element("div") else {
            return;
        };
        toast.set_class_name(TOAST_CLASS);
        toast.set_text_content(Some(message));
        if body.append_child(&toast).is_err() {
            return;
        }

        let (visible_ms, fade_ms) = (self.visible_ms, self.fade_ms);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(0).await;
            dom::add_class(&toast, "show");
            TimeoutFuture::new(visible_ms).await;
            dom::remove_class(&toast, "show");
            TimeoutFuture::new(fade_ms).await;
            toast.remove();
        });
    }
}
