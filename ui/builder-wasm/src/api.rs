//! Storefront wiring for the browser: same-origin base URL and the CSRF
//! cookie.

use dc_builder_core::CredentialProvider;
use dc_storefront_client::ClientConfig;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use crate::dom;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

/// The storefront is served from the page's own origin.
pub fn client_config() -> ClientConfig {
    let origin = dom::window().and_then(|w| w.location().origin().ok());
    ClientConfig::new(origin)
}

/// Reads the CSRF token from `document.cookie` on every call.
#[derive(Debug, Clone)]
pub struct CookieCredentials {
    cookie_name: String,
}

impl Default for CookieCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_CSRF_COOKIE)
    }
}

impl CookieCredentials {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl CredentialProvider for CookieCredentials {
    fn csrf_token(&self) -> Option<String> {
        let cookies = dom::document()?
            .dyn_into::<HtmlDocument>()
            .ok()?
            .cookie()
            .ok()?;
        let raw = read_cookie(&cookies, &self.cookie_name)?;
        match js_sys::decode_uri_component(raw) {
            Ok(decoded) => Some(decoded.into()),
            Err(_) => Some(raw.to_string()),
        }
    }
}

/// Raw (still URI-encoded) value of `name` in a `document.cookie` string.
pub fn read_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
