//! Collaborators the controller drives.
//!
//! Everything runs on one event loop, so traits are `?Send` and shared via `Rc`.

use async_trait::async_trait;
use dc_api_types::{CalculateRequest, Calculation, CartAddRequest};

use crate::error::ApiError;
use crate::selection::OptionGroup;

/// The three storefront endpoints the builder talks to.
#[async_trait(?Send)]
pub trait StorefrontApi {
    async fn product_name(&self, product_id: u32) -> Result<String, ApiError>;
    async fn calculate(&self, request: &CalculateRequest) -> Result<Calculation, ApiError>;
    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<(), ApiError>;
}

/// Supplies the anti-forgery token. Queried fresh for every mutating request.
pub trait CredentialProvider {
    fn csrf_token(&self) -> Option<String>;
}

/// The modal's rendered surface.
pub trait BuilderView {
    fn size_group(&self) -> OptionGroup;
    fn base_group(&self) -> OptionGroup;
    fn activate_size(&self, id: u32);
    fn activate_base(&self, id: u32);
    fn mark_addon(&self, id: u32, selected: bool);
    fn clear_addon_marks(&self);
    fn set_title(&self, title: &str);
    fn set_total(&self, text: &str);
    fn set_submit(&self, enabled: bool, label: &str);
    fn show(&self);
    fn hide(&self);
}

/// One-shot transient message (toast).
pub trait Notifier {
    fn notify(&self, message: &str);
}

pub trait Navigator {
    fn navigate(&self, url: &str);
}
