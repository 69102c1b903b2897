use async_trait::async_trait;
use dc_api_types::{
    CalculateRequest, CalculateResponse, Calculation, CartAddRequest, CartAddResponse,
    ProductResponse,
};
use dc_builder_core::{ApiError, CredentialProvider, StorefrontApi};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use tracing::debug;

pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// Where the storefront lives and how requests are authenticated.
///
/// `base_url` falls back to `STOREFRONT_URL`, then `http://localhost:8000`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub csrf_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ClientConfig {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .or_else(|| std::env::var("STOREFRONT_URL").ok())
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
        }
    }
}

/// Fixed token, for native hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub Option<String>);

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }
}

impl CredentialProvider for StaticCredentials {
    fn csrf_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// HTTP client for the product, builder and cart endpoints.
pub struct StorefrontClient {
    config: ClientConfig,
    http: reqwest::Client,
    credentials: Rc<dyn CredentialProvider>,
}

impl StorefrontClient {
    pub fn new(config: ClientConfig, credentials: Rc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path));
        self.send(path, request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Missing token still sends the header, empty.
        let token = self.credentials.csrf_token().unwrap_or_default();
        let request = self
            .http
            .post(self.url(path))
            .header(self.config.csrf_header.as_str(), token)
            .json(body);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_same_origin();

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(format!("{path}: {err}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(format!("{path} body: {err}")))?;

        if !status.is_success() {
            debug!(path, status = status.as_u16(), "storefront request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| ApiError::Decode(format!("{path}: {err}")))
    }
}

#[async_trait(?Send)]
impl StorefrontApi for StorefrontClient {
    async fn product_name(&self, product_id: u32) -> Result<String, ApiError> {
        let path = format!("/api/products/{product_id}/");
        let body: ProductResponse = self.get_json(&path).await?;
        match body.product {
            Some(product) if body.ok && !product.name.trim().is_empty() => Ok(product.name),
            _ => Err(ApiError::Rejected(format!(
                "product {product_id} lookup returned no name"
            ))),
        }
    }

    async fn calculate(&self, request: &CalculateRequest) -> Result<Calculation, ApiError> {
        let body: CalculateResponse = self.post_json("/api/builder/calculate/", request).await?;
        body.into_calculation().map_err(ApiError::Rejected)
    }

    async fn add_to_cart(&self, request: &CartAddRequest) -> Result<(), ApiError> {
        let body: CartAddResponse = self.post_json("/api/cart/add/", request).await?;
        body.into_result().map_err(ApiError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let cfg = ClientConfig::new(Some("http://shop.local/".into()));
        assert_eq!(cfg.base_url, "http://shop.local");
        assert_eq!(cfg.csrf_header, "X-CSRFToken");
    }

    #[test]
    fn static_credentials_return_token() {
        assert_eq!(StaticCredentials::new("abc").csrf_token().as_deref(), Some("abc"));
        assert_eq!(StaticCredentials::default().csrf_token(), None);
    }
}
