//! Development storefront implementing the builder's three endpoints over a
//! seeded in-memory catalog and cart.

pub mod cart;
pub mod catalog;
pub mod pricing;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use dc_api_types::{CalculateRequest, CartAddRequest, ItemType, ProductResponse, ProductSummary};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::cart::{Cart, CartError, CartView};
use crate::catalog::Catalog;
use crate::pricing::{BuildError, BuildSnapshotBody, calculate_build};

pub const CSRF_HEADER: &str = "x-csrftoken";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cart: Arc<RwLock<Cart>>,
}

impl AppState {
    pub fn seeded() -> Self {
        Self {
            catalog: Arc::new(Catalog::seeded()),
            cart: Arc::new(RwLock::new(Cart::default())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CalculateOk {
    ok: bool,
    subtotal: u64,
    warnings: Vec<String>,
    snapshot: BuildSnapshotBody,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/products/{id}/", get(product_get))
        .route("/api/builder/calculate/", post(builder_calculate))
        .route("/api/cart/", get(cart_get))
        .route("/api/cart/add/", post(cart_add))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn product_get(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ProductResponse>)> {
    match state.catalog.products.get(&id) {
        Some(product) => Ok(Json(ProductResponse {
            ok: true,
            product: Some(ProductSummary {
                name: product.name.clone(),
            }),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ProductResponse {
                ok: false,
                product: None,
            }),
        )),
    }
}

async fn builder_calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<CalculateOk> {
    require_csrf(&headers)?;
    // Unparseable bodies price as an empty build, which fails on product_id.
    let request: CalculateRequest = serde_json::from_slice(&body).unwrap_or_default();

    let priced = calculate_build(&state.catalog, &request).map_err(|err| {
        debug!(product_id = request.product_id, %err, "calculation refused");
        build_error(err)
    })?;

    Ok(Json(CalculateOk {
        ok: true,
        subtotal: priced.subtotal,
        warnings: priced.warnings,
        snapshot: priced.snapshot,
    }))
}

async fn cart_get(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart.read().await.view())
}

async fn cart_add(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<CartView> {
    require_csrf(&headers)?;
    let request: CartAddRequest =
        serde_json::from_slice(&body).map_err(|_| bad_request("Unknown item_type"))?;

    let mut cart = state.cart.write().await;
    let added = match request.item_type {
        ItemType::Builder => cart.add_builder(&state.catalog, &request),
        ItemType::Product => cart.add_product(&state.catalog, &request),
    };
    match added {
        Ok(line) => info!(title = %line.title, total = line.total_price, "cart line added"),
        Err(err) => return Err(cart_error(err)),
    }

    Ok(Json(cart.view()))
}

fn require_csrf(headers: &HeaderMap) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    if token.is_empty() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                ok: false,
                error: Some("CSRF token missing".to_owned()),
                errors: Vec::new(),
                warnings: Vec::new(),
            }),
        ));
    }
    Ok(())
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            ok: false,
            error: Some(message.to_owned()),
            errors: Vec::new(),
            warnings: Vec::new(),
        }),
    )
}

fn build_error(err: BuildError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        BuildError::Rules { errors, warnings } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                ok: false,
                error: None,
                errors,
                warnings,
            }),
        ),
        other => bad_request(&other.to_string()),
    }
}

fn cart_error(err: CartError) -> (StatusCode, Json<ErrorResponse>) {
    bad_request(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("X-CSRFToken", token);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn product_lookup_returns_name_or_404() {
        let app = router(AppState::seeded());
        let (status, body) = call(
            app.clone(),
            Request::get("/api/products/7/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["name"], "Донер классический");

        let (status, body) = call(
            app,
            Request::get("/api/products/404/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn calculate_prices_default_doner() {
        let app = router(AppState::seeded());
        let (status, body) = call(
            app,
            post(
                "/api/builder/calculate/",
                json!({"product_id": 7, "size_id": 1, "base_id": 1, "ingredient_ids": [], "quantities": {}}),
                Some("t"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["subtotal"], 1500);
        assert_eq!(body["snapshot"]["size"]["id"], 1);
        assert_eq!(body["snapshot"]["base"]["id"], 1);
        assert_eq!(body["snapshot"]["items"], json!([]));
    }

    #[tokio::test]
    async fn calculate_without_csrf_is_forbidden() {
        let app = router(AppState::seeded());
        let (status, body) = call(
            app,
            post("/api/builder/calculate/", json!({"product_id": 7}), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn calculate_rule_violation_is_400_with_errors() {
        let app = router(AppState::seeded());
        let (status, body) = call(
            app,
            post(
                "/api/builder/calculate/",
                json!({"product_id": 7, "size_id": 1, "base_id": 1, "ingredient_ids": [40, 41], "quantities": {"40": 3, "41": 2}}),
                Some("t"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn malformed_calculate_body_fails_on_product() {
        let app = router(AppState::seeded());
        let request = Request::post("/api/builder/calculate/")
            .header("X-CSRFToken", "t")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "product_id is invalid");
    }

    #[tokio::test]
    async fn cart_add_builder_then_list() {
        let state = AppState::seeded();
        let app = router(state.clone());
        let (status, body) = call(
            app.clone(),
            post(
                "/api/cart/add/",
                json!({
                    "item_type": "BUILDER", "quantity": 1, "product_id": 7,
                    "size_id": 1, "base_id": 1, "ingredient_ids": [42], "quantities": {"42": 1}
                }),
                Some("t"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["subtotal"], 1650);

        let (_, listed) = call(app, Request::get("/api/cart/").body(Body::empty()).unwrap()).await;
        assert_eq!(listed["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(listed["items"][0]["item_type"], "BUILDER");
    }

    #[tokio::test]
    async fn cart_add_unknown_item_type_is_rejected() {
        let app = router(AppState::seeded());
        let (status, body) = call(
            app,
            post("/api/cart/add/", json!({"item_type": "GIFT"}), Some("t")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown item_type");
    }
}
