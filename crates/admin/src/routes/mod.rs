//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Redirect to products
//!
//! # Products
//! GET  /products                    - Product listing (search, style filter)
//! GET  /products/new                - New product form
//! POST /products                    - Create product
//! GET  /products/{id}/edit          - Edit product form
//! POST /products/{id}               - Update product
//! POST /products/{id}/delete        - Delete product
//! POST /products/{id}/image         - Upload product image (multipart)
//!
//! # Frame assets
//! GET  /assets                      - Asset listing (ratio, color filter)
//! POST /assets                      - Upload asset (multipart, replaces existing)
//! POST /assets/{id}/delete          - Delete asset
//!
//! # Variants
//! GET  /variants                    - Generator form
//! POST /variants/estimate           - Estimated count (fragment)
//! POST /variants/generate           - Generate variants
//! GET  /variants/product/{id}       - Variants of one product
//! POST /variants/{id}               - Update stock and price override
//! POST /variants/{id}/delete        - Delete variant
//! ```

pub mod assets;
pub mod products;
pub mod variants;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the product routes router.
pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    let upload = Router::new()
        .route("/{id}/image", post(products::upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD));

    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}/delete", post(products::delete))
        .merge(upload)
}

/// Create the frame asset routes router.
pub fn asset_routes(max_upload_bytes: usize) -> Router<AppState> {
    let upload = Router::new()
        .route("/", post(assets::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD));

    Router::new()
        .route("/", get(assets::index))
        .route("/{id}/delete", post(assets::delete))
        .merge(upload)
}

/// Create the variant routes router.
pub fn variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(variants::generator))
        .route("/estimate", post(variants::estimate))
        .route("/generate", post(variants::generate))
        .route("/product/{id}", get(variants::list))
        .route("/{id}", post(variants::update))
        .route("/{id}/delete", post(variants::delete))
}

/// Create all routes for admin.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes(max_upload_bytes))
        .nest("/assets", asset_routes(max_upload_bytes))
        .nest("/variants", variant_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use framecraft_core::storage::StorageConfig;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminConfig, DEFAULT_MAX_UPLOAD_BYTES};

    /// A router whose pool never connects; only DB-free routes are usable.
    fn app() -> Router {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/framecraft_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("Zq8#Lm2!vR5@tY7$wN1^kP4&hJ6*cB3x"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            storage: StorageConfig::from_lookup(|_| None).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/framecraft_test")
            .unwrap();
        routes(config.max_upload_bytes).with_state(AppState::new(config, pool).unwrap())
    }

    #[tokio::test]
    async fn test_root_redirects_to_products() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/products");
    }

    #[tokio::test]
    async fn test_estimate_fragment() {
        let body = "product_id=1&aspect_ratio_ids=1&orientation_ids=1&orientation_ids=2\
                    &size_ids=1&size_ids=2&size_ids=3&color_ids=1&thickness_ids=1";
        let response = app()
            .oneshot(
                Request::post("/variants/estimate")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("id=\"estimate\""));
        assert!(html.contains("<strong>6</strong> variants"));
        assert!(!html.contains("estimate--large"));
    }
}
