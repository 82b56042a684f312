//! Integration tests for the admin catalog tools.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The sample catalog seeded (`fc-cli seed catalog crates/cli/data/catalog.yaml`)
//! - The admin server running (cargo run -p framecraft-admin)

use framecraft_integration_tests::{admin_base_url, client};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = admin_base_url();

    for path in ["/health", "/health/ready"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to reach health endpoint");
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_root_redirects_to_products() {
    let resp = client()
        .get(format!("{}/", admin_base_url()))
        .send()
        .await
        .expect("Failed to get admin root");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/products");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_product_list_and_search() {
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to get products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Classic Gallery Frame"));

    let resp = client
        .get(format!("{base_url}/products?search=barnwood"))
        .send()
        .await
        .expect("Failed to search products");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Rustic Barnwood Frame"));
    assert!(!body.contains("Modern Metal Frame"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_invalid_product_form_is_rerendered() {
    let resp = client()
        .post(format!("{}/products", admin_base_url()))
        .form(&[
            ("name", "Broken Frame"),
            ("base_price", "-5"),
            ("style", "modern"),
            ("material", "wood"),
        ])
        .send()
        .await
        .expect("Failed to post product");

    // A valid product would redirect
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Broken Frame"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_variant_estimate_fragment() {
    let resp = client()
        .post(format!("{}/variants/estimate", admin_base_url()))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(
            "product_id=1&aspect_ratio_ids=1&orientation_ids=1&size_ids=1&size_ids=2\
             &color_ids=1&color_ids=2&color_ids=3&thickness_ids=1",
        )
        .send()
        .await
        .expect("Failed to post estimate");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("<strong>6</strong> variants"));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_generate_without_product_returns_to_form() {
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/variants/generate"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("size_ids=1&default_stock=10")
        .send()
        .await
        .expect("Failed to post generate");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers()["location"]
        .to_str()
        .expect("Invalid location")
        .to_string();
    assert!(location.starts_with("/variants"));

    // The selection survives the round trip
    let resp = client
        .get(format!("{base_url}{location}"))
        .send()
        .await
        .expect("Failed to get generator");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("value=\"10\""));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_asset_library() {
    let resp = client()
        .get(format!("{}/assets?aspect_ratio_id=&color_id=", admin_base_url()))
        .send()
        .await
        .expect("Failed to get assets");
    assert_eq!(resp.status(), StatusCode::OK);
}
