//! HTTP surface: status codes, body shapes, and error mapping.

use argus_core::config::FetcherConfig;
use argus_server::{create_router, ApiState, Metrics, PredictionService};
use argus_vision::{Detector, ImageFetcher, StaticBackend};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceExt;

fn categories() -> Vec<String> {
    vec!["__background__", "person", "bicycle", "car", "dog"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn router(pairs: &[(i64, f32)]) -> Router {
    let detector = Detector::new(
        Box::new(StaticBackend::from_pairs(pairs)),
        categories(),
        1_000_000,
    );
    let service = Arc::new(PredictionService::new(
        detector,
        ImageFetcher::new(&FetcherConfig::default()),
        Metrics::new(),
    ));
    create_router(ApiState { service })
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb([12, 34, 56]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

async fn spawn_image_server() -> String {
    let app = Router::new()
        .route("/image.png", get(|| async { png_bytes() }))
        .route("/not_an_image", get(|| async { "plain text, not pixels" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn get_json(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(
    router: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_loaded_model() {
    let router = router(&[(1, 0.9)]);
    let (status, body) = get_json(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_model_info_descriptor() {
    let router = router(&[(1, 0.9)]);
    let (status, body) = get_json(&router, "/model/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_name"], "Faster R-CNN");
    assert_eq!(body["device"], "cpu");
    assert_eq!(body["categories"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_predict_returns_labels() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.9), (4, 0.85), (3, 0.2)]);

    let (status, body) = post_json(
        &router,
        "/predict",
        serde_json::json!({"url": format!("{}/image.png", base)}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Default threshold 0.75 drops the 0.2 entry; native order is kept.
    assert_eq!(body["objects"], serde_json::json!(["person", "dog"]));
}

#[tokio::test]
async fn test_predict_with_confidence_is_ranked() {
    let base = spawn_image_server().await;
    let router = router(&[(3, 0.8), (1, 0.95)]);

    let (status, body) = post_json(
        &router,
        "/predict_with_confidence",
        serde_json::json!({"url": format!("{}/image.png", base)}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let objects = body["objects"].as_array().unwrap();
    assert_eq!(objects[0]["label"], "person");
    assert_eq!(objects[1]["label"], "car");
    assert!(
        objects[0]["confidence"].as_f64().unwrap() >= objects[1]["confidence"].as_f64().unwrap()
    );
}

#[tokio::test]
async fn test_predict_non_image_is_bad_request() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.9)]);

    let (status, body) = post_json(
        &router,
        "/predict",
        serde_json::json!({"url": format!("{}/not_an_image", base)}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("decode"));
}

#[tokio::test]
async fn test_predict_unreachable_host_is_bad_request() {
    let router = router(&[(1, 0.9)]);

    let (status, body) = post_json(
        &router,
        "/predict",
        serde_json::json!({"url": "http://127.0.0.1:1/image.jpg"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_predict_http_404_is_bad_request() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.9)]);

    let (status, _body) = post_json(
        &router,
        "/predict",
        serde_json::json!({"url": format!("{}/missing.png", base)}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_with_options_threshold_and_cap() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.95), (4, 0.5), (3, 0.92)]);

    let (status, body) = post_json(
        &router,
        "/predict_with_options",
        serde_json::json!({
            "url": format!("{}/image.png", base),
            "confidence_threshold": 0.9,
            "max_objects": 1,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"], serde_json::json!(["person"]));
}

#[tokio::test]
async fn test_predict_with_options_zero_cap_is_empty_not_error() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.95)]);

    let (status, body) = post_json(
        &router,
        "/predict_with_options",
        serde_json::json!({
            "url": format!("{}/image.png", base),
            "max_objects": 0,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"], serde_json::json!([]));
}

#[tokio::test]
async fn test_batch_predict_partial_failure() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.9)]);

    let (status, body) = post_json(
        &router,
        "/batch_predict",
        serde_json::json!({"urls": [
            format!("{}/image.png", base),
            format!("{}/not_an_image", base),
            format!("{}/image.png", base),
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    for entry in results {
        let has_objects = entry.get("objects").is_some();
        let has_error = entry.get("error").is_some();
        assert!(has_objects ^ has_error, "entry carries exactly one field: {}", entry);
    }
    assert!(results[0].get("objects").is_some());
    assert!(results[1].get("error").is_some());
    assert!(results[2].get("objects").is_some());
}

#[tokio::test]
async fn test_metrics_exposition() {
    let base = spawn_image_server().await;
    let router = router(&[(1, 0.9)]);

    post_json(
        &router,
        "/predict",
        serde_json::json!({"url": format!("{}/image.png", base)}),
    )
    .await;

    let request = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("argus_inference_total 1"));
    assert!(text.contains("argus_prediction_errors_total 0"));
    assert!(text.contains("argus_prediction_duration_seconds_bucket"));
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let router = router(&[(1, 0.9)]);

    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}
