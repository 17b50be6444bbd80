mod common;

use common::{valid_metrics, TestApp};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn prediction_is_relayed_verbatim() {
    let app = TestApp::spawn().await;
    let raw = r#"{"probability": 0.82, "feature_importance": {"bmi": 0.31, "age": 0.12}}"#;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .and(body_json(valid_metrics()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .expect(1)
        .mount(&app.ml_server)
        .await;

    let response = app.post_json("/api/predict", &valid_metrics()).await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    assert_eq!(response.text().await.unwrap(), raw);
}

#[tokio::test]
async fn missing_required_field_is_rejected_without_upstream_call() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"probability": 0.5})))
        .expect(0)
        .mount(&app.ml_server)
        .await;

    let mut metrics = valid_metrics();
    metrics.as_object_mut().unwrap().remove("bmi");

    let response = app.post_json("/api/predict", &metrics).await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid prediction input"}));
}

#[tokio::test]
async fn positional_array_payload_is_rejected_without_upstream_call() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"probability": 0.5})))
        .expect(0)
        .mount(&app.ml_server)
        .await;

    for endpoint in ["/api/predict", "/api/assess"] {
        let response = app
            .post_json(endpoint, &json!([45, 22, 120, null, 0, 0]))
            .await;

        assert_eq!(response.status(), 400, "endpoint: {}", endpoint);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid prediction input"}));
    }
}

#[tokio::test]
async fn out_of_range_values_are_rejected() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({"age": -1, "bmi": 25, "bp_systolic": 120}),
        json!({"age": 40, "bmi": 25, "bp_systolic": 120, "activityLevel": "7"}),
        json!({"age": 40, "bmi": 25, "bp_systolic": 120, "familyHistory": 2}),
        json!({"age": "forty", "bmi": 25, "bp_systolic": 120}),
    ];

    for case in cases {
        let response = app.post_json("/api/predict", &case).await;
        assert_eq!(response.status(), 400, "payload: {}", case);
    }
}

#[tokio::test]
async fn malformed_json_body_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_raw("/api/predict", "{not json").await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid prediction input");
}

#[tokio::test]
async fn upstream_status_is_relayed_with_generic_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&app.ml_server)
        .await;

    let response = app.post_json("/api/predict", &valid_metrics()).await;

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "ML prediction failed"}));
}

#[tokio::test]
async fn unreachable_ml_server_is_internal_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let app = TestApp::spawn_with_ml_url(format!("http://127.0.0.1:{}", port)).await;

    let response = app.post_json("/api/predict", &valid_metrics()).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn assess_classifies_and_orders_factors() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"probability": 0.82, "feature_importance": {"age": 0.1, "bmi": 0.3, "bp_systolic": 0.2}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&app.ml_server)
        .await;

    let response = app.post_json("/api/assess", &valid_metrics()).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["probabilityPercent"], 82);
    assert_eq!(body["tier"], "High");
    assert_eq!(body["label"], "High Risk");
    assert_eq!(body["styleToken"], "danger");

    let factors = body["contributingFactors"].as_array().unwrap();
    let names: Vec<&str> = factors.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["bmi", "bp_systolic", "age"]);
    let top = factors[0]["scaledContribution"].as_f64().unwrap();
    assert!((top - 12.0).abs() < 1e-9);
}

#[tokio::test]
async fn assess_without_importances_has_no_factors() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"probability": 0.12})))
        .mount(&app.ml_server)
        .await;

    let response = app.post_json("/api/assess", &valid_metrics()).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["tier"], "Low");
    assert_eq!(body["probabilityPercent"], 12);
    assert!(body["contributingFactors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn assess_with_unexpected_shape_is_internal_error() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"score": "high"})))
        .mount(&app.ml_server)
        .await;

    let response = app.post_json("/api/assess", &valid_metrics()).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}
