//! HTTP contract: status codes and bodies of `/`, `/predict` and `/health`.

use appsec_risk_service::{api, config::ServiceConfig, features::UnknownPolicy, service::RiskService};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn valid_request() -> Value {
    json!({
        "tipo_aplicacao": "Web",
        "exposicao_publica": "Sim",
        "dados_sensiveis": "Sim",
        "historico_incidentes": "Não",
        "sast_alto_risco": "Não",
        "dast_alto_risco": "Sim",
        "aplicacao_mfa": "Sim"
    })
}

fn ready_app(policy: UnknownPolicy) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServiceConfig::default();
    config.model.artifact_path = dir.path().join("risk_model.json");
    config.model.training_data_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/training_data.csv");
    config.encoder.unknown_values = policy;
    let service = RiskService::new(config);
    service.initialize().unwrap();
    (api::app(Arc::new(service)), dir)
}

fn cold_app() -> Router {
    api::app(Arc::new(RiskService::new(ServiceConfig::default())))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_predict(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let (status, body) = send(cold_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "AI Risk Analysis Service is running!"}));
}

#[tokio::test]
async fn predict_valid_request() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let (status, body) = send(app, post_predict(&valid_request())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["aprovado_appsec"].is_boolean());
    let band = body["risco"].as_str().unwrap();
    assert!(["baixo", "medio", "alto"].contains(&band));
}

#[tokio::test]
async fn predict_is_idempotent() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let (_, first) = send(app.clone(), post_predict(&valid_request())).await;
    for _ in 0..5 {
        let (_, again) = send(app.clone(), post_predict(&valid_request())).await;
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn incomplete_request_is_a_validation_error() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let (status, body) = send(app, post_predict(&json!({"tipo_aplicacao": "Desktop"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("exposicao_publica"));
}

#[tokio::test]
async fn truncated_body_is_a_validation_error() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"tipo_aplicacao": "Web","#))
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn missing_content_type_is_a_validation_error() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(valid_request().to_string()))
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn wrong_field_type_is_a_validation_error() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let mut req = valid_request();
    req["exposicao_publica"] = json!(1);
    let (status, _) = send(app, post_predict(&req)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_before_model_is_ready() {
    let (status, body) = send(cold_app(), post_predict(&valid_request())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().contains("not been trained"));
}

#[tokio::test]
async fn unknown_category_degrades_by_default() {
    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let mut req = valid_request();
    req["tipo_aplicacao"] = json!("Desktop");
    let (status, _) = send(app, post_predict(&req)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_category_rejected_when_strict() {
    let (app, _dir) = ready_app(UnknownPolicy::Reject);
    let mut req = valid_request();
    req["aplicacao_mfa"] = json!("Talvez");
    let (status, body) = send(app, post_predict(&req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("aplicacao_mfa"));
}

#[tokio::test]
async fn health_follows_model_phase() {
    let (status, body) = send(cold_app(), get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "uninitialized");

    let (app, _dir) = ready_app(UnknownPolicy::Degrade);
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert!(body["model"]["dataset_sha256"].is_string());
}
