//! Integration tests: function listing, plot submission, wait, status, plot page.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gdelt_api::server::{self, AppState};
use gdelt_functions::builtin_catalog;
use gdelt_params::{CategoryTable, CategoryTables};
use gdelt_render::MockPlotRenderer;
use gdelt_scheduler::{InMemoryJobRegistry, JobRegistry};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

fn tables() -> CategoryTables {
    CategoryTables::from_tables(
        CategoryTable::from_pairs("cameo_country", [("USA", "United States"), ("POL", "Poland")]),
        CategoryTable::from_pairs(
            "fips_country",
            [("US", "United States"), ("PL", "Poland"), ("GM", "Germany")],
        ),
        CategoryTable::from_pairs("cameo_event_base", [("01", "MAKE PUBLIC STATEMENT"), ("14", "PROTEST")]),
    )
}

fn app_with(renderer: MockPlotRenderer) -> axum::Router {
    let catalog = Arc::new(builtin_catalog(&tables(), Arc::new(renderer)));
    let jobs: Arc<dyn JobRegistry<String>> = Arc::new(InMemoryJobRegistry::<String>::new(4));
    server::router(Arc::new(AppState { catalog, jobs }))
}

fn test_app() -> axum::Router {
    app_with(MockPlotRenderer::new())
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &axum::Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn event_count_form() -> Value {
    json!({ "start": "01/01/2013", "end": "01/01/2019" })
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(&test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn lists_functions_and_schemas() {
    let app = test_app();
    let j = get_json(&app, "/functions").await;
    assert_eq!(j["status"], "ok");
    let names: Vec<&str> = j["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 10);
    assert!(names.contains(&"event_count"));
    assert!(names.contains(&"domestic_policy_clustering"));

    let j = get_json(&app, "/functions/event_count").await;
    assert_eq!(j["status"], "ok");
    assert_eq!(j["data"]["label"], "Event Count");
    assert_eq!(j["data"]["parameters"][0]["id"], "start");
    assert_eq!(j["data"]["parameters"][0]["default"], "01/01/2013");
    assert_eq!(j["data"]["parameters"][1]["id"], "end");

    let j = get_json(&app, "/functions/clustering").await;
    let method = &j["data"]["parameters"][2];
    assert_eq!(method["id"], "method");
    assert_eq!(method["default"], "Britch");
    assert_eq!(method["options"], json!(["Agglomerative", "Britch", "KMeans"]));

    let j = get_json(&app, "/functions/nope").await;
    assert_eq!(j["status"], "error");
}

#[tokio::test]
async fn plot_request_wait_status_and_page() {
    let app = test_app();
    let j = post_json(&app, "/plot_request/event_count", event_count_form()).await;
    assert_eq!(j["status"], "ok");
    assert_eq!(j["function"], "event_count");
    let job_id = j["job_id"].as_str().unwrap().to_string();

    let j = post_json(&app, "/wait_for_plot", json!({ "job_id": job_id })).await;
    assert_eq!(j, json!({ "status": "ok" }));

    let j = get_json(&app, &format!("/jobs/{job_id}")).await;
    assert_eq!(j["status"], "ok");
    assert_eq!(j["data"]["job_id"], job_id.as_str());
    assert_eq!(j["data"]["status"], "completed");

    let (status, body) = get(&app, &format!("/plot/event_count/{job_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("<title>Event Count</title>"));
    assert!(page.contains("data-function=\"event_count\""));
    assert!(page.contains("data-chart=\"Line\""));
}

#[tokio::test]
async fn wait_accepts_job_uuid_alias() {
    let app = app_with(MockPlotRenderer::new().with_delay(Duration::from_millis(30)));
    let j = post_json(&app, "/plot_request/event_correlation", json!({ "month": "05/2019" })).await;
    let job_id = j["job_id"].as_str().unwrap().to_string();

    let j = get_json(&app, &format!("/jobs/{job_id}")).await;
    assert_ne!(j["data"]["status"], "completed");

    let j = post_json(&app, "/wait_for_plot", json!({ "job_uuid": job_id })).await;
    assert_eq!(j["status"], "ok");
    let j = get_json(&app, &format!("/jobs/{job_id}")).await;
    assert_eq!(j["data"]["status"], "completed");
}

#[tokio::test]
async fn invalid_parameter_names_the_field() {
    let app = test_app();
    let j = post_json(
        &app,
        "/plot_request/event_count",
        json!({ "start": "13/01/2013", "end": "01/01/2019" }),
    )
    .await;
    assert_eq!(j, json!({ "status": "error", "error": "Wrong month", "id": "start" }));

    let j = post_json(
        &app,
        "/plot_request/event_count",
        json!({ "start": "01/01/2019", "end": "01/01/2013" }),
    )
    .await;
    assert_eq!(j["status"], "error");
    assert_eq!(j["id"], "end");

    let j = post_json(&app, "/plot_request/event_count", json!({ "start": "01/01/2013" })).await;
    assert_eq!(j, json!({ "status": "error", "error": "Missing value", "id": "end" }));
}

#[tokio::test]
async fn unknown_function_is_reported_against_function() {
    let j = post_json(&test_app(), "/plot_request/nope", json!({})).await;
    assert_eq!(j["status"], "error");
    assert_eq!(j["id"], "function");
}

#[tokio::test]
async fn unknown_job_is_an_error_everywhere() {
    let app = test_app();
    let fake = "00000000-0000-4000-8000-000000000000";
    let j = post_json(&app, "/wait_for_plot", json!({ "job_id": fake })).await;
    assert_eq!(j["status"], "error");
    assert!(j["message"].as_str().unwrap().contains(fake));

    let j = get_json(&app, &format!("/jobs/{fake}")).await;
    assert_eq!(j["status"], "error");

    let j = get_json(&app, &format!("/plot/event_count/{fake}")).await;
    assert_eq!(j["status"], "error");
}

#[tokio::test]
async fn failed_plot_surfaces_message() {
    let app = app_with(MockPlotRenderer::new().failing("renderer down"));
    let j = post_json(&app, "/plot_request/event_count", event_count_form()).await;
    assert_eq!(j["status"], "ok");
    let job_id = j["job_id"].as_str().unwrap().to_string();

    let j = post_json(&app, "/wait_for_plot", json!({ "job_id": job_id })).await;
    assert_eq!(j["status"], "error");
    assert!(j["message"].as_str().unwrap().contains("renderer down"));

    let j = get_json(&app, &format!("/jobs/{job_id}")).await;
    assert_eq!(j["data"]["status"], "failed");
    assert!(j["data"]["error"].as_str().unwrap().contains("renderer down"));

    let j = get_json(&app, &format!("/plot/event_count/{job_id}")).await;
    assert_eq!(j["status"], "error");
    assert!(j["message"].as_str().unwrap().contains("renderer down"));
}

#[tokio::test]
async fn many_concurrent_requests_all_finish() {
    let app = app_with(MockPlotRenderer::new().with_delay(Duration::from_millis(10)));
    let mut ids = Vec::new();
    for _ in 0..10 {
        let j = post_json(&app, "/plot_request/event_count", event_count_form()).await;
        ids.push(j["job_id"].as_str().unwrap().to_string());
    }
    for id in &ids {
        let j = post_json(&app, "/wait_for_plot", json!({ "job_id": id })).await;
        assert_eq!(j["status"], "ok");
    }
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 10);
}

#[tokio::test]
async fn bundled_resources_back_every_default() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources");
    let tables = CategoryTables::load(dir).unwrap();
    assert_eq!(tables.cameo_event_base.len(), 20);
    assert_eq!(tables.fips_country.label("PL"), Some("Poland"));

    let catalog = Arc::new(builtin_catalog(&tables, Arc::new(MockPlotRenderer::new())));
    let jobs: Arc<dyn JobRegistry<String>> = Arc::new(InMemoryJobRegistry::<String>::new(4));
    let app = server::router(Arc::new(AppState {
        catalog: Arc::clone(&catalog),
        jobs,
    }));
    for summary in catalog.describe() {
        let schema = get_json(&app, &format!("/functions/{}", summary.name)).await;
        let form: serde_json::Map<String, Value> = schema["data"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| (p["id"].as_str().unwrap().to_string(), p["default"].clone()))
            .collect();
        let j = post_json(&app, &format!("/plot_request/{}", summary.name), Value::Object(form)).await;
        assert_eq!(j["status"], "ok", "{}: {j}", summary.name);
        let j = post_json(&app, "/wait_for_plot", json!({ "job_id": j["job_id"] })).await;
        assert_eq!(j["status"], "ok");
    }
}

async fn post_raw(app: &axum::Router, uri: &str, body: &str) -> Value {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK, "{uri} {body}");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn malformed_wait_body_gets_error_status() {
    let app = test_app();
    for body in ["{}", r#"{"job_id": 5}"#, "not json"] {
        let j = post_raw(&app, "/wait_for_plot", body).await;
        assert_eq!(j["status"], "error", "{body}");
        assert!(!j["message"].as_str().unwrap().is_empty(), "{body}");
    }
}

#[tokio::test]
async fn malformed_plot_request_body_is_reported_against_body() {
    let app = test_app();
    for body in ["not json", "[1,2]", r#""text""#] {
        let j = post_raw(&app, "/plot_request/event_count", body).await;
        assert_eq!(j["status"], "error", "{body}");
        assert_eq!(j["id"], "body", "{body}");
        assert!(!j["error"].as_str().unwrap().is_empty(), "{body}");
    }
}
