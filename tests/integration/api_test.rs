// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{closed_port_url, scan_use_case, test_settings, FakeIntelligence, MockSite};
use agentready::presentation::routes;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn test_server() -> TestServer {
    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());
    TestServer::new(routes::routes(use_case)).unwrap()
}

/// 健康检查测试
///
/// 验证健康检查端点是否正常工作
#[tokio::test]
async fn test_health_check_works() {
    let server = test_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

/// 路由可以直接作为 tower 服务调用
#[tokio::test]
async fn test_router_serves_health_via_oneshot() {
    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());
    let app = routes::routes(use_case);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server();

    let response = server.get("/v1/version").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

/// 测试成功扫描
///
/// 验证 /v1/scan 同步返回完整报告，制品检查使用固定的 8 个键
#[tokio::test]
async fn test_scan_returns_report() {
    let target = MockSite::start().await;
    target.homepage(&["Organization"]).await;
    target.llms_txt().await;

    let server = test_server();
    let response = server
        .post("/v1/scan")
        .json(&json!({ "url": target.url() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], format!("{}/", target.url()));
    assert!(body["scanId"].is_string());
    assert_eq!(body["score"], 5 + 3 + 15 + 7);

    let checks = body["artifactChecks"].as_object().unwrap();
    assert_eq!(checks.len(), 8);
    assert_eq!(checks["llmsTxt"]["status"], "found");
    assert_eq!(checks["openApi"]["status"], "not_found");
    assert_eq!(body["benchmarks"]["industry"], "ecommerce");
    assert_eq!(body["companyProfile"]["companyName"], "Acme Widgets");
    assert!(body.get("analysisErrors").is_none());
}

#[tokio::test]
async fn test_empty_url_is_bad_request() {
    let server = test_server();

    let response = server.post("/v1/scan").json(&json!({ "url": "" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unsupported_scheme_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/v1/scan")
        .json(&json!({ "url": "ftp://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_unreachable_target_is_bad_gateway() {
    let server = test_server();

    let response = server
        .post("/v1/scan")
        .json(&json!({ "url": closed_port_url(1) }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("127.0.0.1:1"));
}
