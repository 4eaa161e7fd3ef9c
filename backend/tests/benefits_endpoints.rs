//! End-to-end coverage of the benefits endpoints against a mocked upstream.
//!
//! Each test wires the real gateway, repository and service through
//! `build_http_state`, mounts them with `build_app`, and points the gateway at
//! an `httpmock` server.

use std::net::TcpListener;
use std::time::Duration;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web};
use benefits_backend::inbound::http::error::ErrorBody;
use benefits_backend::inbound::http::health::HealthState;
use benefits_backend::server::{AppDependencies, build_app, build_http_state};
use httpmock::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};
use url::Url;

const TIMEOUT: Duration = Duration::from_millis(250);

fn deps_for(upstream: &str) -> AppDependencies {
    let url = Url::parse(upstream).expect("upstream url");
    let http_state = build_http_state(url, TIMEOUT).expect("http client");
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        cors_origin: "http://localhost:3001".to_owned(),
    }
}

async fn get(upstream: &str, uri: &str) -> ServiceResponse<EitherBody<BoxBody>> {
    let app = test::init_service(build_app(deps_for(upstream))).await;
    test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
}

#[actix_web::test]
async fn list_fills_defaults_for_minimal_records() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios");
            then.status(200)
                .json_body(json!([{ "id": 1, "comercio": "WALMART", "descripcion": "10% off" }]));
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;

    mock.assert_async().await;
    assert_eq!(
        body,
        json!([{
            "id": 1,
            "comercio": "WALMART",
            "descripcion": "10% off",
            "aclaracion": "",
            "tarjeta": false,
            "efectivo": false,
            "vencimiento": "",
            "categoria": "Sin categoría",
            "imagenUrl": ""
        }])
    );
}

#[actix_web::test]
async fn list_keeps_only_valid_records_in_order() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios");
            then.status(200).json_body(json!([
                { "id": 3, "comercio": "Adidas", "descripcion": "2x1" },
                { "id": 4, "descripcion": "no merchant" },
                { "id": 5, "comercio": "Nike", "descripcion": "15%", "tarjeta": "yes" },
                { "id": 6, "comercio": "Puma", "descripcion": "20%", "efectivo": true }
            ]));
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;

    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![3, 6]);
}

#[actix_web::test]
async fn upstream_timeout_surfaces_as_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios/1");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "id": 1, "comercio": "WALMART", "descripcion": "10% off" }));
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios/1").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(body.status_code, 502);
    assert_eq!(body.path, "/api/beneficios/1");
}

#[actix_web::test]
async fn upstream_not_found_surfaces_as_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios/999");
            then.status(404).body("Not Found");
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(body.status_code, 404);
    assert!(body.message.contains("999"), "message: {}", body.message);
}

#[actix_web::test]
async fn non_array_list_payload_is_unprocessable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios");
            then.status(200).json_body(json!({ "invalid": "data" }));
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(body.status_code, 422);
}

#[actix_web::test]
async fn malformed_single_record_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios/7");
            then.status(200).json_body(json!({ "id": 7, "comercio": "  " }));
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios/7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::server_error(500)]
#[case::unavailable(503)]
#[case::forbidden(403)]
#[actix_web::test]
async fn upstream_error_statuses_surface_as_bad_gateway(#[case] status: u16) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/beneficios/1");
            then.status(status).body("upstream trouble");
        })
        .await;

    let response = get(&server.base_url(), "/api/beneficios/1").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(
        body.message,
        format!("Upstream catalogue responded with status {status}")
    );
    assert!(!body.message.contains("upstream trouble"));
}

#[rstest]
#[case::parent("/api/beneficios/..")]
#[case::current("/api/beneficios/.")]
#[actix_web::test]
async fn dot_segment_ids_never_reach_the_upstream(#[case] uri: &str) {
    let server = MockServer::start_async().await;
    let root = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200)
                .json_body(json!({ "id": 42, "comercio": "ROOT", "descripcion": "index" }));
        })
        .await;

    let response = get(&server.base_url(), uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(body.status_code, 404);
    assert_eq!(root.hits_async().await, 0);
}

#[rstest]
#[case::list("/api/beneficios")]
#[case::item("/api/beneficios/1")]
#[actix_web::test]
async fn unreachable_upstream_surfaces_as_bad_gateway(#[case] uri: &str) {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };

    let response = get(&format!("http://127.0.0.1:{port}"), uri).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
