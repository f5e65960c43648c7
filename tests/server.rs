// ABOUTME: Tests for the HTTP API router.
// ABOUTME: Sends requests through the router with a fake component factory.

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dockhand::build::BuildError;
use dockhand::config::CleanupPolicy;
use dockhand::deploy::ComponentFactory;
use dockhand::dns::RegistrationError;
use dockhand::provision::{ContainerInstance, ProvisionError, ProvisionStage};
use dockhand::runtime::{ImageError, PullProgress};
use dockhand::server::{AppState, build_router};
use dockhand::types::ContainerId;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use support::fakes::{FakeFactory, MockSet};
use tower::ServiceExt;

fn state(factory: FakeFactory) -> AppState {
    let factory: Arc<dyn ComponentFactory> = Arc::new(factory);
    AppState::new(factory)
}

fn factory() -> FakeFactory {
    FakeFactory::new(support::settings(CleanupPolicy::Keep))
}

async fn send(state: AppState, method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    support::init_tracing();
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// Mocks that succeed, expecting the given container port and environment.
fn succeeding(port: u16, env: &'static [&'static str]) -> MockSet {
    let mut m = MockSet::new();
    m.resolver.expect_resolve().returning(|_| Ok(support::commit()));
    m.builder
        .expect_build()
        .returning(|_, _, _| Ok(support::artifact()));
    m.provisioner
        .expect_provision()
        .withf(move |_, _, exposed, given| {
            *exposed == port && given.iter().map(|e| e.as_str()).eq(env.iter().copied())
        })
        .returning(|_, _, _, _| Ok(ContainerInstance::created(ContainerId::new("c1"), 54321)));
    m.registrar
        .expect_register()
        .returning(|name| Ok(support::dns_record(name)));
    m.proxy.expect_configure().returning(|_, _, _, _| Ok(()));
    m
}

#[tokio::test]
async fn health_acknowledges() {
    let (status, _, body) = send(state(factory()), "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({ "message": "Accepted", "status": "success" })
    );
}

#[tokio::test]
async fn deploy_returns_the_result() {
    let app = state(factory().with_components(succeeding(3000, &["A=1", "B=two"]).into_components()));
    let (status, _, body) = send(
        app,
        "POST",
        "/api/github/deploy/acme/widget?port=3000&env_vars=A%3D1%2CB%3Dtwo",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["port"], "54321");
    assert_eq!(body["container"]["id"], "c1");
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("acme-widget-"));
    assert!(body["url"].as_str().unwrap().ends_with(".apps.example.test"));
}

#[tokio::test]
async fn deploy_defaults_port_and_env() {
    let m = succeeding(8080, &["DOCKER=1"]);
    let app = state(factory().with_components(m.into_components()));
    let (status, _, _) = send(app, "POST", "/api/github/deploy/acme/widget").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_env_is_a_bad_request() {
    let (status, _, body) = send(
        state(factory()),
        "POST",
        "/api/github/deploy/acme/widget?env_vars=NOEQUALS",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].as_str().unwrap().contains("NOEQUALS"));
}

#[tokio::test]
async fn invalid_repository_is_a_bad_request() {
    let (status, _, _) = send(state(factory()), "POST", "/api/github/deploy/acme/wid%24get").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repository_without_letters_or_digits_is_a_bad_request() {
    let mut m = MockSet::new();
    m.resolver.expect_resolve().never();
    let app = state(factory().with_components(m.into_components()));
    let (status, _, body) = send(app, "POST", "/api/github/deploy/_/-").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].as_str().unwrap().contains("letters or digits"));
}

#[tokio::test]
async fn missing_components_are_unavailable() {
    let (status, _, _) = send(state(factory()), "POST", "/api/github/deploy/acme/widget").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn build_failure_is_a_bad_gateway_with_log_tail() {
    let mut m = MockSet::new();
    m.resolver.expect_resolve().returning(|_| Ok(support::commit()));
    m.builder.expect_build().returning(|_, _, _| {
        Err(BuildError::Engine {
            source: ImageError::BuildFailed("exit code 2".to_string()),
            log_tail: "Step 4/6 : RUN make\nmake: *** [all] Error 2".to_string(),
        })
    });
    m.provisioner.expect_provision().never();

    let app = state(factory().with_components(m.into_components()));
    let (status, headers, body) = send(app, "POST", "/api/github/deploy/acme/widget").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers["x-deploy-phase"], "building");
    assert!(headers["x-deploy-name"].to_str().unwrap().starts_with("acme-widget-"));
    let body = json_body(&body);
    assert_eq!(body["phase"], "building");
    assert_eq!(body["kind"], "BuildError");
    assert!(body["log_tail"].as_str().unwrap().ends_with("Error 2"));
}

#[tokio::test]
async fn late_failure_returns_the_upstream_body() {
    let upstream = json!({
        "success": false,
        "errors": [{ "code": 81057, "message": "Record already exists." }]
    });
    let mut m = MockSet::new();
    m.resolver.expect_resolve().returning(|_| Ok(support::commit()));
    m.builder
        .expect_build()
        .returning(|_, _, _| Ok(support::artifact()));
    m.provisioner
        .expect_provision()
        .returning(|_, _, _, _| Ok(ContainerInstance::created(ContainerId::new("c1"), 54321)));
    let body = upstream.clone();
    m.registrar.expect_register().returning(move |_| {
        Err(RegistrationError::Rejected {
            message: "Record already exists. (81057)".to_string(),
            body: body.clone(),
        })
    });

    let app = state(factory().with_components(m.into_components()));
    let (status, headers, body) = send(app, "POST", "/api/github/deploy/acme/widget").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers["x-deploy-phase"], "registering");
    assert_eq!(json_body(&body), upstream);
}

#[tokio::test]
async fn create_response_without_id_is_returned_verbatim() {
    let created = json!({ "Warnings": ["image platform does not match host"] });
    let mut m = MockSet::new();
    m.resolver.expect_resolve().returning(|_| Ok(support::commit()));
    m.builder
        .expect_build()
        .returning(|_, _, _| Ok(support::artifact()));
    let raw = created.clone();
    m.provisioner.expect_provision().returning(move |_, _, _, _| {
        Err(ProvisionError::new(ProvisionStage::Create, "create response has no container Id")
            .with_raw(raw.clone()))
    });
    m.provisioner.expect_remove().never();
    m.registrar.expect_register().never();
    m.proxy.expect_configure().never();

    let app = state(factory().with_components(m.into_components()));
    let (status, headers, body) = send(app, "POST", "/api/github/deploy/acme/widget").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers["x-deploy-phase"], "provisioning");
    assert_eq!(json_body(&body), created);
}

#[tokio::test]
async fn pull_streams_progress_then_complete() {
    let events = vec![
        Ok(PullProgress {
            id: Some("a1b2".to_string()),
            status: "Downloading".to_string(),
            progress: Some("[==>   ] 1MB/4MB".to_string()),
        }),
        Ok(PullProgress {
            id: None,
            status: "Status: Downloaded newer image for alpine:3.20".to_string(),
            progress: None,
        }),
    ];
    let app = state(factory().with_pulls(events));
    let (status, headers, body) = send(app, "GET", "/api/docker/pull?image=alpine:3.20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "text/event-stream");
    assert_eq!(body.matches("event: progress").count(), 2);
    assert!(body.contains("Downloading"));
    assert!(body.contains("event: complete\ndata: alpine:3.20"));
    assert!(!body.contains("event: error"));
}

#[tokio::test]
async fn pull_failure_ends_with_an_error_event() {
    let events = vec![Err(ImageError::PullFailed(
        "manifest unknown".to_string(),
    ))];
    let app = state(factory().with_pulls(events));
    let (_, _, body) = send(app, "GET", "/api/docker/pull?image=nope:latest").await;

    assert!(body.contains("event: error"));
    assert!(body.contains("manifest unknown"));
    assert!(!body.contains("event: complete"));
}

#[tokio::test]
async fn pull_requires_an_image() {
    let (status, _, _) = send(state(factory()), "GET", "/api/docker/pull?image=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
