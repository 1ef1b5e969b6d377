use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sms_core::{Channel, ChannelType, InMemoryBackend, InMemoryChannelStore, MsgId, MsgStatusValue};
use sms_gateway::build_state;
use sms_gateway::config::GatewayConfig;
use sms_gateway::http::build_router;
use tower::ServiceExt;
use uuid::Uuid;

const CHANNEL_UUID: &str = "8eb23e93-5ecb-45ba-b726-3b064e0c56ab";

fn app() -> (Router, InMemoryBackend) {
    let backend = InMemoryBackend::new();
    let channel = Channel::new(ChannelType::new("IB"), "2020")
        .with_uuid(Uuid::parse_str(CHANNEL_UUID).unwrap())
        .with_country("NG");
    let other = Channel::new(ChannelType::new("EX"), "3030")
        .with_uuid(Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap());
    let channels = InMemoryChannelStore::from_channels([channel, other]);

    let state = build_state(
        &GatewayConfig::default(),
        Arc::new(backend.clone()),
        Arc::new(channels),
    )
    .unwrap();
    (build_router(state), backend)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn receive_accepts_and_stores_messages() {
    let (app, backend) = app();
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/receive"),
            json!({
                "results": [{
                    "messageId": "817790313235066447",
                    "from": "2349067554729",
                    "text": "QUIZ Correct answer is Paris",
                    "receivedAt": "2016-10-06T09:28:39.220+0000"
                }],
                "messageCount": 1,
                "pendingMessageCount": 0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body = read_json(res).await;
    assert_eq!(body["message"], "Message Accepted");
    assert_eq!(body["data"][0]["type"], "msg");
    assert_eq!(body["data"][0]["urn"], "tel:+2349067554729");
    assert_eq!(body["data"][0]["external_id"], "817790313235066447");
    assert_eq!(body["data"][0]["received_on"], "2016-10-06T09:28:39.22Z");

    let msgs = backend.msgs().await;
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].text, "QUIZ Correct answer is Paris");
}

#[tokio::test]
async fn receive_without_messages_is_ignored() {
    let (app, backend) = app();
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/receive"),
            json!({"results": [], "messageCount": 0, "pendingMessageCount": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        read_json(res).await,
        json!({
            "message": "Ignored",
            "data": [{"type": "info", "info": "ignoring request, no message"}]
        })
    );
    assert!(backend.msgs().await.is_empty());
}

#[tokio::test]
async fn receive_with_bad_date_is_rejected() {
    let (app, backend) = app();
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/receive"),
            json!({
                "messageCount": 1,
                "results": [{"from": "2020", "text": "hi", "receivedAt": "yesterday"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["message"], "Error");
    assert_eq!(body["data"][0]["type"], "error");
    assert!(backend.msgs().await.is_empty());
}

#[tokio::test]
async fn delivered_updates_status() {
    let (app, backend) = app();
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/delivered"),
            json!({"results": [{"messageId": 12345, "status": {"groupId": 3, "groupName": "DELIVERED"}}]}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        read_json(res).await,
        json!({
            "message": "Status Update Accepted",
            "data": [{"type": "status", "channel_uuid": CHANNEL_UUID, "msg_id": 12345, "status": "D"}]
        })
    );

    let statuses = backend.statuses().await;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].msg_id, MsgId::new(12345));
    assert_eq!(statuses[0].status, MsgStatusValue::Delivered);
}

#[tokio::test]
async fn delivered_with_unknown_group_is_rejected() {
    let (app, _) = app();
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/delivered"),
            json!({"results": [{"messageId": 12345, "status": {"groupName": "FOO"}}]}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(
        body["data"][0]["error"],
        "unknown status 'FOO', must be one of PENDING, DELIVERED, EXPIRED, REJECTED or UNDELIVERABLE"
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, _) = app();
    let req = Request::builder()
        .method("POST")
        .uri(format!("/c/ib/{CHANNEL_UUID}/receive"))
        .body(Body::from("{\"results\": ["))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_targets_are_not_found() {
    let cases = [
        format!("/c/ib/{CHANNEL_UUID}/stopped"),
        "/c/ib/not-a-uuid/receive".to_string(),
        "/c/ib/7d1f3b2e-0000-4000-8000-000000000000/receive".to_string(),
        "/c/ex/00000000-0000-4000-8000-000000000001/receive".to_string(),
        "/c/ib/00000000-0000-4000-8000-000000000001/receive".to_string(),
    ];
    for uri in cases {
        let (app, _) = app();
        let res = app.oneshot(post(&uri, json!({}))).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn backend_outage_is_server_error() {
    let (app, backend) = app();
    backend.set_unavailable(true);
    let res = app
        .oneshot(post(
            &format!("/c/ib/{CHANNEL_UUID}/receive"),
            json!({"messageCount": 1, "results": [{"from": "2020", "text": "hi"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn healthz_and_request_id_echo() {
    let (app, _) = app();
    let res = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("x-request-id", "probe-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["x-request-id"], "probe-1");
}
