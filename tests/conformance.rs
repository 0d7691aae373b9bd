//! Inbound scenarios every gateway build must pass unchanged.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use command_gateway::{Gateway, GatewayConfig};

mod common;

const HTTP_GREETING: &str = "Hello, SpinHttp!";
const MESSAGE_GREETING: &[u8] = b"Hello, SpinRedis!";

#[tokio::test]
async fn test_inbound_http_fixed_reply() {
    let router = common::router(GatewayConfig::default());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/foo")
        .header("foo", "bar")
        .body(Body::from(HTTP_GREETING))
        .unwrap();
    let (status, headers, body) = common::call(&router, request).await;

    assert_eq!(status, StatusCode::OK, "body: {body:?}");
    assert_eq!(headers.get_all("lorem").iter().count(), 1);
    assert_eq!(headers.get("lorem").unwrap(), "ipsum");
    assert_eq!(body, "dolor sit amet");
}

#[test]
fn test_inbound_message_is_accepted() {
    let handler = Gateway::new(GatewayConfig::default()).message_handler();
    assert!(handler.on_message(MESSAGE_GREETING).is_ok());
}

#[tokio::test]
async fn test_inbound_message_over_socket() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let mut line = MESSAGE_GREETING.to_vec();
    line.push(b'\n');
    let out = common::send_messages(gateway.message_addr, &line).await;
    assert_eq!(out, "+OK\n");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_strict_config_lookup_propagates() {
    let mut config = GatewayConfig::default();
    config.settings.strict = true;
    let router = common::router(config);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(r#"["config","absent"]"#))
        .unwrap();
    let (status, _, body) = common::call(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("invalid key: absent"), "{body}");
}
