use docvault_client::transfer::{HttpTransfer, Transfer, TransferError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENVELOPE: &str = r#"{"iv":"AQIDBAUGBwgJCgsM","data":"q6urq6urq6urq6urq6ur"}"#;

fn setup(server: &MockServer) -> HttpTransfer {
    HttpTransfer::new(&server.uri()).unwrap()
}

// --- submit ---

#[tokio::test]
async fn submit_posts_name_and_envelope_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "plan", "content": ENVELOPE})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Document saved successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    setup(&server).submit("plan", ENVELOPE).await.unwrap();
}

#[tokio::test]
async fn submit_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            json!({"code": "conflict", "message": "Document already exists"}),
        ))
        .mount(&server)
        .await;

    let err = setup(&server).submit("plan", ENVELOPE).await.unwrap_err();
    assert!(matches!(err, TransferError::Conflict));
}

#[tokio::test]
async fn submit_validation_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"code": "validation_error", "message": "Missing name or content"}),
        ))
        .mount(&server)
        .await;

    match setup(&server).submit("", ENVELOPE).await.unwrap_err() {
        TransferError::Validation(msg) => assert_eq!(msg, "Missing name or content"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_unexpected_status_keeps_plain_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    match setup(&server).submit("plan", ENVELOPE).await.unwrap_err() {
        TransferError::Unexpected { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("expected unexpected-status error, got {other:?}"),
    }
}

// --- retrieve ---

#[tokio::test]
async fn retrieve_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load/plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": ENVELOPE})))
        .expect(1)
        .mount(&server)
        .await;

    let content = setup(&server).retrieve("plan").await.unwrap();
    assert_eq!(content, ENVELOPE);
}

#[tokio::test]
async fn retrieve_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({"code": "not_found", "message": "Document not found"}),
        ))
        .mount(&server)
        .await;

    let err = setup(&server).retrieve("gone").await.unwrap_err();
    assert!(matches!(err, TransferError::NotFound));
}

#[tokio::test]
async fn retrieve_percent_encodes_the_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load/q3%20plan%2Fdraft"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let content = setup(&server).retrieve("q3 plan/draft").await.unwrap();
    assert_eq!(content, "x");
}

#[tokio::test]
async fn retrieve_malformed_body_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load/plan"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = setup(&server).retrieve("plan").await.unwrap_err();
    assert!(matches!(err, TransferError::Http(_)));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vault/load/plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let transfer = HttpTransfer::new(&format!("{}/vault", server.uri())).unwrap();
    assert_eq!(transfer.retrieve("plan").await.unwrap(), "x");
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transfer = HttpTransfer::new(&format!("http://{addr}")).unwrap();
    let err = transfer.retrieve("plan").await.unwrap_err();
    assert!(matches!(err, TransferError::Http(_)));
}
