//! Full request path: axum router → ChatSession → RemoteClient → wiremock.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use hugchat_core::session::SessionStore;
use hugchat_core::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"{"type":"data","nodes":[{"type":"data","data":[
    {"models":1,"conversations":7},
    [2],
    {"id":3,"name":4,"description":5,"parameters":-1,"unlisted":6},
    "m1",
    "Model One",
    "A test model",
    false,
    [8],
    {"id":9,"title":10,"model":3,"updatedAt":-1},
    "c1",
    "Greeting"
],"uses":{}}]}
{"type":"chunk","id":1,"data":[[]]}
"#;

const DETAIL: &str = r#"{"type":"data","nodes":[{"type":"data","data":[]},{"type":"data","data":[
    {"messages":1,"title":5,"model":6,"preprompt":7},
    [2],
    {"id":3,"from":4,"content":7,"children":8,"createdAt":-1,"updatedAt":-1},
    "msg-1",
    "system",
    "Greeting",
    "m1",
    "",
    []
]}]}"#;

const FEED: &str = concat!(
    r#"{"type":"status","status":"started"}"#,
    "\n",
    r#"{"type":"stream","token":"hel"}"#,
    "\n",
    r#"{"type":"stream","token":"lo\u0000\u0000"}"#,
    "\n",
    r#"{"type":"finalAnswer","text":"hello"}"#,
    "\n",
);

/// `username=alice&password=pw`
const ALICE: &str = "dXNlcm5hbWU9YWxpY2UmcGFzc3dvcmQ9cHc=";

async fn mount_remote(server: &MockServer, session_cookie: &str) {
    Mock::given(method("GET"))
        .and(path("/chat/"))
        .and(header_is("cookie", session_cookie))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>welcome</html>"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/models/__data.json"))
        .and(query_param("x-sveltekit-invalidated", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/conversation/c1/__data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/conversation/c1"))
        .and(body_string_contains("msg-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_login_chain(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(302).append_header("set-cookie", "token=hub; Path=/"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/login"))
        .respond_with(
            ResponseTemplate::new(303).append_header("location", "/oauth/authorize?state=s"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(
            ResponseTemplate::new(303).append_header("location", "/chat/login/callback?code=c"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/login/callback"))
        .respond_with(
            ResponseTemplate::new(302).append_header("set-cookie", "hf-chat=fresh; Path=/chat"),
        )
        .mount(server)
        .await;
}

fn gateway(remote: &MockServer, session_file: &std::path::Path) -> TestServer {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .expect("client");
    let store = Arc::new(SessionStore::load(session_file).expect("store"));
    let state = AppState::new(client, &remote.uri(), store);
    TestServer::new(build_router(state)).expect("test server")
}

fn bearer(credential: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {credential}")).expect("header value")
}

#[tokio::test]
async fn test_buffered_completion_with_raw_token() {
    let remote = MockServer::start().await;
    mount_remote(&remote, "hf-chat=hf-token-1").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let server = gateway(&remote, &dir.path().join("cookies.json"));

    let response = server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer("hf-token-1"))
        .json(&json!({
            "model": "m1",
            "messages": [{ "role": "user", "content": "hi" }],
            "stream": false
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["model"], "m1");
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(body["choices"][0]["message"]["content"], "hello");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert_eq!(body["usage"]["completion_tokens"], 2);

    // Raw tokens are never written to the session file.
    assert!(!dir.path().join("cookies.json").exists());
}

#[tokio::test]
async fn test_streaming_completion_logs_in_account() {
    let remote = MockServer::start().await;
    mount_login_chain(&remote).await;
    mount_remote(&remote, "token=hub; hf-chat=fresh").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let session_file = dir.path().join("config").join("cookies.json");
    let server = gateway(&remote, &session_file);

    let response = server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer(ALICE))
        .json(&json!({
            "model": "m1",
            "messages": [{ "role": "user", "content": "hi" }],
            "stream": true
        }))
        .await;
    response.assert_status_ok();

    let text = response.text();
    let frames: Vec<&str> = text.split("\n\n").filter(|f| !f.is_empty()).collect();
    assert_eq!(frames.len(), 4);
    assert!(frames.iter().all(|f| f.starts_with("data: ")));

    let second: Value =
        serde_json::from_str(frames[1].trim_start_matches("data: ")).expect("chunk json");
    assert_eq!(second["object"], "chat.completion.chunk");
    assert_eq!(second["model"], "m1");
    assert_eq!(second["choices"][0]["delta"]["content"], "lo");
    assert_eq!(frames[3], "data: [DONE]");

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&session_file).expect("session file"))
            .expect("session json");
    let names: Vec<&str> =
        saved["alice"].as_array().expect("alice").iter().filter_map(|c| c["Name"].as_str()).collect();
    assert_eq!(names, vec!["token", "hf-chat"]);
}

#[tokio::test]
async fn test_rejected_token_surfaces_401() {
    let remote = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<form action="/chat/login" method="POST"></form>"#),
        )
        .mount(&remote)
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let server = gateway(&remote, &dir.path().join("cookies.json"));

    let response = server
        .get("/v1/models")
        .add_header(header::AUTHORIZATION, bearer("expired-token"))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "authentication_error");
}
