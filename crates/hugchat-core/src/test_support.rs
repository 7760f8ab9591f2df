//! Shared fixtures for unit tests.

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A client configured like the production one: no redirects, no proxy.
pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .expect("client")
}

/// Mount the four login steps for user `alice`. The callback answers with
/// `callback_status` and sets `hf-chat=session`.
pub(crate) async fn mount_login_chain(server: &MockServer, callback_status: u16) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=alice"))
        .respond_with(
            ResponseTemplate::new(302)
                .append_header("set-cookie", "token=hub1; Path=/")
                .append_header("set-cookie", "aws=a; Path=/"),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/login"))
        .and(header("cookie", "token=hub1; aws=a"))
        .respond_with(
            ResponseTemplate::new(303)
                .append_header("location", "/oauth/authorize?state=s")
                .append_header("set-cookie", "hf-chat=pending; Path=/chat"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(
            ResponseTemplate::new(303)
                .append_header("location", format!("{}/chat/login/callback?code=c", server.uri())),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chat/login/callback"))
        .respond_with(
            ResponseTemplate::new(callback_status)
                .append_header("set-cookie", "hf-chat=session; Path=/chat; HttpOnly; Secure"),
        )
        .mount(server)
        .await;
}
