//! The one outbound HTTP client shared by the remote client and the login chain.

use anyhow::{Context, Result};
use reqwest::{redirect, Client, Proxy};

/// Browser user agent sent to the remote application.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0";

/// Redirects are never followed: the login chain reads every `Location` itself.
pub fn build_http_client() -> Result<Client> {
    let builder = Client::builder()
        .use_rustls_tls()
        .redirect(redirect::Policy::none())
        .user_agent(USER_AGENT)
        .tcp_nodelay(true);

    let builder = match https_proxy(|key| std::env::var(key).ok()) {
        Some(url) => {
            let proxy = Proxy::all(&url).with_context(|| "invalid outbound proxy URL")?;
            tracing::info!("HTTP client: outbound proxy {}", redact_proxy_url(&url));
            builder.proxy(proxy)
        },
        None => builder.no_proxy(),
    };

    builder.build().context("HTTP client builder failed")
}

/// `https_proxy`, then `HTTPS_PROXY`. Empty values count as unset.
fn https_proxy(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["https_proxy", "HTTPS_PROXY"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
}

fn redact_proxy_url(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| {
            let host = u.host_str().unwrap_or("?");
            let port = u.port_or_known_default().unwrap_or(0);
            if u.username().is_empty() && u.password().is_none() {
                format!("{}://{}:{}", u.scheme(), host, port)
            } else {
                format!("{}://***@{}:{}", u.scheme(), host, port)
            }
        })
        .unwrap_or_else(|_| "<invalid-url>".to_string())
}
