//! Session cookies as persisted in the session file.

use serde::{Deserialize, Serialize};

/// Name of the cookie that carries an authenticated chat session.
pub const SESSION_COOKIE_NAME: &str = "hf-chat";

/// One HTTP cookie belonging to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: false,
            http_only: false,
        }
    }

    /// Wrap a raw session token as the single cookie of a session.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(SESSION_COOKIE_NAME, token)
    }
}

/// Merge `incoming` into `jar`: a cookie whose name already exists replaces
/// the earlier value in place, new names are appended.
pub fn merge_cookies(jar: &mut Vec<SessionCookie>, incoming: impl IntoIterator<Item = SessionCookie>) {
    for cookie in incoming {
        match jar.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => jar.push(cookie),
        }
    }
}

/// Render a `Cookie` request header value (`a=1; b=2`).
pub fn cookie_header(cookies: &[SessionCookie]) -> String {
    cookies.iter().map(|c| format!("{}={}", c.name, c.value)).collect::<Vec<_>>().join("; ")
}

/// Whether the set carries an authenticated chat session cookie.
pub fn has_session_cookie(cookies: &[SessionCookie]) -> bool {
    cookies.iter().any(|c| c.name == SESSION_COOKIE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_by_name() {
        let mut jar = vec![SessionCookie::new("a", "1"), SessionCookie::new("b", "2")];
        merge_cookies(&mut jar, vec![SessionCookie::new("a", "3"), SessionCookie::new("c", "4")]);

        let names: Vec<_> = jar.iter().map(|c| (c.name.as_str(), c.value.as_str())).collect();
        assert_eq!(names, vec![("a", "3"), ("b", "2"), ("c", "4")]);
    }

    #[test]
    fn test_cookie_header() {
        let jar = vec![SessionCookie::new("a", "1"), SessionCookie::from_token("tok")];
        assert_eq!(cookie_header(&jar), "a=1; hf-chat=tok");
        assert!(has_session_cookie(&jar));
    }

    #[test]
    fn test_reads_existing_session_file_entries() {
        let raw = r#"{"Name":"hf-chat","Value":"abc","Path":"/","Domain":"huggingface.co",
            "Expires":"0001-01-01T00:00:00Z","Secure":true,"HttpOnly":true,"SameSite":0}"#;
        let cookie: SessionCookie = serde_json::from_str(raw).expect("parses");
        assert_eq!(cookie.name, "hf-chat");
        assert_eq!(cookie.path.as_deref(), Some("/"));
        assert!(cookie.secure && cookie.http_only);
    }
}
