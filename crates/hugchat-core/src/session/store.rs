//! File-backed cache of session cookies keyed by identity.

use hugchat_types::SessionCookie;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::GatewayResult;

/// Key under which raw-token sessions are stored.
pub const TOKEN_IDENTITY_KEY: &str = "<token>";

type CookieMap = BTreeMap<String, Vec<SessionCookie>>;

/// Identity key → cookie list, mirrored to one JSON file.
///
/// The whole map is rewritten on every `set` while the write lock is held, so
/// readers never observe a map that differs from the file.
pub struct SessionStore {
    path: PathBuf,
    entries: RwLock<CookieMap>,
}

impl SessionStore {
    /// Load the store from `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> GatewayResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => CookieMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[SessionStore] No session file at {}, starting empty", path.display());
                CookieMap::new()
            },
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "[SessionStore] Loaded {} session(s) from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries: RwLock::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cookies stored for `key`, or an empty list.
    pub fn get(&self, key: &str) -> Vec<SessionCookie> {
        self.entries.read().get(key).cloned().unwrap_or_default()
    }

    /// Replace the cookies for `key` and rewrite the backing file.
    ///
    /// The new map only replaces the in-memory one after the file is written.
    pub fn set(&self, key: &str, cookies: Vec<SessionCookie>) -> GatewayResult<()> {
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), cookies);
        write_file(&self.path, &updated)?;
        *entries = updated;
        tracing::debug!("[SessionStore] Stored session for '{}'", key);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Write to `<file>.tmp`, then rename over the real file.
fn write_file(path: &Path, entries: &CookieMap) -> GatewayResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(entries)?;
    let temp_path = temp_path(path);
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    PathBuf::from(temp)
}
