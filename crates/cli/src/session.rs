//! Session persistence between CLI invocations.
//!
//! The API identifies the caller by a session cookie. Each `makerlog`
//! process starts a fresh [`Jar`], so the cookie header for the API base
//! URL is saved to a small JSON file after every command and loaded back
//! into the jar before the next one. The access layer itself never sees
//! this file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the session file location.
pub const SESSION_FILE_ENV: &str = "MAKERLOG_SESSION_FILE";

/// On-disk shape of a saved session.
#[derive(Debug, Serialize, Deserialize)]
struct SavedSession {
    base_url: String,
    cookie: String,
}

/// File-backed store for the session cookie of one API server.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `MAKERLOG_SESSION_FILE`, else `<config dir>/makerlog/session`.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Some(path) = std::env::var_os(SESSION_FILE_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().context("Could not determine the user config directory")?;
        Ok(Self::new(dir.join("makerlog").join("session")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a cookie jar holding the saved session for `base_url`.
    ///
    /// A missing file, or one saved for a different server, yields an
    /// empty jar.
    pub fn load(&self, base_url: &Url) -> anyhow::Result<Arc<Jar>> {
        let jar = Arc::new(Jar::default());

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(jar),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session file {}", self.path.display())
                })
            }
        };

        let saved: SavedSession = match serde_json::from_str(&raw) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                return Ok(jar);
            }
        };

        if saved.base_url != base_url.as_str() {
            tracing::debug!(
                saved = %saved.base_url,
                current = %base_url,
                "Saved session belongs to another server",
            );
            return Ok(jar);
        }

        for pair in saved.cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            jar.add_cookie_str(&format!("{pair}; Path=/"), base_url);
        }
        tracing::debug!(path = %self.path.display(), "Session restored");
        Ok(jar)
    }

    /// Write the jar's cookies for `base_url`, or remove the file when the
    /// jar holds none (e.g. after logout).
    pub fn save(&self, jar: &Jar, base_url: &Url) -> anyhow::Result<()> {
        let Some(header) = jar.cookies(base_url) else {
            return self.clear();
        };
        let cookie = header
            .to_str()
            .context("Session cookie is not valid UTF-8")?
            .to_string();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let saved = SavedSession {
            base_url: base_url.to_string(),
            cookie,
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&saved)?)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        restrict_permissions(&self.path)?;

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Forget the saved session.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
