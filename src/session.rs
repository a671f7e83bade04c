// Persisted session store
// Holds the bearer token and the logged-in user, the way the web client kept
// `token` and `user` blobs in localStorage.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::auth::User;

/// On-disk session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// File-backed session storage under `~/.focusflow/session.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self {
            path: home.join(".focusflow").join("session.json"),
        })
    }

    /// Use an explicit file path (tests point this at a temp dir).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a session, creating the parent directory if needed.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Load the stored session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session: {}", self.path.display()))?;
        let session =
            serde_json::from_str(&contents).context("Failed to parse stored session")?;
        Ok(Some(session))
    }

    /// The stored bearer token, if the user is logged in.
    pub fn token(&self) -> Option<String> {
        self.load().ok().flatten().map(|s| s.token)
    }

    /// The stored user, if the user is logged in.
    pub fn user(&self) -> Option<User> {
        self.load().ok().flatten().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Remove the stored session. Missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session: {}", self.path.display()))?;
            tracing::debug!("Session cleared");
        }
        Ok(())
    }
}
