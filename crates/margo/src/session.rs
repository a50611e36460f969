use crate::backend::SessionService;
use crate::config::margo_home;
use crate::error::{BackendError, DeskError};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
  pub id: String,
  pub email: Option<String>,
}

/// An authenticated reviewer session issued by the backend's auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub access_token: String,
  pub refresh_token: Option<String>,
  pub expires_at: DateTime<Utc>,
  pub user: SessionUser,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }

  pub fn display_name(&self) -> &str {
    self.user.email.as_deref().unwrap_or(&self.user.id)
  }
}

/// Persists the current session between CLI invocations
pub struct SessionManager {
  session_dir: PathBuf,
}

impl SessionManager {
  /// Session storage under `$MARGO_HOME` (or `~/.margo`)
  pub fn new() -> Result<Self> {
    Self::with_dir(margo_home()?)
  }

  pub fn with_dir(session_dir: impl Into<PathBuf>) -> Result<Self> {
    let session_dir = session_dir.into();
    std::fs::create_dir_all(&session_dir)
      .with_context(|| format!("Failed to create {}", session_dir.display()))?;
    Ok(Self { session_dir })
  }

  pub fn session_dir(&self) -> &Path {
    &self.session_dir
  }

  fn session_file(&self) -> PathBuf {
    self.session_dir.join(SESSION_FILE)
  }

  pub fn session_exists(&self) -> bool {
    self.session_file().exists()
  }

  /// Write the session file, readable by the owner only from the moment it exists
  pub fn save_session(&self, session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    let path = self.session_file();

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
      use std::os::unix::fs::OpenOptionsExt;
      options.mode(0o600);
    }
    let mut file =
      options.open(&path).with_context(|| format!("Failed to open {}", path.display()))?;

    // mode() only applies on creation; tighten a file left by an older version
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file
      .write_all(json.as_bytes())
      .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }

  /// The stored session, whether or not it has expired
  pub fn load_session(&self) -> Result<Option<Session>> {
    let path = self.session_file();
    if !path.exists() {
      return Ok(None);
    }

    let json = std::fs::read_to_string(&path)?;
    let session: Session =
      serde_json::from_str(&json).with_context(|| format!("Corrupt session file {}", path.display()))?;
    Ok(Some(session))
  }

  pub fn clear_session(&self) -> Result<()> {
    let path = self.session_file();
    if path.exists() {
      std::fs::remove_file(path)?;
    }
    Ok(())
  }

  /// The stored session if it is still valid; expired sessions count as none
  pub fn current_session(&self) -> Result<Option<Session>> {
    Ok(self.load_session()?.filter(|session| !session.is_expired_at(Utc::now())))
  }

  /// Like [`current_session`](Self::current_session) but missing sessions are an error
  pub fn require_session(&self) -> Result<Session> {
    self.current_session()?.ok_or_else(|| DeskError::NotSignedIn.into())
  }

  /// Exchange credentials for a session and persist it.
  ///
  /// Rejected credentials surface as [`DeskError::Auth`] carrying the
  /// backend's message so it can be shown inline.
  pub async fn sign_in(
    &self,
    service: &dyn SessionService,
    email: &str,
    password: &str,
  ) -> Result<Session> {
    let session = service.sign_in_with_password(email, password).await.map_err(|e| match e {
      BackendError::Status { status: 400 | 401 | 403, message } => DeskError::auth(message),
      other => DeskError::auth(other.to_string()),
    })?;

    tracing::debug!(user = %session.user.id, "session issued");
    self.save_session(&session)?;
    Ok(session)
  }

  /// Revoke the session at the backend and forget it locally.
  ///
  /// The local copy is removed even when revocation fails, so a dead backend
  /// never leaves the reviewer stuck signed in.
  pub async fn sign_out(&self, service: &dyn SessionService) -> Result<bool> {
    let Some(session) = self.load_session()? else {
      return Ok(false);
    };

    if let Err(e) = service.sign_out(&session).await {
      tracing::warn!(error = %e, "remote sign out failed");
    }

    self.clear_session()?;
    Ok(true)
  }
}
