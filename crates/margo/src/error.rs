use thiserror::Error;

/// Failures talking to the hosted backend
#[derive(Error, Debug)]
pub enum BackendError {
  #[error("Backend unreachable: {message}")]
  Network { message: String },

  #[error("Backend returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("Unexpected backend response: {message}")]
  Decode { message: String },
}

impl BackendError {
  pub fn network(message: impl Into<String>) -> Self {
    Self::Network { message: message.into() }
  }

  pub fn status(status: u16, message: impl Into<String>) -> Self {
    Self::Status { status, message: message.into() }
  }

  pub fn decode(message: impl Into<String>) -> Self {
    Self::Decode { message: message.into() }
  }

  /// Whether the backend rejected the caller's credentials or token
  pub fn is_unauthorized(&self) -> bool {
    matches!(self, Self::Status { status: 400 | 401 | 403, .. })
  }
}

impl From<reqwest::Error> for BackendError {
  fn from(error: reqwest::Error) -> Self {
    if error.is_decode() {
      Self::decode(error.to_string())
    } else {
      Self::network(error.to_string())
    }
  }
}

/// Errors surfaced to the reviewer. None of them outlives the action that
/// triggered it; every one requires a new user action to try again.
#[derive(Error, Debug)]
pub enum DeskError {
  #[error("Sign in failed: {message}")]
  Auth { message: String },

  #[error("Not signed in. Use 'margo login' first.")]
  NotSignedIn,

  #[error("Failed to load dashboards: {source}")]
  Load {
    #[source]
    source: BackendError,
  },

  #[error("Failed to save insight: {source}")]
  Save {
    #[source]
    source: BackendError,
  },

  #[error("A save is already in progress for this dashboard")]
  SaveInProgress,

  #[error("No dashboard is open in the editor")]
  EditorClosed,

  #[error("Dashboard '{id}' not found")]
  RecordNotFound { id: String },

  #[error("Row {position} is not on the current page ({available} rows shown)")]
  PageOutOfRange { position: usize, available: usize },

  #[error("Configuration error: {message}")]
  Config { message: String },
}

impl DeskError {
  pub fn auth(message: impl Into<String>) -> Self {
    Self::Auth { message: message.into() }
  }

  pub fn load(source: BackendError) -> Self {
    Self::Load { source }
  }

  pub fn save(source: BackendError) -> Self {
    Self::Save { source }
  }

  pub fn record_not_found(id: impl Into<String>) -> Self {
    Self::RecordNotFound { id: id.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }
}
