use crate::error::DeskError;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BUCKET: &str = "superstore";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
  /// Project URL, e.g. "https://abcd.supabase.co"
  pub url: Url,
  /// Public (anon) API key sent with every request
  pub anon_key: String,
  /// Public storage bucket holding the dashboard screenshots
  pub bucket: String,
  /// Per-request timeout in seconds
  pub timeout_secs: u64,
}

impl BackendConfig {
  pub fn new(
    url: Option<&str>,
    anon_key: Option<&str>,
    bucket: Option<&str>,
    timeout_secs: Option<u64>,
  ) -> Result<Self, DeskError> {
    let raw_url = url
      .map(str::trim)
      .filter(|u| !u.is_empty())
      .ok_or_else(|| DeskError::config("backend URL is missing (set SUPABASE_URL or --backend-url)"))?;

    let url = Url::parse(raw_url)
      .map_err(|e| DeskError::config(format!("invalid backend URL '{raw_url}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(DeskError::config(format!("backend URL must be http(s), got '{}'", url.scheme())));
    }

    let anon_key = anon_key
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .ok_or_else(|| DeskError::config("anon key is missing (set SUPABASE_ANON_KEY or --anon-key)"))?
      .to_string();

    let bucket = bucket
      .map(|b| b.trim().trim_matches('/'))
      .filter(|b| !b.is_empty())
      .unwrap_or(DEFAULT_BUCKET)
      .to_string();

    let timeout_secs = match timeout_secs {
      Some(0) => return Err(DeskError::config("timeout must be at least one second")),
      Some(secs) => secs,
      None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(Self { url, anon_key, bucket, timeout_secs })
  }

  /// Absolute URL for a path below the project root
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.url.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
  }

  /// Public URL of a screenshot. Pure string building, no request is made.
  pub fn image_url(&self, storage_path: &str) -> String {
    self.endpoint(&format!(
      "storage/v1/object/public/{}/{}",
      self.bucket,
      storage_path.trim_start_matches('/')
    ))
  }
}

/// Directory holding margo's local state (`$MARGO_HOME`, else `~/.margo`)
pub fn margo_home() -> Result<PathBuf, DeskError> {
  if let Ok(dir) = std::env::var("MARGO_HOME") {
    if !dir.trim().is_empty() {
      return Ok(PathBuf::from(dir));
    }
  }

  dirs::home_dir()
    .map(|home| home.join(".margo"))
    .ok_or_else(|| DeskError::config("cannot determine home directory; set MARGO_HOME"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> BackendConfig {
    BackendConfig::new(Some("https://demo.supabase.co/"), Some("anon"), None, None).unwrap()
  }

  #[test]
  fn test_defaults_applied() {
    let config = config();
    assert_eq!(config.bucket, DEFAULT_BUCKET);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
  }

  #[test]
  fn test_missing_url_is_config_error() {
    let err = BackendConfig::new(None, Some("anon"), None, None).unwrap_err();
    assert!(matches!(err, DeskError::Config { .. }));
  }

  #[test]
  fn test_missing_key_is_config_error() {
    let err = BackendConfig::new(Some("https://demo.supabase.co"), Some("  "), None, None).unwrap_err();
    assert!(err.to_string().contains("anon key"));
  }

  #[test]
  fn test_rejects_non_http_scheme_and_zero_timeout() {
    assert!(BackendConfig::new(Some("ftp://demo"), Some("k"), None, None).is_err());
    assert!(BackendConfig::new(Some("https://demo"), Some("k"), None, Some(0)).is_err());
  }

  #[test]
  fn test_endpoint_joins_without_double_slash() {
    assert_eq!(config().endpoint("/rest/v1/metadata"), "https://demo.supabase.co/rest/v1/metadata");
  }

  #[test]
  fn test_image_url_follows_public_object_convention() {
    assert_eq!(
      config().image_url("screenshots/abc.png"),
      "https://demo.supabase.co/storage/v1/object/public/superstore/screenshots/abc.png"
    );
  }

  #[test]
  fn test_custom_bucket_is_trimmed() {
    let config =
      BackendConfig::new(Some("https://demo.supabase.co"), Some("k"), Some("/shots/"), None).unwrap();
    assert_eq!(config.image_url("/a.png"), "https://demo.supabase.co/storage/v1/object/public/shots/a.png");
  }
}
