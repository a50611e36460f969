//! HTTP binding to a Supabase-style backend
//!
//! Auth goes through the GoTrue endpoints under `/auth/v1`, table access
//! through PostgREST under `/rest/v1`. Screenshots are public objects, so the
//! image URL is derived from configuration alone (see
//! [`BackendConfig::image_url`]).

use crate::backend::{RecordStore, SessionService};
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::model::{AnnotationFields, DashboardRecord};
use crate::session::{Session, SessionUser};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DASHBOARD_TABLE: &str = "metadata";
pub const ANNOTATION_TABLE: &str = "human_insights";

/// Columns fetched for the dashboard list, with the annotation embedded
pub const DASHBOARD_SELECT: &str = "id,dashboard_name,dashboard_author,bucket_path,dashboard_link,\
favorite_count,created_at,human_insights(id,created_at,updated_at,expected_dataset,insight_part_1,\
insight_part_2,insight_part_3)";

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token: String,
  #[serde(default)]
  refresh_token: Option<String>,
  #[serde(default)]
  expires_in: Option<i64>,
  #[serde(default)]
  expires_at: Option<i64>,
  user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
  id: String,
  #[serde(default)]
  email: Option<String>,
}

impl TokenResponse {
  fn into_session(self, now: DateTime<Utc>) -> Session {
    let expires_at = self
      .expires_at
      .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
      .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));

    Session {
      access_token: self.access_token,
      refresh_token: self.refresh_token,
      expires_at,
      user: SessionUser { id: self.user.id, email: self.user.email },
    }
  }
}

#[derive(Serialize)]
struct NewAnnotation<'a> {
  metadata_id: &'a str,
  #[serde(flatten)]
  fields: &'a AnnotationFields,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct AnnotationPatch<'a> {
  #[serde(flatten)]
  fields: &'a AnnotationFields,
  updated_at: DateTime<Utc>,
}

/// Client handle for one backend project.
///
/// Constructed explicitly and passed to whoever needs it; requests are made
/// as the signed-in reviewer once [`with_session`](Self::with_session) is used.
#[derive(Clone)]
pub struct SupabaseClient {
  http: Client,
  config: BackendConfig,
  access_token: Option<String>,
}

impl SupabaseClient {
  pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
    let http = Client::builder()
      .timeout(std::time::Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;

    Ok(Self { http, config, access_token: None })
  }

  /// Authenticate subsequent table requests as the session's user
  pub fn with_session(mut self, session: &Session) -> Self {
    self.access_token = Some(session.access_token.clone());
    self
  }

  pub fn config(&self) -> &BackendConfig {
    &self.config
  }

  pub fn image_url(&self, storage_path: &str) -> String {
    self.config.image_url(storage_path)
  }

  fn authorized(&self, builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
    let bearer = bearer.or(self.access_token.as_deref()).unwrap_or(&self.config.anon_key);
    builder.header("apikey", &self.config.anon_key).bearer_auth(bearer)
  }

  fn table_url(&self, table: &str) -> String {
    self.config.endpoint(&format!("rest/v1/{table}"))
  }

  async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, BackendError> {
    let response = builder.send().await?;
    let status = response.status();
    tracing::debug!(%status, what, "backend response");

    if status.is_success() {
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::status(status.as_u16(), error_message(&body, status.canonical_reason())))
  }
}

/// Rows echoed back by a write sent with `Prefer: return=representation`.
///
/// PostgREST answers a filter that matches nothing (missing row, row hidden by
/// row-level security) with success and no rows, so an empty reply is an error.
async fn written_rows(
  response: Response,
  what: &str,
  none_written: &str,
) -> Result<Vec<serde_json::Value>, BackendError> {
  let body = response.text().await?;
  let rows: Vec<serde_json::Value> =
    serde_json::from_str(&body).map_err(|e| BackendError::decode(format!("{what}: {e}")))?;
  if rows.is_empty() {
    tracing::warn!(what, "write matched no rows");
    return Err(BackendError::status(404, none_written));
  }
  Ok(rows)
}

/// Pull the human-readable message out of an auth or PostgREST error body
fn error_message(body: &str, fallback: Option<&str>) -> String {
  let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
  let from_json = parsed.as_ref().and_then(|value| {
    ["msg", "error_description", "message", "error"]
      .iter()
      .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
      .map(str::to_string)
  });

  from_json
    .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
    .or_else(|| fallback.map(str::to_string))
    .unwrap_or_else(|| "unknown error".to_string())
}

#[async_trait]
impl SessionService for SupabaseClient {
  async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
    tracing::info!(email, "signing in");
    let request = self
      .http
      .post(self.config.endpoint("auth/v1/token"))
      .query(&[("grant_type", "password")])
      .header("apikey", &self.config.anon_key)
      .json(&json!({ "email": email, "password": password }));

    let response = self.send(request, "sign in").await?;
    let token: TokenResponse =
      response.json().await.map_err(|e| BackendError::decode(format!("token response: {e}")))?;
    Ok(token.into_session(Utc::now()))
  }

  async fn sign_out(&self, session: &Session) -> Result<(), BackendError> {
    let request = self.http.post(self.config.endpoint("auth/v1/logout"));
    self.send(self.authorized(request, Some(&session.access_token)), "sign out").await?;
    Ok(())
  }
}

#[async_trait]
impl RecordStore for SupabaseClient {
  async fn fetch_dashboards(&self) -> Result<Vec<DashboardRecord>, BackendError> {
    let request =
      self.http.get(self.table_url(DASHBOARD_TABLE)).query(&[("select", DASHBOARD_SELECT)]);
    let response = self.send(self.authorized(request, None), "fetch dashboards").await?;

    let records: Vec<DashboardRecord> =
      response.json().await.map_err(|e| BackendError::decode(format!("dashboard list: {e}")))?;
    tracing::debug!(count = records.len(), "dashboards fetched");
    Ok(records)
  }

  async fn insert_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError> {
    let body = NewAnnotation { metadata_id: dashboard_id, fields, created_at, updated_at };
    let request = self
      .http
      .post(self.table_url(ANNOTATION_TABLE))
      .header("Prefer", "return=representation")
      .json(&body);

    let response = self.send(self.authorized(request, None), "insert annotation").await?;
    written_rows(response, "insert annotation", "annotation was not created").await?;
    tracing::info!(dashboard_id, "annotation inserted");
    Ok(())
  }

  async fn update_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError> {
    let body = AnnotationPatch { fields, updated_at };
    let request = self
      .http
      .patch(self.table_url(ANNOTATION_TABLE))
      .query(&[("metadata_id", format!("eq.{dashboard_id}"))])
      .header("Prefer", "return=representation")
      .json(&body);

    let response = self.send(self.authorized(request, None), "update annotation").await?;
    written_rows(response, "update annotation", "no annotation to update").await?;
    tracing::info!(dashboard_id, "annotation updated");
    Ok(())
  }
}
