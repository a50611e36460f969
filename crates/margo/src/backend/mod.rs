use crate::error::BackendError;
use crate::model::{AnnotationFields, DashboardRecord};
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub mod supabase;

pub use supabase::SupabaseClient;

/// Backend auth service: issues and revokes reviewer sessions
#[async_trait]
pub trait SessionService: Send + Sync {
  /// Exchange an email/password pair for a session
  async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError>;

  /// Revoke the session's tokens
  async fn sign_out(&self, session: &Session) -> Result<(), BackendError>;
}

/// Relational store holding dashboards and their annotations
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// All dashboard records joined with their (zero or one) annotation, in store order
  async fn fetch_dashboards(&self) -> Result<Vec<DashboardRecord>, BackendError>;

  /// Create the annotation for a dashboard that has none yet
  async fn insert_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError>;

  /// Overwrite the content of a dashboard's existing annotation.
  /// The creation timestamp is never part of an update.
  async fn update_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
  async fn fetch_dashboards(&self) -> Result<Vec<DashboardRecord>, BackendError> {
    (**self).fetch_dashboards().await
  }

  async fn insert_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError> {
    (**self).insert_annotation(dashboard_id, fields, created_at, updated_at).await
  }

  async fn update_annotation(
    &self,
    dashboard_id: &str,
    fields: &AnnotationFields,
    updated_at: DateTime<Utc>,
  ) -> Result<(), BackendError> {
    (**self).update_annotation(dashboard_id, fields, updated_at).await
  }
}
