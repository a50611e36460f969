use crate::backend::RecordStore;
use crate::error::{BackendError, DeskError};
use crate::model::{Annotation, AnnotationFields, DashboardRecord, DatasetMatch};
use chrono::{DateTime, Utc};

/// Lifecycle of one editor instance:
/// `Closed -> Open -> Saving -> Saved -> Closed`, with `Saving -> Failed -> Open`
/// when the store rejects the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
  Closed,
  Open,
  Saving,
  Saved,
  Failed,
}

/// Whether a save created the annotation or overwrote an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  Created,
  Updated,
}

/// Everything needed to perform one write, captured when the save starts
#[derive(Debug, Clone)]
pub struct SaveRequest {
  pub dashboard_id: String,
  pub fields: AnnotationFields,
  pub existing: bool,
  pub at: DateTime<Utc>,
}

impl SaveRequest {
  /// Insert when the dashboard has no annotation yet, update otherwise
  pub async fn execute<S: RecordStore + ?Sized>(
    &self,
    store: &S,
  ) -> Result<SaveOutcome, BackendError> {
    if self.existing {
      store.update_annotation(&self.dashboard_id, &self.fields, self.at).await?;
      Ok(SaveOutcome::Updated)
    } else {
      store.insert_annotation(&self.dashboard_id, &self.fields, self.at, self.at).await?;
      Ok(SaveOutcome::Created)
    }
  }
}

/// Form state for annotating a single dashboard record
#[derive(Debug, Clone)]
pub struct AnnotationEditor {
  state: EditorState,
  record: Option<DashboardRecord>,
  fields: AnnotationFields,
  last_error: Option<String>,
}

impl Default for AnnotationEditor {
  fn default() -> Self {
    Self::new()
  }
}

impl AnnotationEditor {
  /// A closed editor with nothing loaded
  pub fn new() -> Self {
    Self {
      state: EditorState::Closed,
      record: None,
      fields: AnnotationFields::default(),
      last_error: None,
    }
  }

  /// Load a record, pre-filling the form from its annotation when it has one
  pub fn open(&mut self, record: DashboardRecord) {
    self.fields = record.annotation.as_ref().map(|a| a.fields.clone()).unwrap_or_default();
    self.record = Some(record);
    self.last_error = None;
    self.state = EditorState::Open;
    tracing::debug!(prefilled = self.is_prefilled(), "editor opened");
  }

  pub fn opened(record: DashboardRecord) -> Self {
    let mut editor = Self::new();
    editor.open(record);
    editor
  }

  pub fn state(&self) -> EditorState {
    self.state
  }

  pub fn is_open(&self) -> bool {
    self.state != EditorState::Closed
  }

  pub fn record(&self) -> Option<&DashboardRecord> {
    self.record.as_ref()
  }

  /// True when the form started from a previously saved annotation
  pub fn is_prefilled(&self) -> bool {
    self.record.as_ref().is_some_and(DashboardRecord::is_completed)
  }

  pub fn fields(&self) -> &AnnotationFields {
    &self.fields
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  fn touch(&mut self) {
    if self.state == EditorState::Failed {
      self.state = EditorState::Open;
    }
  }

  pub fn set_dataset_matches(&mut self, value: DatasetMatch) {
    self.touch();
    self.fields.dataset_matches = value;
  }

  /// Set insight part 1, 2 or 3; other part numbers are ignored
  pub fn set_insight(&mut self, part: usize, text: impl Into<String>) {
    self.touch();
    let slot = match part {
      1 => &mut self.fields.insight_part_1,
      2 => &mut self.fields.insight_part_2,
      3 => &mut self.fields.insight_part_3,
      _ => return,
    };
    *slot = text.into();
  }

  /// Leave `Failed` without editing anything, keeping the form for a retry
  pub fn dismiss_error(&mut self) {
    self.touch();
  }

  /// Move to `Saving` and capture the write to perform.
  ///
  /// Rejected while another save from this editor is still pending, and on a
  /// closed editor.
  pub fn begin_save(&mut self, at: DateTime<Utc>) -> Result<SaveRequest, DeskError> {
    match self.state {
      EditorState::Closed => return Err(DeskError::EditorClosed),
      EditorState::Saving => return Err(DeskError::SaveInProgress),
      EditorState::Open | EditorState::Saved | EditorState::Failed => {}
    }

    let record = self.record.as_ref().ok_or(DeskError::EditorClosed)?;
    let request = SaveRequest {
      dashboard_id: record.id.clone(),
      fields: self.fields.clone(),
      existing: record.is_completed(),
      at,
    };

    self.last_error = None;
    self.state = EditorState::Saving;
    Ok(request)
  }

  /// Record the outcome of a write started with [`begin_save`](Self::begin_save)
  pub fn finish_save(
    &mut self,
    request: &SaveRequest,
    result: Result<SaveOutcome, BackendError>,
  ) -> Result<SaveOutcome, DeskError> {
    match result {
      Ok(outcome) => {
        if let Some(record) = self.record.as_mut() {
          match record.annotation.as_mut() {
            Some(annotation) => {
              annotation.fields = request.fields.clone();
              annotation.updated_at = request.at;
            }
            None => {
              record.annotation = Some(Annotation {
                fields: request.fields.clone(),
                created_at: request.at,
                updated_at: request.at,
              });
            }
          }
        }
        self.state = EditorState::Saved;
        tracing::info!(dashboard_id = %request.dashboard_id, ?outcome, "insight saved");
        Ok(outcome)
      }
      Err(e) => {
        tracing::warn!(dashboard_id = %request.dashboard_id, error = %e, "insight save failed");
        self.last_error = Some(e.to_string());
        self.state = EditorState::Failed;
        Err(DeskError::save(e))
      }
    }
  }

  /// Insert or update the annotation, stamped with the current time
  pub async fn save<S: RecordStore + ?Sized>(
    &mut self,
    store: &S,
  ) -> Result<SaveOutcome, DeskError> {
    self.save_at(store, Utc::now()).await
  }

  /// Insert or update the annotation, stamped with `at`.
  ///
  /// On failure the editor stays on the form in `Failed` with every field
  /// intact, so saving again retries the same content.
  pub async fn save_at<S: RecordStore + ?Sized>(
    &mut self,
    store: &S,
    at: DateTime<Utc>,
  ) -> Result<SaveOutcome, DeskError> {
    let request = self.begin_save(at)?;
    let result = request.execute(store).await;
    self.finish_save(&request, result)
  }

  /// Close the form (after a save or as a cancel), handing back the record
  pub fn close(&mut self) -> Option<DashboardRecord> {
    self.state = EditorState::Closed;
    self.fields = AnnotationFields::default();
    self.last_error = None;
    self.record.take()
  }
}
