use crate::backend::RecordStore;
use crate::editor::{AnnotationEditor, SaveOutcome};
use crate::error::DeskError;
use crate::list::ListController;
use crate::model::DashboardRecord;

/// Owns the reviewer's working set: the backend handle, the dashboard list
/// and at most one open editor. Closing the editor always reloads the list.
pub struct ReviewDesk<S> {
  store: S,
  list: ListController,
  editor: AnnotationEditor,
}

impl<S: RecordStore> ReviewDesk<S> {
  pub fn new(store: S) -> Self {
    Self::with_list(store, ListController::new())
  }

  pub fn with_list(store: S, list: ListController) -> Self {
    Self { store, list, editor: AnnotationEditor::new() }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn list(&self) -> &ListController {
    &self.list
  }

  pub fn list_mut(&mut self) -> &mut ListController {
    &mut self.list
  }

  /// Full reload of the list; a failure keeps what was shown before
  pub async fn refresh(&mut self) -> Result<(), DeskError> {
    self.list.load(&self.store).await?;
    Ok(())
  }

  /// Open the row numbered `position` ("No." column) on the current page
  pub fn select(&mut self, position: usize) -> Result<&mut AnnotationEditor, DeskError> {
    let rows = self.list.current_page();
    let record = rows
      .iter()
      .find(|row| row.position == position)
      .map(|row| row.record.clone())
      .ok_or_else(|| DeskError::PageOutOfRange { position, available: rows.len() })?;

    self.editor.open(record);
    Ok(&mut self.editor)
  }

  /// Open a record by id, wherever it sits in the list
  pub fn select_id(&mut self, id: &str) -> Result<&mut AnnotationEditor, DeskError> {
    let record = self.list.find(id).cloned().ok_or_else(|| DeskError::record_not_found(id))?;
    self.editor.open(record);
    Ok(&mut self.editor)
  }

  pub fn editor(&self) -> Option<&AnnotationEditor> {
    self.editor.is_open().then_some(&self.editor)
  }

  pub fn editor_mut(&mut self) -> Result<&mut AnnotationEditor, DeskError> {
    if self.editor.is_open() {
      Ok(&mut self.editor)
    } else {
      Err(DeskError::EditorClosed)
    }
  }

  /// Save the open form. The editor stays open either way.
  pub async fn save(&mut self) -> Result<SaveOutcome, DeskError> {
    self.editor.save(&self.store).await
  }

  /// Close the editor (save or cancel) and reload the list
  pub async fn close_editor(&mut self) -> Result<Option<DashboardRecord>, DeskError> {
    let record = self.editor.close();
    self.refresh().await?;
    Ok(record)
  }

  /// Save, then close and reload.
  ///
  /// A failed save leaves the editor open in `Failed`. A failed reload after a
  /// good save is returned as [`DeskError::Load`]; the annotation is stored
  /// regardless.
  pub async fn save_and_close(&mut self) -> Result<SaveOutcome, DeskError> {
    let outcome = self.save().await?;
    self.close_editor().await?;
    Ok(outcome)
  }
}
