
use margo::editor::SaveOutcome;
use margo::{AnnotationEditor, DatasetMatch, DeskError, EditorState, RecordStore};
use mock_backend::{completed, created, dashboard, MockBackend};

#[tokio::test]
async fn test_first_save_creates_single_annotation() {
  let mock = MockBackend::new(vec![dashboard("a", "Alpha Sales", 1)]);
  let mut editor = AnnotationEditor::opened(dashboard("a", "Alpha Sales", 1));
  assert!(!editor.is_prefilled());

  editor.set_dataset_matches(DatasetMatch::Yes);
  editor.set_insight(1, "Revenue peaks in Q4");
  editor.set_insight(2, "West region lags");

  let outcome = editor.save_at(&mock, created(10)).await.unwrap();

  assert_eq!(outcome, SaveOutcome::Created);
  assert_eq!(editor.state(), EditorState::Saved);
  assert_eq!(mock.inserts(), 1);
  assert_eq!(mock.updates(), 0);

  let stored = mock.annotation("a").unwrap();
  assert_eq!(stored.created_at, created(10));
  assert_eq!(stored.updated_at, created(10));
  assert_eq!(stored.fields.dataset_matches, DatasetMatch::Yes);
  assert_eq!(stored.fields.insight_part_1, "Revenue peaks in Q4");
  assert_eq!(stored.fields.insight_part_3, "");
}

#[tokio::test]
async fn test_second_save_in_same_session_updates() {
  let mock = MockBackend::new(vec![dashboard("a", "Alpha Sales", 1)]);
  let mut editor = AnnotationEditor::opened(dashboard("a", "Alpha Sales", 1));

  editor.set_insight(1, "first draft");
  editor.save_at(&mock, created(10)).await.unwrap();

  editor.set_insight(1, "second draft");
  let outcome = editor.save_at(&mock, created(11)).await.unwrap();

  assert_eq!(outcome, SaveOutcome::Updated);
  assert_eq!(mock.inserts(), 1);
  assert_eq!(mock.updates(), 1);
  assert_eq!(mock.annotation_count(), 1);

  let stored = mock.annotation("a").unwrap();
  assert_eq!(stored.fields.insight_part_1, "second draft");
  assert_eq!(stored.created_at, created(10));
  assert_eq!(stored.updated_at, created(11));
}

#[tokio::test]
async fn test_reopening_completed_record_prefills_and_updates() {
  let mock = MockBackend::new(vec![completed(dashboard("b", "Beta Churn", 2), "old notes")]);
  let records = mock.fetch_dashboards().await.unwrap();
  let original_created = records[0].annotation.as_ref().unwrap().created_at;

  let mut editor = AnnotationEditor::opened(records[0].clone());
  assert!(editor.is_prefilled());
  assert_eq!(editor.fields().insight_part_1, "old notes");

  editor.set_insight(2, "added context");
  let outcome = editor.save_at(&mock, created(20)).await.unwrap();

  assert_eq!(outcome, SaveOutcome::Updated);
  assert_eq!(mock.inserts(), 0);
  let stored = mock.annotation("b").unwrap();
  assert_eq!(stored.fields.insight_part_1, "old notes");
  assert_eq!(stored.fields.insight_part_2, "added context");
  assert_eq!(stored.created_at, original_created);
  assert_eq!(stored.updated_at, created(20));
}

#[tokio::test]
async fn test_failed_save_keeps_form_and_retry_succeeds() {
  let mock = MockBackend::new(vec![dashboard("a", "Alpha Sales", 1)]);
  mock.set_fail_writes(true);

  let mut editor = AnnotationEditor::opened(dashboard("a", "Alpha Sales", 1));
  editor.set_dataset_matches(DatasetMatch::No);
  editor.set_insight(3, "wrong dataset entirely");

  let err = editor.save_at(&mock, created(10)).await.unwrap_err();
  assert!(matches!(err, DeskError::Save { .. }));
  assert_eq!(editor.state(), EditorState::Failed);
  assert!(editor.last_error().unwrap().contains("503"));
  assert_eq!(editor.fields().insight_part_3, "wrong dataset entirely");
  assert_eq!(editor.fields().dataset_matches, DatasetMatch::No);
  assert!(mock.annotation("a").is_none());

  mock.set_fail_writes(false);
  let outcome = editor.save_at(&mock, created(11)).await.unwrap();

  assert_eq!(outcome, SaveOutcome::Created);
  assert_eq!(editor.last_error(), None);
  let stored = mock.annotation("a").unwrap();
  assert_eq!(stored.fields.insight_part_3, "wrong dataset entirely");
  assert_eq!(stored.created_at, created(11));
}

#[tokio::test]
async fn test_editing_after_failure_returns_to_open() {
  let mock = MockBackend::new(vec![dashboard("a", "Alpha Sales", 1)]);
  mock.set_fail_writes(true);

  let mut editor = AnnotationEditor::opened(dashboard("a", "Alpha Sales", 1));
  let _ = editor.save_at(&mock, created(10)).await;
  assert_eq!(editor.state(), EditorState::Failed);

  editor.set_insight(1, "more detail");
  assert_eq!(editor.state(), EditorState::Open);
}

#[tokio::test]
async fn test_save_on_closed_editor_is_rejected() {
  let mock = MockBackend::default();
  let mut editor = AnnotationEditor::new();

  let err = editor.save_at(&mock, created(1)).await.unwrap_err();
  assert!(matches!(err, DeskError::EditorClosed));
  assert_eq!(mock.inserts(), 0);
}

#[tokio::test]
async fn test_empty_annotation_still_completes_record() {
  let mock = MockBackend::new(vec![dashboard("a", "Alpha Sales", 1)]);
  let mut editor = AnnotationEditor::opened(dashboard("a", "Alpha Sales", 1));

  editor.save_at(&mock, created(5)).await.unwrap();

  let records = mock.fetch_dashboards().await.unwrap();
  assert!(records[0].is_completed());
  assert_eq!(records[0].annotation.as_ref().unwrap().fields.dataset_matches, DatasetMatch::Unset);
}
