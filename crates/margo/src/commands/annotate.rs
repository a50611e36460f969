use crate::backend::RecordStore;
use crate::commands::{connect, prompt_line};
use crate::config::BackendConfig;
use crate::desk::ReviewDesk;
use crate::display::progress_line;
use crate::editor::{AnnotationEditor, SaveOutcome};
use crate::error::DeskError;
use crate::model::{AnnotationFields, DatasetMatch};
use crate::session::SessionManager;
use anyhow::Result;
use std::io::IsTerminal;

/// Field values given on the command line; `None` keeps the pre-filled value
#[derive(Debug, Clone, Default)]
pub struct AnnotateArgs {
  pub id: String,
  pub matches: Option<DatasetMatch>,
  pub insights: [Option<String>; 3],
}

impl AnnotateArgs {
  pub fn has_edits(&self) -> bool {
    self.matches.is_some() || self.insights.iter().any(Option::is_some)
  }

  fn apply(&self, editor: &mut AnnotationEditor) {
    if let Some(matches) = self.matches {
      editor.set_dataset_matches(matches);
    }
    for (idx, text) in self.insights.iter().enumerate() {
      if let Some(text) = text {
        editor.set_insight(idx + 1, text.clone());
      }
    }
  }
}

pub async fn handle(config: &BackendConfig, mut args: AnnotateArgs) -> Result<()> {
  let sessions = SessionManager::new()?;
  let mut desk = ReviewDesk::new(connect(config, &sessions)?);

  let interactive = !args.has_edits() && std::io::stdin().is_terminal();
  if interactive {
    desk.refresh().await?;
    let editor = desk.select_id(&args.id)?;
    args = prompt_for_fields(&args.id, editor)?;
  }

  run(&mut desk, &args).await?;
  Ok(())
}

fn prompt_for_fields(id: &str, editor: &AnnotationEditor) -> Result<AnnotateArgs> {
  if let Some(record) = editor.record() {
    herald::announce(&record.name);
  }

  let fields = editor.fields();
  let matches = loop {
    let current = fields.dataset_matches.to_string();
    let answer = prompt_line("Uses expected dataset (yes/no/unset)", Some(&current))?;
    match answer.parse::<DatasetMatch>() {
      Ok(value) => break value,
      Err(message) => herald::warn(&message),
    }
  };

  let mut insights: [Option<String>; 3] = Default::default();
  for (idx, current) in fields.insights().iter().enumerate() {
    let label = format!("Insight {}", idx + 1);
    insights[idx] = Some(prompt_line(&label, Some(current))?);
  }

  Ok(AnnotateArgs { id: id.to_string(), matches: Some(matches), insights })
}

/// Open the record, apply the edits, save and reload the list.
///
/// A failed save is reported and returned; nothing is retried automatically.
pub async fn run<S: RecordStore>(
  desk: &mut ReviewDesk<S>,
  args: &AnnotateArgs,
) -> Result<SaveOutcome> {
  if desk.list().find(&args.id).is_none() {
    desk.refresh().await?;
  }

  let editor = desk.select_id(&args.id)?;
  if editor.is_prefilled() {
    herald::info("Editing existing insight");
  }
  args.apply(editor);
  if *editor.fields() == AnnotationFields::default() {
    herald::warn("Saving an empty insight; the dashboard will still count as completed");
  }

  match desk.save_and_close().await {
    Ok(outcome) => {
      herald::toast("Insight saved");
      herald::info(&progress_line(desk.list()));
      Ok(outcome)
    }
    Err(e @ DeskError::Save { .. }) => {
      herald::error(&e.to_string());
      herald::info("Your answers were not stored. Run the same command again to retry.");
      Err(e.into())
    }
    Err(e @ DeskError::Load { .. }) => {
      herald::toast("Insight saved");
      herald::warn("Could not refresh the dashboard list afterwards");
      Err(e.into())
    }
    Err(e) => Err(e.into()),
  }
}
