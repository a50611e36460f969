use crate::backend::RecordStore;
use crate::commands::{connect, show};
use crate::config::BackendConfig;
use crate::desk::ReviewDesk;
use crate::session::SessionManager;
use anyhow::{Context, Result};

pub async fn handle(config: &BackendConfig, id: String) -> Result<()> {
  let sessions = SessionManager::new()?;
  let mut desk = ReviewDesk::new(connect(config, &sessions)?);

  let Some(link) = run(&mut desk, &id).await? else {
    herald::warn("No dashboard link available");
    return Ok(());
  };

  herald::info(&format!("Opening {link}"));
  webbrowser::open(&link).with_context(|| format!("Failed to open {link}"))?;
  Ok(())
}

/// The external link of a record, if it has a usable one
pub async fn run<S: RecordStore>(desk: &mut ReviewDesk<S>, id: &str) -> Result<Option<String>> {
  let record = show::run(desk, id).await?;
  Ok(record.link().map(str::to_string))
}
