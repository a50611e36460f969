use crate::backend::RecordStore;
use crate::commands::connect;
use crate::config::BackendConfig;
use crate::desk::ReviewDesk;
use crate::display::display_record;
use crate::error::DeskError;
use crate::model::DashboardRecord;
use crate::session::SessionManager;
use anyhow::Result;

pub async fn handle(config: &BackendConfig, id: String) -> Result<()> {
  let sessions = SessionManager::new()?;
  let mut desk = ReviewDesk::new(connect(config, &sessions)?);

  let record = run(&mut desk, &id).await?;
  display_record(&record, &config.image_url(&record.storage_path));
  Ok(())
}

pub async fn run<S: RecordStore>(desk: &mut ReviewDesk<S>, id: &str) -> Result<DashboardRecord> {
  desk.refresh().await?;
  let record = desk.list().find(id).cloned().ok_or_else(|| DeskError::record_not_found(id))?;
  Ok(record)
}
