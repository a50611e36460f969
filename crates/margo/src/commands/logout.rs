use crate::backend::{SessionService, SupabaseClient};
use crate::config::BackendConfig;
use crate::session::SessionManager;
use anyhow::Result;

pub async fn handle(config: &BackendConfig) -> Result<()> {
  let sessions = SessionManager::new()?;
  let client = SupabaseClient::new(config.clone())?;
  run(&sessions, &client).await
}

pub async fn run(sessions: &SessionManager, service: &dyn SessionService) -> Result<()> {
  if sessions.sign_out(service).await? {
    herald::success("Signed out");
  } else {
    herald::info("Not signed in");
  }
  Ok(())
}
