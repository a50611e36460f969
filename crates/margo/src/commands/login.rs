use crate::backend::{SessionService, SupabaseClient};
use crate::commands::prompt_line;
use crate::config::BackendConfig;
use crate::error::DeskError;
use crate::session::SessionManager;
use anyhow::{anyhow, Result};

pub async fn handle(config: &BackendConfig, email: Option<String>) -> Result<()> {
  let sessions = SessionManager::new()?;
  let client = SupabaseClient::new(config.clone())?;

  let email = match email {
    Some(email) => email,
    None => prompt_line("Email", None)?,
  };
  let password = rpassword::prompt_password("Password: ")?;

  run(&sessions, &client, &email, &password).await
}

pub async fn run(
  sessions: &SessionManager,
  service: &dyn SessionService,
  email: &str,
  password: &str,
) -> Result<()> {
  let email = email.trim();
  if email.is_empty() || password.is_empty() {
    return Err(anyhow!("Email and password are both required"));
  }

  match sessions.sign_in(service, email, password).await {
    Ok(session) => {
      herald::success(&format!("Signed in as {}", session.display_name()));
      Ok(())
    }
    Err(e) => {
      if let Some(DeskError::Auth { message }) = e.downcast_ref::<DeskError>() {
        herald::error(message);
      }
      Err(e)
    }
  }
}
