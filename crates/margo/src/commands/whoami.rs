use crate::display::format_timestamp;
use crate::session::SessionManager;
use anyhow::Result;
use chrono::Utc;

pub async fn handle() -> Result<()> {
  let sessions = SessionManager::new()?;

  let Some(session) = sessions.load_session()? else {
    herald::info("Not signed in. Use 'margo login' to start reviewing.");
    return Ok(());
  };

  if session.is_expired_at(Utc::now()) {
    herald::warn(&format!(
      "Session for {} expired at {}. Use 'margo login' again.",
      session.display_name(),
      format_timestamp(session.expires_at)
    ));
    return Ok(());
  }

  println!("Signed in as: {}", session.display_name());
  println!("User ID:      {}", session.user.id);
  println!("Expires:      {}", format_timestamp(session.expires_at));
  Ok(())
}
