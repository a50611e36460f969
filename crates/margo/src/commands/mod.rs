use crate::backend::SupabaseClient;
use crate::config::BackendConfig;
use crate::session::SessionManager;
use anyhow::{anyhow, Result};
use std::io::{self, Write};

pub mod annotate;
pub mod list;
pub mod login;
pub mod logout;
pub mod open;
pub mod show;
pub mod whoami;

/// Backend client acting as the signed-in reviewer
pub fn connect(config: &BackendConfig, sessions: &SessionManager) -> Result<SupabaseClient> {
  let session = sessions.require_session()?;
  tracing::debug!(user = %session.user.id, "using stored session");
  Ok(SupabaseClient::new(config.clone())?.with_session(&session))
}

/// Answer that blanks a pre-filled value
pub const CLEAR_ANSWER: &str = "-";

/// Read one line from stdin after printing `label`. An empty answer keeps
/// `current` when one is given; [`CLEAR_ANSWER`] empties it.
pub fn prompt_line(label: &str, current: Option<&str>) -> Result<String> {
  match current {
    Some(value) if !value.is_empty() => {
      print!("{label} [{value}] (Enter keeps, '{CLEAR_ANSWER}' clears): ")
    }
    _ => print!("{label}: "),
  }
  io::stdout().flush()?;

  let mut input = String::new();
  let read = io::stdin().read_line(&mut input)?;
  if read == 0 {
    return Err(anyhow!("No input available for '{label}'"));
  }

  Ok(resolve_answer(input.trim_end_matches(['\r', '\n']), current))
}

fn resolve_answer(answer: &str, current: Option<&str>) -> String {
  match answer.trim() {
    "" => current.unwrap_or_default().to_string(),
    CLEAR_ANSWER => String::new(),
    _ => answer.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_answer_keeps_current() {
    assert_eq!(resolve_answer("", Some("saved text")), "saved text");
    assert_eq!(resolve_answer("   ", None), "");
  }

  #[test]
  fn test_clear_answer_blanks_saved_value() {
    assert_eq!(resolve_answer("-", Some("saved text")), "");
    assert_eq!(resolve_answer(" - ", Some("saved text")), "");
  }

  #[test]
  fn test_new_answer_replaces_current() {
    assert_eq!(resolve_answer("fresh take", Some("saved text")), "fresh take");
    assert_eq!(resolve_answer("-5% margin", Some("x")), "-5% margin");
  }
}
