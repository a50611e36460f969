use crate::backend::RecordStore;
use crate::commands::connect;
use crate::config::BackendConfig;
use crate::desk::ReviewDesk;
use crate::display::display_list;
use crate::list::StatusFilter;
use crate::session::SessionManager;
use anyhow::Result;

pub async fn handle(config: &BackendConfig, filter: StatusFilter, page: usize) -> Result<()> {
  let sessions = SessionManager::new()?;
  let mut desk = ReviewDesk::new(connect(config, &sessions)?);

  run(&mut desk, filter, page).await?;
  display_list(desk.list());
  Ok(())
}

/// Load the list and move to the requested filter and page.
/// Returns the page actually shown after clamping.
pub async fn run<S: RecordStore>(
  desk: &mut ReviewDesk<S>,
  filter: StatusFilter,
  page: usize,
) -> Result<usize> {
  desk.refresh().await?;

  let list = desk.list_mut();
  list.set_filter(filter);
  let shown = list.go_to_page(page);
  if shown != page {
    herald::warn(&format!("Page {page} does not exist, showing page {shown}"));
  }
  Ok(shown)
}
