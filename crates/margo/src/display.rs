use crate::list::{ListController, PageRow};
use crate::model::{DashboardRecord, DatasetMatch, Status};
use chrono::{DateTime, Local, Utc};
use colored::*;

const TITLE_WIDTH: usize = 40;
const AUTHOR_WIDTH: usize = 20;

/// Local date and 24h time, e.g. "2026-01-04 17:15"
pub fn format_timestamp(utc_time: DateTime<Utc>) -> String {
  let local_time: DateTime<Local> = utc_time.into();
  local_time.format("%Y-%m-%d %H:%M").to_string()
}

/// Cut to `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    return text.to_string();
  }
  let kept: String = text.chars().take(width.saturating_sub(1)).collect();
  format!("{kept}…")
}

pub fn status_badge(status: Status) -> ColoredString {
  match status {
    Status::Completed => status.label().green().bold(),
    Status::Pending => status.label().red().bold(),
  }
}

pub fn dataset_label(value: DatasetMatch) -> ColoredString {
  match value {
    DatasetMatch::Yes => "Yes".green(),
    DatasetMatch::No => "No".red(),
    DatasetMatch::Unset => "Not answered".dimmed(),
  }
}

/// "3 / 10 completed"
pub fn progress_line(list: &ListController) -> String {
  format!("{} / {} completed", list.completed_count(), list.total_count())
}

pub fn page_line(list: &ListController) -> String {
  format!("Page {} of {}", list.page(), list.total_pages().max(1))
}

pub fn row_line(row: &PageRow<'_>) -> String {
  let record = row.record;
  format!(
    "{:>4}  {:<title$}  {:<author$}  {}  {}",
    row.position,
    truncate(&record.name, TITLE_WIDTH),
    truncate(&record.author, AUTHOR_WIDTH),
    format_timestamp(record.created_at),
    status_badge(record.status()),
    title = TITLE_WIDTH,
    author = AUTHOR_WIDTH,
  )
}

/// The current page of the list with its header and footer
pub fn display_list(list: &ListController) {
  herald::announce("Insight Generation Platform");
  herald::info(&format!("{} ({} shown)", progress_line(list), list.filter()));

  let rows = list.current_page();
  if rows.is_empty() {
    herald::info("No dashboards match this filter");
    return;
  }

  println!(
    "{:>4}  {:<title$}  {:<author$}  {:<16}  {}",
    "No.".bold(),
    "Dashboard Title".bold(),
    "Author".bold(),
    "Timestamp".bold(),
    "Status".bold(),
    title = TITLE_WIDTH,
    author = AUTHOR_WIDTH,
  );
  for row in &rows {
    println!("{}", row_line(row));
  }

  if list.total_pages() > 1 {
    println!();
    herald::info(&page_line(list));
  }
}

pub fn display_record(record: &DashboardRecord, image_url: &str) {
  herald::announce(&record.name);
  println!("ID:        {}", record.id);
  println!("Author:    {}", record.author);
  println!("Captured:  {}", format_timestamp(record.created_at));
  if let Some(favorites) = record.favorite_count {
    println!("Favorites: {favorites}");
  }
  println!("Status:    {}", status_badge(record.status()));
  println!("Image:     {image_url}");
  match record.link() {
    Some(link) => println!("Link:      {link}"),
    None => println!("Link:      {}", "none".dimmed()),
  }

  if let Some(annotation) = &record.annotation {
    println!();
    herald::info(&format!("Completed: {}", format_timestamp(annotation.updated_at)));
    println!("Uses expected dataset: {}", dataset_label(annotation.fields.dataset_matches));
    for (idx, insight) in annotation.fields.insights().iter().enumerate() {
      let text = if insight.is_empty() { "-" } else { insight };
      println!("Insight {}: {text}", idx + 1);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn record(name: &str) -> DashboardRecord {
    DashboardRecord {
      id: "id-1".to_string(),
      name: name.to_string(),
      author: "Author".to_string(),
      storage_path: "screenshots/id-1.png".to_string(),
      external_link: None,
      favorite_count: None,
      created_at: Utc.with_ymd_and_hms(2026, 5, 6, 7, 8, 0).unwrap(),
      annotation: None,
    }
  }

  #[test]
  fn test_truncate_is_char_aware() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Überschrift lang", 5), "Über…");
  }

  #[test]
  fn test_progress_and_page_lines() {
    let mut list = ListController::new();
    list.replace(vec![record("a")]);
    assert_eq!(progress_line(&list), "0 / 1 completed");
    assert_eq!(page_line(&list), "Page 1 of 1");

    list.replace(Vec::new());
    assert_eq!(page_line(&list), "Page 1 of 1");
  }

  #[test]
  fn test_row_line_contains_position_and_title() {
    colored::control::set_override(false);
    let record = record("Superstore Profit by Region");
    let line = row_line(&PageRow { position: 12, record: &record });
    assert!(line.starts_with("  12  Superstore Profit by Region"));
    assert!(line.ends_with("Pending"));
  }

  #[test]
  fn test_format_timestamp_shape() {
    let formatted = format_timestamp(Utc.with_ymd_and_hms(2026, 5, 6, 7, 8, 0).unwrap());
    assert_eq!(formatted.len(), "2026-05-06 07:08".len());
  }
}
