use crate::backend::RecordStore;
use crate::error::DeskError;
use crate::model::{DashboardRecord, Status};
use std::fmt;
use std::str::FromStr;

/// Rows shown per page of the dashboard list
pub const PAGE_SIZE: usize = 10;

/// Which records the list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
  #[default]
  All,
  Pending,
  Completed,
}

impl StatusFilter {
  pub fn matches(&self, record: &DashboardRecord) -> bool {
    match self {
      StatusFilter::All => true,
      StatusFilter::Pending => record.status() == Status::Pending,
      StatusFilter::Completed => record.status() == Status::Completed,
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      StatusFilter::All => "all",
      StatusFilter::Pending => "pending",
      StatusFilter::Completed => "completed",
    };
    f.write_str(label)
  }
}

impl FromStr for StatusFilter {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "all" => Ok(StatusFilter::All),
      "pending" | "todo" => Ok(StatusFilter::Pending),
      "completed" | "done" => Ok(StatusFilter::Completed),
      other => Err(format!("Unknown status '{other}'. Use all, pending or completed")),
    }
  }
}

/// Pending records first, then completed; oldest first inside each group.
/// The sort is stable, so equal timestamps keep the store's order.
pub fn order_records(mut records: Vec<DashboardRecord>) -> Vec<DashboardRecord> {
  records.sort_by_key(|record| (record.is_completed(), record.created_at));
  records
}

pub fn filter_records(records: &[DashboardRecord], filter: StatusFilter) -> Vec<&DashboardRecord> {
  records.iter().filter(|record| filter.matches(record)).collect()
}

/// Number of pages needed for `len` items; zero items means zero pages
pub fn total_pages(len: usize, page_size: usize) -> usize {
  if page_size == 0 {
    return 0;
  }
  len.div_ceil(page_size)
}

/// Items `[(page-1)*size, page*size)` clamped to what exists.
/// Page numbers start at 1; page 0 or a page past the end is empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
  if page == 0 {
    return &[];
  }
  let start = (page - 1).saturating_mul(page_size).min(items.len());
  let end = start.saturating_add(page_size).min(items.len());
  &items[start..end]
}

/// A visible row with its 1-based position in the filtered list
#[derive(Debug, Clone, Copy)]
pub struct PageRow<'a> {
  pub position: usize,
  pub record: &'a DashboardRecord,
}

/// Holds the ordered dashboard list plus the reviewer's filter and page.
///
/// The controller never writes to the store; it is refreshed wholesale after
/// every editor session.
#[derive(Debug, Clone)]
pub struct ListController {
  records: Vec<DashboardRecord>,
  filter: StatusFilter,
  page: usize,
  page_size: usize,
}

impl Default for ListController {
  fn default() -> Self {
    Self::new()
  }
}

impl ListController {
  pub fn new() -> Self {
    Self::with_page_size(PAGE_SIZE)
  }

  pub fn with_page_size(page_size: usize) -> Self {
    Self { records: Vec::new(), filter: StatusFilter::All, page: 1, page_size: page_size.max(1) }
  }

  /// Fetch and order every record. On failure the previous list, filter and
  /// page are left exactly as they were.
  pub async fn load<S: RecordStore + ?Sized>(
    &mut self,
    store: &S,
  ) -> Result<&[DashboardRecord], DeskError> {
    let records = store.fetch_dashboards().await.map_err(DeskError::load)?;
    self.replace(records);
    Ok(&self.records)
  }

  /// Install a freshly fetched list. The page is pulled back into range if the
  /// new list is shorter than before.
  pub fn replace(&mut self, records: Vec<DashboardRecord>) {
    self.records = order_records(records);
    self.page = self.page.clamp(1, self.total_pages().max(1));
  }

  pub fn records(&self) -> &[DashboardRecord] {
    &self.records
  }

  pub fn find(&self, id: &str) -> Option<&DashboardRecord> {
    self.records.iter().find(|record| record.id == id)
  }

  pub fn filter(&self) -> StatusFilter {
    self.filter
  }

  /// Switching filters always returns to page 1
  pub fn set_filter(&mut self, filter: StatusFilter) {
    self.filter = filter;
    self.page = 1;
  }

  pub fn filtered(&self) -> Vec<&DashboardRecord> {
    filter_records(&self.records, self.filter)
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn total_pages(&self) -> usize {
    total_pages(self.filtered().len(), self.page_size)
  }

  /// Jump to a page, clamped to the pages that exist
  pub fn go_to_page(&mut self, page: usize) -> usize {
    self.page = page.clamp(1, self.total_pages().max(1));
    self.page
  }

  pub fn next_page(&mut self) -> usize {
    self.go_to_page(self.page + 1)
  }

  pub fn previous_page(&mut self) -> usize {
    self.go_to_page(self.page.saturating_sub(1))
  }

  pub fn has_next_page(&self) -> bool {
    self.page < self.total_pages()
  }

  pub fn has_previous_page(&self) -> bool {
    self.page > 1
  }

  /// Rows of the current page, numbered across the whole filtered list
  pub fn current_page(&self) -> Vec<PageRow<'_>> {
    let filtered = self.filtered();
    let offset = (self.page - 1) * self.page_size;
    page_slice(&filtered, self.page, self.page_size)
      .iter()
      .enumerate()
      .map(|(idx, record)| PageRow { position: offset + idx + 1, record: *record })
      .collect()
  }

  pub fn completed_count(&self) -> usize {
    self.records.iter().filter(|record| record.is_completed()).count()
  }

  pub fn total_count(&self) -> usize {
    self.records.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Annotation, AnnotationFields};
  use chrono::{TimeZone, Utc};

  fn record(id: &str, created_secs: i64, annotated: bool) -> DashboardRecord {
    let created_at = Utc.timestamp_opt(created_secs, 0).unwrap();
    DashboardRecord {
      id: id.to_string(),
      name: format!("Dashboard {id}"),
      author: "author".to_string(),
      storage_path: format!("screenshots/{id}.png"),
      external_link: None,
      favorite_count: None,
      created_at,
      annotation: annotated.then(|| Annotation {
        fields: AnnotationFields::default(),
        created_at,
        updated_at: created_at,
      }),
    }
  }

  fn ids(records: &[&DashboardRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
  }

  fn mixed(count: usize) -> Vec<DashboardRecord> {
    // deterministic shuffle of timestamps and completion
    (0..count)
      .map(|i| record(&format!("r{i}"), ((i * 7919) % 101) as i64, i % 3 == 0))
      .collect()
  }

  #[test]
  fn test_scenario_order_filter_and_page() {
    let records = vec![record("A", 1, false), record("B", 2, true), record("C", 0, false)];
    let mut list = ListController::with_page_size(1);
    list.replace(records);

    let all: Vec<&DashboardRecord> = list.records().iter().collect();
    assert_eq!(ids(&all), vec!["C", "A", "B"]);

    list.set_filter(StatusFilter::Pending);
    assert_eq!(ids(&list.filtered()), vec!["C", "A"]);

    list.go_to_page(2);
    let page = list.current_page();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].record.id, "A");
    assert_eq!(page[0].position, 2);
  }

  #[test]
  fn test_pending_before_completed_and_oldest_first() {
    let ordered = order_records(mixed(40));
    let first_completed = ordered.iter().position(|r| r.is_completed()).unwrap();
    assert!(ordered[..first_completed].iter().all(|r| !r.is_completed()));
    assert!(ordered[first_completed..].iter().all(|r| r.is_completed()));

    for window in ordered.windows(2) {
      if window[0].is_completed() == window[1].is_completed() {
        assert!(window[0].created_at <= window[1].created_at);
      }
    }
  }

  #[test]
  fn test_equal_timestamps_keep_store_order() {
    let ordered = order_records(vec![record("x", 5, false), record("y", 5, false), record("z", 5, false)]);
    let refs: Vec<&DashboardRecord> = ordered.iter().collect();
    assert_eq!(ids(&refs), vec!["x", "y", "z"]);
  }

  #[test]
  fn test_filters_partition_the_list() {
    let records = order_records(mixed(25));
    let pending = filter_records(&records, StatusFilter::Pending);
    let completed = filter_records(&records, StatusFilter::Completed);
    let all = filter_records(&records, StatusFilter::All);

    assert_eq!(pending.len() + completed.len(), all.len());
    assert!(pending.iter().all(|p| !completed.iter().any(|c| c.id == p.id)));

    let mut recombined = ids(&pending);
    recombined.extend(ids(&completed));
    recombined.sort();
    let mut everything = ids(&all);
    everything.sort();
    assert_eq!(recombined, everything);
  }

  #[test]
  fn test_pages_cover_filtered_list_exactly() {
    for len in 0..=35 {
      let items: Vec<usize> = (0..len).collect();
      let pages = total_pages(len, PAGE_SIZE);
      assert_eq!(pages, (len + PAGE_SIZE - 1) / PAGE_SIZE);

      let mut concatenated = Vec::new();
      for page in 1..=pages {
        let slice = page_slice(&items, page, PAGE_SIZE);
        if page == pages {
          let expected_last = if len % PAGE_SIZE == 0 { PAGE_SIZE } else { len % PAGE_SIZE };
          assert_eq!(slice.len(), expected_last);
        } else {
          assert_eq!(slice.len(), PAGE_SIZE);
        }
        concatenated.extend_from_slice(slice);
      }
      assert_eq!(concatenated, items);
    }
  }

  #[test]
  fn test_page_slice_out_of_range_is_empty() {
    let items = [1, 2, 3];
    assert!(page_slice(&items, 0, 10).is_empty());
    assert!(page_slice(&items, 2, 10).is_empty());
    assert_eq!(page_slice(&items, 1, 10), &[1, 2, 3]);
  }

  #[test]
  fn test_filter_change_resets_page() {
    let mut list = ListController::new();
    list.replace(mixed(35));
    assert_eq!(list.go_to_page(3), 3);

    list.set_filter(StatusFilter::Completed);
    assert_eq!(list.page(), 1);
    assert!(!list.current_page().is_empty());
  }

  #[test]
  fn test_navigation_is_clamped() {
    let mut list = ListController::new();
    list.replace(mixed(25));
    assert_eq!(list.total_pages(), 3);

    assert_eq!(list.previous_page(), 1);
    assert!(!list.has_previous_page());
    assert_eq!(list.go_to_page(99), 3);
    assert_eq!(list.next_page(), 3);
    assert!(!list.has_next_page());
    assert_eq!(list.current_page().len(), 5);
    assert_eq!(list.current_page()[0].position, 21);
  }

  #[test]
  fn test_replace_pulls_page_back_into_range() {
    let mut list = ListController::new();
    list.replace(mixed(30));
    list.go_to_page(3);

    list.replace(mixed(12));
    assert_eq!(list.page(), 2);

    list.replace(Vec::new());
    assert_eq!(list.page(), 1);
    assert!(list.current_page().is_empty());
    assert_eq!(list.total_pages(), 0);
  }

  #[test]
  fn test_progress_counts_whole_list() {
    let mut list = ListController::new();
    list.replace(vec![record("a", 1, true), record("b", 2, false), record("c", 3, true)]);
    list.set_filter(StatusFilter::Pending);

    assert_eq!(list.completed_count(), 2);
    assert_eq!(list.total_count(), 3);
    assert_eq!(list.filtered().len(), 1);
  }

  #[test]
  fn test_status_filter_parsing() {
    assert_eq!("Pending".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
    assert_eq!("done".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
    assert!("archived".parse::<StatusFilter>().is_err());
    assert_eq!(StatusFilter::default().to_string(), "all");
  }
}
