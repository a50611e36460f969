use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reviewer's answer to "does this dashboard use the expected dataset?"
///
/// Stored as a nullable boolean; `Unset` means nobody has answered yet, which
/// is different from answering "no".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum DatasetMatch {
  #[default]
  Unset,
  Yes,
  No,
}

impl From<Option<bool>> for DatasetMatch {
  fn from(value: Option<bool>) -> Self {
    match value {
      None => DatasetMatch::Unset,
      Some(true) => DatasetMatch::Yes,
      Some(false) => DatasetMatch::No,
    }
  }
}

impl From<DatasetMatch> for Option<bool> {
  fn from(value: DatasetMatch) -> Self {
    match value {
      DatasetMatch::Unset => None,
      DatasetMatch::Yes => Some(true),
      DatasetMatch::No => Some(false),
    }
  }
}

impl fmt::Display for DatasetMatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      DatasetMatch::Unset => "unset",
      DatasetMatch::Yes => "yes",
      DatasetMatch::No => "no",
    };
    f.write_str(label)
  }
}

impl FromStr for DatasetMatch {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "yes" | "y" | "true" => Ok(DatasetMatch::Yes),
      "no" | "n" | "false" => Ok(DatasetMatch::No),
      "unset" | "none" | "" => Ok(DatasetMatch::Unset),
      other => Err(format!("Invalid dataset answer '{other}'. Use yes, no or unset")),
    }
  }
}

/// The editable content of an annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationFields {
  #[serde(rename = "expected_dataset", default)]
  pub dataset_matches: DatasetMatch,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub insight_part_1: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub insight_part_2: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub insight_part_3: String,
}

impl AnnotationFields {
  pub fn insights(&self) -> [&str; 3] {
    [&self.insight_part_1, &self.insight_part_2, &self.insight_part_3]
  }
}

/// A saved human judgment. At most one exists per dashboard record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Annotation {
  #[serde(flatten)]
  pub fields: AnnotationFields,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Pending,
  Completed,
}

impl Status {
  pub fn label(&self) -> &'static str {
    match self {
      Status::Pending => "Pending",
      Status::Completed => "Completed",
    }
  }
}

/// One reviewable dashboard snapshot, joined with its annotation if any.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardRecord {
  pub id: String,
  #[serde(rename = "dashboard_name", default, deserialize_with = "null_as_empty")]
  pub name: String,
  #[serde(rename = "dashboard_author", default, deserialize_with = "null_as_empty")]
  pub author: String,
  #[serde(rename = "bucket_path", default, deserialize_with = "null_as_empty")]
  pub storage_path: String,
  #[serde(rename = "dashboard_link", default)]
  pub external_link: Option<String>,
  #[serde(default)]
  pub favorite_count: Option<i64>,
  pub created_at: DateTime<Utc>,
  #[serde(rename = "human_insights", default, deserialize_with = "first_annotation")]
  pub annotation: Option<Annotation>,
}

impl DashboardRecord {
  /// Completion is decided by existence of an annotation, never by its content
  pub fn is_completed(&self) -> bool {
    self.annotation.is_some()
  }

  pub fn status(&self) -> Status {
    if self.is_completed() {
      Status::Completed
    } else {
      Status::Pending
    }
  }

  /// External link, ignoring blank strings left behind by the scraper
  pub fn link(&self) -> Option<&str> {
    self.external_link.as_deref().map(str::trim).filter(|link| !link.is_empty())
  }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The embedded relation arrives as a list for one-to-many embeds and as a
/// single object (or null) once the foreign key is declared unique.
#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded {
  Many(Vec<Annotation>),
  One(Annotation),
}

fn first_annotation<'de, D>(deserializer: D) -> Result<Option<Annotation>, D::Error>
where
  D: Deserializer<'de>,
{
  let embedded = Option::<Embedded>::deserialize(deserializer)?;
  Ok(match embedded {
    None => None,
    Some(Embedded::One(annotation)) => Some(annotation),
    Some(Embedded::Many(annotations)) => annotations.into_iter().next(),
  })
}
