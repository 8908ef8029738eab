//! Core data models used throughout the catalog.
//!
//! These types are read-only projections built per request: the search
//! filters coming in, and the search-result and detail records going out.

use serde::{Deserialize, Serialize};

/// Placeholder stored in an aggregate list when the relationship is empty.
pub const NONE_SENTINEL: &str = "None";

/// The four optional free-text search filters.
///
/// Empty strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SearchParams {
    pub fn new(
        label: Option<String>,
        classifier: Option<String>,
        agent: Option<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            label,
            classifier,
            agent,
            date,
        }
    }

    /// True when no filter carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        [&self.label, &self.classifier, &self.agent, &self.date]
            .iter()
            .all(|f| f.as_deref().map_or(true, str::is_empty))
    }
}

/// One search hit.
///
/// `agents` holds `"name (role)"` descriptors sorted by name then role;
/// `classifiers` holds lower-cased names sorted alphabetically. An empty
/// relationship is `["None"]` (see [`NONE_SENTINEL`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogObject {
    pub id: i64,
    pub label: String,
    pub date: String,
    pub agents: Vec<String>,
    pub classifiers: Vec<String>,
}

/// A production credit on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub part: String,
    pub name: String,
    /// Newline-joined nationality descriptors, empty when none are recorded.
    pub nationalities: String,
    pub timespan: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub ref_type: String,
    pub content: String,
}

/// Reference rows for an object, or an explicit marker that none exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum References {
    Entries(Vec<Reference>),
    NoData,
}

impl References {
    pub fn from_rows(rows: Vec<Reference>) -> Self {
        if rows.is_empty() {
            Self::NoData
        } else {
            Self::Entries(rows)
        }
    }

    pub fn entries(&self) -> &[Reference] {
        match self {
            Self::Entries(rows) => rows,
            Self::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Full record for an object's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectDetail {
    pub id: i64,
    pub accession_no: String,
    pub date: String,
    /// Comma-joined place labels.
    pub places: Option<String>,
    pub department: Option<String>,
    pub label: String,
    pub productions: Vec<Production>,
    pub classifications: Vec<String>,
    pub references: References,
    pub has_image: bool,
    /// Thumbnail URL, set only when the image exists.
    pub image_url: Option<String>,
}
