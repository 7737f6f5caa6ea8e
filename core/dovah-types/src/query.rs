//! Filter criteria and the server-side query derived from them.
//!
//! Search text, the favorites flag, the MIME prefix and the sort order are
//! applied by the server. The tag filter is never sent: it is resolved
//! locally against the fetched file list.

use crate::ids::TagId;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-side ordering of the file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Recent,
    Oldest,
    Name,
    NameDesc,
}

impl SortOrder {
    /// Value of the `order` query parameter.
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Oldest => "oldest",
            Self::Name => "name",
            Self::NameDesc => "name_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            "name" => Ok(Self::Name),
            "name_desc" => Ok(Self::NameDesc),
            other => Err(Error::UnknownSortOrder(other.to_string())),
        }
    }
}

/// The MIME type families offered as quick filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    All,
    Image,
    Video,
    Audio,
    Pdf,
    Text,
}

impl MediaKind {
    pub const ALL: [MediaKind; 6] = [
        Self::All,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Pdf,
        Self::Text,
    ];

    /// MIME prefix sent as the `type` parameter; `None` means no filter.
    #[must_use]
    pub const fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Image => Some("image/"),
            Self::Video => Some("video/"),
            Self::Audio => Some("audio/"),
            Self::Pdf => Some("application/pdf"),
            Self::Text => Some("text/"),
        }
    }
}

/// Transient filter state driving both the server query and the local view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_text: String,
    pub favorites_only: bool,
    pub mime_type_prefix: Option<String>,
    /// Applied locally only.
    pub tag_id: Option<TagId>,
    #[serde(default)]
    pub order: SortOrder,
}

impl FilterCriteria {
    /// The part of the criteria the server sees.
    #[must_use]
    pub fn file_query(&self) -> FileQuery {
        FileQuery::from(self)
    }

    /// Sets the MIME prefix from a quick-filter kind.
    pub fn set_kind(&mut self, kind: MediaKind) {
        self.mime_type_prefix = kind.prefix().map(str::to_string);
    }
}

/// Query parameters for `GET /files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FileQuery {
    /// Trimmed search text; `None` when blank.
    pub search: Option<String>,
    pub favorites_only: bool,
    pub mime_type_prefix: Option<String>,
    pub order: SortOrder,
}

impl From<&FilterCriteria> for FileQuery {
    fn from(criteria: &FilterCriteria) -> Self {
        let search = criteria.search_text.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            favorites_only: criteria.favorites_only,
            mime_type_prefix: criteria
                .mime_type_prefix
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            order: criteria.order,
        }
    }
}

impl FileQuery {
    /// Query pairs in the order the web client sends them. Defaults are
    /// omitted so an unfiltered query carries no parameters at all.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if self.favorites_only {
            pairs.push(("favorites", "1".to_string()));
        }
        if let Some(prefix) = &self.mime_type_prefix {
            pairs.push(("type", prefix.clone()));
        }
        if self.order != SortOrder::Recent {
            pairs.push(("order", self.order.as_param().to_string()));
        }
        pairs
    }
}
