// Request and response shapes for the external API.
//
// Records are owned by the server, so responses are only typed as far as
// the client needs (ids, folio numbers). Every other field is kept in a
// flattened map and printed back untouched.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// The `{ "data": ... }` envelope every endpoint answers with. Extra
/// top-level keys (pagination info and the like) land in `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Page {
    /// Folio label such as `1r`. Numeric folios are rendered as text;
    /// missing or null folios give `None`.
    pub fn folio_number(&self) -> Option<String> {
        match self.fields.get("folioNumber")? {
            Value::String(folio) => Some(folio.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Rectangle on a manuscript page, in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Region { x, y, width, height }
    }
}

/// Body for `POST symbols`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymbol {
    pub page_id: i64,
    #[serde(flatten)]
    pub region: Region,
    #[serde(skip_serializing_if = "blank_category")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "blank_metadata")]
    pub metadata: Option<Map<String, Value>>,
}

fn blank_category(category: &Option<String>) -> bool {
    category.as_deref().map_or(true, str::is_empty)
}

fn blank_metadata(metadata: &Option<Map<String, Value>>) -> bool {
    metadata.as_ref().map_or(true, Map::is_empty)
}

impl NewSymbol {
    pub fn new(page_id: i64, region: Region) -> Self {
        NewSymbol {
            page_id,
            region,
            category: None,
            metadata: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Body for `POST annotations`. Annotations are public unless marked
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnotation {
    pub page_id: i64,
    #[serde(flatten)]
    pub region: Region,
    pub content: String,
    pub is_public: bool,
}

impl NewAnnotation {
    pub fn new(page_id: i64, region: Region, content: impl Into<String>) -> Self {
        NewAnnotation {
            page_id,
            region,
            content: content.into(),
            is_public: true,
        }
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(ApiError::InvalidArgument(format!(
                "vote type must be 'upvote' or 'downvote', got '{other}'"
            ))),
        }
    }
}

/// Window the leaderboard is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    #[default]
    Weekly,
    Monthly,
    #[value(name = "alltime")]
    AllTime,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Daily,
        Timeframe::Weekly,
        Timeframe::Monthly,
        Timeframe::AllTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::AllTime => "alltime",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Timeframe::ALL.iter().map(|t| t.as_str()).collect();
                ApiError::InvalidArgument(format!(
                    "timeframe must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}
