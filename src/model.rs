/// Core data types for the reserve guide.
///
/// This module defines the shared domain model imported by all other modules:
/// the reserve record as it appears in the catalog, and the error types raised
/// while loading it or talking to the guide endpoint. No I/O happens here.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The two categories a reserve can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReserveType {
    Natural,
    Royal,
}

impl ReserveType {
    /// Display label shown on badges and filter buttons.
    pub fn label(&self) -> &'static str {
        match self {
            ReserveType::Natural => "طبيعية",
            ReserveType::Royal => "ملكية",
        }
    }

    /// The other category. There are exactly two.
    pub fn complement(&self) -> ReserveType {
        match self {
            ReserveType::Natural => ReserveType::Royal,
            ReserveType::Royal => ReserveType::Natural,
        }
    }
}

impl fmt::Display for ReserveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Reserve record
// ---------------------------------------------------------------------------

/// Species lists, display-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Wildlife {
    pub animals: Vec<String>,
    pub plants: Vec<String>,
    pub birds: Vec<String>,
}

/// Optional social handles. At most one per platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Social {
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub social: Social,
}

/// Visitor statistics shown on the info tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub monthly_visitors: u32,
    pub yearly_visitors: u32,
    /// Expected within 0–5.
    pub rating: f64,
    pub peak_season: String,
}

/// One protected area in the catalog.
///
/// All descriptive fields are opaque display strings; nothing parses them.
/// `coordinates` is (latitude, longitude) in WGS84 and is used only as the
/// map marker position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reserve {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub reserve_type: ReserveType,
    pub region: String,
    pub area: String,
    pub established: String,
    pub coordinates: (f64, f64),
    pub description: String,
    pub short_description: String,
    pub climate: String,
    pub wildlife: Wildlife,
    pub activities: Vec<String>,
    pub contact: Contact,
    pub stats: Statistics,
    pub image_url: String,
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl Reserve {
    pub fn latitude(&self) -> f64 {
        self.coordinates.0
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.1
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while loading the reserve catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Duplicate reserve id '{0}' in catalog")]
    DuplicateId(String),
    #[error("Catalog contains no reserves")]
    Empty,
}

/// Errors that can arise when asking the guide endpoint for a reply.
///
/// These never reach the chat user directly. The chat session logs them and
/// shows the fixed fallback text instead.
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    /// The request never completed (DNS, TLS, connection reset, timeout).
    #[error("Request failed: {0}")]
    Transport(String),
    /// Non-2xx HTTP response from the endpoint.
    #[error("HTTP error: {status}: {body}")]
    Http { status: u16, body: String },
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The response parsed but carried no text.
    #[error("Empty response: no text in candidates")]
    EmptyResponse,
}

impl From<reqwest::Error> for GuideError {
    fn from(err: reqwest::Error) -> Self {
        GuideError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GuideError {
    fn from(err: serde_json::Error) -> Self {
        GuideError::Parse(err.to_string())
    }
}
