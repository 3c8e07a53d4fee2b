use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A pool entry that may be suggested to a user.
///
/// Only `id` matters to the engine. Everything else the pool document
/// carries is kept in `extra` and handed back to the client verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateSong {
    /// `"artistSlug/songSlug"`
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a user already knows: played and liked song ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserActivity {
    pub history: Vec<String>,
    pub liked: Vec<String>,
}

impl UserActivity {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.liked.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidatePools {
    pub popular: Vec<CandidateSong>,
    pub chart: Vec<CandidateSong>,
}

impl CandidatePools {
    pub fn len(&self) -> usize {
        self.popular.len() + self.chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Documents as the session service and the chart refresher write them.

#[derive(Debug, Default, Deserialize)]
pub(super) struct HistoryDocument {
    #[serde(default)]
    pub history: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct LikesDocument {
    #[serde(default)]
    pub liked: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PoolDocument {
    #[serde(default)]
    pub songs: Vec<Value>,
}

/// Pulls the `id` out of an activity entry, ignoring entries without one.
pub(super) fn entry_ids(entries: Vec<Value>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            _ => None,
        })
        .collect()
}
