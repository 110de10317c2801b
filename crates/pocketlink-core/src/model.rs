use crate::shortcode::ShortCode;
use crate::time;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored short URL together with its click history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntry {
    pub shortcode: ShortCode,
    /// The original URL that was shortened.
    pub long_url: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub clicks: u64,
    #[serde(default)]
    pub click_events: Vec<ClickEvent>,
}

impl UrlEntry {
    /// A fresh entry with no clicks.
    pub fn new(
        shortcode: ShortCode,
        long_url: impl Into<String>,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            shortcode,
            long_url: long_url.into(),
            created_at,
            expires_at,
            clicks: 0,
            click_events: Vec::new(),
        }
    }

    /// Expiry is inclusive: an entry is expired at its `expires_at` instant.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        time::is_expired(self.expires_at, now)
    }
}

/// One visit to a short URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: Timestamp,
    /// Where the visit came from; the `src` query parameter or `direct`.
    pub source: String,
    #[serde(default)]
    pub geo: Geo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

/// Coarse location of a visit. Only `region` is ever filled, with the
/// visitor's time zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub last_updated: Timestamp,
}

/// The whole persisted state: every entry keyed by its shortcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub urls: BTreeMap<ShortCode, UrlEntry>,
    pub meta: Meta,
}

impl StoreDocument {
    pub fn empty(now: Timestamp) -> Self {
        Self {
            urls: BTreeMap::new(),
            meta: Meta { last_updated: now },
        }
    }

    /// Entries sorted by creation time, newest first.
    pub fn newest_first(&self) -> Vec<&UrlEntry> {
        let mut entries: Vec<&UrlEntry> = self.urls.values().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }
}
