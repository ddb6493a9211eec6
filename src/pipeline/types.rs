//! Shared types for the engagement pipeline.

use serde::{Deserialize, Serialize};

use crate::geo::GeoLocation;
use crate::store::models::{Conversation, Message};

/// Browser data reported by the messenger widget on connect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserInfo {
    /// Browser locale, e.g. "en".
    pub language: Option<String>,
    /// URL of the page the visitor is currently on.
    pub url: Option<String>,
}

/// Snapshot of a visitor's browsing context, built once per rule-set check.
///
/// `city`/`country` stay unset until enrichment runs, and enrichment only
/// runs when some rule actually targets them.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    pub browser_language: Option<String>,
    pub current_page_url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub number_of_visits: u32,
}

impl VisitorContext {
    pub fn new(browser_info: &BrowserInfo, number_of_visits: u32) -> Self {
        Self {
            browser_language: browser_info.language.clone(),
            current_page_url: browser_info.url.clone(),
            city: None,
            country: None,
            number_of_visits,
        }
    }

    pub fn with_location(mut self, location: GeoLocation) -> Self {
        self.city = location.city;
        self.country = location.country;
        self
    }
}

/// A fired engagement: the conversation and its initiating message,
/// created together.
#[derive(Debug, Clone, Serialize)]
pub struct EngagePair {
    pub conversation: Conversation,
    pub message: Message,
}
