//! Structured search-results replies.
//!
//! ```json
//! { "type": "search_results", "title": "...",
//!   "results": [ { "number": 1, "title": "...", "content": "...", "url": "..." } ] }
//! ```

use log::debug;
use serde::Deserialize;

use super::fragment::{SearchResult, SearchResults};

pub const SEARCH_RESULTS_TYPE: &str = "search_results";

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    results: Vec<SearchResult>,
}

/// Returns the payload when `raw` is a well-formed search-results object.
///
/// Anything else (not JSON, another `type`, missing fields) is `None` and the
/// caller falls back to text formatting.
pub fn detect(raw: &str) -> Option<SearchResults> {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('{') {
        return None;
    }
    let payload: SearchPayload = match serde_json::from_str(trimmed) {
        Ok(p) => p,
        Err(e) => {
            debug!("Reply looks like JSON but is not a search payload: {}", e);
            return None;
        }
    };
    if payload.kind != SEARCH_RESULTS_TYPE {
        debug!("Ignoring structured reply of type {:?}", payload.kind);
        return None;
    }
    Some(SearchResults {
        title: payload.title,
        results: payload.results,
    })
}
