use serde::Serialize;
use tracing::debug;

use crate::types::TrackingEvent;

/// Number of trailing events kept verbatim for prompt context.
pub const RECENT_EVENT_WINDOW: usize = 5;

pub const PAGE_VIEW: &str = "page_view";
pub const CLICK: &str = "click";
pub const ADD_TO_CART: &str = "add_to_cart";

/// Reduced view of a session, recomputed on every analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_events: usize,
    pub page_views: usize,
    pub clicks: usize,
    pub cart_actions: usize,
    /// Last timestamp minus first. Not clamped, so out-of-order input can make it negative.
    pub session_duration: f64,
    pub product_page_views: usize,
    pub cart_page_views: usize,
    pub current_page: String,
    pub has_cart_items: bool,
    pub recent_events: Vec<TrackingEvent>,
}

impl SessionSummary {
    /// Neutral summary for a session with no events.
    pub fn empty() -> Self {
        Self {
            total_events: 0,
            page_views: 0,
            clicks: 0,
            cart_actions: 0,
            session_duration: 0.0,
            product_page_views: 0,
            cart_page_views: 0,
            current_page: "unknown".into(),
            has_cart_items: false,
            recent_events: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_events == 0
    }
}

impl Default for SessionSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reduce an ordered event list to a [`SessionSummary`].
pub fn summarize(events: &[TrackingEvent]) -> SessionSummary {
    let (first, last) = match (events.first(), events.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return SessionSummary::empty(),
    };

    let mut page_views = 0;
    let mut clicks = 0;
    let mut cart_actions = 0;
    let mut product_page_views = 0;
    let mut cart_page_views = 0;

    for event in events {
        match event.event_type.as_str() {
            PAGE_VIEW => {
                page_views += 1;
                match event.page_type.as_deref() {
                    Some("product") => product_page_views += 1,
                    Some("cart") => cart_page_views += 1,
                    _ => {}
                }
            }
            CLICK => clicks += 1,
            ADD_TO_CART => cart_actions += 1,
            _ => {}
        }
    }

    let recent_start = events.len().saturating_sub(RECENT_EVENT_WINDOW);

    let summary = SessionSummary {
        total_events: events.len(),
        page_views,
        clicks,
        cart_actions,
        session_duration: last.timestamp - first.timestamp,
        product_page_views,
        cart_page_views,
        current_page: last
            .page_type
            .clone()
            .unwrap_or_else(|| "unknown".into()),
        has_cart_items: cart_actions > 0,
        recent_events: events[recent_start..].to_vec(),
    };

    debug!(?summary, "session summarized");
    summary
}
