use serde::{Deserialize, Serialize};

/// A single behavioral event emitted by the storefront widget.
///
/// Wire format: `{"session_id": "...", "event_type": "page_view", "page_type": "product",
/// "page_url": "/products/x", "timestamp": 1718000000.5, "data": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub session_id: String,
    pub event_type: String,
    #[serde(default)]
    pub page_type: Option<String>,
    #[serde(default)]
    pub page_url: String,
    /// Client clock, seconds since the epoch.
    pub timestamp: f64,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TrackingEvent {
    /// Build an event with no page type or payload. Mostly useful in tests and benches.
    pub fn new(session_id: impl Into<String>, event_type: impl Into<String>, timestamp: f64) -> Self {
        Self {
            session_id: session_id.into(),
            event_type: event_type.into(),
            page_type: None,
            page_url: String::new(),
            timestamp,
            data: None,
        }
    }

    pub fn with_page(mut self, page_type: impl Into<String>, page_url: impl Into<String>) -> Self {
        self.page_type = Some(page_type.into());
        self.page_url = page_url.into();
        self
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: String,
}

/// Category label attached to a shown engagement message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Discount,
    Help,
    Urgency,
    Recommendation,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Discount => "discount",
            TriggerType::Help => "help",
            TriggerType::Urgency => "urgency",
            TriggerType::Recommendation => "recommendation",
        }
    }
}

/// Whether (and what) to show the visitor.
///
/// `message` and `trigger_type` are always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub should_show_message: bool,
    pub message: Option<String>,
    pub trigger_type: Option<TriggerType>,
}

impl Decision {
    /// Show `message` under the given trigger.
    pub fn show(message: impl Into<String>, trigger_type: TriggerType) -> Self {
        Self {
            should_show_message: true,
            message: Some(message.into()),
            trigger_type: Some(trigger_type),
        }
    }

    /// Do not show anything.
    pub fn none() -> Self {
        Self {
            should_show_message: false,
            message: None,
            trigger_type: None,
        }
    }

    /// Returned by `/analyze` when analysis itself blows up, so the widget
    /// still gets something sensible to render.
    pub fn safe_default() -> Self {
        Self::show(
            "Thanks for browsing! Get 15% off your first order!",
            TriggerType::Discount,
        )
    }
}
