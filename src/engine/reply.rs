use serde::Deserialize;
use tracing::debug;

use crate::error::EngineError;
use crate::types::{Decision, TriggerType};

pub const DEFAULT_MESSAGE: &str = "Special offer just for you!";
pub const DEFAULT_TRIGGER: TriggerType = TriggerType::Discount;

/// The JSON object the model is asked to produce.
#[derive(Debug, Deserialize)]
pub struct GeneratedReply {
    pub should_show_message: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub trigger_type: Option<TriggerType>,
}

impl GeneratedReply {
    pub fn into_decision(self) -> Decision {
        if !self.should_show_message {
            return Decision::none();
        }
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.into());
        Decision::show(message, self.trigger_type.unwrap_or(DEFAULT_TRIGGER))
    }
}

/// Parse a model reply into a [`Decision`].
///
/// Models often wrap the object in prose or a Markdown fence, so the outermost
/// `{ ... }` span is extracted first. Anything that does not deserialize into
/// [`GeneratedReply`] is rejected.
pub fn parse_reply(text: &str) -> Result<Decision, EngineError> {
    let json = extract_object(text)
        .ok_or_else(|| EngineError::MalformedReply("no JSON object in reply".into()))?;

    let reply: GeneratedReply =
        serde_json::from_str(json).map_err(|e| EngineError::MalformedReply(e.to_string()))?;

    if let Some(reasoning) = reply.reasoning.as_deref() {
        debug!(reasoning, "model reasoning");
    }
    Ok(reply.into_decision())
}

fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
