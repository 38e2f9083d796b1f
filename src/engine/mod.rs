pub mod prompt;
pub mod providers;
pub mod reply;

use tracing::{debug, info, warn};

use crate::analyzer::SessionSummary;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::{Decision, TriggerType};

use providers::TextGenerator;

/// Decides whether to show an engagement message for a session.
///
/// One generation attempt per decision. Any failure on that path, including
/// having no provider at all, lands on [`fallback_decision`].
pub struct DecisionEngine {
    generator: Option<Box<dyn TextGenerator>>,
    system_prompt: String,
}

impl DecisionEngine {
    pub fn new(generator: Option<Box<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.into(),
        }
    }

    /// Heuristic-only engine.
    pub fn heuristic() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let generator = providers::from_config(config)?;
        match &generator {
            Some(g) => info!(provider = g.name(), model = %config.model, "text generation enabled"),
            None if !config.enabled => info!("text generation disabled, using heuristic decisions"),
            None => warn!(
                provider = %config.provider,
                "no API key found, using heuristic decisions"
            ),
        }

        let engine = Self::new(generator);
        Ok(match &config.system_prompt {
            Some(system) => engine.with_system_prompt(system.as_str()),
            None => engine,
        })
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Decide for `summary`. Never fails.
    pub async fn decide(&self, summary: &SessionSummary) -> Decision {
        match self.generate(summary).await {
            Ok(decision) => decision,
            Err(EngineError::NotConfigured) => fallback_decision(summary),
            Err(e) => {
                warn!("generation failed, using fallback: {e}");
                fallback_decision(summary)
            }
        }
    }

    /// Ask the configured provider for a decision.
    pub async fn generate(&self, summary: &SessionSummary) -> Result<Decision, EngineError> {
        let generator = self.generator.as_deref().ok_or(EngineError::NotConfigured)?;

        let prompt = prompt::build_prompt(summary);
        let text = generator.complete(&self.system_prompt, &prompt).await?;
        debug!(provider = generator.name(), reply = %text, "generation reply");

        let decision = reply::parse_reply(&text)?;
        info!(
            show = decision.should_show_message,
            trigger = decision.trigger_type.map_or("none", |t| t.as_str()),
            "generated decision"
        );
        Ok(decision)
    }
}

pub const CART_MESSAGE: &str = "Great choice! Complete your order for free shipping!";
pub const BROWSING_MESSAGE: &str = "Still browsing? Get 10% off your first order!";

/// Minimum activity before a browsing visitor is offered a discount.
pub const BROWSING_EVENT_THRESHOLD: usize = 3;

/// Rule-based decision used whenever generation is unavailable or fails.
pub fn fallback_decision(summary: &SessionSummary) -> Decision {
    if summary.has_cart_items {
        return Decision::show(CART_MESSAGE, TriggerType::Urgency);
    }

    if summary.total_events >= BROWSING_EVENT_THRESHOLD {
        return Decision::show(BROWSING_MESSAGE, TriggerType::Discount);
    }

    Decision::none()
}
