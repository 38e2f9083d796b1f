use crate::analyzer::SessionSummary;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a smart e-commerce engagement assistant.";

/// Render the user prompt for a session summary.
pub fn build_prompt(summary: &SessionSummary) -> String {
    format!(
        r#"You are an AI assistant helping an e-commerce store engage customers at the right moment.

Analyze this user session data and decide if you should show an engagement message:

Session Analysis:
- Total page views: {page_views}
- Total clicks: {clicks}
- Products viewed: {product_views}
- Cart interactions: {cart_actions}
- Session duration: {duration:.1} seconds
- Current page type: {current_page}
- Has items in cart: {has_cart}

Rules for engagement:
1. Don't be annoying - only show messages when it adds value
2. Consider user behavior patterns (hesitation, high engagement, etc.)
3. Time messages appropriately (not too early, not too late)
4. Personalize based on behavior

Respond with a single JSON object and nothing else:
{{
    "should_show_message": true | false,
    "message": "Your personalized message here (max 50 words)",
    "reasoning": "Brief explanation of why",
    "trigger_type": "discount" | "help" | "urgency" | "recommendation" | null
}}
"#,
        page_views = summary.page_views,
        clicks = summary.clicks,
        product_views = summary.product_page_views,
        cart_actions = summary.cart_actions,
        duration = summary.session_duration,
        current_page = summary.current_page,
        has_cart = summary.has_cart_items,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_summary_fields() {
        let summary = SessionSummary {
            total_events: 4,
            page_views: 2,
            clicks: 1,
            cart_actions: 1,
            session_duration: 12.345,
            product_page_views: 2,
            cart_page_views: 0,
            current_page: "product".into(),
            has_cart_items: true,
            recent_events: Vec::new(),
        };

        let prompt = build_prompt(&summary);
        assert!(prompt.contains("- Total page views: 2"));
        assert!(prompt.contains("- Total clicks: 1"));
        assert!(prompt.contains("- Products viewed: 2"));
        assert!(prompt.contains("- Cart interactions: 1"));
        assert!(prompt.contains("- Session duration: 12.3 seconds"));
        assert!(prompt.contains("- Current page type: product"));
        assert!(prompt.contains("- Has items in cart: true"));
    }

    #[test]
    fn prompt_states_engagement_rules_and_schema() {
        let prompt = build_prompt(&SessionSummary::empty());
        assert!(prompt.contains("Don't be annoying"));
        assert!(prompt.contains("Personalize based on behavior"));
        assert!(prompt.contains("\"should_show_message\""));
        assert!(prompt.contains("\"trigger_type\""));
        assert!(prompt.contains("- Current page type: unknown"));
        assert!(prompt.contains("- Session duration: 0.0 seconds"));
    }
}
