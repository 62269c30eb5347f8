use std::cmp::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::EnrichedProp;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_TOKENS: u32 = 160;
const TEMPERATURE: f64 = 0.3;

/// How many rows of a result set get an explanation attached.
pub const EXPLAIN_TOP_K: usize = 3;

/// Response from an OpenAI-compatible chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

pub struct ExplainApiClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl ExplainApiClient {
    pub fn new(base_url: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");
        Self {
            base_url,
            model,
            client,
        }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// Ask the completion endpoint for a short explanation of one prop.
    pub async fn explain_prop(&self, prop: &EnrichedProp) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You are a concise NBA betting assistant." },
                { "role": "user", "content": explanation_prompt(prop) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(self.endpoint_url())
            .json(&payload)
            .send()
            .await
            .context("Failed to reach completion endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("completion endpoint returned error: {}", response.status());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .context("completion response contained no choices")?;

        Ok(content)
    }
}

fn explanation_prompt(prop: &EnrichedProp) -> String {
    format!(
        "You are an NBA betting assistant. Explain this player prop in 2-3 sentences \
         for a casual sports bettor.\n\n\
         Player: {}\n\
         Stat line: {} {}\n\
         American odds: {:+}\n\
         Implied probability: {:.3}\n\
         Estimated true probability: {:.3}\n\
         Expected value per $1: {:.3}\n\n\
         Mention whether this seems like a positive or negative value bet and why, \
         using simple language. Do not give gambling advice; just describe the numbers.",
        prop.player,
        prop.line,
        prop.stat_type,
        prop.american_odds,
        prop.implied_prob,
        prop.true_prob,
        prop.ev_per_dollar
    )
}

/// Optional explanation capability. Stays disabled unless a completion
/// endpoint is configured, and every failure downgrades to "no
/// explanation" so analysis results never depend on the endpoint
/// being reachable.
pub enum ExplanationService {
    Disabled,
    Endpoint(ExplainApiClient),
}

impl ExplanationService {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.vllm_base_url {
            Some(base_url) => Self::Endpoint(ExplainApiClient::new(
                base_url.clone(),
                config.vllm_model.clone(),
            )),
            None => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Endpoint(_))
    }

    /// Explain one prop. Returns None when disabled or on any failure.
    pub async fn explain(&self, prop: &EnrichedProp) -> Option<String> {
        let client = match self {
            Self::Disabled => return None,
            Self::Endpoint(client) => client,
        };

        match client.explain_prop(prop).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(
                    "explanation request failed for {} {}: {:#}",
                    prop.player, prop.stat_type, e
                );
                None
            }
        }
    }

    /// Attach explanations to the highest-EV rows of a result set.
    /// Row order is untouched; only `llm_explanation` changes, and only
    /// for requests that actually succeed.
    pub async fn annotate_top(&self, rows: &mut [EnrichedProp]) {
        if !self.is_enabled() || rows.is_empty() {
            return;
        }

        info!(
            "generating explanations for the top {} rows",
            rows.len().min(EXPLAIN_TOP_K)
        );

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| {
            rows[b]
                .ev_per_dollar
                .partial_cmp(&rows[a].ev_per_dollar)
                .unwrap_or(Ordering::Equal)
        });

        for &i in order.iter().take(EXPLAIN_TOP_K) {
            let explanation = self.explain(&rows[i]).await;
            rows[i].llm_explanation = explanation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(player: &str, ev: f64) -> EnrichedProp {
        EnrichedProp {
            player: player.to_string(),
            stat_type: "points".to_string(),
            line: 25.5,
            american_odds: -119,
            model_prob: 0.55,
            implied_prob: 0.543,
            true_prob: 0.55,
            ev_per_dollar: ev,
            llm_explanation: None,
        }
    }

    fn endpoint_config(base_url: &str) -> AppConfig {
        AppConfig {
            vllm_base_url: Some(base_url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_service_disabled_without_base_url() {
        let service = ExplanationService::from_config(&AppConfig::default());
        assert!(!service.is_enabled());
    }

    #[test]
    fn test_service_enabled_with_base_url() {
        let service = ExplanationService::from_config(&endpoint_config("http://llm:8000"));
        assert!(service.is_enabled());
    }

    #[test]
    fn test_endpoint_url_handles_trailing_slash() {
        let client = ExplainApiClient::new(
            "http://llm:8000/".to_string(),
            "mistral-7b-instruct".to_string(),
        );
        assert_eq!(client.endpoint_url(), "http://llm:8000/v1/chat/completions");

        let client = ExplainApiClient::new(
            "http://llm:8000".to_string(),
            "mistral-7b-instruct".to_string(),
        );
        assert_eq!(client.endpoint_url(), "http://llm:8000/v1/chat/completions");
    }

    #[test]
    fn test_prompt_includes_the_numbers() {
        let prompt = explanation_prompt(&enriched("LeBron James", 0.012));
        assert!(prompt.contains("Player: LeBron James"));
        assert!(prompt.contains("Stat line: 25.5 points"));
        assert!(prompt.contains("American odds: -119"));
        assert!(prompt.contains("Implied probability: 0.543"));
        assert!(prompt.contains("Expected value per $1: 0.012"));
    }

    #[tokio::test]
    async fn test_disabled_service_returns_none() {
        let service = ExplanationService::Disabled;
        assert_eq!(service.explain(&enriched("LeBron James", 0.012)).await, None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_none() {
        // port 9 (discard) is not listening; the request fails fast
        let service = ExplanationService::from_config(&endpoint_config("http://127.0.0.1:9"));
        assert_eq!(service.explain(&enriched("LeBron James", 0.012)).await, None);
    }

    #[tokio::test]
    async fn test_annotate_top_is_a_no_op_when_disabled() {
        let service = ExplanationService::Disabled;
        let mut rows = vec![enriched("a", 0.05), enriched("b", 0.01)];

        service.annotate_top(&mut rows).await;

        assert!(rows.iter().all(|r| r.llm_explanation.is_none()));
        assert_eq!(rows[0].player, "a");
        assert_eq!(rows[1].player, "b");
    }

    #[tokio::test]
    async fn test_annotate_top_failures_leave_rows_unexplained() {
        let service = ExplanationService::from_config(&endpoint_config("http://127.0.0.1:9"));
        let mut rows = vec![
            enriched("low", 0.01),
            enriched("high", 0.09),
            enriched("mid", 0.05),
            enriched("lowest", -0.02),
        ];

        service.annotate_top(&mut rows).await;

        // every request failed, so no explanations and no reordering
        assert!(rows.iter().all(|r| r.llm_explanation.is_none()));
        let players: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["low", "high", "mid", "lowest"]);
    }
}
