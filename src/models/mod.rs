use serde::{Deserialize, Serialize};

/// One row of the props dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub player: String,
    pub stat_type: String, // Category (points, rebounds, assists, ...)
    pub line: f64,         // Stat threshold the bet is on (e.g., 25.5)
    pub american_odds: i32, // American odds format (e.g., -110, +150)
    pub model_prob: f64,   // Probability between 0 and 1
}

/// A prop augmented with the derived betting metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProp {
    pub player: String,
    pub stat_type: String,
    pub line: f64,
    pub american_odds: i32,
    pub model_prob: f64,
    pub implied_prob: f64,  // Implied probability from odds
    pub true_prob: f64,     // Model probability taken at face value
    pub ev_per_dollar: f64, // Expected profit per $1 staked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_explanation: Option<String>,
}

impl EnrichedProp {
    /// Format the enriched prop as a readable string
    pub fn format(&self) -> String {
        format!(
            "{} {} {} ({:+}) | EV: {:+.3}/$1 | Model: {:.1}% | Implied: {:.1}%",
            self.player,
            self.stat_type,
            self.line,
            self.american_odds,
            self.ev_per_dollar,
            self.model_prob * 100.0,
            self.implied_prob * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shows_signed_odds_and_percentages() {
        let prop = EnrichedProp {
            player: "LeBron James".to_string(),
            stat_type: "points".to_string(),
            line: 25.5,
            american_odds: -119,
            model_prob: 0.55,
            implied_prob: 0.5434,
            true_prob: 0.55,
            ev_per_dollar: 0.0122,
            llm_explanation: None,
        };

        let text = prop.format();
        assert!(text.contains("LeBron James points 25.5"));
        assert!(text.contains("(-119)"));
        assert!(text.contains("Model: 55.0%"));
        assert!(text.contains("Implied: 54.3%"));
    }

    #[test]
    fn test_json_omits_absent_explanation() {
        let prop = EnrichedProp {
            player: "Stephen Curry".to_string(),
            stat_type: "threes".to_string(),
            line: 4.5,
            american_odds: 120,
            model_prob: 0.48,
            implied_prob: 0.4545,
            true_prob: 0.48,
            ev_per_dollar: 0.056,
            llm_explanation: None,
        };

        let json = serde_json::to_string(&prop).unwrap();
        assert!(!json.contains("llm_explanation"));

        let explained = EnrichedProp {
            llm_explanation: Some("A slight edge over the posted odds.".to_string()),
            ..prop
        };
        let json = serde_json::to_string(&explained).unwrap();
        assert!(json.contains("llm_explanation"));
    }
}
