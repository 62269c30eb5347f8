use crate::error::{AnalyzeError, AnalyzeResult};
use crate::models::{EnrichedProp, Prop};
use crate::utils::ev_calculator::{american_odds_to_probability, calculate_expected_value};

/// Compute the derived betting metrics for every prop.
///
/// The model probability is taken at face value as the true win probability;
/// no de-vig or calibration is applied. Input order is preserved, and no
/// rounding happens here: display rounding belongs to the render layer.
pub fn enrich_props(props: &[Prop]) -> AnalyzeResult<Vec<EnrichedProp>> {
    props
        .iter()
        .enumerate()
        .map(|(i, prop)| enrich_one(i + 1, prop))
        .collect()
}

fn enrich_one(row: usize, prop: &Prop) -> AnalyzeResult<EnrichedProp> {
    if !prop.model_prob.is_finite() || !(0.0..=1.0).contains(&prop.model_prob) {
        return Err(AnalyzeError::Schema(format!(
            "row {}: model_prob {} is outside [0, 1]",
            row, prop.model_prob
        )));
    }
    if !prop.line.is_finite() {
        return Err(AnalyzeError::Schema(format!(
            "row {}: line is not a finite number",
            row
        )));
    }
    if prop.american_odds == 0 {
        return Err(AnalyzeError::Odds(format!(
            "row {}: american_odds of 0 has no probability conversion",
            row
        )));
    }

    let implied_prob = american_odds_to_probability(prop.american_odds);
    let true_prob = prop.model_prob;
    let ev_per_dollar = calculate_expected_value(true_prob, prop.american_odds);

    Ok(EnrichedProp {
        player: prop.player.clone(),
        stat_type: prop.stat_type.clone(),
        line: prop.line,
        american_odds: prop.american_odds,
        model_prob: prop.model_prob,
        implied_prob,
        true_prob,
        ev_per_dollar,
        llm_explanation: None,
    })
}
