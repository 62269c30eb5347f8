use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::models::EnrichedProp;

/// Column an analyze result set can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Player,
    StatType,
    Line,
    AmericanOdds,
    ModelProb,
    ImpliedProb,
    TrueProb,
    EvPerDollar,
}

impl SortColumn {
    pub fn parse(name: &str) -> AnalyzeResult<Self> {
        match name {
            "player" => Ok(Self::Player),
            "stat_type" => Ok(Self::StatType),
            "line" => Ok(Self::Line),
            "american_odds" => Ok(Self::AmericanOdds),
            "model_prob" => Ok(Self::ModelProb),
            "implied_prob" => Ok(Self::ImpliedProb),
            "true_prob" => Ok(Self::TrueProb),
            "ev_per_dollar" => Ok(Self::EvPerDollar),
            other => Err(AnalyzeError::Validation(format!(
                "unknown sort_by column '{}'",
                other
            ))),
        }
    }

    fn compare(&self, a: &EnrichedProp, b: &EnrichedProp) -> Ordering {
        match self {
            Self::Player => a.player.cmp(&b.player),
            Self::StatType => a.stat_type.cmp(&b.stat_type),
            Self::Line => cmp_f64(a.line, b.line),
            Self::AmericanOdds => a.american_odds.cmp(&b.american_odds),
            Self::ModelProb => cmp_f64(a.model_prob, b.model_prob),
            Self::ImpliedProb => cmp_f64(a.implied_prob, b.implied_prob),
            Self::TrueProb => cmp_f64(a.true_prob, b.true_prob),
            Self::EvPerDollar => cmp_f64(a.ev_per_dollar, b.ev_per_dollar),
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// A parsed and validated analyze request. Filters are conjunctive:
/// a row must pass every present filter to be included.
#[derive(Debug, Clone)]
pub struct PropsQuery {
    pub min_ev: Option<f64>,
    pub stat_type: Option<String>,
    pub player: Option<String>,
    pub sort_by: SortColumn,
    pub sort_desc: bool,
    pub explain: bool,
}

impl Default for PropsQuery {
    fn default() -> Self {
        Self {
            min_ev: None,
            stat_type: None,
            player: None,
            sort_by: SortColumn::EvPerDollar,
            sort_desc: true,
            explain: false,
        }
    }
}

impl PropsQuery {
    /// Build a query from raw URL parameters. Unknown keys and malformed
    /// values are rejected rather than silently ignored.
    pub fn from_params(params: &HashMap<String, String>) -> AnalyzeResult<Self> {
        let mut query = Self::default();

        for (key, value) in params {
            match key.as_str() {
                "min_ev" => {
                    let min_ev: f64 = value.parse().map_err(|_| {
                        AnalyzeError::Validation(format!(
                            "min_ev must be a number, got '{}'",
                            value
                        ))
                    })?;
                    if !min_ev.is_finite() {
                        return Err(AnalyzeError::Validation(format!(
                            "min_ev must be finite, got '{}'",
                            value
                        )));
                    }
                    query.min_ev = Some(min_ev);
                }
                "stat_type" => query.stat_type = Some(value.clone()),
                "player" => query.player = Some(value.clone()),
                "sort_by" => query.sort_by = SortColumn::parse(value)?,
                "sort_desc" => query.sort_desc = parse_bool("sort_desc", value)?,
                "explain" => query.explain = parse_bool("explain", value)?,
                other => {
                    return Err(AnalyzeError::Validation(format!(
                        "unknown query parameter '{}'",
                        other
                    )));
                }
            }
        }

        Ok(query)
    }

    fn matches(&self, prop: &EnrichedProp) -> bool {
        if let Some(min_ev) = self.min_ev {
            if prop.ev_per_dollar < min_ev {
                return false;
            }
        }
        if let Some(stat_type) = &self.stat_type {
            if prop.stat_type != *stat_type {
                return false;
            }
        }
        if let Some(player) = &self.player {
            if !prop.player.to_lowercase().contains(&player.to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// Filter and sort a snapshot into a result set. The sort is stable,
    /// so rows that compare equal keep their dataset order.
    pub fn apply(&self, props: &[EnrichedProp]) -> Vec<EnrichedProp> {
        let mut rows: Vec<EnrichedProp> =
            props.iter().filter(|p| self.matches(p)).cloned().collect();

        let column = self.sort_by;
        if self.sort_desc {
            rows.sort_by(|a, b| column.compare(b, a));
        } else {
            rows.sort_by(|a, b| column.compare(a, b));
        }
        rows
    }
}

fn parse_bool(name: &str, value: &str) -> AnalyzeResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AnalyzeError::Validation(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}
