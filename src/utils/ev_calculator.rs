/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
/// Zero odds have no conversion and are rejected before this is called.
pub fn american_odds_to_probability(odds: i32) -> f64 {
    if odds > 0 {
        // For positive odds: 100 / (odds + 100)
        100.0 / (odds as f64 + 100.0)
    } else {
        // For negative odds: |odds| / (|odds| + 100)
        // cast first: i32::MIN has no integer absolute value
        let abs_odds = (odds as f64).abs();
        abs_odds / (abs_odds + 100.0)
    }
}

/// Net profit per $1 staked if the bet wins
pub fn payout_per_dollar(odds: i32) -> f64 {
    if odds > 0 {
        odds as f64 / 100.0
    } else {
        100.0 / (odds as f64).abs()
    }
}

/// Calculate expected value for a bet
/// EV = (probability of winning * amount won per bet) - (probability of losing * amount lost per bet)
/// Returns EV per $1 staked
pub fn calculate_expected_value(model_prob: f64, odds: i32) -> f64 {
    let win_amount = payout_per_dollar(odds);

    let lose_amount = 1.0; // You lose your stake
    let prob_lose = 1.0 - model_prob;

    // EV = (prob_win * win_amount) - (prob_lose * lose_amount)
    (model_prob * win_amount) - (prob_lose * lose_amount)
}
