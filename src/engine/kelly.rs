//! Kelly criterion stake sizing for a prop at American odds.

use super::odds::{american_to_decimal, american_to_probability, fair_probability, is_valid_american};
use super::types::{EdgeResult, OddsQuote, StakeSuggestion};
use crate::config::StakeConfig;

/// Map an edge percent to a win probability.
///
/// `p = clamp(base + |edge| * per_pct, min, max)`. The clamp keeps a large
/// projection gap from implying near-certainty.
pub fn estimate_win_probability(edge_percent: f64, config: &StakeConfig) -> f64 {
    let p = config.base_win_probability + edge_percent.abs() * config.win_prob_per_edge_pct;
    p.clamp(config.min_win_probability, config.max_win_probability)
}

/// Fractional-Kelly stake.
///
/// - `win_probability`: 0–1
/// - `american_price`: price for the side being bet
/// - `bankroll`: available balance, any currency unit
///
/// `f* = (b*p - q) / b` with `b = decimal - 1`, clamped to `[0, kelly_cap]`
/// and scaled by `kelly_fraction`. Returns a zero stake when there is no
/// bankroll, no payout, or the price is not a valid American price.
pub fn kelly_stake(
    win_probability: f64,
    american_price: f64,
    bankroll: f64,
    config: &StakeConfig,
) -> StakeSuggestion {
    let b = if is_valid_american(american_price) {
        american_to_decimal(american_price) - 1.0
    } else {
        0.0
    };
    let p = win_probability;
    let q = 1.0 - p;

    let kelly_full = if b > 0.0 { (b * p - q) / b } else { 0.0 };
    let kelly_full = kelly_full.clamp(0.0, config.kelly_cap);
    let kelly_adjusted = kelly_full * config.kelly_fraction;
    let stake_amount = if bankroll > 0.0 {
        bankroll * kelly_adjusted
    } else {
        0.0
    };

    StakeSuggestion {
        win_probability: p,
        kelly_full_percent: kelly_full * 100.0,
        kelly_adjusted_percent: kelly_adjusted * 100.0,
        stake_amount,
        edge_over_book_percent: (p - american_to_probability(american_price)) * 100.0,
    }
}

/// Stake for the side an edge result recommends.
pub fn suggest_stake(
    edge: &EdgeResult,
    american_price: f64,
    bankroll: f64,
    config: &StakeConfig,
) -> StakeSuggestion {
    let p = estimate_win_probability(edge.edge_percent, config);
    kelly_stake(p, american_price, bankroll, config)
}

/// Stake against a book quote. The edge over the book is measured against the
/// no-vig probability of the recommended side rather than the raw price.
pub fn suggest_stake_for_quote(
    edge: &EdgeResult,
    quote: &OddsQuote,
    bankroll: f64,
    config: &StakeConfig,
) -> Option<StakeSuggestion> {
    let price = quote.price(edge.side)?;
    let fair = fair_probability(quote, edge.side)?;
    let mut stake = suggest_stake(edge, price, bankroll, config);
    stake.edge_over_book_percent = (stake.win_probability - fair) * 100.0;
    Some(stake)
}
