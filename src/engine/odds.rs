use super::types::{OddsQuote, Side, StatCategory};

/// American prices live at or beyond ±100; anything inside is a typo or a
/// decimal price.
pub fn is_valid_american(price: f64) -> bool {
    price.is_finite() && price.abs() >= 100.0
}

/// Convert American odds to implied probability.
/// Positive odds (e.g., +150): prob = 100 / (odds + 100)
/// Negative odds (e.g., -150): prob = |odds| / (|odds| + 100)
pub fn american_to_probability(odds: f64) -> f64 {
    if odds > 0.0 {
        100.0 / (odds + 100.0)
    } else {
        let abs = odds.abs();
        abs / (abs + 100.0)
    }
}

/// Convert American odds to decimal odds (total return per unit staked).
pub fn american_to_decimal(odds: f64) -> f64 {
    if odds > 0.0 {
        odds / 100.0 + 1.0
    } else {
        100.0 / odds.abs() + 1.0
    }
}

/// Devig a two-way over/under market. Returns (over_fair, under_fair).
pub fn devig(over_odds: f64, under_odds: f64) -> (f64, f64) {
    let over = american_to_probability(over_odds);
    let under = american_to_probability(under_odds);
    let total = over + under;
    if total == 0.0 {
        return (0.5, 0.5);
    }
    (over / total, under / total)
}

/// No-vig probability that `side` hits, from both prices of one quote.
pub fn fair_probability(quote: &OddsQuote, side: Side) -> Option<f64> {
    let (over, under) = devig(quote.over_price, quote.under_price);
    match side {
        Side::Over => Some(over),
        Side::Under => Some(under),
        Side::Push => None,
    }
}

/// Every quote for a player/category, one per book, in input order.
pub fn quotes_for<'a>(quotes: &'a [OddsQuote], player: &str, stat: StatCategory) -> Vec<&'a OddsQuote> {
    quotes
        .iter()
        .filter(|q| q.player == player && q.stat == stat)
        .collect()
}

/// Quote paying the most on `side`. Earlier quotes win ties.
pub fn best_quote<'a>(
    quotes: &'a [OddsQuote],
    player: &str,
    stat: StatCategory,
    side: Side,
) -> Option<&'a OddsQuote> {
    let mut best: Option<(&OddsQuote, f64)> = None;
    for quote in quotes_for(quotes, player, stat) {
        let Some(price) = quote.price(side) else {
            continue;
        };
        match best {
            Some((_, best_price)) if price <= best_price => {}
            _ => best = Some((quote, price)),
        }
    }
    best.map(|(quote, _)| quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(book: &str, over: f64, under: f64) -> OddsQuote {
        OddsQuote {
            player: "jalen brunson".to_string(),
            stat: StatCategory::Points,
            line: 26.5,
            over_price: over,
            under_price: under,
            sportsbook: book.to_string(),
        }
    }

    #[test]
    fn test_american_to_probability() {
        let prob = american_to_probability(-150.0);
        assert!((prob - 0.6).abs() < 0.001);

        let prob = american_to_probability(150.0);
        assert!((prob - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_american_to_decimal() {
        assert!((american_to_decimal(150.0) - 2.5).abs() < 1e-12);
        assert!((american_to_decimal(-200.0) - 1.5).abs() < 1e-12);
        assert!((american_to_decimal(100.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_devig() {
        let (over, under) = devig(-120.0, 100.0);
        assert!((over + under - 1.0).abs() < 0.001);
        assert!(over > 0.5);
    }

    #[test]
    fn test_fair_probability_removes_vig() {
        // -110/-110: 0.5238 each before devig, 0.5 after
        let q = quote("A", -110.0, -110.0);
        assert!((fair_probability(&q, Side::Over).unwrap() - 0.5).abs() < 1e-12);
        assert!(fair_probability(&q, Side::Push).is_none());
    }

    #[test]
    fn test_is_valid_american() {
        assert!(is_valid_american(-110.0));
        assert!(is_valid_american(100.0));
        assert!(!is_valid_american(0.0));
        assert!(!is_valid_american(50.0));
        assert!(!is_valid_american(f64::NAN));
    }

    #[test]
    fn test_best_quote_by_side() {
        let quotes = vec![
            quote("DraftKings", -115.0, -105.0),
            quote("FanDuel", -110.0, -110.0),
            quote("BetMGM", -110.0, -120.0),
        ];
        let over = best_quote(&quotes, "jalen brunson", StatCategory::Points, Side::Over).unwrap();
        assert_eq!(over.sportsbook, "FanDuel"); // first of the -110 tie
        let under = best_quote(&quotes, "jalen brunson", StatCategory::Points, Side::Under).unwrap();
        assert_eq!(under.sportsbook, "DraftKings");
        assert!(best_quote(&quotes, "jalen brunson", StatCategory::Points, Side::Push).is_none());
        assert!(best_quote(&quotes, "nobody", StatCategory::Points, Side::Over).is_none());
    }

    #[test]
    fn test_quotes_for_preserves_all_books() {
        let quotes = vec![quote("A", -110.0, -110.0), quote("B", -110.0, -110.0)];
        assert_eq!(quotes_for(&quotes, "jalen brunson", StatCategory::Points).len(), 2);
        assert!(quotes_for(&quotes, "jalen brunson", StatCategory::Assists).is_empty());
    }
}
