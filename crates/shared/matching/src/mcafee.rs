//! McAfee trade reduction over a fixed participant set
//!
//! After `align` + `match_pairs` leave `k` efficient pairs, the midpoint of
//! the most recently excluded seller and buyer is tested against the
//! marginal matched pair. If it separates them all `k` pairs trade,
//! otherwise the marginal pair is dropped and `k - 1` pairs trade. The
//! marginal pair left in the queues defines the reserve prices.

use netda_core::{RunState, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::book::{MarketBook, ReservePrices};
use crate::welfare::social_welfare;

/// Result of one static trade reduction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionOutcome {
    /// Pairs left by the efficient matching
    pub efficient_trades: usize,
    /// Pairs that actually trade
    pub trades: usize,
    /// Whether the marginal pair was sacrificed
    pub reduced: bool,
    /// Midpoint of the last excluded seller and buyer, when both exist
    pub midpoint: Option<Value>,
    /// Thresholds set by the pass; `None` when nothing trades
    pub prices: Option<ReservePrices>,
    /// Social welfare of the resulting allocation
    pub welfare: Value,
}

/// Full-information welfare: efficient matching over every agent of the run
pub fn optimal_welfare(state: &RunState) -> Value {
    let mut book = MarketBook::with_all_agents(state);
    book.align();
    book.match_pairs();
    social_welfare(state, &book)
}

/// Run McAfee's trade reduction on the agents already in `book`
///
/// Sets the book's reserve prices when at least one pair survives.
pub fn trade_reduction(state: &RunState, book: &mut MarketBook) -> ReductionOutcome {
    book.align();
    book.match_pairs();

    let efficient_trades = book.trade_count();
    let mut midpoint = None;
    let mut reduced = false;

    if let (Some(top_seller), Some(top_buyer)) = (book.sellers().peek(), book.buyers().peek()) {
        midpoint = match (book.seller_out().back(), book.buyer_out().back()) {
            (Some(seller), Some(buyer)) => Some((seller.value + buyer.value) / Decimal::TWO),
            _ => None,
        };

        let separates = midpoint.is_some_and(|p0| top_seller.value <= p0 && p0 <= top_buyer.value);
        if !separates {
            book.exclude_pair();
            reduced = true;
        }

        if let (Some(seller), Some(buyer)) = (book.sellers().peek(), book.buyers().peek()) {
            book.set_prices(ReservePrices::new(seller.value, buyer.value));
        }
    }

    ReductionOutcome {
        efficient_trades,
        trades: book.trade_count(),
        reduced,
        midpoint,
        prices: book.prices(),
        welfare: social_welfare(state, book),
    }
}

/// Deterministic thresholds when the static pass leaves nothing to trade
///
/// Posts a single price at the midpoint of the cheapest invited seller and
/// the highest invited buyer. With only one side invited that side's
/// extreme is posted; with nobody invited the price is zero.
pub fn fallback_prices(state: &RunState) -> ReservePrices {
    let cheapest_seller = state
        .invited_agents()
        .filter(|a| a.is_seller())
        .map(|a| a.value)
        .min();
    let richest_buyer = state
        .invited_agents()
        .filter(|a| a.is_buyer())
        .map(|a| a.value)
        .max();

    let price = match (cheapest_seller, richest_buyer) {
        (Some(cost), Some(valuation)) => (cost + valuation) / Decimal::TWO,
        (Some(cost), None) => cost,
        (None, Some(valuation)) => valuation,
        (None, None) => Value::ZERO,
    };

    ReservePrices::posted(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::tests::ladder;
    use netda_core::SocialGraph;
    use rust_decimal_macros::dec;

    fn market(sellers: usize, values: &[i64], invited: &[usize]) -> RunState {
        RunState::from_values(
            sellers,
            values.iter().map(|&v| Value::from(v)),
            SocialGraph::empty(values.len()),
            invited.iter().copied(),
        )
        .unwrap()
    }

    fn run(state: &RunState) -> (MarketBook, ReductionOutcome) {
        let mut book = MarketBook::with_invited_agents(state);
        let outcome = trade_reduction(state, &mut book);
        (book, outcome)
    }

    #[test]
    fn test_ladder_keeps_all_pairs() {
        let state = ladder();
        let (_, outcome) = run(&state);

        assert_eq!(outcome.efficient_trades, 4);
        assert_eq!(outcome.trades, 4);
        assert!(!outcome.reduced);
        assert_eq!(outcome.midpoint, Some(dec!(4)));
        assert_eq!(outcome.prices, Some(ReservePrices::new(dec!(4), dec!(4))));
        assert_eq!(outcome.welfare, dec!(27));
        assert_eq!(optimal_welfare(&state), dec!(27));
    }

    #[test]
    fn test_midpoint_outside_boundary_drops_a_pair() {
        let state = market(5, &[1, 2, 3, 4, 6, 3, 4, 5, 6, 7], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let (book, outcome) = run(&state);

        assert_eq!(outcome.midpoint, Some(dec!(4.5)));
        assert!(outcome.reduced);
        assert_eq!(outcome.trades, 3);
        assert_eq!(outcome.prices, Some(ReservePrices::new(dec!(3), dec!(5))));
        // Unsold costs 4 + 6, traded buyers 5 + 6 + 7
        assert_eq!(outcome.welfare, dec!(28));
        assert_eq!(book.seller_out().len(), 2);
        assert_eq!(book.buyer_out().len(), 2);
    }

    #[test]
    fn test_without_exclusions_a_pair_is_dropped() {
        let state = market(2, &[1, 2, 5, 6], &[0, 1, 2, 3]);
        let (_, outcome) = run(&state);

        assert_eq!(outcome.midpoint, None);
        assert!(outcome.reduced);
        assert_eq!(outcome.trades, 1);
        assert_eq!(outcome.prices, Some(ReservePrices::new(dec!(1), dec!(6))));
        assert_eq!(outcome.welfare, dec!(8));
    }

    #[test]
    fn test_single_pair_reduces_to_no_trade() {
        let state = market(1, &[1, 5], &[0, 1]);
        let (book, outcome) = run(&state);

        assert_eq!(outcome.efficient_trades, 1);
        assert_eq!(outcome.trades, 0);
        assert_eq!(outcome.prices, None);
        assert!(book.prices().is_none());
        assert_eq!(outcome.welfare, dec!(1));
    }

    #[test]
    fn test_no_profitable_pair_leaves_prices_undefined() {
        let state = market(2, &[8, 9, 1, 2], &[0, 1, 2, 3]);
        let (_, outcome) = run(&state);

        assert_eq!(outcome.trades, 0);
        assert!(!outcome.reduced);
        assert_eq!(outcome.prices, None);
        assert_eq!(fallback_prices(&state), ReservePrices::posted(dec!(5)));
    }

    #[test]
    fn test_static_pass_only_sees_invited_agents() {
        let state = market(5, &[1, 2, 3, 4, 5, 3, 4, 5, 6, 7], &[3, 4, 5, 6]);
        let (_, outcome) = run(&state);

        // Sellers 4,5 vs buyers 3,4: only (4, 4) is profitable and midpoint 4 keeps it
        assert_eq!(outcome.efficient_trades, 1);
        assert_eq!(outcome.midpoint, Some(dec!(4)));
        assert!(!outcome.reduced);
        assert_eq!(outcome.prices, Some(ReservePrices::new(dec!(4), dec!(4))));
        assert!(outcome.welfare <= optimal_welfare(&state));
    }

    #[test]
    fn test_fallback_with_one_side_or_none() {
        let sellers_only = market(2, &[7, 3, 9], &[0, 1]);
        assert_eq!(fallback_prices(&sellers_only), ReservePrices::posted(dec!(3)));

        let buyers_only = market(1, &[7, 3, 9], &[1, 2]);
        assert_eq!(fallback_prices(&buyers_only), ReservePrices::posted(dec!(9)));

        let nobody = market(1, &[7, 3, 9], &[]);
        assert_eq!(fallback_prices(&nobody), ReservePrices::posted(Value::ZERO));
    }
}
