//! Trade-Reduction-Price recompute
//!
//! Runs after new agents joined the queues. Agents priced out by the
//! current thresholds move to the out-sequences, then the threshold of the
//! longer side is moved to the first agent that would balance supply and
//! demand. Queue membership is never changed by the rebalancing step.

use netda_core::Value;
use serde::{Deserialize, Serialize};

use crate::book::{MarketBook, ReservePrices};
use crate::error::{MatchingError, MatchingResult};
use crate::queue::{QueueOrder, SideQueue};

/// Result of one TRP pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepriceOutcome {
    /// Thresholds the evictions were checked against
    pub previous: ReservePrices,
    /// Thresholds after rebalancing
    pub prices: ReservePrices,
    pub evicted_sellers: usize,
    pub evicted_buyers: usize,
    /// Queue sizes after eviction
    pub sellers: usize,
    pub buyers: usize,
}

impl MarketBook {
    /// Evict priced-out agents and rebalance the reserve prices
    pub fn reprice(&mut self) -> MatchingResult<RepriceOutcome> {
        let previous = self.prices().ok_or(MatchingError::UndefinedReservePrices)?;

        let mut evicted_sellers = 0;
        while self
            .sellers()
            .peek()
            .is_some_and(|seller| seller.value > previous.seller)
        {
            if let Some(entry) = self.exclude_seller() {
                log::trace!("TRP evicts seller {} (cost {})", entry.id, entry.value);
            }
            evicted_sellers += 1;
        }

        let mut evicted_buyers = 0;
        while self
            .buyers()
            .peek()
            .is_some_and(|buyer| buyer.value < previous.buyer)
        {
            if let Some(entry) = self.exclude_buyer() {
                log::trace!("TRP evicts buyer {} (value {})", entry.id, entry.value);
            }
            evicted_buyers += 1;
        }

        let sellers = self.sellers().len();
        let buyers = self.buyers().len();
        let mut prices = previous;

        if sellers > buyers {
            if let Some(cost) = value_behind(self.sellers_mut(), sellers - buyers - 1) {
                log::trace!("TRP seller threshold {} -> {}", prices.seller, cost);
                prices.seller = cost;
            }
        } else if buyers > sellers {
            if let Some(valuation) = value_behind(self.buyers_mut(), buyers - sellers - 1) {
                log::trace!("TRP buyer threshold {} -> {}", prices.buyer, valuation);
                prices.buyer = valuation;
            }
        }

        self.set_prices(prices);

        Ok(RepriceOutcome {
            previous,
            prices,
            evicted_sellers,
            evicted_buyers,
            sellers,
            buyers,
        })
    }
}

/// Value of the entry that would be on top after popping `skip` entries
///
/// The popped entries are pushed back before returning.
fn value_behind<O: QueueOrder>(queue: &mut SideQueue<O>, skip: usize) -> Option<Value> {
    let held: Vec<_> = (0..skip).map_while(|_| queue.pop()).collect();
    let value = queue.peek().map(|entry| entry.value);
    queue.extend(held);
    value
}
