//! Network Double Auction Matching
//!
//! Trade reduction building blocks over worst-first side queues:
//!
//! - [`MarketBook::align`] / [`MarketBook::match_pairs`]: efficient matching
//! - [`social_welfare`]: welfare of the current matched set
//! - [`trade_reduction`]: McAfee's static mechanism
//! - [`MarketBook::reprice`]: Trade-Reduction-Price recompute after new arrivals

mod book;
mod error;
mod mcafee;
mod queue;
mod trp;
mod welfare;

pub use book::{MarketBook, ReservePrices};
pub use error::{MatchingError, MatchingResult};
pub use mcafee::{ReductionOutcome, fallback_prices, optimal_welfare, trade_reduction};
pub use queue::{BuyerQueue, Entry, QueueOrder, SellerQueue, SideQueue, WorstBuyerFirst, WorstSellerFirst};
pub use trp::RepriceOutcome;
pub use welfare::social_welfare;
