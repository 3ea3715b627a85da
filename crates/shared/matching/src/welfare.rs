//! Social welfare of a book state
//!
//! Every seller of the run that is not in the seller queue keeps its good
//! and contributes its cost; every buyer left in the buyer queue receives a
//! good and contributes its valuation. Recomputed from scratch on each call.

use std::collections::HashSet;

use netda_core::{AgentId, RunState, Value};

use crate::book::MarketBook;

/// Total social welfare of the current matched set
///
/// # Panics
/// If the seller and buyer queues differ in size. Callers must `align` first.
pub fn social_welfare(state: &RunState, book: &MarketBook) -> Value {
    assert_eq!(
        book.sellers().len(),
        book.buyers().len(),
        "welfare requires aligned queues"
    );

    let sold: HashSet<AgentId> = book.sellers().iter().map(|entry| entry.id).collect();

    let kept: Value = state
        .sellers()
        .iter()
        .filter(|seller| !sold.contains(&seller.id))
        .map(|seller| seller.value)
        .sum();
    let realized: Value = book.buyers().iter().map(|entry| entry.value).sum();

    kept + realized
}
