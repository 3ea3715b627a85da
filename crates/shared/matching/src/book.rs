//! Market book: both side queues, their out-sequences and the reserve prices
//!
//! `align` and `match_pairs` together leave the maximum efficient trade set
//! in the queues. They only move entries between a queue and its
//! out-sequence; agent values and invitations are never touched.

use std::collections::VecDeque;

use netda_core::{Agent, Role, RunState, Value};
use serde::{Deserialize, Serialize};

use crate::queue::{BuyerQueue, Entry, SellerQueue};

/// Anonymous price thresholds: sellers trade at cost <= `seller`, buyers at value >= `buyer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePrices {
    pub seller: Value,
    pub buyer: Value,
}

impl ReservePrices {
    pub fn new(seller: Value, buyer: Value) -> Self {
        Self { seller, buyer }
    }

    /// Single posted price on both sides
    pub fn posted(price: Value) -> Self {
        Self {
            seller: price,
            buyer: price,
        }
    }
}

/// Queues and out-sequences of one mechanism pass
#[derive(Debug, Clone, Default)]
pub struct MarketBook {
    sellers: SellerQueue,
    buyers: BuyerQueue,
    seller_out: VecDeque<Entry>,
    buyer_out: VecDeque<Entry>,
    prices: Option<ReservePrices>,
}

impl MarketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book holding every agent of the run, invited or not
    pub fn with_all_agents(state: &RunState) -> Self {
        let mut book = Self::new();
        for agent in state.agents() {
            book.admit(agent);
        }
        book
    }

    /// Book holding the currently invited agents only
    pub fn with_invited_agents(state: &RunState) -> Self {
        let mut book = Self::new();
        for agent in state.invited_agents() {
            book.admit(agent);
        }
        book
    }

    /// Add an agent to the queue of its side
    pub fn admit(&mut self, agent: &Agent) {
        match agent.role {
            Role::Seller => self.sellers.push(Entry::from(agent)),
            Role::Buyer => self.buyers.push(Entry::from(agent)),
        }
    }

    pub fn sellers(&self) -> &SellerQueue {
        &self.sellers
    }

    pub fn buyers(&self) -> &BuyerQueue {
        &self.buyers
    }

    pub fn seller_out(&self) -> &VecDeque<Entry> {
        &self.seller_out
    }

    pub fn buyer_out(&self) -> &VecDeque<Entry> {
        &self.buyer_out
    }

    pub fn prices(&self) -> Option<ReservePrices> {
        self.prices
    }

    pub fn set_prices(&mut self, prices: ReservePrices) {
        self.prices = Some(prices);
    }

    /// Number of matched pairs, meaningful once the queues are aligned
    pub fn trade_count(&self) -> usize {
        self.sellers.len().min(self.buyers.len())
    }

    pub fn is_aligned(&self) -> bool {
        self.sellers.len() == self.buyers.len()
    }

    /// Pop the oldest excluded seller
    pub fn next_excluded_seller(&mut self) -> Option<Entry> {
        self.seller_out.pop_front()
    }

    /// Pop the oldest excluded buyer
    pub fn next_excluded_buyer(&mut self) -> Option<Entry> {
        self.buyer_out.pop_front()
    }

    /// Truncate the longer queue, worst first, until both have equal size
    pub fn align(&mut self) {
        while self.sellers.len() > self.buyers.len() {
            self.exclude_seller();
        }
        while self.buyers.len() > self.sellers.len() {
            self.exclude_buyer();
        }
    }

    /// Strip top pairs while the marginal seller's cost exceeds the marginal buyer's value
    pub fn match_pairs(&mut self) {
        while let (Some(seller), Some(buyer)) = (self.sellers.peek(), self.buyers.peek()) {
            if seller.value <= buyer.value {
                break;
            }
            self.exclude_pair();
        }
    }

    /// Move the marginal seller to the seller out-sequence
    pub(crate) fn exclude_seller(&mut self) -> Option<Entry> {
        let entry = self.sellers.pop()?;
        self.seller_out.push_back(entry);
        Some(entry)
    }

    /// Move the marginal buyer to the buyer out-sequence
    pub(crate) fn exclude_buyer(&mut self) -> Option<Entry> {
        let entry = self.buyers.pop()?;
        self.buyer_out.push_back(entry);
        Some(entry)
    }

    pub(crate) fn exclude_pair(&mut self) {
        self.exclude_seller();
        self.exclude_buyer();
    }

    pub(crate) fn sellers_mut(&mut self) -> &mut SellerQueue {
        &mut self.sellers
    }

    pub(crate) fn buyers_mut(&mut self) -> &mut BuyerQueue {
        &mut self.buyers
    }
}
