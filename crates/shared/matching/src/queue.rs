//! Side queues ordered worst-first
//!
//! The seller queue pops the highest-cost seller first and the buyer queue
//! pops the lowest-value buyer first, so the top of each queue is always the
//! marginal participant on that side. Ties on value pop the lower agent id
//! first. Ordering is supplied by a [`QueueOrder`] comparator rather than by
//! negating values.

use std::cmp::Ordering;
use std::marker::PhantomData;

use netda_core::{Agent, AgentId, Value};
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};

/// An agent's bid as it sits in a queue or out-sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: AgentId,
    pub value: Value,
}

impl Entry {
    pub fn new(id: impl Into<AgentId>, value: Value) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

impl From<&Agent> for Entry {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            value: agent.value,
        }
    }
}

/// Comparator deciding which entry leaves a queue first
pub trait QueueOrder {
    /// `Ordering::Greater` means `a` is popped before `b`
    fn compare(a: &Entry, b: &Entry) -> Ordering;
}

/// Highest cost first
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstSellerFirst;

impl QueueOrder for WorstSellerFirst {
    fn compare(a: &Entry, b: &Entry) -> Ordering {
        a.value.cmp(&b.value).then_with(|| b.id.cmp(&a.id))
    }
}

/// Lowest valuation first
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstBuyerFirst;

impl QueueOrder for WorstBuyerFirst {
    fn compare(a: &Entry, b: &Entry) -> Ordering {
        b.value.cmp(&a.value).then_with(|| b.id.cmp(&a.id))
    }
}

/// Priority of an entry under comparator `O`
#[derive(Debug, Clone, Copy)]
struct Rank<O> {
    entry: Entry,
    _order: PhantomData<fn() -> O>,
}

impl<O> Rank<O> {
    fn new(entry: Entry) -> Self {
        Self {
            entry,
            _order: PhantomData,
        }
    }
}

impl<O: QueueOrder> PartialEq for Rank<O> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<O: QueueOrder> Eq for Rank<O> {}

impl<O: QueueOrder> PartialOrd for Rank<O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<O: QueueOrder> Ord for Rank<O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::compare(&self.entry, &other.entry)
    }
}

/// Priority queue of entries keyed by agent id, popped in `O` order
#[derive(Debug, Clone)]
pub struct SideQueue<O: QueueOrder> {
    inner: PriorityQueue<AgentId, Rank<O>>,
}

pub type SellerQueue = SideQueue<WorstSellerFirst>;
pub type BuyerQueue = SideQueue<WorstBuyerFirst>;

impl<O: QueueOrder> Default for SideQueue<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: QueueOrder> SideQueue<O> {
    pub fn new() -> Self {
        Self {
            inner: PriorityQueue::new(),
        }
    }

    /// Insert an entry; an agent already queued keeps a single slot
    pub fn push(&mut self, entry: Entry) {
        self.inner.push(entry.id, Rank::new(entry));
    }

    /// Remove and return the worst entry
    pub fn pop(&mut self) -> Option<Entry> {
        self.inner.pop().map(|(_, rank)| rank.entry)
    }

    /// Worst entry without removing it
    pub fn peek(&self) -> Option<Entry> {
        self.inner.peek().map(|(_, rank)| rank.entry)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.inner.get(&id).is_some()
    }

    /// Entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = Entry> + '_ {
        self.inner.iter().map(|(_, rank)| rank.entry)
    }

    /// Entries in pop order, leaving the queue untouched
    pub fn to_sorted_vec(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.iter().collect();
        entries.sort_by(|a, b| O::compare(b, a));
        entries
    }
}

impl<O: QueueOrder> Extend<Entry> for SideQueue<O> {
    fn extend<I: IntoIterator<Item = Entry>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry);
        }
    }
}

impl<O: QueueOrder> FromIterator<Entry> for SideQueue<O> {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
