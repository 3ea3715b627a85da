//! Diffusion Controller - Dynamic Trade Reduction
//!
//! State machine over one run:
//!
//! ```text
//! StaticInit ──McAfee on invited agents──▶ Diffusing ──no new invite──▶ Converged
//!                                            │    ▲
//!                                            └────┘ excluded agents refer neighbors, TRP
//! ```
//!
//! Every round drains the seller out-sequence and then the buyer
//! out-sequence in exclusion order. Each excluded agent invites all of its
//! uninvited neighbors, who join the queue of their side. TRP then runs
//! with the thresholds of the previous round. Each agent is invited at most
//! once, so the loop ends after at most `n` rounds.

use netda_core::{RunState, Value};
use netda_matching::{
    Entry, MarketBook, ReductionOutcome, RepriceOutcome, ReservePrices, fallback_prices,
    social_welfare, trade_reduction,
};
use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Static McAfee pass not run yet
    StaticInit,
    /// Referral rounds in progress
    Diffusing,
    /// No round invites anyone anymore; queues aligned
    Converged,
}

/// Outcome of a converged diffusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffusionReport {
    /// Static McAfee pass over the initially invited agents
    pub static_outcome: ReductionOutcome,
    /// Whether the static pass left thresholds undefined
    pub used_fallback: bool,
    /// Referral rounds run, including the final round without invitations
    pub rounds: usize,
    /// Invited-set size after the static pass and after every round
    pub invited_history: Vec<usize>,
    /// Final thresholds
    pub prices: Option<ReservePrices>,
    /// Pairs trading at convergence
    pub trades: usize,
    /// Social welfare at convergence
    pub welfare: Value,
}

/// Drives one run from the static pass to convergence
#[derive(Debug, Clone)]
pub struct DiffusionController {
    phase: Phase,
    book: MarketBook,
    static_outcome: Option<ReductionOutcome>,
    used_fallback: bool,
    rounds: usize,
    invited_history: Vec<usize>,
    last_reprice: Option<RepriceOutcome>,
}

impl Default for DiffusionController {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffusionController {
    pub fn new() -> Self {
        Self {
            phase: Phase::StaticInit,
            book: MarketBook::new(),
            static_outcome: None,
            used_fallback: false,
            rounds: 0,
            invited_history: Vec::new(),
            last_reprice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn book(&self) -> &MarketBook {
        &self.book
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn invited_history(&self) -> &[usize] {
        &self.invited_history
    }

    pub fn static_outcome(&self) -> Option<&ReductionOutcome> {
        self.static_outcome.as_ref()
    }

    /// TRP result of the most recent round
    pub fn last_reprice(&self) -> Option<&RepriceOutcome> {
        self.last_reprice.as_ref()
    }

    /// Advance by one transition: the static pass or one referral round
    pub fn step(&mut self, state: &mut RunState) -> RunnerResult<Phase> {
        match self.phase {
            Phase::StaticInit => {
                self.book = MarketBook::with_invited_agents(state);
                let outcome = trade_reduction(state, &mut self.book);

                if self.book.prices().is_none() {
                    let fallback = fallback_prices(state);
                    log::debug!(
                        "No trade among {} invited agents, fallback thresholds {:?}",
                        state.invited_count(),
                        fallback
                    );
                    self.book.set_prices(fallback);
                    self.used_fallback = true;
                }

                log::debug!(
                    "Static trade reduction: {} of {} efficient pairs trade, welfare {}",
                    outcome.trades,
                    outcome.efficient_trades,
                    outcome.welfare
                );

                self.static_outcome = Some(outcome);
                self.invited_history.push(state.invited_count());
                self.phase = Phase::Diffusing;
            }
            Phase::Diffusing => {
                let invited = self.invite_round(state);
                let reprice = self.book.reprice()?;
                self.rounds += 1;
                self.invited_history.push(state.invited_count());

                log::debug!(
                    "Round {}: {} invited (total {}), thresholds {} / {}, queues {} / {}",
                    self.rounds,
                    invited,
                    state.invited_count(),
                    reprice.prices.seller,
                    reprice.prices.buyer,
                    reprice.sellers,
                    reprice.buyers
                );

                self.last_reprice = Some(reprice);

                if invited == 0 {
                    self.book.align();
                    self.phase = Phase::Converged;
                }
            }
            Phase::Converged => {}
        }

        Ok(self.phase)
    }

    /// Step until converged and report
    pub fn run(&mut self, state: &mut RunState) -> RunnerResult<DiffusionReport> {
        while self.step(state)? != Phase::Converged {}
        self.report(state)
            .ok_or(RunnerError::NotConverged(self.phase))
    }

    /// Final report, available once converged
    pub fn report(&self, state: &RunState) -> Option<DiffusionReport> {
        if self.phase != Phase::Converged {
            return None;
        }

        Some(DiffusionReport {
            static_outcome: self.static_outcome.clone()?,
            used_fallback: self.used_fallback,
            rounds: self.rounds,
            invited_history: self.invited_history.clone(),
            prices: self.book.prices(),
            trades: self.book.trade_count(),
            welfare: social_welfare(state, &self.book),
        })
    }

    /// Consume both out-sequences, inviting neighbors of every excluded agent
    fn invite_round(&mut self, state: &mut RunState) -> usize {
        let mut invited = 0;
        while let Some(excluded) = self.book.next_excluded_seller() {
            invited += self.refer(state, excluded);
        }
        while let Some(excluded) = self.book.next_excluded_buyer() {
            invited += self.refer(state, excluded);
        }
        invited
    }

    fn refer(&mut self, state: &mut RunState, referrer: Entry) -> usize {
        let neighbors: Vec<_> = state.graph().neighbors(referrer.id).collect();

        let mut invited = 0;
        for neighbor in neighbors {
            if state.invite(neighbor) {
                let agent = *state.agent(neighbor);
                log::trace!("{} invites {} {}", referrer.id, agent.role, agent.id);
                self.book.admit(&agent);
                invited += 1;
            }
        }
        invited
    }
}
