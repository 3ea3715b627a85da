//! Run state: one generated market instance
//!
//! Owns the agents, the social graph and the invited flags. Invited flags
//! only ever go from `false` to `true` within a run.

use rand::Rng;
use rand::seq::index;
use rust_decimal::Decimal;

use super::config::MarketConfig;
use super::graph::SocialGraph;
use crate::entities::Agent;
use crate::error::{ConfigError, ConfigResult};
use crate::values::{AgentId, Value};

/// One market instance: agents, network and participation
#[derive(Debug, Clone)]
pub struct RunState {
    agents: Vec<Agent>,
    sellers: usize,
    graph: SocialGraph,
    invited: Vec<bool>,
    initially_invited: Vec<bool>,
}

impl RunState {
    /// Draw a fresh instance from `config` using the caller's random source
    ///
    /// Draw order: seller count, agent values, network, initial invitees.
    pub fn generate<R: Rng>(config: &MarketConfig, rng: &mut R) -> ConfigResult<Self> {
        config.validate()?;

        let n = config.population;
        let sellers = rng.gen_range(config.seller_range.low..=config.seller_range.high);
        let values: Vec<Value> = (0..n)
            .map(|_| Decimal::from(rng.gen_range(config.value_range.low..=config.value_range.high)))
            .collect();
        let graph = SocialGraph::small_world(n, &config.small_world, rng);
        let initial = index::sample(rng, n, config.initial_participants.min(n));

        Self::from_values(sellers, values, graph, initial.iter())
    }

    /// Assemble an instance from explicit parts
    ///
    /// The first `sellers` values are seller costs, the rest buyer valuations.
    pub fn from_values(
        sellers: usize,
        values: impl IntoIterator<Item = Value>,
        graph: SocialGraph,
        invited: impl IntoIterator<Item = usize>,
    ) -> ConfigResult<Self> {
        let agents: Vec<Agent> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                if i < sellers {
                    Agent::seller(i, value)
                } else {
                    Agent::buyer(i, value)
                }
            })
            .collect();

        let n = agents.len();
        if n != graph.node_count() {
            return Err(ConfigError::ValueCount {
                values: n,
                population: graph.node_count(),
            });
        }
        if sellers > n {
            return Err(ConfigError::SellerRange {
                low: sellers,
                high: sellers,
                population: n,
            });
        }

        let mut flags = vec![false; n];
        for i in invited.into_iter().filter(|&i| i < n) {
            flags[i] = true;
        }

        Ok(Self {
            agents,
            sellers,
            graph,
            invited: flags.clone(),
            initially_invited: flags,
        })
    }

    /// Total number of agents (`n`)
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Number of sellers (`s`)
    pub fn seller_count(&self) -> usize {
        self.sellers
    }

    pub fn buyer_count(&self) -> usize {
        self.agents.len() - self.sellers
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Sellers, indices `0..s`
    pub fn sellers(&self) -> &[Agent] {
        &self.agents[..self.sellers]
    }

    /// Buyers, indices `s..n`
    pub fn buyers(&self) -> &[Agent] {
        &self.agents[self.sellers..]
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn is_invited(&self, id: AgentId) -> bool {
        self.invited[id.index()]
    }

    pub fn was_initially_invited(&self, id: AgentId) -> bool {
        self.initially_invited[id.index()]
    }

    pub fn invited_count(&self) -> usize {
        self.invited.iter().filter(|&&flag| flag).count()
    }

    pub fn initially_invited_count(&self) -> usize {
        self.initially_invited.iter().filter(|&&flag| flag).count()
    }

    /// Currently invited agents in index order
    pub fn invited_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter().filter(|a| self.invited[a.id.index()])
    }

    /// Invite `id`; returns `true` only if it was not invited before
    pub fn invite(&mut self, id: AgentId) -> bool {
        let flag = &mut self.invited[id.index()];
        if *flag {
            false
        } else {
            *flag = true;
            true
        }
    }

    /// Reset participation to the initially invited set
    pub fn restore_initial_invitations(&mut self) {
        self.invited.clone_from(&self.initially_invited);
    }
}
