//! Social network connecting all agents
//!
//! Built once per run as a Watts-Strogatz small world and queried read-only
//! afterwards. Node `i` of the underlying graph is agent `i`.

use std::collections::HashSet;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use super::config::SmallWorldConfig;
use crate::values::AgentId;

/// Undirected adjacency between all agents of a run
#[derive(Debug, Clone)]
pub struct SocialGraph {
    graph: UnGraph<AgentId, ()>,
}

impl SocialGraph {
    /// Graph with `population` agents and no edges
    pub fn empty(population: usize) -> Self {
        Self::from_edges(population, std::iter::empty())
    }

    /// Graph from explicit undirected edges (pairs of agent indices)
    ///
    /// Self-loops and repeated edges are dropped.
    pub fn from_edges(population: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = UnGraph::with_capacity(population, 0);
        for i in 0..population {
            graph.add_node(AgentId(i));
        }

        let mut seen = HashSet::new();
        for (a, b) in edges {
            if a == b || a >= population || b >= population {
                continue;
            }
            if seen.insert(undirected(a, b)) {
                graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
            }
        }

        Self { graph }
    }

    /// Watts-Strogatz small world
    ///
    /// Ring lattice where each agent links to `nei` neighbors on each side,
    /// then every lattice edge is rewired with probability `rewire_prob` to a
    /// fresh endpoint that is neither the source nor an existing neighbor.
    pub fn small_world<R: Rng>(
        population: usize,
        config: &SmallWorldConfig,
        rng: &mut R,
    ) -> Self {
        let nei = config.neighbors_per_side(population);

        let mut edges: Vec<(usize, usize)> = Vec::with_capacity(population * nei);
        let mut present: HashSet<(usize, usize)> = HashSet::with_capacity(population * nei);
        for i in 0..population {
            for j in 1..=nei {
                let neighbor = (i + j) % population;
                if present.insert(undirected(i, neighbor)) {
                    edges.push((i, neighbor));
                }
            }
        }

        for edge in edges.iter_mut() {
            if rng.r#gen::<f64>() >= config.rewire_prob {
                continue;
            }
            let (source, target) = *edge;
            for _ in 0..population {
                let candidate = rng.gen_range(0..population);
                if candidate != source && !present.contains(&undirected(source, candidate)) {
                    present.remove(&undirected(source, target));
                    present.insert(undirected(source, candidate));
                    *edge = (source, candidate);
                    break;
                }
            }
        }

        Self::from_edges(population, edges)
    }

    /// Number of agents
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Agents adjacent to `agent`
    pub fn neighbors(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.graph
            .neighbors(NodeIndex::new(agent.index()))
            .map(move |n| self.graph[n])
    }

    pub fn degree(&self, agent: AgentId) -> usize {
        self.neighbors(agent).count()
    }

    pub fn are_adjacent(&self, a: AgentId, b: AgentId) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a.index()), NodeIndex::new(b.index()))
            .is_some()
    }
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
