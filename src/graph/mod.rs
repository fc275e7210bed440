// BgpSecSim: Inter-Domain Routing Security Simulator written in Rust
// Copyright 2022-2025 Tibor Schneider <sctibor@ethz.ch>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Module containing the AS-level topology and the per-trial routing state.
//!
//! The graph is split in two parts. The [`Topology`] holds everything that never changes after
//! construction (the link structure, tiers, and customer cones) and is shared between clones
//! behind an `Arc`. The per-AS trial state (installed policy, feature flags, attestation
//! records, and the routing table) is owned by each [`AsGraph`] clone, so every harness worker
//! can mutate its own copy without synchronization.

mod propagation;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use itertools::Itertools;
use log::debug;
use petgraph::algo::toposort;
use petgraph::prelude::*;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::policy::{AsCones, Aspa, RoutingPolicy};
use crate::route::{RibEntry, Route};
use crate::types::{Asn, Relation, SimError, Tier};

/// How a link between two ASes is annotated in the input topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A provider-to-customer link; the first endpoint is the provider.
    P2C,
    /// A settlement-free peering link.
    P2P,
}

/// Immutable per-AS data computed at construction time.
#[derive(Debug)]
pub(crate) struct AsInfo {
    /// The AS number.
    pub(crate) id: Asn,
    /// All neighbors in ascending ASN order, with the relation as seen from this AS.
    pub(crate) neighbors: Vec<(Asn, Relation)>,
    /// Position in the provider hierarchy.
    pub(crate) tier: Tier,
    /// Number of direct and indirect customers.
    pub(crate) cone: usize,
}

/// The frozen link structure, shared between all clones of a graph.
#[derive(Debug)]
pub(crate) struct Topology {
    /// The link graph; an edge `a -> b` is weighted with the relation of `b` as seen from `a`.
    /// Every link is stored in both directions with inverse relations.
    pub(crate) graph: DiGraph<Asn, Relation>,
    /// Lookup from AS number to graph index.
    pub(crate) ids: HashMap<Asn, NodeIndex>,
    /// Per-AS data, indexed like the graph nodes.
    pub(crate) info: Vec<AsInfo>,
}

/// Mutable per-trial state of one AS.
#[derive(Debug, Clone, Default)]
pub(crate) struct AsState {
    /// The installed routing policy.
    pub(crate) policy: RoutingPolicy,
    /// Whether this AS participates in BGPsec path signing.
    pub(crate) bgp_sec_enabled: bool,
    /// The published ASPA record, if any.
    pub(crate) aspa: Option<Aspa>,
    /// The published AS Cones record, if any.
    pub(crate) ascones: Option<AsCones>,
    /// The routing table: the selected route per origin AS.
    pub(crate) routes: HashMap<Asn, RibEntry>,
}

/// An AS-level interdomain topology with per-AS policies, attestations, and routing tables.
///
/// Cloning a graph is cheap: the topology is shared, only the per-AS trial state is copied.
/// Between trials, [`AsGraph::reset_policies`], [`AsGraph::clear_attestations`], and
/// [`AsGraph::clear_routing_tables`] restore the state of a freshly constructed graph.
#[derive(Debug)]
pub struct AsGraph {
    pub(crate) topo: Arc<Topology>,
    pub(crate) state: Vec<AsState>,
    /// The forged route of the most recent hijack, if any.
    pub(crate) attack: Option<Route>,
}

impl Clone for AsGraph {
    fn clone(&self) -> Self {
        debug!("Cloning the AS graph!");
        Self {
            topo: self.topo.clone(),
            state: self.state.clone(),
            attack: self.attack.clone(),
        }
    }
}

impl AsGraph {
    /// Build a graph from pairwise relationship declarations. Unknown ASes are created on
    /// first mention. Every link is mirrored with the inverse relation. Duplicate declarations
    /// are tolerated as long as they agree; conflicting declarations (including mutual
    /// provider claims) and circular provider chains are rejected.
    pub fn from_relationships<I, A>(edges: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = (A, A, EdgeKind)>,
        A: Into<Asn>,
    {
        let mut graph: DiGraph<Asn, Relation> = DiGraph::new();
        let mut ids: HashMap<Asn, NodeIndex> = HashMap::new();

        for (u, v, kind) in edges {
            let (u, v): (Asn, Asn) = (u.into(), v.into());
            if u == v {
                return Err(SimError::InconsistentEdge(u, v));
            }
            let nu = *ids.entry(u).or_insert_with(|| graph.add_node(u));
            let nv = *ids.entry(v).or_insert_with(|| graph.add_node(v));
            // relation of v as seen from u; for P2C the first endpoint is the provider
            let rel = match kind {
                EdgeKind::P2C => Relation::Customer,
                EdgeKind::P2P => Relation::Peer,
            };
            match graph.find_edge(nu, nv) {
                Some(e) if graph[e] == rel => continue,
                Some(_) => return Err(SimError::InconsistentEdge(u, v)),
                None => {
                    graph.add_edge(nu, nv, rel);
                    graph.add_edge(nv, nu, rel.inverse());
                }
            }
        }

        // The customer hierarchy must be acyclic: no AS may be its own transitive provider.
        let p2c = graph.filter_map(
            |_, asn| Some(*asn),
            |_, rel| (*rel == Relation::Customer).then_some(()),
        );
        if let Err(cycle) = toposort(&p2c, None) {
            return Err(SimError::CyclicRelation(p2c[cycle.node_id()]));
        }

        let mut info = Vec::with_capacity(graph.node_count());
        for n in graph.node_indices() {
            let neighbors: Vec<(Asn, Relation)> = graph
                .edges(n)
                .map(|e| (graph[e.target()], *e.weight()))
                .sorted_by_key(|(asn, _)| *asn)
                .collect();
            let has_provider = neighbors.iter().any(|(_, r)| *r == Relation::Provider);
            let has_customer = neighbors.iter().any(|(_, r)| *r == Relation::Customer);
            let tier = match (has_provider, has_customer) {
                (false, _) => Tier::One,
                (true, false) => Tier::Three,
                (true, true) => Tier::Two,
            };
            info.push(AsInfo {
                id: graph[n],
                neighbors,
                tier,
                cone: 0,
            });
        }
        for n in graph.node_indices() {
            info[n.index()].cone = customer_cone_size(&graph, n);
        }

        debug!(
            "Constructed an AS graph with {} ASes and {} links",
            graph.node_count(),
            graph.edge_count() / 2
        );

        let state = vec![AsState::default(); graph.node_count()];
        Ok(Self {
            topo: Arc::new(Topology { graph, ids, info }),
            state,
            attack: None,
        })
    }

    pub(crate) fn index(&self, asn: Asn) -> Option<usize> {
        self.topo.ids.get(&asn).map(|n| n.index())
    }

    pub(crate) fn require(&self, asn: Asn) -> Result<usize, SimError> {
        self.index(asn).ok_or(SimError::AsNotFound(asn))
    }

    /// Number of ASes in the graph.
    pub fn len(&self) -> usize {
        self.topo.info.len()
    }

    /// Whether the graph contains no AS at all.
    pub fn is_empty(&self) -> bool {
        self.topo.info.is_empty()
    }

    /// Whether the given AS exists in the graph.
    pub fn contains(&self, asn: Asn) -> bool {
        self.topo.ids.contains_key(&asn)
    }

    /// All AS numbers in the graph, in ascending order.
    pub fn asns(&self) -> impl Iterator<Item = Asn> + '_ {
        self.topo.info.iter().map(|i| i.id).sorted()
    }

    /// The relation of `b` as seen from `a`, or `None` if the two are not neighbors.
    pub fn get_relation(&self, a: Asn, b: Asn) -> Option<Relation> {
        let info = &self.topo.info[self.index(a)?];
        info.neighbors
            .binary_search_by_key(&b, |(asn, _)| *asn)
            .ok()
            .map(|i| info.neighbors[i].1)
    }

    /// All neighbors of an AS in ascending ASN order, with their relations.
    pub fn neighbors(&self, asn: Asn) -> &[(Asn, Relation)] {
        self.index(asn)
            .map(|i| self.topo.info[i].neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// The tier of an AS.
    pub fn tier(&self, asn: Asn) -> Option<Tier> {
        self.index(asn).map(|i| self.topo.info[i].tier)
    }

    /// All ASes of the given tier, in ascending ASN order.
    pub fn tier_members(&self, tier: Tier) -> Vec<Asn> {
        self.topo
            .info
            .iter()
            .filter(|i| i.tier == tier)
            .map(|i| i.id)
            .sorted()
            .collect()
    }

    /// The number of direct and indirect customers of an AS.
    pub fn customer_cone_size(&self, asn: Asn) -> Option<usize> {
        self.index(asn).map(|i| self.topo.info[i].cone)
    }

    /// The `k` ASes with the largest customer cones, in descending cone order with ties broken
    /// towards the smaller ASN.
    pub fn top_isps(&self, k: usize) -> Vec<Asn> {
        self.ranked_by_cone().take(k).collect()
    }

    /// Like [`AsGraph::top_isps`], but restricted to tier-1 and tier-2 ASes.
    pub fn top_isps_without_stubs(&self, k: usize) -> Vec<Asn> {
        self.ranked_by_cone_without_stubs().take(k).collect()
    }

    /// The `k` ASes with the smallest customer cones: the tail of the descending cone ranking.
    pub fn bottom_isps(&self, k: usize) -> Vec<Asn> {
        let ranked: Vec<Asn> = self.ranked_by_cone().collect();
        ranked[ranked.len().saturating_sub(k)..].to_vec()
    }

    /// Like [`AsGraph::bottom_isps`], but restricted to tier-1 and tier-2 ASes.
    pub fn bottom_isps_without_stubs(&self, k: usize) -> Vec<Asn> {
        let ranked: Vec<Asn> = self.ranked_by_cone_without_stubs().collect();
        ranked[ranked.len().saturating_sub(k)..].to_vec()
    }

    fn ranked_by_cone(&self) -> impl Iterator<Item = Asn> + '_ {
        self.topo
            .info
            .iter()
            .sorted_by_key(|i| (std::cmp::Reverse(i.cone), i.id))
            .map(|i| i.id)
    }

    fn ranked_by_cone_without_stubs(&self) -> impl Iterator<Item = Asn> + '_ {
        self.topo
            .info
            .iter()
            .filter(|i| i.tier != Tier::Three)
            .sorted_by_key(|i| (std::cmp::Reverse(i.cone), i.id))
            .map(|i| i.id)
    }

    /// The installed policy of an AS.
    pub fn policy(&self, asn: Asn) -> Option<RoutingPolicy> {
        self.index(asn).map(|i| self.state[i].policy)
    }

    /// Install a policy on one AS.
    pub fn set_policy(&mut self, asn: Asn, policy: RoutingPolicy) -> Result<(), SimError> {
        let i = self.require(asn)?;
        self.state[i].policy = policy;
        Ok(())
    }

    /// Install the same policy on every AS.
    pub fn install_base_policy(&mut self, policy: RoutingPolicy) {
        for state in &mut self.state {
            state.policy = policy;
        }
    }

    /// How many ASes run each policy.
    pub fn policy_census(&self) -> BTreeMap<RoutingPolicy, usize> {
        let mut census = BTreeMap::new();
        for state in &self.state {
            *census.entry(state.policy).or_insert(0) += 1;
        }
        census
    }

    /// Whether an AS participates in BGPsec path signing.
    pub fn bgp_sec_enabled(&self, asn: Asn) -> bool {
        self.index(asn)
            .map(|i| self.state[i].bgp_sec_enabled)
            .unwrap_or(false)
    }

    /// Let an AS participate in BGPsec path signing.
    pub fn enable_bgp_sec(&mut self, asn: Asn) -> Result<(), SimError> {
        let i = self.require(asn)?;
        self.state[i].bgp_sec_enabled = true;
        Ok(())
    }

    /// Publish an ASPA record for an AS, listing its current providers.
    pub fn publish_aspa(&mut self, asn: Asn) -> Result<(), SimError> {
        let i = self.require(asn)?;
        let providers: BTreeSet<Asn> = self.topo.info[i]
            .neighbors
            .iter()
            .filter(|(_, r)| *r == Relation::Provider)
            .map(|(a, _)| *a)
            .collect();
        self.state[i].aspa = Some(Aspa {
            customer: asn,
            providers,
        });
        Ok(())
    }

    /// Publish an AS Cones record for an AS, listing its current customers.
    pub fn publish_ascones(&mut self, asn: Asn) -> Result<(), SimError> {
        let i = self.require(asn)?;
        let customers: BTreeSet<Asn> = self.topo.info[i]
            .neighbors
            .iter()
            .filter(|(_, r)| *r == Relation::Customer)
            .map(|(a, _)| *a)
            .collect();
        self.state[i].ascones = Some(AsCones {
            provider: asn,
            customers,
        });
        Ok(())
    }

    /// The published ASPA record of an AS, if any.
    pub fn aspa_record(&self, asn: Asn) -> Option<&Aspa> {
        self.index(asn).and_then(|i| self.state[i].aspa.as_ref())
    }

    /// The published AS Cones record of an AS, if any.
    pub fn ascones_record(&self, asn: Asn) -> Option<&AsCones> {
        self.index(asn).and_then(|i| self.state[i].ascones.as_ref())
    }

    /// Whether an AS has published an ASPA record.
    pub fn aspa_enabled(&self, asn: Asn) -> bool {
        self.aspa_record(asn).is_some()
    }

    /// The selected route of `asn` towards `origin`, if any.
    pub fn route(&self, asn: Asn, origin: Asn) -> Option<&RibEntry> {
        self.index(asn).and_then(|i| self.state[i].routes.get(&origin))
    }

    /// The forged route of the most recent hijack, if one was injected since the routing
    /// tables were last cleared.
    pub fn last_attack(&self) -> Option<&Route> {
        self.attack.as_ref()
    }

    /// Reset every AS to the default policy and disable all BGPsec participation.
    pub fn reset_policies(&mut self) {
        debug!("Resetting all policies");
        for state in &mut self.state {
            state.policy = RoutingPolicy::default();
            state.bgp_sec_enabled = false;
        }
    }

    /// Withdraw all published ASPA and AS Cones records.
    pub fn clear_attestations(&mut self) {
        debug!("Clearing all attestation records");
        for state in &mut self.state {
            state.aspa = None;
            state.ascones = None;
        }
    }

    /// Drop every routing table and the recorded attack.
    pub fn clear_routing_tables(&mut self) {
        debug!("Clearing all routing tables");
        for state in &mut self.state {
            state.routes.clear();
        }
        self.attack = None;
    }
}

/// Number of distinct transitive customers of `root`, following provider-to-customer edges.
fn customer_cone_size(graph: &DiGraph<Asn, Relation>, root: NodeIndex) -> usize {
    let mut visited: std::collections::HashSet<NodeIndex> = std::collections::HashSet::new();
    visited.insert(root);
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        for e in graph.edges(n) {
            if *e.weight() == Relation::Customer && visited.insert(e.target()) {
                stack.push(e.target());
            }
        }
    }
    visited.len() - 1
}
