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

//! Module containing experiment descriptions and trial execution.
//!
//! A [`Scenario`] captures everything that varies between experiments: the policy every AS
//! starts from, a list of deployment actions (which ASes upgrade their policy, sign their
//! paths, or publish attestations, selected by rank, at random, or explicitly), and the role
//! the attacker plays. A single trial applies the scenario to a pristine graph, computes all
//! routes towards the victim, injects the attack, and scores the outcome.

pub mod harness;

use log::warn;
use num::rational::Rational64;
use num::Zero;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::AsGraph;
use crate::policy::RoutingPolicy;
use crate::score::{attacker_success_rate, route_leak_success_rate};
use crate::types::{Asn, SimError, Tier};

/// The attack a trial simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attack {
    /// A path hijack claiming to be `hops` hops away from the victim. The attacker keeps its
    /// installed policy.
    Hijack {
        /// Claimed distance to the victim: `0` forges the origin itself, `1` a direct
        /// adjacency, larger values prepend truthful hops.
        hops: usize,
    },
    /// A forged-origin prefix hijack: a next-AS forgery with the attacker reset to the default
    /// policy so it does not drop its own fabricated route.
    ForgedOrigin,
    /// A route leak: the attacker re-advertises genuine routes to every neighbor. No route is
    /// forged.
    RouteLeak,
}

/// How the ASes affected by a [`DeployAction`] are selected. Rank-based selections use the
/// customer-cone ordering (descending, ties towards the smaller ASN); random selections are
/// re-sampled for every trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// The `count` ASes with the largest customer cones.
    Top {
        /// Number of ASes to select.
        count: usize,
    },
    /// The `count` ASes with the smallest customer cones.
    Bottom {
        /// Number of ASes to select.
        count: usize,
    },
    /// The top share of the customer-cone ranking.
    TopPercent {
        /// Share of the universe in percent.
        percent: u8,
    },
    /// The bottom share of the customer-cone ranking.
    BottomPercent {
        /// Share of the universe in percent.
        percent: u8,
    },
    /// A uniformly random share of all ASes.
    Random {
        /// Share of the universe in percent.
        percent: u8,
    },
    /// A uniformly random share per tier.
    RandomPerTier {
        /// Share of the tier-1 ASes in percent.
        tier_one: u8,
        /// Share of the tier-2 ASes in percent.
        tier_two: u8,
        /// Share of the tier-3 ASes in percent.
        tier_three: u8,
    },
    /// An explicit list of ASes. Entries missing from the graph are ignored.
    List(Vec<Asn>),
}

/// The universe a selection draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Universe {
    /// All ASes.
    All,
    /// Only tier-1 and tier-2 ASes.
    Transit,
}

/// Rounded integer share, like the reference experiments compute deployment counts.
fn share(n: usize, percent: u8) -> usize {
    (n * percent as usize + 50) / 100
}

impl Selection {
    fn resolve<R: Rng>(&self, graph: &AsGraph, universe: Universe, rng: &mut R) -> Vec<Asn> {
        let members = |graph: &AsGraph| -> Vec<Asn> {
            match universe {
                Universe::All => graph.asns().collect(),
                Universe::Transit => {
                    let mut transit = graph.tier_members(Tier::One);
                    transit.extend(graph.tier_members(Tier::Two));
                    transit
                }
            }
        };
        match self {
            Self::Top { count } => match universe {
                Universe::All => graph.top_isps(*count),
                Universe::Transit => graph.top_isps_without_stubs(*count),
            },
            Self::Bottom { count } => match universe {
                Universe::All => graph.bottom_isps(*count),
                Universe::Transit => graph.bottom_isps_without_stubs(*count),
            },
            Self::TopPercent { percent } => {
                let count = share(members(graph).len(), *percent);
                Self::Top { count }.resolve(graph, universe, rng)
            }
            Self::BottomPercent { percent } => {
                let count = share(members(graph).len(), *percent);
                Self::Bottom { count }.resolve(graph, universe, rng)
            }
            Self::Random { percent } => {
                let members = members(graph);
                let count = share(members.len(), *percent);
                members.choose_multiple(rng, count).copied().collect()
            }
            Self::RandomPerTier {
                tier_one,
                tier_two,
                tier_three,
            } => {
                let mut selected = Vec::new();
                for (tier, percent) in [
                    (Tier::One, *tier_one),
                    (Tier::Two, *tier_two),
                    (Tier::Three, *tier_three),
                ] {
                    let members = graph.tier_members(tier);
                    let count = share(members.len(), percent);
                    selected.extend(members.choose_multiple(rng, count).copied());
                }
                selected
            }
            Self::List(asns) => asns
                .iter()
                .copied()
                .filter(|asn| graph.contains(*asn))
                .collect(),
        }
    }
}

/// One deployment step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployAction {
    /// Install a policy on the selected ASes.
    SetPolicy {
        /// Which ASes upgrade.
        select: Selection,
        /// The policy to install.
        policy: RoutingPolicy,
    },
    /// Let the selected ASes participate in BGPsec path signing.
    EnableBgpSec {
        /// Which ASes sign their paths.
        select: Selection,
    },
    /// Publish ASPA records for the selected ASes.
    PublishAspa {
        /// Which ASes publish.
        select: Selection,
    },
    /// Publish AS Cones records for the selected ASes. Random selections draw from tier-1 and
    /// tier-2 only, since stubs have no customers to attest.
    PublishAsCones {
        /// Which ASes publish.
        select: Selection,
    },
}

impl DeployAction {
    fn apply<R: Rng>(&self, graph: &mut AsGraph, rng: &mut R) -> Result<(), SimError> {
        match self {
            Self::SetPolicy { select, policy } => {
                for asn in select.resolve(graph, Universe::All, rng) {
                    graph.set_policy(asn, *policy)?;
                }
            }
            Self::EnableBgpSec { select } => {
                for asn in select.resolve(graph, Universe::All, rng) {
                    graph.enable_bgp_sec(asn)?;
                }
            }
            Self::PublishAspa { select } => {
                for asn in select.resolve(graph, Universe::All, rng) {
                    graph.publish_aspa(asn)?;
                }
            }
            Self::PublishAsCones { select } => {
                for asn in select.resolve(graph, Universe::Transit, rng) {
                    graph.publish_ascones(asn)?;
                }
            }
        }
        Ok(())
    }
}

/// A complete experiment description: base policy, deployment, and attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// The policy installed on every AS before the deployment actions run.
    pub base_policy: RoutingPolicy,
    /// Deployment actions, applied in order on every trial.
    pub actions: Vec<DeployAction>,
    /// The attack to simulate.
    pub attack: Attack,
}

impl Scenario {
    /// A scenario without any deployment action.
    pub fn new(base_policy: RoutingPolicy, attack: Attack) -> Self {
        Self {
            base_policy,
            actions: Vec::new(),
            attack,
        }
    }

    /// Add a deployment action.
    pub fn with_action(mut self, action: DeployAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Parse a scenario from its JSON description.
    pub fn from_json(s: &str) -> Result<Self, SimError> {
        serde_json::from_str(s).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Restore the pristine graph state and apply the scenario for one trial: base policy,
    /// deployment actions, and the attacker-policy override.
    pub fn prepare<R: Rng>(
        &self,
        graph: &mut AsGraph,
        attacker: Asn,
        rng: &mut R,
    ) -> Result<(), SimError> {
        graph.reset_policies();
        graph.clear_attestations();
        graph.clear_routing_tables();
        graph.install_base_policy(self.base_policy);
        for action in &self.actions {
            action.apply(graph, rng)?;
        }
        match self.attack {
            Attack::RouteLeak => graph.set_policy(attacker, RoutingPolicy::RouteLeak)?,
            Attack::ForgedOrigin => graph.set_policy(attacker, RoutingPolicy::Bgp)?,
            Attack::Hijack { .. } => {}
        }
        Ok(())
    }

    /// Run one `(victim, attacker)` trial on the given graph and return the attack success
    /// rate in percent. A victim or attacker missing from the graph yields a warned
    /// zero-success outcome instead of an error.
    pub fn run_trial<R: Rng>(
        &self,
        graph: &mut AsGraph,
        victim: Asn,
        attacker: Asn,
        rng: &mut R,
    ) -> Result<Rational64, SimError> {
        if !graph.contains(victim) {
            warn!("No AS with id {}", victim);
            return Ok(Rational64::zero());
        }
        if !graph.contains(attacker) {
            warn!("No AS with id {}", attacker);
            return Ok(Rational64::zero());
        }
        self.prepare(graph, attacker, rng)?;
        graph.find_routes_to(victim)?;
        let rate = match self.attack {
            Attack::Hijack { hops } => {
                graph.hijack_n_hops(victim, attacker, hops)?;
                attacker_success_rate(graph, attacker, victim)
            }
            Attack::ForgedOrigin => {
                graph.hijack_n_hops(victim, attacker, 1)?;
                attacker_success_rate(graph, attacker, victim)
            }
            Attack::RouteLeak => route_leak_success_rate(graph, attacker, victim)?,
        };
        graph.clear_routing_tables();
        Ok(rate)
    }
}
