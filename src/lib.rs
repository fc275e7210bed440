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

#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # BgpSecSim
//!
//! This is a simulator for quantifying how partial deployment of routing-security mechanisms
//! (RPKI origin validation, BGPsec, Path-End validation, ASPA, and AS Cones) reduces the
//! success of prefix hijacks, forged-origin hijacks, and route leaks. It does not model BGP
//! message exchange or convergence: a simulation computes the steady-state outcome of a
//! synchronous best-path selection over an AS-level topology annotated with Gao-Rexford
//! business relations. ASes are identified by plain numbers ([`types::Asn`]); there are no IP
//! prefixes, no timers, and no persistence.
//!
//! ## Main Concepts
//!
//! The [`graph::AsGraph`] is the main datastructure to operate on. It is built once from
//! pairwise relationship declarations and then mutated per trial: install policies
//! ([`policy::RoutingPolicy`]), publish attestations, compute all routes towards a victim with
//! [`graph::AsGraph::find_routes_to`], and inject an attack with
//! [`graph::AsGraph::hijack_n_hops`]. The two scorers in [`score`] walk the resulting routing
//! tables and return the attack success as an exact rational.
//!
//! The [`experiment::Scenario`] describes a complete experiment (base policy, deployment
//! actions, attack role), and the [`experiment::harness::Harness`] executes a scenario over a
//! stream of `(victim, attacker)` pairs on a pool of workers, each owning its own clone of the
//! graph.
//!
//! ## Example usage
//!
//! The following example builds a small topology of six ASes, where AS 1 provides transit for
//! AS 2 and AS 3, and checks how far a next-AS forgery by AS 5 spreads without any protection:
//!
//! ```
//! use bgpsecsim::prelude::*;
//!
//! fn main() -> Result<(), SimError> {
//!     let mut graph = AsGraph::from_relationships([
//!         (1, 2, EdgeKind::P2C),
//!         (1, 3, EdgeKind::P2C),
//!         (2, 4, EdgeKind::P2C),
//!         (2, 5, EdgeKind::P2C),
//!         (3, 6, EdgeKind::P2C),
//!         (2, 3, EdgeKind::P2P),
//!         (4, 5, EdgeKind::P2P),
//!     ])?;
//!
//!     // compute every AS's route towards AS 6
//!     graph.find_routes_to(Asn(6))?;
//!     let entry = graph.route(Asn(4), Asn(6)).unwrap();
//!     assert_eq!(entry.route.path(), &[Asn(6), Asn(3), Asn(2), Asn(4)]);
//!
//!     // AS 5 pretends to be a direct neighbor of AS 6; half of the ASes fall for it
//!     graph.hijack_n_hops(Asn(6), Asn(5), 1)?;
//!     assert_eq!(
//!         attacker_success_rate(&graph, Asn(5), Asn(6)),
//!         Rational64::new(50, 1)
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Experiments over many trials run on the harness. The following scenario deploys ASPA on
//! every AS and checks that route leaks no longer spread:
//!
//! ```
//! use bgpsecsim::prelude::*;
//!
//! fn main() -> Result<(), SimError> {
//!     let graph = AsGraph::from_relationships([
//!         (1, 2, EdgeKind::P2C),
//!         (1, 3, EdgeKind::P2C),
//!         (2, 4, EdgeKind::P2C),
//!         (2, 5, EdgeKind::P2C),
//!         (3, 6, EdgeKind::P2C),
//!         (2, 3, EdgeKind::P2P),
//!         (4, 5, EdgeKind::P2P),
//!     ])?;
//!
//!     let scenario = Scenario::new(RoutingPolicy::Aspa, Attack::RouteLeak)
//!         .with_action(DeployAction::PublishAspa {
//!             select: Selection::Random { percent: 100 },
//!         });
//!
//!     let mut harness = Harness::with_options(&graph, scenario, 2, Some(42));
//!     for result in harness.run([(Asn(6), Asn(4)), (Asn(6), Asn(2))]) {
//!         assert_eq!(result.outcome, Ok(Rational64::new(0, 1)));
//!     }
//!     Ok(())
//! }
//! ```

pub mod experiment;
pub mod graph;
pub mod policy;
pub mod prelude;
pub mod route;
pub mod score;
pub mod types;

#[cfg(test)]
mod test;
