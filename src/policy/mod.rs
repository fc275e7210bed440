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

//! Module containing the routing policies.
//!
//! A policy decides three things for the AS it is installed on: which received routes to accept
//! ([`RoutingPolicy::accept_route`]), which of two routes to the same origin to select
//! ([`RoutingPolicy::prefer_route`]), and to which neighbors the selected route is exported
//! ([`RoutingPolicy::forward_to`]). Policies are plain tagged variants; route selection is a
//! lexicographic comparison over a fixed, per-policy list of preference rules.

pub mod aspa;
pub mod ascones;

pub use aspa::{Aspa, ValidationOutcome};
pub use ascones::AsCones;

use serde::{Deserialize, Serialize};

use crate::graph::AsGraph;
use crate::route::{RibEntry, Route};
use crate::types::Relation;

/// Where the authentication preference of BGPsec slots into route selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BgpSecLevel {
    /// Prefer authenticated routes only as the last criterion before the ASN tie-break.
    Low,
    /// Prefer authenticated routes after local preference but before path length.
    Med,
    /// Prefer authenticated routes above everything else.
    High,
}

/// The routing policy installed on an AS.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RoutingPolicy {
    /// Plain BGP with Gao-Rexford export rules and no route validation.
    #[default]
    Bgp,
    /// BGP with RPKI origin validation: routes with an invalid origin are rejected.
    Rpki,
    /// BGP with Path-End validation: routes whose hop adjacent to the origin is fabricated are
    /// rejected.
    PathEnd,
    /// BGP with BGPsec path authentication. All levels reject invalid origins; they differ in
    /// how strongly authenticated routes are preferred.
    BgpSec(BgpSecLevel),
    /// BGP with ASPA verification: routes whose path contradicts a published provider
    /// authorization are rejected. Unattested paths are accepted.
    Aspa,
    /// BGP with AS Cones verification, the customer-attestation mirror of [`Self::Aspa`].
    AsCones,
    /// Plain BGP that exports every selected route to every neighbor, violating Gao-Rexford.
    /// Installed on the attacker in route-leak trials.
    RouteLeak,
}

/// A single criterion of route selection. Rules are compared in order; for each rule that
/// yields a value on both routes, the strictly smaller value wins and decides the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreferenceRule {
    /// Prefer authenticated routes.
    Authenticated,
    /// Prefer routes learned from customers over peers over providers.
    LocalPref,
    /// Prefer shorter AS paths.
    PathLength,
    /// Deterministic tie-break on the first-hop ASN.
    FirstHopAsn,
}

use PreferenceRule::*;

const DEFAULT_RULES: [PreferenceRule; 3] = [LocalPref, PathLength, FirstHopAsn];
const BGP_SEC_HIGH_RULES: [PreferenceRule; 4] = [Authenticated, LocalPref, PathLength, FirstHopAsn];
const BGP_SEC_MED_RULES: [PreferenceRule; 4] = [LocalPref, Authenticated, PathLength, FirstHopAsn];
const BGP_SEC_LOW_RULES: [PreferenceRule; 4] = [LocalPref, PathLength, Authenticated, FirstHopAsn];

impl PreferenceRule {
    /// The value of this criterion for one routing-table entry, or `None` if the criterion does
    /// not apply. Smaller is better.
    fn value(self, entry: &RibEntry) -> Option<i64> {
        match self {
            Authenticated => Some(i64::from(!entry.route.authenticated())),
            LocalPref => Some(entry.local_pref()),
            PathLength => Some(entry.route.len() as i64),
            FirstHopAsn => entry.route.first_hop().map(|asn| i64::from(asn.0)),
        }
    }
}

impl RoutingPolicy {
    /// Ingress filter: whether a route may enter the routing table at all. `from` is the
    /// relation toward the announcing neighbor, or `None` for a route the AS itself originated
    /// or forged; self-installed routes are never validated against attestations.
    ///
    /// Every policy rejects cyclic paths. ASPA and AS Cones additionally reject routes whose
    /// verification outcome is [`ValidationOutcome::Invalid`], while `Unknown` is accepted.
    pub fn accept_route(&self, route: &Route, from: Option<Relation>, graph: &AsGraph) -> bool {
        if route.contains_cycle() {
            return false;
        }
        match self {
            Self::Bgp | Self::RouteLeak => true,
            Self::Rpki | Self::BgpSec(_) => !route.origin_invalid(),
            Self::PathEnd => !route.path_end_invalid(),
            Self::Aspa => match from {
                None => true,
                Some(rel) => aspa::verify(route, rel, graph) != ValidationOutcome::Invalid,
            },
            Self::AsCones => match from {
                None => true,
                Some(rel) => ascones::verify(route, rel, graph) != ValidationOutcome::Invalid,
            },
        }
    }

    /// Strict selection order: whether `candidate` is better than `current`. Both entries must
    /// hold routes delivered to the same AS. A full tie keeps the current route.
    pub fn prefer_route(&self, current: &RibEntry, candidate: &RibEntry) -> bool {
        debug_assert_eq!(
            current.route.final_as(),
            candidate.route.final_as(),
            "routes must have the same final AS"
        );
        for rule in self.rules() {
            if let (Some(cur), Some(new)) = (rule.value(current), rule.value(candidate)) {
                if new < cur {
                    return true;
                }
                if cur < new {
                    return false;
                }
            }
        }
        false
    }

    /// Gao-Rexford egress filter: whether the selected entry is exported to a neighbor with the
    /// given relation. Routes originated locally or learned from a customer are exported to
    /// everyone; everything else only to customers. The route-leak policy exports
    /// unconditionally.
    pub fn forward_to(&self, entry: &RibEntry, egress: Relation) -> bool {
        match self {
            Self::RouteLeak => true,
            _ => {
                matches!(entry.from, None | Some(Relation::Customer))
                    || egress == Relation::Customer
            }
        }
    }

    fn rules(&self) -> &'static [PreferenceRule] {
        match self {
            Self::BgpSec(BgpSecLevel::High) => &BGP_SEC_HIGH_RULES,
            Self::BgpSec(BgpSecLevel::Med) => &BGP_SEC_MED_RULES,
            Self::BgpSec(BgpSecLevel::Low) => &BGP_SEC_LOW_RULES,
            _ => &DEFAULT_RULES,
        }
    }
}

impl std::fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bgp => write!(f, "bgp"),
            Self::Rpki => write!(f, "rpki"),
            Self::PathEnd => write!(f, "path-end"),
            Self::BgpSec(BgpSecLevel::Low) => write!(f, "bgpsec-low"),
            Self::BgpSec(BgpSecLevel::Med) => write!(f, "bgpsec-med"),
            Self::BgpSec(BgpSecLevel::High) => write!(f, "bgpsec-high"),
            Self::Aspa => write!(f, "aspa"),
            Self::AsCones => write!(f, "as-cones"),
            Self::RouteLeak => write!(f, "route-leak"),
        }
    }
}
