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

//! Attack-outcome scoring over populated routing tables.
//!
//! Both scorers walk every AS's routing-table entry for the victim's origin and return the
//! share of poisoned routes as an exact rational in `[0, 100]`, so results can be aggregated
//! without rounding.

use num::rational::Rational64;
use num::Zero;

use crate::graph::AsGraph;
use crate::route::Route;
use crate::types::{Asn, Relation, SimError};

/// The share of ASes whose selected route towards `victim` carries the attacker's forged
/// announcement, in percent.
///
/// A route counts as poisoned when the first occurrence of the attacker on its path directly
/// follows the last fabricated hop of the injected route (for plain origin and next-AS hijacks
/// that hop is the victim itself; for an origin masquerade the path must start at the
/// attacker). When no attack is recorded on the graph, the attacker must directly follow the
/// victim. Legitimate transit that merely traverses the attacker never counts.
pub fn attacker_success_rate(graph: &AsGraph, attacker: Asn, victim: Asn) -> Rational64 {
    let predecessor = match graph.last_attack() {
        Some(forged) if forged.len() == 1 => None,
        Some(forged) => Some(forged.path()[forged.len() - 2]),
        None => Some(victim),
    };
    let mut n_bad = 0i64;
    let mut n_total = 0i64;
    for asn in graph.asns() {
        let Some(entry) = graph.route(asn, victim) else {
            continue;
        };
        n_total += 1;
        let path = entry.route.path();
        let poisoned = match predecessor {
            None => path[0] == attacker,
            Some(pred) => path
                .iter()
                .position(|&hop| hop == attacker)
                .map(|i| i >= 1 && path[i - 1] == pred)
                .unwrap_or(false),
        };
        if poisoned {
            n_bad += 1;
        }
    }
    if n_total == 0 {
        return Rational64::zero();
    }
    Rational64::new(n_bad * 100, n_total)
}

/// The share of ASes whose selected route towards `victim` crosses a Gao-Rexford violation, in
/// percent.
///
/// The offending AS of every violating route must be the designated attacker; any other
/// offender means the trial state is inconsistent and yields [`SimError::LeakMismatch`].
pub fn route_leak_success_rate(
    graph: &AsGraph,
    attacker: Asn,
    victim: Asn,
) -> Result<Rational64, SimError> {
    let mut n_bad = 0i64;
    let mut n_total = 0i64;
    for asn in graph.asns() {
        let Some(entry) = graph.route(asn, victim) else {
            continue;
        };
        n_total += 1;
        if let Some(offending) = offending_as(graph, &entry.route) {
            n_bad += 1;
            if offending != attacker {
                return Err(SimError::LeakMismatch {
                    offending,
                    attacker,
                });
            }
        }
    }
    if n_total == 0 {
        return Ok(Rational64::zero());
    }
    Ok(Rational64::new(n_bad * 100, n_total))
}

/// The first AS on the path that violates the Gao-Rexford export discipline: an AS that
/// received the route from a peer or provider and passed it on to a peer or provider.
fn offending_as(graph: &AsGraph, route: &Route) -> Option<Asn> {
    let path = route.path();
    for i in 1..path.len().saturating_sub(1) {
        let asn = path[i];
        let from = graph.get_relation(asn, path[i - 1]);
        let to = graph.get_relation(asn, path[i + 1]);
        let from_non_customer = matches!(from, Some(Relation::Peer | Relation::Provider));
        let to_non_customer = matches!(to, Some(Relation::Peer | Relation::Provider));
        if from_non_customer && to_non_customer {
            return Some(asn);
        }
    }
    None
}
