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

//! Route propagation and attack injection.
//!
//! Propagation computes the steady state of a synchronous best-path selection: each AS drawn
//! from a work queue offers its selected route to all neighbors (in ascending ASN order, which
//! makes the outcome reproducible), and a neighbor that adopts a strictly preferred candidate
//! re-enters the queue. Adoption is monotone under the strict preference order, so the queue
//! drains.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::route::{RibEntry, Route};
use crate::types::{Asn, SimError};

use super::AsGraph;

impl AsGraph {
    /// Fill `routes[origin]` on every AS that can reach `origin` under the currently installed
    /// policies.
    pub fn find_routes_to(&mut self, origin: Asn) -> Result<(), SimError> {
        let o = self.require(origin)?;
        debug!("Finding all routes towards {}", origin);
        let bgp_sec = self.state[o].bgp_sec_enabled;
        self.state[o].routes.insert(
            origin,
            RibEntry {
                route: Route::originate(origin, bgp_sec),
                from: None,
            },
        );
        self.propagate(o, origin);
        Ok(())
    }

    /// Install a forged route claiming to reach `victim` at the attacker and spread it.
    ///
    /// The forged path depends on `n`: `0` announces `[attacker]` masquerading as the victim's
    /// address space, `1` announces `[victim, attacker]`, and `n >= 2` prepends `n - 1`
    /// truthful hops walking real links away from the victim, each chosen as the smallest-ASN
    /// neighbor of the previous hop that is reachable from the attacker and not used yet (the
    /// chain stays shorter if it cannot grow). Only `n <= 1` paths fabricate the hop adjacent
    /// to the origin.
    ///
    /// The forged route is offered to the attacker through its own policy, so an attacker
    /// whose policy rejects forged announcements drops its own hijack. Returns the forged
    /// route as announced.
    pub fn hijack_n_hops(
        &mut self,
        victim: Asn,
        attacker: Asn,
        n: usize,
    ) -> Result<Route, SimError> {
        let a = self.require(attacker)?;
        if n >= 1 {
            self.require(victim)?;
        }
        let forged = self.forge_route(victim, attacker, n);
        debug!("Injecting forged route [{}] at {}", forged, attacker);
        self.attack = Some(forged.clone());

        let policy = self.state[a].policy;
        if policy.accept_route(&forged, None, self) {
            let candidate = RibEntry {
                route: forged.clone(),
                from: None,
            };
            let adopt = match self.state[a].routes.get(&victim) {
                None => true,
                Some(current) => policy.prefer_route(current, &candidate),
            };
            if adopt {
                self.state[a].routes.insert(victim, candidate);
                self.propagate(a, victim);
            }
        }
        Ok(forged)
    }

    /// Drain the work queue starting at `seed`, letting every AS offer its selected route for
    /// `origin` to its neighbors.
    fn propagate(&mut self, seed: usize, origin: Asn) {
        let topo = self.topo.clone();
        let mut queue: VecDeque<usize> = VecDeque::from([seed]);
        while let Some(a) = queue.pop_front() {
            let Some(entry) = self.state[a].routes.get(&origin).cloned() else {
                continue;
            };
            let policy_a = self.state[a].policy;
            for &(b_id, rel) in &topo.info[a].neighbors {
                if !policy_a.forward_to(&entry, rel) {
                    continue;
                }
                let b = topo.ids[&b_id].index();
                let candidate_route = entry.route.extend(b_id, self.state[b].bgp_sec_enabled);
                let from = Some(rel.inverse());
                let policy_b = self.state[b].policy;
                if !policy_b.accept_route(&candidate_route, from, self) {
                    continue;
                }
                let candidate = RibEntry {
                    route: candidate_route,
                    from,
                };
                let adopt = match self.state[b].routes.get(&origin) {
                    None => true,
                    Some(current) => policy_b.prefer_route(current, &candidate),
                };
                if adopt {
                    trace!("{} adopts [{}]", b_id, candidate.route);
                    self.state[b].routes.insert(origin, candidate);
                    queue.push_back(b);
                }
            }
        }
    }

    fn forge_route(&self, victim: Asn, attacker: Asn, n: usize) -> Route {
        if n == 0 {
            return Route::forged(vec![attacker], true);
        }
        let mut path = vec![victim];
        if n >= 2 {
            let reachable = self.reachable_from(attacker);
            let mut cursor = victim;
            for _ in 0..n - 1 {
                let next = self
                    .neighbors(cursor)
                    .iter()
                    .map(|(asn, _)| *asn)
                    .find(|asn| *asn != attacker && !path.contains(asn) && reachable.contains(asn));
                match next {
                    Some(asn) => {
                        path.push(asn);
                        cursor = asn;
                    }
                    None => break,
                }
            }
        }
        path.push(attacker);
        Route::forged(path, n < 2)
    }

    /// All ASes connected to `start`, ignoring policies and link directions.
    fn reachable_from(&self, start: Asn) -> HashSet<Asn> {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(asn) = queue.pop_front() {
            for &(next, _) in self.neighbors(asn) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }
}
