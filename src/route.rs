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

//! Module containing the immutable route value and the routing-table entry.

use std::sync::Arc;

use itertools::Itertools;

use crate::types::{Asn, Relation};

/// A route as delivered to its final AS: the ordered AS path (origin first) together with the
/// validity flags set by attack injection.
///
/// Routes are values. Extending a route with [`Route::extend`] produces a new route one hop
/// longer; the path storage is reference counted, so cloning a route into a routing table is
/// cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// AS path, where the origin of the route is first, and each forwarding AS is appended.
    path: Arc<[Asn]>,
    /// The route was injected by a forged-origin or path-hijack attack.
    origin_invalid: bool,
    /// The attacker fabricated the hop adjacent to the origin.
    path_end_invalid: bool,
    /// Every AS on the path runs BGPsec and the route was not forged.
    authenticated: bool,
    /// Some AS appears twice on the path. Maintained incrementally on extension.
    cyclic: bool,
}

impl Route {
    /// The trivial route an AS originates for its own address space.
    pub fn originate(origin: Asn, bgp_sec_enabled: bool) -> Self {
        Self {
            path: Arc::from(vec![origin]),
            origin_invalid: false,
            path_end_invalid: false,
            authenticated: bgp_sec_enabled,
            cyclic: false,
        }
    }

    /// A fabricated route installed by attack injection. Forged routes are never authenticated
    /// and always carry an invalid origin.
    pub(crate) fn forged(path: Vec<Asn>, path_end_invalid: bool) -> Self {
        let cyclic = !path.iter().all_unique();
        Self {
            path: Arc::from(path),
            origin_invalid: true,
            path_end_invalid,
            authenticated: false,
            cyclic,
        }
    }

    /// The route as seen by the neighbor `next` after one more forwarding step. The validity
    /// flags are inherited; the route stays authenticated only if `next` runs BGPsec as well.
    pub fn extend(&self, next: Asn, next_has_bgp_sec: bool) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(next);
        Self {
            cyclic: self.cyclic || self.path.contains(&next),
            path: Arc::from(path),
            origin_invalid: self.origin_invalid,
            path_end_invalid: self.path_end_invalid,
            authenticated: self.authenticated && next_has_bgp_sec,
        }
    }

    /// The full AS path, origin first.
    pub fn path(&self) -> &[Asn] {
        &self.path
    }

    /// The AS that originated the route.
    pub fn origin(&self) -> Asn {
        self.path[0]
    }

    /// The AS the route was delivered to.
    pub fn final_as(&self) -> Asn {
        self.path[self.path.len() - 1]
    }

    /// The neighbor that announced the route to the final AS, or `None` for a route of length
    /// one (the origin's own route).
    pub fn first_hop(&self) -> Option<Asn> {
        (self.path.len() >= 2).then(|| self.path[self.path.len() - 2])
    }

    /// Number of ASes on the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path is empty. Routes are constructed non-empty, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether some AS appears twice on the path.
    pub fn contains_cycle(&self) -> bool {
        self.cyclic
    }

    /// Whether the route was injected by a forged-origin or path-hijack attack.
    pub fn origin_invalid(&self) -> bool {
        self.origin_invalid
    }

    /// Whether the attacker fabricated the hop adjacent to the origin.
    pub fn path_end_invalid(&self) -> bool {
        self.path_end_invalid
    }

    /// Whether every AS on the path runs BGPsec and the route was not forged.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.iter().join(" => "))
    }
}

/// An entry of a per-AS routing table: the selected route together with the relation toward the
/// neighbor that announced it (`None` for locally originated or locally forged routes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibEntry {
    /// The selected route.
    pub route: Route,
    /// Relation toward the announcing neighbor, `None` if the route was not learned from a
    /// neighbor.
    pub from: Option<Relation>,
}

impl RibEntry {
    /// Local-preference value of this entry (smaller is better). Locally originated routes win
    /// against any learned route.
    pub(crate) fn local_pref(&self) -> i64 {
        self.from.map(Relation::local_pref).unwrap_or(-1)
    }
}
