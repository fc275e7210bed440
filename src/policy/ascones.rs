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

//! AS Cones records and path verification, following draft-ietf-grow-rpki-as-cones. The
//! verification reuses the ASPA walk with the attestation direction reversed: the provider
//! publishes its authorized customers, so each hop is checked against the record of its
//! provider-side AS.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::aspa::{downstream_walk, upstream_walk, HopAttestation, ValidationOutcome};
use crate::graph::AsGraph;
use crate::route::Route;
use crate::types::{Asn, Relation};

/// An AS Cones record: the set of customers a provider has authorized to receive its routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsCones {
    /// The AS that published the record.
    pub provider: Asn,
    /// All customers the provider has authorized.
    pub customers: BTreeSet<Asn>,
}

/// Verify a received route against the AS Cones records published in the graph. `from` is the
/// relation between the validating AS (the route's final AS) and the announcing neighbor.
pub fn verify(route: &Route, from: Relation, graph: &AsGraph) -> ValidationOutcome {
    let path: Vec<Asn> = route.path().iter().copied().dedup().collect();
    let hop = |customer: Asn, provider: Asn| match graph.ascones_record(provider) {
        None => HopAttestation::NoAttestation,
        Some(cones) if cones.customers.contains(&customer) => HopAttestation::ProviderPlus,
        Some(_) => HopAttestation::NotProviderPlus,
    };
    match from {
        Relation::Customer | Relation::Peer => upstream_walk(&path, hop),
        Relation::Provider => downstream_walk(&path, hop),
    }
}
