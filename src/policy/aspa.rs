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

//! Autonomous System Provider Authorization (ASPA) records and path verification, following
//! draft-ietf-sidrops-aspa-verification.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::graph::AsGraph;
use crate::route::Route;
use crate::types::{Asn, Relation};

/// An ASPA record: the set of providers an AS has authorized to propagate its routes upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspa {
    /// The AS that published the record.
    pub customer: Asn,
    /// All providers the customer has authorized.
    pub providers: BTreeSet<Asn>,
}

/// Outcome of an ASPA or ASCONES path verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    /// Every hop of the path is covered by a matching attestation.
    Valid,
    /// No hop contradicts an attestation, but at least one hop is not attested.
    Unknown,
    /// Some hop contradicts a published attestation.
    Invalid,
}

/// What a single attestation lookup says about the customer/provider pair of one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HopAttestation {
    /// The customer-side AS has attested the provider-side AS.
    ProviderPlus,
    /// An attestation exists, but does not cover the provider-side AS.
    NotProviderPlus,
    /// The customer-side AS has not published an attestation.
    NoAttestation,
}

/// Verify a received route against the ASPA records published in the graph. `from` is the
/// relation between the validating AS (the route's final AS) and the announcing neighbor.
pub fn verify(route: &Route, from: Relation, graph: &AsGraph) -> ValidationOutcome {
    let path: Vec<Asn> = route.path().iter().copied().dedup().collect();
    let hop = |customer: Asn, provider: Asn| match graph.aspa_record(customer) {
        None => HopAttestation::NoAttestation,
        Some(aspa) if aspa.providers.contains(&provider) => HopAttestation::ProviderPlus,
        Some(_) => HopAttestation::NotProviderPlus,
    };
    match from {
        Relation::Customer | Relation::Peer => upstream_walk(&path, hop),
        Relation::Provider => downstream_walk(&path, hop),
    }
}

/// Upstream verification (the route arrived from a customer or peer): the collapsed path must be
/// a monotone customer-to-provider walk. The path includes the validating AS as its last
/// element; the hop onto the validator itself is not examined. A contradicted hop dominates a
/// missing attestation regardless of position.
pub(crate) fn upstream_walk<F>(path: &[Asn], hop: F) -> ValidationOutcome
where
    F: Fn(Asn, Asn) -> HopAttestation,
{
    let m = path.len();
    debug_assert!(m >= 2, "a received route contains announcer and validator");
    if m == 2 {
        return ValidationOutcome::Valid;
    }
    let mut outcome = ValidationOutcome::Valid;
    for j in 0..=m - 3 {
        match hop(path[j], path[j + 1]) {
            HopAttestation::NotProviderPlus => return ValidationOutcome::Invalid,
            HopAttestation::NoAttestation => outcome = ValidationOutcome::Unknown,
            HopAttestation::ProviderPlus => {}
        }
    }
    outcome
}

/// Downstream verification (the route arrived from a provider): the collapsed path may be an
/// up-ramp followed by a down-ramp. Indices follow the draft, with `AS(i) = path[i-1]` and
/// `AS(m)` the validating AS.
pub(crate) fn downstream_walk<F>(path: &[Asn], hop: F) -> ValidationOutcome
where
    F: Fn(Asn, Asn) -> HopAttestation,
{
    let m = path.len();
    debug_assert!(m >= 2, "a received route contains announcer and validator");
    if m <= 3 {
        return ValidationOutcome::Valid;
    }
    let hop_i = |x: usize, y: usize| hop(path[x - 1], path[y - 1]);

    // u_min: smallest u with hop(AS(u-1), AS(u)) contradicted, scanning from the origin.
    let u_min = (2..=m - 1)
        .find(|&u| hop_i(u - 1, u) == HopAttestation::NotProviderPlus)
        .unwrap_or(m);
    // v_max: largest v with hop(AS(v+1), AS(v)) contradicted, scanning from the validator.
    let v_max = (1..=m - 2)
        .rev()
        .find(|&v| hop_i(v + 1, v) == HopAttestation::NotProviderPlus)
        .unwrap_or(0);
    if u_min <= v_max {
        return ValidationOutcome::Invalid;
    }

    // Up-ramp length: largest k such that all hops up to AS(k) are attested.
    let mut k = 1;
    for i in 2..=m - 1 {
        if hop_i(i - 1, i) == HopAttestation::ProviderPlus {
            k = i;
        } else {
            break;
        }
    }
    // Down-ramp start: smallest l such that all hops from AS(m-1) down to AS(l) are attested.
    let mut l = m - 1;
    for j in (1..=m - 2).rev() {
        if hop_i(j + 1, j) == HopAttestation::ProviderPlus {
            l = j;
        } else {
            break;
        }
    }

    if l <= k + 1 {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Unknown
    }
}
