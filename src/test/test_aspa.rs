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

use maplit::btreeset;

use crate::graph::{AsGraph, EdgeKind};
use crate::policy::aspa::{verify, ValidationOutcome};
use crate::route::Route;
use crate::types::{Asn, Relation};

/// Two provider chains hanging off AS 1: `1 > 2 > 3 > 4` (with AS 5 as a second provider of
/// AS 3) and `1 > 6 > 7`.
fn chain_graph() -> AsGraph {
    AsGraph::from_relationships([
        (1, 2, EdgeKind::P2C),
        (2, 3, EdgeKind::P2C),
        (3, 4, EdgeKind::P2C),
        (5, 3, EdgeKind::P2C),
        (1, 6, EdgeKind::P2C),
        (6, 7, EdgeKind::P2C),
    ])
    .unwrap()
}

fn publish_all(graph: &mut AsGraph) {
    for asn in graph.asns().collect::<Vec<_>>() {
        graph.publish_aspa(asn).unwrap();
    }
}

/// An honest-looking route along the given path (origin first), for verification only.
fn route(path: &[u32]) -> Route {
    let mut route = Route::originate(Asn(path[0]), false);
    for asn in &path[1..] {
        route = route.extend(Asn(*asn), false);
    }
    route
}

#[test]
fn published_record_lists_the_providers() {
    let mut graph = chain_graph();
    publish_all(&mut graph);
    let aspa = graph.aspa_record(Asn(3)).unwrap();
    assert_eq!(aspa.customer, Asn(3));
    assert_eq!(aspa.providers, btreeset![Asn(2), Asn(5)]);
    // a tier-1 AS publishes an empty provider set
    assert_eq!(graph.aspa_record(Asn(1)).unwrap().providers, btreeset![]);
}

#[test]
fn upstream_pair_is_always_valid() {
    let graph = chain_graph();
    assert_eq!(
        verify(&route(&[4, 3]), Relation::Customer, &graph),
        ValidationOutcome::Valid
    );
}

#[test]
fn upstream_attested_walk_is_valid() {
    let mut graph = chain_graph();
    publish_all(&mut graph);
    assert_eq!(
        verify(&route(&[4, 3, 2]), Relation::Customer, &graph),
        ValidationOutcome::Valid
    );
    assert_eq!(
        verify(&route(&[4, 3, 2, 1]), Relation::Peer, &graph),
        ValidationOutcome::Valid
    );
}

#[test]
fn upstream_missing_attestation_is_unknown() {
    let mut graph = chain_graph();
    graph.publish_aspa(Asn(3)).unwrap();
    assert_eq!(
        verify(&route(&[4, 3, 2, 1]), Relation::Customer, &graph),
        ValidationOutcome::Unknown
    );
}

#[test]
fn upstream_contradicted_attestation_is_invalid() {
    let mut graph = chain_graph();
    publish_all(&mut graph);
    // AS 2 is not a provider of AS 4
    assert_eq!(
        verify(&route(&[4, 2, 1]), Relation::Customer, &graph),
        ValidationOutcome::Invalid
    );
    assert_eq!(
        verify(&route(&[4, 2, 1]), Relation::Peer, &graph),
        ValidationOutcome::Invalid
    );
}

#[test]
fn upstream_contradiction_dominates_missing_attestation() {
    let mut graph = chain_graph();
    // only AS 2 publishes; the first hop (4, 2) is unattested, the later hop (2, 3)
    // contradicts the record
    graph.publish_aspa(Asn(2)).unwrap();
    assert_eq!(
        verify(&route(&[4, 2, 3, 1]), Relation::Customer, &graph),
        ValidationOutcome::Invalid
    );
}

#[test]
fn downstream_short_paths_are_valid() {
    let graph = chain_graph();
    assert_eq!(
        verify(&route(&[3, 2]), Relation::Provider, &graph),
        ValidationOutcome::Valid
    );
    assert_eq!(
        verify(&route(&[4, 3, 2]), Relation::Provider, &graph),
        ValidationOutcome::Valid
    );
}

#[test]
fn downstream_ramp_over_the_top_is_valid() {
    let mut graph = chain_graph();
    publish_all(&mut graph);
    // up from AS 4 to the tier-1 AS 1, down again to AS 7
    assert_eq!(
        verify(&route(&[4, 3, 2, 1, 6, 7]), Relation::Provider, &graph),
        ValidationOutcome::Valid
    );
}

#[test]
fn downstream_attestation_gaps_are_unknown() {
    let mut graph = chain_graph();
    for asn in [1, 3, 4, 5, 7] {
        graph.publish_aspa(Asn(asn)).unwrap();
    }
    assert_eq!(
        verify(&route(&[4, 3, 2, 1, 6, 7]), Relation::Provider, &graph),
        ValidationOutcome::Unknown
    );
}

#[test]
fn downstream_crossing_contradictions_are_invalid() {
    let mut graph = chain_graph();
    publish_all(&mut graph);
    // the path claims a valley: AS 2 never authorized AS 4 as provider
    assert_eq!(
        verify(&route(&[2, 4, 3, 1, 6, 7]), Relation::Provider, &graph),
        ValidationOutcome::Invalid
    );
}

#[test]
fn consecutive_duplicates_are_collapsed() {
    let graph = chain_graph();
    let prepended = Route::forged(vec![Asn(4), Asn(4), Asn(3)], false);
    assert_eq!(
        verify(&prepended, Relation::Customer, &graph),
        ValidationOutcome::Valid
    );
}

#[test]
fn additional_correct_attestations_never_invalidate() {
    let mut graph = chain_graph();
    graph.publish_aspa(Asn(3)).unwrap();
    let path = route(&[4, 3, 2, 1]);
    assert_eq!(
        verify(&path, Relation::Customer, &graph),
        ValidationOutcome::Unknown
    );
    graph.publish_aspa(Asn(4)).unwrap();
    assert_eq!(
        verify(&path, Relation::Customer, &graph),
        ValidationOutcome::Valid
    );
    graph.publish_aspa(Asn(2)).unwrap();
    graph.publish_aspa(Asn(1)).unwrap();
    assert_eq!(
        verify(&path, Relation::Customer, &graph),
        ValidationOutcome::Valid
    );
}
