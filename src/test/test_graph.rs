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

use maplit::btreemap;
use pretty_assertions::assert_eq;

use super::{path_of, six_as_graph};
use crate::graph::{AsGraph, EdgeKind};
use crate::policy::RoutingPolicy;
use crate::types::{Asn, Relation, SimError, Tier};

#[test]
fn construction() {
    let graph = six_as_graph();
    assert_eq!(graph.len(), 6);
    assert!(graph.contains(Asn(4)));
    assert!(!graph.contains(Asn(7)));
    assert_eq!(
        graph.asns().collect::<Vec<_>>(),
        vec![Asn(1), Asn(2), Asn(3), Asn(4), Asn(5), Asn(6)]
    );
}

#[test]
fn neighbors_are_sorted_and_mirrored() {
    let graph = six_as_graph();
    assert_eq!(
        graph.neighbors(Asn(2)),
        &[
            (Asn(1), Relation::Provider),
            (Asn(3), Relation::Peer),
            (Asn(4), Relation::Customer),
            (Asn(5), Relation::Customer),
        ]
    );
    // every edge is mirrored with the inverse relation
    for a in graph.asns() {
        for &(b, rel) in graph.neighbors(a) {
            assert_eq!(graph.get_relation(b, a), Some(rel.inverse()));
        }
    }
    assert_eq!(graph.get_relation(Asn(1), Asn(6)), None);
}

#[test]
fn duplicate_declarations_are_tolerated() {
    let graph = AsGraph::from_relationships([
        (1, 2, EdgeKind::P2C),
        (1, 2, EdgeKind::P2C),
    ])
    .unwrap();
    assert_eq!(graph.len(), 2);
}

#[test]
fn conflicting_declarations_are_rejected() {
    let err = AsGraph::from_relationships([(1, 2, EdgeKind::P2C), (1, 2, EdgeKind::P2P)])
        .unwrap_err();
    assert_eq!(err, SimError::InconsistentEdge(Asn(1), Asn(2)));

    // a mutual provider claim is a conflict on the mirrored edge
    let err = AsGraph::from_relationships([(1, 2, EdgeKind::P2C), (2, 1, EdgeKind::P2C)])
        .unwrap_err();
    assert_eq!(err, SimError::InconsistentEdge(Asn(2), Asn(1)));

    let err = AsGraph::from_relationships([(1, 1, EdgeKind::P2P)]).unwrap_err();
    assert_eq!(err, SimError::InconsistentEdge(Asn(1), Asn(1)));
}

#[test]
fn circular_provider_chains_are_rejected() {
    let err = AsGraph::from_relationships([
        (1, 2, EdgeKind::P2C),
        (2, 3, EdgeKind::P2C),
        (3, 1, EdgeKind::P2C),
    ])
    .unwrap_err();
    assert!(matches!(err, SimError::CyclicRelation(_)));
}

#[test]
fn tier_classification() {
    let graph = six_as_graph();
    assert_eq!(graph.tier(Asn(1)), Some(Tier::One));
    assert_eq!(graph.tier(Asn(2)), Some(Tier::Two));
    assert_eq!(graph.tier(Asn(3)), Some(Tier::Two));
    assert_eq!(graph.tier(Asn(4)), Some(Tier::Three));
    assert_eq!(graph.tier(Asn(5)), Some(Tier::Three));
    assert_eq!(graph.tier(Asn(6)), Some(Tier::Three));
    assert_eq!(graph.tier_members(Tier::Two), vec![Asn(2), Asn(3)]);
}

#[test]
fn customer_cones() {
    let graph = six_as_graph();
    assert_eq!(graph.customer_cone_size(Asn(1)), Some(5));
    assert_eq!(graph.customer_cone_size(Asn(2)), Some(2));
    assert_eq!(graph.customer_cone_size(Asn(3)), Some(1));
    assert_eq!(graph.customer_cone_size(Asn(4)), Some(0));
    assert_eq!(graph.customer_cone_size(Asn(6)), Some(0));
}

#[test]
fn isp_rankings() {
    let graph = six_as_graph();
    assert_eq!(graph.top_isps(3), vec![Asn(1), Asn(2), Asn(3)]);
    // cone ties are broken towards the smaller ASN
    assert_eq!(
        graph.top_isps(6),
        vec![Asn(1), Asn(2), Asn(3), Asn(4), Asn(5), Asn(6)]
    );
    assert_eq!(graph.bottom_isps(2), vec![Asn(5), Asn(6)]);
    assert_eq!(graph.top_isps_without_stubs(5), vec![Asn(1), Asn(2), Asn(3)]);
    assert_eq!(graph.bottom_isps_without_stubs(2), vec![Asn(2), Asn(3)]);
}

#[test]
fn policy_census() {
    let mut graph = six_as_graph();
    assert_eq!(graph.policy_census(), btreemap! { RoutingPolicy::Bgp => 6 });
    graph.set_policy(Asn(2), RoutingPolicy::Rpki).unwrap();
    graph.set_policy(Asn(3), RoutingPolicy::Rpki).unwrap();
    assert_eq!(
        graph.policy_census(),
        btreemap! { RoutingPolicy::Bgp => 4, RoutingPolicy::Rpki => 2 }
    );
}

#[test]
fn missing_as_is_reported() {
    let mut graph = six_as_graph();
    assert_eq!(
        graph.set_policy(Asn(9), RoutingPolicy::Rpki),
        Err(SimError::AsNotFound(Asn(9)))
    );
    assert_eq!(graph.find_routes_to(Asn(9)), Err(SimError::AsNotFound(Asn(9))));
    assert_eq!(graph.policy(Asn(9)), None);
}

#[test]
fn baseline_connectivity() {
    let mut graph = six_as_graph();
    graph.find_routes_to(Asn(6)).unwrap();

    assert_eq!(path_of(&graph, 1, 6), vec![6, 3, 1]);
    assert_eq!(path_of(&graph, 2, 6), vec![6, 3, 2]);
    assert_eq!(path_of(&graph, 3, 6), vec![6, 3]);
    assert_eq!(path_of(&graph, 4, 6), vec![6, 3, 2, 4]);
    assert_eq!(path_of(&graph, 5, 6), vec![6, 3, 2, 5]);
    assert_eq!(path_of(&graph, 6, 6), vec![6]);

    // the relation toward the announcing neighbor is stored alongside
    assert_eq!(
        graph.route(Asn(2), Asn(6)).unwrap().from,
        Some(Relation::Peer)
    );
    assert_eq!(
        graph.route(Asn(4), Asn(6)).unwrap().from,
        Some(Relation::Provider)
    );
    assert_eq!(graph.route(Asn(6), Asn(6)).unwrap().from, None);
}

#[test]
fn stored_routes_respect_path_invariants() {
    let mut graph = six_as_graph();
    graph.find_routes_to(Asn(6)).unwrap();
    for asn in graph.asns() {
        let Some(entry) = graph.route(asn, Asn(6)) else {
            continue;
        };
        let path = entry.route.path();
        assert_eq!(path[0], Asn(6));
        assert_eq!(path[path.len() - 1], asn);
        assert!(!entry.route.contains_cycle());
        for pair in path.windows(2) {
            assert!(graph.get_relation(pair[0], pair[1]).is_some());
        }
    }
}

#[test]
fn recomputation_is_idempotent() {
    let mut graph = six_as_graph();
    graph.find_routes_to(Asn(6)).unwrap();
    let first: Vec<Vec<u32>> = (1..=6).map(|asn| path_of(&graph, asn, 6)).collect();
    graph.clear_routing_tables();
    graph.find_routes_to(Asn(6)).unwrap();
    let second: Vec<Vec<u32>> = (1..=6).map(|asn| path_of(&graph, asn, 6)).collect();
    assert_eq!(first, second);
}

#[test]
fn reset_restores_the_pristine_graph() {
    let mut graph = six_as_graph();
    graph.set_policy(Asn(2), RoutingPolicy::Aspa).unwrap();
    graph.enable_bgp_sec(Asn(3)).unwrap();
    graph.publish_aspa(Asn(4)).unwrap();
    graph.publish_ascones(Asn(2)).unwrap();
    graph.find_routes_to(Asn(6)).unwrap();
    graph.hijack_n_hops(Asn(6), Asn(5), 1).unwrap();

    graph.reset_policies();
    graph.clear_attestations();
    graph.clear_routing_tables();

    assert_eq!(graph.policy_census(), btreemap! { RoutingPolicy::Bgp => 6 });
    for asn in graph.asns() {
        assert!(!graph.bgp_sec_enabled(asn));
        assert!(graph.aspa_record(asn).is_none());
        assert!(graph.ascones_record(asn).is_none());
        assert!(graph.route(asn, Asn(6)).is_none());
    }
    assert!(graph.last_attack().is_none());
}
