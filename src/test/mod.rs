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

use crate::graph::{AsGraph, EdgeKind};
use crate::types::Asn;

/// The six-AS reference topology used throughout the tests:
///
/// ```text
///         1
///        / \          (downward edges: provider -> customer)
///       2 - 3
///      / \   \
///     4 - 5   6
/// ```
fn six_as_graph() -> AsGraph {
    AsGraph::from_relationships([
        (1, 2, EdgeKind::P2C),
        (1, 3, EdgeKind::P2C),
        (2, 4, EdgeKind::P2C),
        (2, 5, EdgeKind::P2C),
        (3, 6, EdgeKind::P2C),
        (2, 3, EdgeKind::P2P),
        (4, 5, EdgeKind::P2P),
    ])
    .unwrap()
}

/// The AS path (as plain numbers) that `asn` selected towards `origin`, empty if it has none.
fn path_of(graph: &AsGraph, asn: u32, origin: u32) -> Vec<u32> {
    graph
        .route(Asn(asn), Asn(origin))
        .map(|entry| entry.route.path().iter().map(|a| a.0).collect())
        .unwrap_or_default()
}

mod test_aspa;
mod test_graph;
