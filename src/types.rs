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

//! Module containing all basic type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AS Number
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asn(pub u32);

impl std::fmt::Display for Asn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

impl From<usize> for Asn {
    fn from(x: usize) -> Self {
        Self(x as u32)
    }
}

impl From<i32> for Asn {
    fn from(x: i32) -> Self {
        Self(x as u32)
    }
}

impl From<u64> for Asn {
    fn from(x: u64) -> Self {
        Self(x as u32)
    }
}

impl<T> From<&T> for Asn
where
    T: Into<Asn> + Copy,
{
    fn from(x: &T) -> Self {
        (*x).into()
    }
}

/// The business relation of a neighboring AS, as seen from the local AS. A neighbor tagged
/// `Customer` pays the local AS for transit; a neighbor tagged `Provider` is paid by the local AS.
///
/// The discriminant doubles as the local-preference value during route selection, where smaller is
/// better: customer routes are preferred over peer routes, which are preferred over provider
/// routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// The neighbor is a customer of the local AS.
    Customer = 1,
    /// The neighbor is a settlement-free peer.
    Peer = 2,
    /// The neighbor is a provider of the local AS.
    Provider = 3,
}

impl Relation {
    /// The same link as seen from the other endpoint.
    pub fn inverse(self) -> Self {
        match self {
            Self::Customer => Self::Provider,
            Self::Peer => Self::Peer,
            Self::Provider => Self::Customer,
        }
    }

    /// Local-preference value of a route learned over this relation (smaller is better).
    pub(crate) fn local_pref(self) -> i64 {
        self as i64
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Peer => write!(f, "peer"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// Position of an AS in the provider hierarchy, assigned at graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// An AS without any provider.
    One,
    /// An AS with both providers and customers.
    Two,
    /// An AS without any customer (a stub).
    Three,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One => write!(f, "tier-1"),
            Self::Two => write!(f, "tier-2"),
            Self::Three => write!(f, "tier-3"),
        }
    }
}

/// Simulator error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The same AS pair was declared twice with conflicting relations.
    #[error("Conflicting relations declared for the link {0} -- {1}")]
    InconsistentEdge(Asn, Asn),
    /// The provider hierarchy contains a cycle (an AS is transitively its own provider).
    #[error("Circular provider chain through {0}")]
    CyclicRelation(Asn),
    /// The requested AS does not exist in the graph.
    #[error("AS was not found in the topology: {0}")]
    AsNotFound(Asn),
    /// A detected route leak was caused by an AS other than the designated attacker.
    #[error("Route leak caused by {offending}, but {attacker} is the designated attacker")]
    LeakMismatch {
        /// The AS that violated the export rules.
        offending: Asn,
        /// The AS configured to leak routes in this trial.
        attacker: Asn,
    },
    /// A stored route violates the path invariants (bug indicator).
    #[error("Stored route violates path invariants: {0}")]
    BrokenRoute(String),
    /// A scenario description could not be parsed.
    #[error("Invalid scenario configuration: {0}")]
    Config(String),
}
