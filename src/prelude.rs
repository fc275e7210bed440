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

//! Module containing the most important types and functions, all in one place.

pub use crate::experiment::harness::{Harness, TrialResult};
pub use crate::experiment::{Attack, DeployAction, Scenario, Selection};
pub use crate::graph::{AsGraph, EdgeKind};
pub use crate::policy::{AsCones, Aspa, BgpSecLevel, RoutingPolicy, ValidationOutcome};
pub use crate::route::{RibEntry, Route};
pub use crate::score::{attacker_success_rate, route_leak_success_rate};
pub use crate::types::{Asn, Relation, SimError, Tier};

pub use num::rational::Rational64;
