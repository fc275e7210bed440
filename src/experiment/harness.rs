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

//! The parallel trial harness.
//!
//! A [`Harness`] keeps a pool of long-lived workers, each owning its own clone of the graph
//! (the topology is shared, the mutable trial state is not), so trials run without any
//! synchronization beyond the two queues. Results arrive in completion order, not submission
//! order. Stopping is cooperative: workers finish their current trial, then exit; one sentinel
//! per worker guarantees that nobody stays blocked on the input queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use num::rational::Rational64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::graph::AsGraph;
use crate::types::{Asn, SimError};

use super::Scenario;

/// The outcome of one `(victim, attacker)` trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    /// The AS whose address space was attacked.
    pub victim: Asn,
    /// The attacking AS.
    pub attacker: Asn,
    /// The attack success rate in percent, or the error that aborted the trial.
    pub outcome: Result<Rational64, SimError>,
}

struct Job {
    index: u64,
    victim: Asn,
    attacker: Asn,
}

/// A pool of trial workers executing one [`Scenario`] over a stream of `(victim, attacker)`
/// pairs.
#[derive(Debug)]
pub struct Harness {
    jobs: Sender<Option<Job>>,
    results: Receiver<TrialResult>,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    next_index: u64,
}

impl Harness {
    /// Spawn a harness with one worker per logical CPU and per-trial seeds drawn from system
    /// entropy.
    pub fn new(graph: &AsGraph, scenario: Scenario) -> Self {
        Self::with_options(graph, scenario, num_cpus::get(), None)
    }

    /// Spawn a harness with an explicit worker count and an optional base seed. With a seed,
    /// the random choices of trial `i` depend only on `seed + i`, making runs reproducible
    /// regardless of how trials are spread over the workers.
    pub fn with_options(
        graph: &AsGraph,
        scenario: Scenario,
        workers: usize,
        seed: Option<u64>,
    ) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<Option<Job>>();
        let (result_tx, result_rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let scenario = Arc::new(scenario);
        let handles = (0..workers)
            .map(|_| {
                let graph = graph.clone();
                let scenario = scenario.clone();
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let stop = stop.clone();
                std::thread::spawn(move || worker(graph, scenario, jobs, results, stop, seed))
            })
            .collect();
        debug!("Spawned {} trial workers", workers);
        Self {
            jobs: job_tx,
            results: result_rx,
            stop,
            workers: handles,
            next_index: 0,
        }
    }

    /// Feed a batch of `(victim, attacker)` pairs to the pool and collect one result per
    /// trial, in completion order. Failed trials are logged and returned as `Err` outcomes.
    pub fn run(&mut self, trials: impl IntoIterator<Item = (Asn, Asn)>) -> Vec<TrialResult> {
        let mut submitted = 0usize;
        for (victim, attacker) in trials {
            let job = Job {
                index: self.next_index,
                victim,
                attacker,
            };
            if self.jobs.send(Some(job)).is_err() {
                break;
            }
            self.next_index += 1;
            submitted += 1;
        }
        let mut results = Vec::with_capacity(submitted);
        for _ in 0..submitted {
            match self.results.recv() {
                Ok(result) => {
                    if let Err(e) = &result.outcome {
                        warn!(
                            "Trial ({}, {}) failed: {}",
                            result.victim, result.attacker, e
                        );
                    }
                    results.push(result);
                }
                Err(_) => break,
            }
        }
        results
    }

    /// Stop the pool and wait for the workers to exit. Every worker finishes its current trial
    /// first; one sentinel per worker makes sure nobody stays blocked on the input queue.
    pub fn stop(&mut self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            debug!("Stopping the trial workers");
            for _ in &self.workers {
                let _ = self.jobs.send(None);
            }
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker(
    mut graph: AsGraph,
    scenario: Arc<Scenario>,
    jobs: Receiver<Option<Job>>,
    results: Sender<TrialResult>,
    stop: Arc<AtomicBool>,
    seed: Option<u64>,
) {
    while !stop.load(Ordering::SeqCst) {
        match jobs.recv() {
            // A `None` job only unblocks the queue so the stop flag is checked again.
            Ok(None) => continue,
            Ok(Some(job)) => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(job.index)),
                    None => StdRng::from_entropy(),
                };
                let outcome = scenario.run_trial(&mut graph, job.victim, job.attacker, &mut rng);
                let result = TrialResult {
                    victim: job.victim,
                    attacker: job.attacker,
                    outcome,
                };
                if results.send(result).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}
