// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background execution of external calls.
//!
//! Jobs queue up for a single worker thread and run in submission order, so
//! a later save or broadcast can never land before an earlier one. Results
//! come back over a channel; nothing waits on a job unless asked to.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Result of one background job.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub label: String,
    pub result: Result<(), String>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct Dispatcher {
    jobs: Option<Sender<(String, Job)>>,
    outcomes: Receiver<Outcome>,
    worker: Option<JoinHandle<()>>,
    /// Jobs submitted but not yet collected
    in_flight: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn run_jobs(jobs: Receiver<(String, Job)>, outcomes: Sender<Outcome>) {
    for (label, job) in jobs {
        let result = match catch_unwind(AssertUnwindSafe(job)) {
            Ok(result) => result.map_err(|e| format!("{:#}", e)),
            Err(_) => Err("background job panicked".to_string()),
        };
        if outcomes.send(Outcome { label, result }).is_err() {
            break;
        }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (job_sender, job_receiver) = channel::<(String, Job)>();
        let (outcome_sender, outcome_receiver) = channel();
        let worker = std::thread::spawn(move || run_jobs(job_receiver, outcome_sender));
        Self {
            jobs: Some(job_sender),
            outcomes: outcome_receiver,
            worker: Some(worker),
            in_flight: 0,
        }
    }

    /// Queue `job` behind everything submitted before it.
    pub fn spawn<F>(&mut self, label: impl Into<String>, job: F)
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let label = label.into();
        let job: Job = Box::new(job);
        let sent = match &self.jobs {
            Some(jobs) => jobs.send((label.clone(), job)).is_ok(),
            None => false,
        };
        if sent {
            self.in_flight += 1;
        } else {
            log::error!("Background worker is gone, dropped '{}'", label);
        }
    }

    /// Jobs that have not been collected yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Outcomes reported since the last poll, oldest first, without blocking.
    pub fn poll(&mut self) -> Vec<Outcome> {
        let outcomes: Vec<Outcome> = self.outcomes.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }

    /// Block until every queued job has reported.
    pub fn wait_all(&mut self) -> Vec<Outcome> {
        let mut outcomes = self.poll();
        while self.in_flight > 0 {
            match self.outcomes.recv() {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    outcomes.push(outcome);
                }
                Err(_) => {
                    log::error!("Background worker stopped with {} job(s) queued", self.in_flight);
                    self.in_flight = 0;
                }
            }
        }
        outcomes
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // closing the queue lets the worker finish what it has and exit
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Background worker panicked");
            }
        }
    }
}
