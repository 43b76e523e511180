// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker pool runtime (spec §4.2/§5): a bounded FIFO queue shared by
//! `N` tokio tasks, each looping `dequeue → run → dequeue` until the
//! queue drains. A global pause sentinel file suspends new dequeues
//! without interrupting in-flight phases.

use super::Engine;
use crate::enumerator::PairCandidate;
use endtoend_core::{Clock, Config};
use endtoend_orchestrator_client::OrchestratorClient;
use endtoend_probe_client::ProbeClient;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

const PAUSE_SENTINEL_NAME: &str = "pause-endtoend-testing";
const PAUSE_POLL_SECS: u64 = 30;

/// A shared, thread-safe FIFO of work (spec §4.2: "each queue entry is
/// dequeued exactly once"). Clones share the same backing queue.
#[derive(Clone)]
pub struct WorkQueue {
    inner: Arc<Mutex<VecDeque<PairCandidate>>>,
}

impl WorkQueue {
    pub fn new(items: impl IntoIterator<Item = PairCandidate>) -> Self {
        Self { inner: Arc::new(Mutex::new(items.into_iter().collect())) }
    }

    pub fn dequeue(&self) -> Option<PairCandidate> {
        self.inner.lock().pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

fn is_paused(config: &Config) -> bool {
    config.workdir.join(PAUSE_SENTINEL_NAME).exists()
}

async fn worker_loop<O, P, C>(worker_id: String, engine: Arc<Engine<O, P, C>>, queue: WorkQueue)
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    loop {
        while is_paused(&engine.config) {
            tracing::debug!(worker = %worker_id, "pause sentinel present, suspending new dequeues");
            tokio::time::sleep(Duration::from_secs(PAUSE_POLL_SECS)).await;
        }

        let Some(candidate) = queue.dequeue() else {
            break;
        };

        if let Err(err) = engine.run(&worker_id, &candidate).await {
            tracing::error!(worker = %worker_id, %err, "artifact I/O failure driving pair");
        }
    }
}

/// Spawn `worker_count` tokio tasks sharing `queue` (spec §5: "N
/// parallel worker contexts ... one task per worker slot"). Resolves
/// once every worker has drained the queue.
pub async fn run_pool<O, P, C>(engine: Arc<Engine<O, P, C>>, queue: WorkQueue, worker_count: usize)
where
    O: OrchestratorClient,
    P: ProbeClient,
    C: Clock,
{
    let slots = worker_count.max(1);
    let mut handles = Vec::with_capacity(slots);
    for i in 0..slots {
        let worker_id = format!("worker-{i}");
        let engine = Arc::clone(&engine);
        let queue = queue.clone();
        handles.push(tokio::spawn(worker_loop(worker_id, engine, queue)));
    }
    for handle in handles {
        if let Err(err) = handle.await {
            tracing::error!(%err, "worker task panicked");
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
