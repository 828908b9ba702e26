// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schwärz — Bounded worker pool for batch document processing.
//
// The pool is deliberately generic over worker state: OCR engines, pdfium
// bindings, and compiled grammars are all either expensive or not
// thread-safe, so each worker builds its own in `init` and nothing but
// job specs and results ever crosses a thread boundary. It also keeps
// the scheduler testable with plain closures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info};

/// Decide how many workers a batch should use.
///
/// Documents are memory-hungry (a 300 DPI A4 page is ~25 MB of pixels),
/// so the default is half the available cores, floor one. An explicit
/// request is honoured but still clamped to the core count and the job
/// count — more workers than jobs is pure overhead.
pub fn worker_count(requested: Option<usize>, jobs: usize) -> usize {
    let cpus = thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    let chosen = requested.unwrap_or_else(|| (cpus / 2).max(1));
    chosen.min(cpus).min(jobs).max(1)
}

/// Run every job and return exactly one result per job, in completion
/// order.
///
/// Workers pull jobs from a shared atomic cursor, so each job is claimed
/// exactly once and an expensive document does not stall the others.
/// `init` runs once per worker before it claims anything; `work` runs
/// once per claimed job against that worker's state.
///
/// With one worker (or one job) the pool degenerates to a plain loop on
/// the calling thread — no threads, no channel.
pub fn run_all<J, W, R, I, F>(jobs: &[J], workers: usize, init: I, work: F) -> Vec<R>
where
    J: Sync,
    R: Send,
    I: Fn(usize) -> W + Sync,
    F: Fn(&mut W, &J) -> R + Sync,
{
    if jobs.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, jobs.len());

    if workers == 1 {
        let mut state = init(0);
        return jobs.iter().map(|job| work(&mut state, job)).collect();
    }

    info!(workers, jobs = jobs.len(), "dispatching batch");
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for worker_id in 0..workers {
            let tx = tx.clone();
            let cursor = &cursor;
            let init = &init;
            let work = &work;
            scope.spawn(move || {
                let mut state = init(worker_id);
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    if index >= jobs.len() {
                        break;
                    }
                    debug!(worker_id, index, "job claimed");
                    let result = work(&mut state, &jobs[index]);
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
        rx.iter().collect()
    })
}
