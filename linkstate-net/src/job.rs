//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The one-shot job scheduler: the primitive edge-triggered, coalescing
//! work (LSP generation, SPF runs) is built on top of (spec.md §4.3, §6).
//! A job runs at the next opportunity the executor gives it, not after a
//! fixed delay — that distinguishes it from [`crate::task::TimeoutTask`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle to a scheduled one-shot job. Cancelling is idempotent: cancelling
/// a job that already ran, or cancelling twice, is a harmless no-op
/// (spec.md §5).
#[derive(Clone, Debug)]
pub struct JobHandle {
    cancelled: Arc<AtomicBool>,
}

/// Schedules `cb` to run once, as soon as the executor gets to it.
pub fn create_job<F, Fut>(cb: F) -> JobHandle
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    tokio::spawn(async move {
        if !flag.load(Ordering::Acquire) {
            cb().await;
        }
    });
    JobHandle { cancelled }
}

/// Cancels a pending job. No-op if the job already ran or was already
/// cancelled.
pub fn cancel_job(handle: &JobHandle) {
    handle.cancelled.store(true, Ordering::Release);
}
