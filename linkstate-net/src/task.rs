//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The timer wheel: one-shot ([`TimeoutTask`]) and periodic
//! ([`IntervalTask`]) timers, each independently armable, rearmable and
//! cancellable. Dropping a handle cancels the underlying timer.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug)]
enum Message {
    Reschedule(Option<Duration>),
}

/// A cancellable, rearmable one-shot timer.
///
/// Dropping the handle cancels the timer; this is idempotent (spec.md §5).
#[derive(Debug)]
pub struct TimeoutTask {
    _task: JoinHandle<()>,
    control: UnboundedSender<Message>,
    next: Arc<Mutex<Instant>>,
}

/// A cancellable, rearmable periodic timer.
#[derive(Debug)]
pub struct IntervalTask {
    _task: JoinHandle<()>,
    control: UnboundedSender<Message>,
    next: Arc<Mutex<Instant>>,
}

impl TimeoutTask {
    /// Arms a new one-shot timer that invokes `cb` once `timeout` elapses.
    pub fn new<F, Fut>(timeout: Duration, cb: F) -> TimeoutTask
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let next = Arc::new(Mutex::new(Instant::now() + timeout));
        let next_child = next.clone();

        let task = tokio::spawn(async move {
            let sleep = tokio::time::sleep(timeout);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = &mut sleep => {
                        cb().await;
                        break;
                    }
                    message = control_rx.recv() => {
                        match message {
                            Some(Message::Reschedule(new_timeout)) => {
                                let timeout = new_timeout.unwrap_or(timeout);
                                let at = Instant::now() + timeout;
                                sleep.as_mut().reset(at);
                                *next_child.lock().unwrap() = at;
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        TimeoutTask {
            _task: task,
            control: control_tx,
            next,
        }
    }

    /// Rearms the timer, regardless of whether it already fired. Reuses the
    /// last timeout value when `timeout` is `None`.
    pub fn reset(&mut self, timeout: Option<Duration>) {
        let _ = self.control.send(Message::Reschedule(timeout));
    }

    /// Time remaining before the timer fires.
    pub fn remaining(&self) -> Duration {
        self.next
            .lock()
            .unwrap()
            .saturating_duration_since(Instant::now())
    }
}

impl IntervalTask {
    /// Arms a new periodic timer that invokes `cb` every `interval`.
    pub fn new<F, Fut>(interval: Duration, tick_on_start: bool, mut cb: F) -> IntervalTask
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let next = Arc::new(Mutex::new(Instant::now() + interval));
        let next_child = next.clone();

        let task = tokio::spawn(async move {
            let mut ticker = if tick_on_start {
                tokio::time::interval(interval)
            } else {
                tokio::time::interval_at(Instant::now() + interval, interval)
            };
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cb().await;
                        *next_child.lock().unwrap() = Instant::now() + interval;
                    }
                    message = control_rx.recv() => {
                        match message {
                            Some(Message::Reschedule(new_interval)) => {
                                let interval = new_interval.unwrap_or(interval);
                                ticker = tokio::time::interval(interval);
                                *next_child.lock().unwrap() = Instant::now() + interval;
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        IntervalTask {
            _task: task,
            control: control_tx,
            next,
        }
    }

    /// Reschedules the interval, reusing the previous period when `interval`
    /// is `None`.
    pub fn reset(&mut self, interval: Option<Duration>) {
        let _ = self.control.send(Message::Reschedule(interval));
    }

    pub fn remaining(&self) -> Duration {
        self.next
            .lock()
            .unwrap()
            .saturating_duration_since(Instant::now())
    }
}

impl Drop for TimeoutTask {
    fn drop(&mut self) {
        self._task.abort();
    }
}

impl Drop for IntervalTask {
    fn drop(&mut self) {
        self._task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn timeout_task_fires_once_after_its_duration() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = TimeoutTask::new(Duration::from_millis(100), move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
            }
        });
        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_timeout_task_cancels_it() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let timer = TimeoutTask::new(Duration::from_millis(100), move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
            }
        });
        drop(timer);
        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_pushes_the_deadline_back() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut timer = TimeoutTask::new(Duration::from_millis(100), move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
            }
        });
        tokio::time::advance(Duration::from_millis(50)).await;
        timer.reset(Some(Duration::from_millis(100)));
        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_task_ticks_more_than_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let _timer = IntervalTask::new(Duration::from_millis(50), false, move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::advance(Duration::from_millis(60)).await;
        tokio::time::advance(Duration::from_millis(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
