#![forbid(unsafe_code)]

//! Background event sources for the carousel program.
//!
//! A [`Subscription`] runs on its own thread and feeds messages into the
//! program's channel until its [`CancellationToken`] is cancelled or the
//! channel disconnects. The [`SubscriptionManager`] keeps the running set in
//! line with what the program declares:
//!
//! 1. the program passes the subscriptions it currently wants to
//!    [`SubscriptionManager::reconcile`],
//! 2. subscriptions whose id is no longer declared are stopped and joined,
//! 3. newly declared ids are started, already running ones are left alone.

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;

use web_time::Duration;

use crate::cancellation::{CancellationSource, CancellationToken};

/// A unique identifier for a subscription.
///
/// Subscriptions with the same id are considered identical, so reconciling
/// with an unchanged id never restarts the thread.
pub type SubId = u64;

/// A subscription produces messages from an external event source.
pub trait Subscription<M: Send + 'static>: Send {
    /// Identifier used for deduplication.
    fn id(&self) -> SubId;

    /// Send messages through `sender` until `stop` is cancelled or the
    /// receiver is dropped. Called on a background thread.
    fn run(&self, sender: mpsc::Sender<M>, stop: CancellationToken);
}

struct RunningSubscription {
    id: SubId,
    stop: CancellationSource,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunningSubscription {
    /// Stop the subscription and join its thread.
    fn stop(mut self) {
        self.stop.cancel();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RunningSubscription {
    fn drop(&mut self) {
        // Don't join in drop to avoid blocking.
        self.stop.cancel();
    }
}

/// Starts and stops subscriptions by id.
pub struct SubscriptionManager<M: Send + 'static> {
    active: Vec<RunningSubscription>,
    sender: mpsc::Sender<M>,
}

impl<M: Send + 'static> std::fmt::Debug for SubscriptionManager<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("active", &self.active_ids())
            .finish()
    }
}

impl<M: Send + 'static> SubscriptionManager<M> {
    /// Manager whose subscriptions send into `sender`.
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self {
            active: Vec::new(),
            sender,
        }
    }

    /// Ids of the running subscriptions, in start order.
    pub fn active_ids(&self) -> Vec<SubId> {
        self.active.iter().map(|r| r.id).collect()
    }

    /// Whether a subscription with `id` is running.
    pub fn is_active(&self, id: SubId) -> bool {
        self.active.iter().any(|r| r.id == id)
    }

    /// Bring the running set in line with `subscriptions`.
    pub fn reconcile(&mut self, subscriptions: Vec<Box<dyn Subscription<M>>>) {
        let wanted: HashSet<SubId> = subscriptions.iter().map(|s| s.id()).collect();

        let mut remaining = Vec::with_capacity(self.active.len());
        for running in self.active.drain(..) {
            if wanted.contains(&running.id) {
                remaining.push(running);
            } else {
                tracing::debug!(sub_id = running.id, "stopping subscription");
                running.stop();
            }
        }
        self.active = remaining;

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.id).collect();
        for sub in subscriptions {
            let id = sub.id();
            if !active_ids.insert(id) {
                continue;
            }
            tracing::debug!(sub_id = id, "starting subscription");
            let stop = CancellationSource::new();
            let token = stop.token();
            let sender = self.sender.clone();
            let thread = thread::spawn(move || sub.run(sender, token));
            self.active.push(RunningSubscription {
                id,
                stop,
                thread: Some(thread),
            });
        }
    }

    /// Stop every running subscription and join their threads.
    pub fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            tracing::debug!(sub_id = running.id, "stopping subscription");
            running.stop();
        }
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// A subscription that fires at a fixed interval.
///
/// The program uses one at the 60 fps frame interval to drive transitions
/// while the carousel has work to do.
pub struct Every<M: Send + 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: Send + 'static> std::fmt::Debug for Every<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Every")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<M: Send + 'static> Every<M> {
    /// Ticker with an id derived from the interval.
    pub fn new(interval: Duration, make_msg: impl Fn() -> M + Send + Sync + 'static) -> Self {
        // "TICK" magic keeps interval-derived ids away from small explicit ones.
        let id = interval.as_nanos() as u64 ^ 0x5449_434B;
        Self::with_id(id, interval, make_msg)
    }

    /// Ticker with an explicit id.
    pub fn with_id(
        id: SubId,
        interval: Duration,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }

    /// Tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<M: Send + 'static> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: CancellationToken) {
        while !stop.wait_timeout(self.interval) {
            if sender.send((self.make_msg)()).is_err() {
                break;
            }
        }
    }
}
