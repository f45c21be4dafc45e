//! Fixed-interval dispatch of due items.

use crate::item::Dispatchable;
use crate::store::SharedStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why a delivery did not reach its destination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The channel, user or message no longer exists or is not visible.
    #[error("destination gone: {0}")]
    DestinationGone(String),

    /// The chat platform rejected the request.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Delivers the outcome of a due item.
#[async_trait]
pub trait Announcer<T: Dispatchable>: Send + Sync {
    /// Announces `outcome` for the item stored under `id`.
    async fn announce(&self, id: &str, item: &T, outcome: &T::Outcome)
        -> Result<(), DeliveryError>;
}

/// Counts from one dispatcher tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Items found due.
    pub due: usize,
    /// Items announced successfully.
    pub delivered: usize,
    /// Items whose announcement failed. They are removed all the same.
    pub failed: usize,
}

/// Periodically delivers and removes the due items of one store.
pub struct Dispatcher<T, A> {
    store: SharedStore<T>,
    announcer: Arc<A>,
    rng: StdRng,
}

impl<T, A> Dispatcher<T, A>
where
    T: Dispatchable + Serialize + DeserializeOwned,
    A: Announcer<T>,
{
    /// Creates a dispatcher over `store`.
    pub fn new(store: SharedStore<T>, announcer: Arc<A>) -> Self {
        Self {
            store,
            announcer,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source used for winner draws.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Delivers every item due at `now` and removes it from the store.
    ///
    /// The store lock is released while announcing. An item is removed
    /// whether or not its announcement succeeded, so it is never delivered
    /// twice.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let due = self.store.lock().await.due(now);
        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };

        for (id, item) in due {
            let outcome = item.resolve(&mut self.rng);

            match self.announcer.announce(&id, &item, &outcome).await {
                Ok(()) => {
                    info!("Delivered {} {}", T::KIND, id);
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!("Could not deliver {} {}: {}", T::KIND, id, e);
                    report.failed += 1;
                }
            }

            if let Err(e) = self.store.lock().await.remove(&id) {
                error!("Failed to persist removal of {} {}: {}", T::KIND, id, e);
            }
        }

        report
    }

    /// Ticks every `period` until `shutdown` is cancelled. The first tick
    /// happens one period after the call. A tick in progress always runs to
    /// completion.
    pub async fn run(mut self, period: Duration, shutdown: CancellationToken) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Starting {} dispatcher, checking every {:?}", T::KIND, period);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let report = self.tick(Utc::now()).await;
                    if report.due > 0 {
                        debug!(
                            "{} tick: {} due, {} delivered, {} failed",
                            T::KIND, report.due, report.delivered, report.failed
                        );
                    }
                }
            }
        }

        info!("Stopped {} dispatcher", T::KIND);
    }
}
