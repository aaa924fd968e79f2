use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::select;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant};

/// How often a poll tick fires. The first tick comes one full period after
/// start, never immediately.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

type TickFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type TickFn = dyn Fn() -> TickFuture + Send + Sync;

/// Repeatedly runs a callback on a fixed period. Ticks are fire-and-forget:
/// the loop never awaits a tick, so a slow one can overlap the next. The
/// callback can be swapped between ticks and the next tick always uses the
/// latest one.
pub struct Poller {
    name: &'static str,
    period: Duration,
    tick: Arc<Mutex<Arc<TickFn>>>,
}

pub struct PollerHandle {
    tick: Arc<Mutex<Arc<TickFn>>>,
    cancel_tx: watch::Sender<bool>,
}

impl Poller {
    pub fn new<F, Fut>(name: &'static str, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            period: POLL_INTERVAL,
            tick: Arc::new(Mutex::new(box_tick(tick))),
        }
    }

    pub fn start(self) -> PollerHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = PollerHandle {
            tick: self.tick.clone(),
            cancel_tx,
        };
        tokio::spawn(async move {
            self.main_loop(cancel_rx).await;
        });
        handle
    }

    async fn main_loop(self, mut cancel_rx: watch::Receiver<bool>) {
        info!(
            "[{}] Starting poll loop with period {}",
            self.name,
            humantime::format_duration(self.period)
        );
        let mut intv = interval_at(Instant::now() + self.period, self.period);

        loop {
            select! {
                // Checked before the timer so a cancel racing a due tick wins.
                biased;
                _ = cancel_rx.changed() => {
                    info!("[{}] Poll loop stopped", self.name);
                    return;
                }
                _ = intv.tick() => {
                    let tick = self.tick.lock().unwrap().clone();
                    debug!("[{}] Poll tick", self.name);
                    tokio::spawn(async move { tick().await });
                }
            }
        }
    }
}

impl PollerHandle {
    /// Swap in a new callback. Takes effect at the next tick.
    pub fn set_tick<F, Fut>(&self, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        *self.tick.lock().unwrap() = box_tick(tick);
    }

    /// Stop the loop. No tick fires after this; ticks already spawned are
    /// left to finish on their own. Dropping the handle has the same
    /// effect.
    pub fn cancel(&self) {
        // The loop may already be gone
        let _ = self.cancel_tx.send(true);
    }
}

fn box_tick<F, Fut>(tick: F) -> Arc<TickFn>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || Box::pin(tick()) as TickFuture)
}
