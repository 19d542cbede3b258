use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Period of every session clock
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Ticks a manual ticker can hold before `fire()` starts dropping them
const MANUAL_TICK_BUFFER: usize = 64;

/// Scheduler capability used by sessions
///
/// Implementations:
/// - [`TokioClock`]: wall-clock ticks from a tokio interval task
/// - [`ManualClock`]: ticks delivered on demand (tests, scripted demos)
pub trait Clock: Send + Sync {
    /// Start delivering one tick per `period` to the returned ticker
    fn arm_interval(&self, period: Duration) -> Ticker;
}

/// An armed interval owned by exactly one session
///
/// Ticks are strictly ordered and at most one is in flight at a time.
/// Dropping the ticker aborts the timer task and discards any tick that
/// was queued but not yet observed.
pub struct Ticker {
    rx: mpsc::Receiver<()>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Build a ticker from a tick channel and the task feeding it (if any)
    pub fn from_parts(rx: mpsc::Receiver<()>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    /// Wait for the next tick
    ///
    /// Returns `None` once the tick source has gone away. Cancel safe.
    pub async fn tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Disarm explicitly; equivalent to dropping the ticker
    pub fn disarm(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Clock backed by `tokio::time::interval`
///
/// Must be armed from inside a tokio runtime. The first tick arrives one
/// full period after arming, never immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for TokioClock {
    fn arm_interval(&self, period: Duration) -> Ticker {
        // Capacity 1: the timer task waits for the session to consume a
        // tick before producing the next one.
        let (tx, rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }

            debug!("Interval task finished");
        });

        Ticker::from_parts(rx, Some(task))
    }
}

/// Clock whose ticks are fired by hand
#[derive(Clone, Default)]
pub struct ManualClock {
    senders: Arc<Mutex<Vec<mpsc::Sender<()>>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick to every armed ticker
    ///
    /// Returns how many tickers received it.
    pub fn fire(&self) -> usize {
        let mut senders = self.senders.lock();
        senders.retain(|tx| !tx.is_closed());
        senders.iter().filter(|tx| tx.try_send(()).is_ok()).count()
    }

    /// Number of tickers currently armed against this clock
    pub fn armed_count(&self) -> usize {
        let mut senders = self.senders.lock();
        senders.retain(|tx| !tx.is_closed());
        senders.len()
    }
}

impl Clock for ManualClock {
    fn arm_interval(&self, _period: Duration) -> Ticker {
        let (tx, rx) = mpsc::channel(MANUAL_TICK_BUFFER);
        self.senders.lock().push(tx);
        Ticker::from_parts(rx, None)
    }
}
