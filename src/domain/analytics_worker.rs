//! Fire-and-forget side effects and the background worker that applies them.
//!
//! Request handlers never await analytics writes. They push a [`SideEffect`]
//! into a bounded channel through [`EventSink`]; [`run_analytics_worker`]
//! drains the channel with bounded concurrency and a short retry.
//!
//! Delivery is best-effort: a full queue drops the effect, and effects still
//! queued when the process is killed are lost.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Attempts per side effect, including the first one.
const MAX_ATTEMPTS: usize = 3;

/// A deferred write produced by a routing decision.
#[derive(Debug, Clone)]
pub enum SideEffect {
    Record(AnalyticsEvent),
    IncrementClicks { link_id: i64 },
}

impl SideEffect {
    fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record_event",
            Self::IncrementClicks { .. } => "increment_clicks",
        }
    }

    async fn apply(&self, repository: &dyn AnalyticsRepository) -> Result<(), AppError> {
        match self {
            Self::Record(event) => repository.record_event(event.clone()).await,
            Self::IncrementClicks { link_id } => repository.increment_click_count(*link_id).await,
        }
    }
}

/// Non-blocking handle for submitting side effects.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: Option<mpsc::Sender<SideEffect>>,
}

impl EventSink {
    pub fn new(sender: mpsc::Sender<SideEffect>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink that silently discards everything (CLI tools, dry runs).
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queues a side effect without waiting.
    ///
    /// Never fails: a full or closed queue drops the effect and logs it.
    pub fn emit(&self, effect: SideEffect) {
        let Some(sender) = &self.sender else {
            return;
        };

        let kind = effect.kind();
        match sender.try_send(effect) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Analytics queue full, dropping {}", kind);
                counter!("analytics_side_effects_total", "kind" => kind, "result" => "dropped")
                    .increment(1);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Analytics queue closed, dropping {}", kind);
            }
        }
    }

    /// Records an analytics event.
    pub fn record(&self, event: AnalyticsEvent) {
        self.emit(SideEffect::Record(event));
    }

    /// Increments a link's click counter.
    pub fn increment_clicks(&self, link_id: i64) {
        self.emit(SideEffect::IncrementClicks { link_id });
    }

    /// Returns true when no worker can receive effects anymore.
    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().is_none_or(|s| s.is_closed())
    }

    /// Remaining queue slots, or `None` for a disabled sink.
    pub fn capacity(&self) -> Option<usize> {
        self.sender.as_ref().map(|s| s.capacity())
    }
}

/// Drains the side-effect channel until every sender is dropped.
///
/// At most `concurrency` writes run at once. Each write is retried with
/// jittered exponential backoff; the final failure is logged and dropped.
pub async fn run_analytics_worker(
    mut rx: mpsc::Receiver<SideEffect>,
    repository: Arc<dyn AnalyticsRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(effect) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tasks.spawn(async move {
            let _permit = permit;
            apply_with_retry(repository.as_ref(), effect).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Analytics worker stopped");
}

async fn apply_with_retry(repository: &dyn AnalyticsRepository, effect: SideEffect) {
    let kind = effect.kind();
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_ATTEMPTS - 1);

    let effect = &effect;
    match Retry::start(strategy, move || effect.apply(repository)).await {
        Ok(()) => {
            counter!("analytics_side_effects_total", "kind" => kind, "result" => "ok").increment(1);
        }
        Err(e) => {
            error!("Failed to apply {} after {} attempts: {}", kind, MAX_ATTEMPTS, e);
            counter!("analytics_side_effects_total", "kind" => kind, "result" => "failed")
                .increment(1);
        }
    }
}
