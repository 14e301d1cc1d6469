use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashboard_core::JobId;
use dashboard_logging::{dash_debug, dash_info, dash_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, DashboardApi, EngineEvent, EventSink, FailureKind, ScrapeEvent};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

struct ActiveJob {
    job_id: JobId,
    token: CancellationToken,
}

/// Starts a backend scrape and polls its status until it stops running.
///
/// At most one job is active; a trigger refused for that reason is reported
/// as `TriggerFailed`. Polling uses a fixed interval with no backoff and no
/// attempt ceiling. Cancelling a job aborts the pending sleep or the in-flight
/// request. An event already past its cancellation check can still reach the
/// sink, so receivers must drop events for jobs they no longer track.
///
/// The slot is released before a job's final event is emitted, so the
/// receiver may trigger the next job from that event.
pub struct ScrapeJobController {
    api: Arc<dyn DashboardApi>,
    poll_interval: Duration,
    active: Arc<Mutex<Option<ActiveJob>>>,
}

impl ScrapeJobController {
    pub fn new(api: Arc<dyn DashboardApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn active_job(&self) -> Option<JobId> {
        lock(&self.active).as_ref().map(|job| job.job_id)
    }

    /// Spawns the job on the current tokio runtime.
    ///
    /// Returns `None` if another job is still active; the refusal is emitted
    /// to `sink` as `TriggerFailed` for `job_id`.
    pub fn trigger(&self, job_id: JobId, sink: Arc<dyn EventSink>) -> Option<JoinHandle<()>> {
        let token = {
            let mut active = lock(&self.active);
            if let Some(job) = active.as_ref() {
                dash_warn!(
                    "Scrape job {} requested while job {} is active; refusing",
                    job_id,
                    job.job_id
                );
                let error = ApiError::new(
                    FailureKind::JobActive,
                    format!("scrape job {} is still active", job.job_id),
                );
                drop(active);
                sink.emit(EngineEvent::Scrape(ScrapeEvent::TriggerFailed { job_id, error }));
                return None;
            }
            let token = CancellationToken::new();
            *active = Some(ActiveJob {
                job_id,
                token: token.clone(),
            });
            token
        };

        let api = self.api.clone();
        let active = self.active.clone();
        let interval = self.poll_interval;
        Some(tokio::spawn(async move {
            let job = Job {
                job_id,
                token: &token,
                active: &active,
                sink: sink.as_ref(),
            };
            run_job(api.as_ref(), interval, &job).await;
            release(&active, job_id);
        }))
    }

    /// Returns whether `job_id` was the active job.
    pub fn cancel(&self, job_id: JobId) -> bool {
        let mut active = lock(&self.active);
        match active.as_ref() {
            Some(job) if job.job_id == job_id => {
                job.token.cancel();
                *active = None;
                dash_info!("Scrape job {} cancelled", job_id);
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&self) {
        if let Some(job) = lock(&self.active).take() {
            job.token.cancel();
            dash_info!("Scrape job {} cancelled on shutdown", job.job_id);
        }
    }
}

impl Drop for ScrapeJobController {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

struct Job<'a> {
    job_id: JobId,
    token: &'a CancellationToken,
    active: &'a Mutex<Option<ActiveJob>>,
    sink: &'a dyn EventSink,
}

impl Job<'_> {
    fn emit(&self, event: ScrapeEvent) {
        if self.token.is_cancelled() {
            return;
        }
        self.sink.emit(EngineEvent::Scrape(event));
    }

    /// Frees the slot, then emits the job's last event.
    fn finish(&self, event: ScrapeEvent) {
        release(self.active, self.job_id);
        self.emit(event);
    }
}

async fn run_job(api: &dyn DashboardApi, interval: Duration, job: &Job<'_>) {
    let job_id = job.job_id;
    let started = tokio::select! {
        biased;
        _ = job.token.cancelled() => return,
        result = api.trigger_scrape() => result,
    };
    if let Err(error) = started {
        job.finish(ScrapeEvent::TriggerFailed { job_id, error });
        return;
    }
    dash_info!("Scrape job {} started, polling every {:?}", job_id, interval);
    job.emit(ScrapeEvent::Started { job_id });

    loop {
        tokio::select! {
            biased;
            _ = job.token.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        let polled = tokio::select! {
            biased;
            _ = job.token.cancelled() => return,
            result = api.scrape_status() => result,
        };
        match polled {
            Ok(status) => {
                dash_debug!("Scrape job {} running={}", job_id, status.running);
                let event = ScrapeEvent::Status {
                    job_id,
                    running: status.running,
                    run_error: status.run_error(),
                };
                if status.running {
                    job.emit(event);
                } else {
                    job.finish(event);
                    return;
                }
            }
            Err(error) => {
                job.finish(ScrapeEvent::PollFailed { job_id, error });
                return;
            }
        }
    }
}

fn release(active: &Mutex<Option<ActiveJob>>, job_id: JobId) {
    let mut active = lock(active);
    if active.as_ref().is_some_and(|job| job.job_id == job_id) {
        *active = None;
    }
}

fn lock(active: &Mutex<Option<ActiveJob>>) -> MutexGuard<'_, Option<ActiveJob>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}
