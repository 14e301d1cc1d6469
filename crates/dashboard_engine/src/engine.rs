use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{FetchSeq, JobId, QueryParams};
use dashboard_logging::{dash_debug, dash_info};

use crate::{
    ApiSettings, DashboardApi, DataFetcher, EngineError, EngineEvent, EventSink, ReqwestApi,
    ScrapeJobController, DEFAULT_POLL_INTERVAL, TRENDING_LIMIT,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub poll_interval: Duration,
    pub trending_limit: u32,
}

impl EngineSettings {
    pub fn new(api: ApiSettings) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
            trending_limit: TRENDING_LIMIT,
        }
    }
}

enum EngineCommand {
    FetchAll { seq: FetchSeq, query: QueryParams },
    TriggerScrape { job_id: JobId },
    CancelScrape { job_id: JobId },
}

/// Front-end side of the engine thread.
///
/// Commands are queued to a dedicated thread owning a tokio runtime; results
/// come back through the [`EventSink`]. Dropping the handle stops the thread
/// and cancels any active scrape job.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApi::new(settings.api.clone())?);
        Self::with_api(api, &settings, sink)
    }

    pub fn with_api(
        api: Arc<dyn DashboardApi>,
        settings: &EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("dashboard-io")
            .enable_all()
            .build()?;
        let fetcher = DataFetcher::new(api.clone()).with_trending_limit(settings.trending_limit);
        let scrape = ScrapeJobController::new(api, settings.poll_interval);
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("dashboard-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::FetchAll { seq, query } => {
                            let fetcher = fetcher.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let result = fetcher.fetch_all(&query).await;
                                dash_debug!("Fetch seq={} done ok={}", seq, result.is_ok());
                                sink.emit(EngineEvent::FetchCompleted { seq, result });
                            });
                        }
                        EngineCommand::TriggerScrape { job_id } => {
                            let _guard = runtime.enter();
                            scrape.trigger(job_id, sink.clone());
                        }
                        EngineCommand::CancelScrape { job_id } => {
                            scrape.cancel(job_id);
                        }
                    }
                }
                scrape.cancel_all();
                dash_info!("Engine command channel closed, shutting down");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn fetch_all(&self, seq: FetchSeq, query: QueryParams) {
        let _ = self.cmd_tx.send(EngineCommand::FetchAll { seq, query });
    }

    pub fn trigger_scrape(&self, job_id: JobId) {
        let _ = self.cmd_tx.send(EngineCommand::TriggerScrape { job_id });
    }

    pub fn cancel_scrape(&self, job_id: JobId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelScrape { job_id });
    }
}
