use std::sync::{mpsc, Arc};

use dashboard_core::{Effect, Msg};
use dashboard_engine::{
    ApiSettings, EngineError, EngineEvent, EngineHandle, EngineSettings, EventSink, ScrapeEvent,
};
use dashboard_logging::{dash_info, dash_warn};

use super::app::AppEvent;

/// Executes core effects against the engine.
pub struct EffectRunner {
    engine: EngineHandle,
    api: ApiSettings,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, events: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let api = settings.api.clone();
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx: events }))?;
        Ok(Self { engine, api })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchAll { seq, query } => {
                    dash_info!("FetchAll seq={} query={}", seq, query.encode());
                    self.engine.fetch_all(seq, query);
                }
                Effect::TriggerScrape { job_id } => {
                    dash_info!("TriggerScrape job_id={}", job_id);
                    self.engine.trigger_scrape(job_id);
                }
                Effect::CancelScrape { job_id } => {
                    dash_info!("CancelScrape job_id={}", job_id);
                    self.engine.cancel_scrape(job_id);
                }
                Effect::OpenExport { format } => match self.api.export_url(format) {
                    Ok(url) => println!("Export ({}): {}", format.as_str(), url),
                    Err(err) => dash_warn!("Export link unavailable: {}", err),
                },
            }
        }
    }
}

/// Feeds engine events back into the app loop as messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Msg(into_msg(event)));
    }
}

fn into_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FetchCompleted { seq, result } => Msg::FetchCompleted {
            seq,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::Scrape(ScrapeEvent::Started { job_id }) => Msg::ScrapeStarted { job_id },
        EngineEvent::Scrape(ScrapeEvent::TriggerFailed { job_id, error }) => {
            Msg::ScrapeTriggerFailed {
                job_id,
                message: error.to_string(),
            }
        }
        EngineEvent::Scrape(ScrapeEvent::Status {
            job_id,
            running,
            run_error,
        }) => Msg::ScrapeStatus {
            job_id,
            running,
            run_error,
        },
        EngineEvent::Scrape(ScrapeEvent::PollFailed { job_id, error }) => Msg::ScrapePollFailed {
            job_id,
            message: error.to_string(),
        },
    }
}
