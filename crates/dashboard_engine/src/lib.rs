//! Dashboard engine: REST client, concurrent refresh and scrape job polling.
mod api;
mod engine;
mod fetcher;
mod scrape;
mod sink;
mod types;

pub use api::{
    ApiSettings, DashboardApi, ReqwestApi, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use engine::{EngineHandle, EngineSettings};
pub use fetcher::{DataFetcher, TRENDING_LIMIT};
pub use scrape::{ScrapeJobController, DEFAULT_POLL_INTERVAL};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{ApiError, EngineError, EngineEvent, FailureKind, ScrapeEvent, ScrapeStatus};
