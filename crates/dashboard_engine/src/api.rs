use std::time::Duration;

use dashboard_core::{ExportFormat, Page, PainPoint, QueryParams, StatsSnapshot, TrendingList};
use dashboard_logging::dash_trace;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, FailureKind, ScrapeStatus};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiSettings {
    base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    /// `base_url` is the server root; a path prefix is kept.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut parsed = Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be a base url"),
            ));
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self {
            base_url: parsed,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Download location for the export; opening it is up to the front-end.
    pub fn export_url(&self, format: ExportFormat) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/export")?;
        url.query_pairs_mut().append_pair("format", format.as_str());
        Ok(url)
    }
}

/// The REST surface the dashboard consumes.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_pain_points(&self, query: &QueryParams) -> Result<Page, ApiError>;

    async fn stats(&self) -> Result<StatsSnapshot, ApiError>;

    async fn trending(&self, limit: u32) -> Result<Vec<PainPoint>, ApiError>;

    /// Any 2xx counts as started, including "already running".
    async fn trigger_scrape(&self) -> Result<(), ApiError>;

    async fn scrape_status(&self) -> Result<ScrapeStatus, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        dash_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestApi {
    async fn list_pain_points(&self, query: &QueryParams) -> Result<Page, ApiError> {
        let mut url = self.settings.endpoint("api/pain-points")?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        self.get_json(url).await
    }

    async fn stats(&self) -> Result<StatsSnapshot, ApiError> {
        let url = self.settings.endpoint("api/stats")?;
        self.get_json(url).await
    }

    async fn trending(&self, limit: u32) -> Result<Vec<PainPoint>, ApiError> {
        let mut url = self.settings.endpoint("api/trending")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let list: TrendingList = self.get_json(url).await?;
        Ok(list.items)
    }

    async fn trigger_scrape(&self) -> Result<(), ApiError> {
        let url = self.settings.endpoint("api/scrape")?;
        dash_trace!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    async fn scrape_status(&self) -> Result<ScrapeStatus, ApiError> {
        let url = self.settings.endpoint("api/scrape/status")?;
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
