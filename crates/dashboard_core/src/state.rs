use std::sync::Arc;

use crate::view_model::AppViewModel;
use crate::{DashboardData, PainPoint, QueryParams};

/// Tag attached to every issued fetch. Strictly increasing per session.
pub type FetchSeq = u64;

/// Session-local identity of one scrape job instance.
pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrapeJobState {
    #[default]
    Idle,
    Triggering { job_id: JobId },
    Polling { job_id: JobId },
    /// Terminal for `job_id`; a new trigger starts a fresh job.
    Failed { job_id: JobId, message: String },
}

impl ScrapeJobState {
    /// The job whose events are still accepted, if any.
    pub fn active_job(&self) -> Option<JobId> {
        match self {
            ScrapeJobState::Triggering { job_id } | ScrapeJobState::Polling { job_id } => {
                Some(*job_id)
            }
            ScrapeJobState::Idle | ScrapeJobState::Failed { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_job().is_some()
    }
}

/// Inline messages about the scrape control that do not block the data view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeNotice {
    TriggerFailed(String),
    PollFailed(String),
    /// The job finished but the backend reported an error for the run.
    RunReportedError(String),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    query: QueryParams,
    search_input: String,
    fetch: FetchState,
    last_issued_seq: FetchSeq,
    data: Option<Arc<DashboardData>>,
    scrape: ScrapeJobState,
    scrape_notice: Option<ScrapeNotice>,
    next_job_id: JobId,
    selected: Option<String>,
    view_open: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_limit(limit: u32) -> Self {
        Self {
            query: QueryParams::with_limit(limit),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn scrape_state(&self) -> &ScrapeJobState {
        &self.scrape
    }

    pub fn scrape_notice(&self) -> Option<&ScrapeNotice> {
        self.scrape_notice.as_ref()
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_deref()
    }

    pub fn last_issued_seq(&self) -> FetchSeq {
        self.last_issued_seq
    }

    pub fn is_view_open(&self) -> bool {
        self.view_open
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryParams {
        &mut self.query
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        if self.search_input != text {
            self.search_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_view_open(&mut self, open: bool) {
        self.view_open = open;
        self.mark_dirty();
    }

    /// Tags a new fetch of the current query and enters `Loading`.
    pub(crate) fn issue_fetch(&mut self) -> (FetchSeq, QueryParams) {
        self.last_issued_seq += 1;
        self.fetch = FetchState::Loading;
        self.mark_dirty();
        (self.last_issued_seq, self.query.clone())
    }

    /// Makes every in-flight fetch stale without issuing a new one.
    pub(crate) fn invalidate_fetches(&mut self) {
        self.last_issued_seq += 1;
        if self.fetch == FetchState::Loading {
            self.fetch = FetchState::Idle;
        }
    }

    pub(crate) fn is_latest(&self, seq: FetchSeq) -> bool {
        seq == self.last_issued_seq
    }

    pub(crate) fn accept_data(&mut self, data: DashboardData) {
        self.data = Some(Arc::new(data));
        self.fetch = FetchState::Loaded;
        if let Some(id) = self.selected.clone() {
            if self.find_pain_point(&id).is_none() {
                self.selected = None;
            }
        }
        self.mark_dirty();
    }

    /// Prior data stays visible.
    pub(crate) fn fail_fetch(&mut self, message: String) {
        self.fetch = FetchState::Failed { message };
        self.mark_dirty();
    }

    pub(crate) fn begin_scrape(&mut self) -> JobId {
        self.next_job_id += 1;
        let job_id = self.next_job_id;
        self.scrape = ScrapeJobState::Triggering { job_id };
        self.scrape_notice = None;
        self.mark_dirty();
        job_id
    }

    pub(crate) fn set_scrape(&mut self, scrape: ScrapeJobState, notice: Option<ScrapeNotice>) {
        self.scrape = scrape;
        if notice.is_some() {
            self.scrape_notice = notice;
        }
        self.mark_dirty();
    }

    pub(crate) fn select(&mut self, id: Option<String>) {
        if self.selected != id {
            self.selected = id;
            self.mark_dirty();
        }
    }

    pub(crate) fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Looks in the current page first, then the trending list.
    pub(crate) fn find_pain_point(&self, id: &str) -> Option<&PainPoint> {
        let data = self.data.as_deref()?;
        data.page
            .items
            .iter()
            .chain(data.trending.iter())
            .find(|item| item.id == id)
    }
}
