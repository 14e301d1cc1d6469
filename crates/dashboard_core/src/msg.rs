use crate::{DashboardData, ExportFormat, FetchSeq, JobId, SortField, SortOrder};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The dashboard became visible; loads the current query.
    ViewOpened,
    /// The dashboard was torn down. Cancels scrape polling and drops in-flight results.
    ViewClosed,
    /// User picked a subreddit filter (empty clears it).
    SubredditSelected(String),
    /// User picked a category filter (empty clears it).
    CategorySelected(String),
    SortSelected(SortField),
    OrderSelected(SortOrder),
    /// User edited the search box. Does not query by itself.
    SearchInputChanged(String),
    /// User submitted the search box.
    SearchSubmitted,
    /// Jump to a page, unclamped.
    PageRequested(u32),
    NextPage,
    PreviousPage,
    RefreshRequested,
    /// Engine finished a combined fetch.
    FetchCompleted {
        seq: FetchSeq,
        result: Result<DashboardData, String>,
    },
    /// User clicked the scrape control.
    ScrapeClicked,
    /// The scrape POST succeeded; polling has begun.
    ScrapeStarted { job_id: JobId },
    ScrapeTriggerFailed { job_id: JobId, message: String },
    /// One status poll came back.
    ScrapeStatus {
        job_id: JobId,
        running: bool,
        run_error: Option<String>,
    },
    ScrapePollFailed { job_id: JobId, message: String },
    PainPointSelected { id: String },
    DetailClosed,
    ExportRequested(ExportFormat),
}
