use dashboard_logging::{dash_debug, dash_info, dash_warn};

use crate::{AppState, Effect, JobId, Msg, ScrapeJobState, ScrapeNotice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ViewOpened => {
            if state.is_view_open() {
                return (state, Vec::new());
            }
            state.set_view_open(true);
            vec![fetch_current(&mut state)]
        }
        Msg::ViewClosed => {
            if !state.is_view_open() {
                return (state, Vec::new());
            }
            state.set_view_open(false);
            state.invalidate_fetches();
            match state.scrape_state().active_job() {
                Some(job_id) => {
                    dash_info!("View closed, cancelling scrape job {}", job_id);
                    state.set_scrape(ScrapeJobState::Idle, None);
                    vec![Effect::CancelScrape { job_id }]
                }
                None => Vec::new(),
            }
        }
        Msg::SubredditSelected(value) => {
            let changed = state.query_mut().set_subreddit(&value);
            refetch_if(&mut state, changed)
        }
        Msg::CategorySelected(value) => {
            let changed = state.query_mut().set_category(&value);
            refetch_if(&mut state, changed)
        }
        Msg::SortSelected(field) => {
            let changed = state.query_mut().set_sort(field);
            refetch_if(&mut state, changed)
        }
        Msg::OrderSelected(order) => {
            let changed = state.query_mut().set_order(order);
            refetch_if(&mut state, changed)
        }
        Msg::SearchInputChanged(text) => {
            state.set_search_input(text);
            Vec::new()
        }
        Msg::SearchSubmitted => {
            let text = state.search_input().to_string();
            let changed = state.query_mut().submit_search(&text);
            refetch_if(&mut state, changed)
        }
        Msg::PageRequested(page) => {
            let changed = state.query_mut().set_page(page);
            refetch_if(&mut state, changed)
        }
        Msg::NextPage => {
            let total = state.data().map(|data| data.page.total).unwrap_or(0);
            if state.query().has_next(total) {
                let next = state.query().page() + 1;
                let changed = state.query_mut().set_page(next);
                refetch_if(&mut state, changed)
            } else {
                Vec::new()
            }
        }
        Msg::PreviousPage => {
            if state.query().has_previous() {
                let previous = state.query().page() - 1;
                let changed = state.query_mut().set_page(previous);
                refetch_if(&mut state, changed)
            } else {
                Vec::new()
            }
        }
        Msg::RefreshRequested => refetch_if(&mut state, true),
        Msg::FetchCompleted { seq, result } => {
            if !state.is_latest(seq) {
                dash_debug!(
                    "Discarding stale fetch result seq={} latest={}",
                    seq,
                    state.last_issued_seq()
                );
                return (state, Vec::new());
            }
            match result {
                Ok(data) => state.accept_data(data),
                Err(message) => {
                    dash_warn!("Fetch seq={} failed: {}", seq, message);
                    state.fail_fetch(message);
                }
            }
            Vec::new()
        }
        Msg::ScrapeClicked => {
            if state.scrape_state().is_active() || !state.is_view_open() {
                return (state, Vec::new());
            }
            let job_id = state.begin_scrape();
            dash_info!("Triggering scrape job {}", job_id);
            vec![Effect::TriggerScrape { job_id }]
        }
        Msg::ScrapeStarted { job_id } => {
            if *state.scrape_state() != (ScrapeJobState::Triggering { job_id }) {
                return ignore_job_event(state, job_id);
            }
            state.set_scrape(ScrapeJobState::Polling { job_id }, None);
            Vec::new()
        }
        Msg::ScrapeTriggerFailed { job_id, message } => {
            if *state.scrape_state() != (ScrapeJobState::Triggering { job_id }) {
                return ignore_job_event(state, job_id);
            }
            dash_warn!("Scrape job {} could not start: {}", job_id, message);
            state.set_scrape(
                ScrapeJobState::Idle,
                Some(ScrapeNotice::TriggerFailed(message)),
            );
            Vec::new()
        }
        Msg::ScrapeStatus {
            job_id,
            running,
            run_error,
        } => {
            if *state.scrape_state() != (ScrapeJobState::Polling { job_id }) {
                return ignore_job_event(state, job_id);
            }
            if running {
                return (state, Vec::new());
            }
            dash_info!("Scrape job {} finished, refreshing", job_id);
            let notice = match run_error {
                Some(message) => ScrapeNotice::RunReportedError(message),
                None => ScrapeNotice::Completed,
            };
            state.set_scrape(ScrapeJobState::Idle, Some(notice));
            vec![fetch_current(&mut state)]
        }
        Msg::ScrapePollFailed { job_id, message } => {
            if *state.scrape_state() != (ScrapeJobState::Polling { job_id }) {
                return ignore_job_event(state, job_id);
            }
            dash_warn!("Scrape job {} status poll failed: {}", job_id, message);
            state.set_scrape(
                ScrapeJobState::Failed {
                    job_id,
                    message: message.clone(),
                },
                Some(ScrapeNotice::PollFailed(message)),
            );
            Vec::new()
        }
        Msg::PainPointSelected { id } => {
            if state.find_pain_point(&id).is_some() {
                state.select(Some(id));
            }
            Vec::new()
        }
        Msg::DetailClosed => {
            state.select(None);
            Vec::new()
        }
        Msg::ExportRequested(format) => vec![Effect::OpenExport { format }],
    };

    (state, effects)
}

fn fetch_current(state: &mut AppState) -> Effect {
    let (seq, query) = state.issue_fetch();
    dash_debug!("Issuing fetch seq={} query={}", seq, query.encode());
    Effect::FetchAll { seq, query }
}

/// Query edits made while the view is closed are kept and loaded on reopen.
fn refetch_if(state: &mut AppState, changed: bool) -> Vec<Effect> {
    if !changed {
        return Vec::new();
    }
    state.mark_dirty();
    if !state.is_view_open() {
        return Vec::new();
    }
    vec![fetch_current(state)]
}

fn ignore_job_event(state: AppState, job_id: JobId) -> (AppState, Vec<Effect>) {
    dash_debug!(
        "Ignoring event for scrape job {} in state {:?}",
        job_id,
        state.scrape_state()
    );
    (state, Vec::new())
}
