use std::sync::Once;

use dashboard_core::{
    update, AppState, DashboardData, Effect, FetchState, JobId, Msg, ScrapeJobState, ScrapeNotice,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn opened() -> AppState {
    let (state, _) = update(AppState::new(), Msg::ViewOpened);
    state
}

fn triggered(state: AppState) -> (AppState, JobId) {
    let (state, effects) = update(state, Msg::ScrapeClicked);
    match effects.as_slice() {
        [Effect::TriggerScrape { job_id }] => (state, *job_id),
        other => panic!("expected TriggerScrape, got {other:?}"),
    }
}

fn polling() -> (AppState, JobId) {
    let (state, job_id) = triggered(opened());
    let (state, effects) = update(state, Msg::ScrapeStarted { job_id });
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Polling { job_id });
    (state, job_id)
}

fn status(job_id: JobId, running: bool) -> Msg {
    Msg::ScrapeStatus {
        job_id,
        running,
        run_error: None,
    }
}

#[test]
fn trigger_moves_idle_to_triggering() {
    init_logging();
    let (mut state, job_id) = triggered(opened());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Triggering { job_id });
    assert!(!state.view().scrape.enabled);
    assert!(state.consume_dirty());
}

#[test]
fn trigger_while_active_is_noop() {
    init_logging();
    let (state, job_id) = triggered(opened());
    let (state, effects) = update(state, Msg::ScrapeClicked);
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Triggering { job_id });

    let (state, _) = update(state, Msg::ScrapeStarted { job_id });
    let (state, effects) = update(state, Msg::ScrapeClicked);
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Polling { job_id });
}

#[test]
fn trigger_failure_returns_to_idle_and_keeps_data() {
    init_logging();
    let state = opened();
    let seq = state.last_issued_seq();
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(DashboardData::default()),
        },
    );
    let (state, job_id) = triggered(state);
    let (state, effects) = update(
        state,
        Msg::ScrapeTriggerFailed {
            job_id,
            message: "http status 503".into(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Idle);
    assert_eq!(
        state.scrape_notice(),
        Some(&ScrapeNotice::TriggerFailed("http status 503".into()))
    );
    assert_eq!(*state.fetch_state(), FetchState::Loaded);
    assert!(state.view().scrape.enabled);
}

#[test]
fn running_status_keeps_polling() {
    init_logging();
    let (state, job_id) = polling();
    let (state, effects) = update(state, status(job_id, true));
    assert!(effects.is_empty());
    let (state, effects) = update(state, status(job_id, true));
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Polling { job_id });
}

#[test]
fn completion_refreshes_current_query_exactly_once() {
    init_logging();
    let (state, job_id) = polling();

    // Filters change while the job runs; the refresh must use the new ones.
    let (state, _) = update(state, Msg::SubredditSelected("indiehackers".into()));

    let (state, effects) = update(state, status(job_id, false));
    assert_eq!(*state.scrape_state(), ScrapeJobState::Idle);
    assert_eq!(state.scrape_notice(), Some(&ScrapeNotice::Completed));
    match effects.as_slice() {
        [Effect::FetchAll { seq, query }] => {
            assert_eq!(*seq, state.last_issued_seq());
            assert_eq!(query.subreddit(), Some("indiehackers"));
        }
        other => panic!("expected one FetchAll, got {other:?}"),
    }

    // A duplicate final status is ignored.
    let (_, effects) = update(state, status(job_id, false));
    assert!(effects.is_empty());
}

#[test]
fn run_error_is_reported_but_still_refreshes() {
    init_logging();
    let (state, job_id) = polling();
    let (state, effects) = update(
        state,
        Msg::ScrapeStatus {
            job_id,
            running: false,
            run_error: Some("rate limited".into()),
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(
        state.scrape_notice(),
        Some(&ScrapeNotice::RunReportedError("rate limited".into()))
    );
}

#[test]
fn poll_failure_is_terminal_for_job() {
    init_logging();
    let (state, job_id) = polling();
    let (state, effects) = update(
        state,
        Msg::ScrapePollFailed {
            job_id,
            message: "timeout".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        *state.scrape_state(),
        ScrapeJobState::Failed {
            job_id,
            message: "timeout".into()
        }
    );

    let (state, effects) = update(state, status(job_id, false));
    assert!(effects.is_empty());
    assert!(matches!(state.scrape_state(), ScrapeJobState::Failed { .. }));

    // A fresh trigger starts a new job instance.
    let (state, next_job) = triggered(state);
    assert_ne!(next_job, job_id);
    assert_eq!(
        *state.scrape_state(),
        ScrapeJobState::Triggering { job_id: next_job }
    );
}

#[test]
fn teardown_cancels_and_ignores_late_status() {
    init_logging();
    let (state, job_id) = polling();
    let seq_before = state.last_issued_seq();

    let (state, effects) = update(state, Msg::ViewClosed);
    assert_eq!(effects, vec![Effect::CancelScrape { job_id }]);
    assert_eq!(*state.scrape_state(), ScrapeJobState::Idle);

    let (state, effects) = update(state, status(job_id, false));
    assert!(effects.is_empty());
    assert_eq!(state.last_issued_seq(), seq_before + 1);
    assert_eq!(state.scrape_notice(), None);
}

#[test]
fn teardown_while_triggering_cancels() {
    init_logging();
    let (state, job_id) = triggered(opened());
    let (state, effects) = update(state, Msg::ViewClosed);
    assert_eq!(effects, vec![Effect::CancelScrape { job_id }]);

    let (state, effects) = update(state, Msg::ScrapeStarted { job_id });
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Idle);
}

#[test]
fn reentering_after_teardown_starts_one_new_job() {
    init_logging();
    let (state, old_job) = polling();
    let (state, _) = update(state, Msg::ViewClosed);
    let (state, _) = update(state, Msg::ViewOpened);
    let (state, new_job) = triggered(state);
    assert_ne!(old_job, new_job);

    let (state, _) = update(state, Msg::ScrapeStarted { job_id: new_job });
    // Stray events from the cancelled job never touch the new one.
    let (state, effects) = update(state, status(old_job, false));
    assert!(effects.is_empty());
    assert_eq!(
        *state.scrape_state(),
        ScrapeJobState::Polling { job_id: new_job }
    );
}

#[test]
fn scrape_click_ignored_while_closed() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ScrapeClicked);
    assert!(effects.is_empty());
    assert_eq!(*state.scrape_state(), ScrapeJobState::Idle);
}
