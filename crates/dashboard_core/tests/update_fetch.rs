use std::sync::Once;

use dashboard_core::{
    update, AppState, DashboardData, Effect, FetchSeq, FetchState, Msg, Page, PainPoint,
    QueryParams, SortField, StatsSnapshot,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn pain_point(id: &str) -> PainPoint {
    PainPoint {
        id: id.to_string(),
        title: format!("Post {id}"),
        subreddit: "startups".to_string(),
        opportunity_score: 60,
        severity: 3,
        ..PainPoint::default()
    }
}

fn data(ids: &[&str], total: u64) -> DashboardData {
    DashboardData {
        page: Page {
            items: ids.iter().map(|id| pain_point(id)).collect(),
            total,
        },
        stats: StatsSnapshot {
            analyzed_posts: total,
            ..StatsSnapshot::default()
        },
        trending: Vec::new(),
    }
}

fn expect_fetch(effects: &[Effect]) -> (FetchSeq, QueryParams) {
    match effects {
        [Effect::FetchAll { seq, query }] => (*seq, query.clone()),
        other => panic!("expected a single FetchAll, got {other:?}"),
    }
}

fn opened() -> (AppState, FetchSeq) {
    let (state, effects) = update(AppState::new(), Msg::ViewOpened);
    let (seq, _) = expect_fetch(&effects);
    (state, seq)
}

fn loaded(ids: &[&str], total: u64) -> AppState {
    let (state, seq) = opened();
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(ids, total)),
        },
    );
    state
}

fn item_ids(state: &AppState) -> Vec<String> {
    state.view().items.into_iter().map(|item| item.id).collect()
}

#[test]
fn opening_the_view_issues_first_fetch() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::ViewOpened);
    let (seq, query) = expect_fetch(&effects);

    assert_eq!(seq, 1);
    assert_eq!(query, QueryParams::new());
    assert_eq!(*state.fetch_state(), FetchState::Loading);
    assert!(state.view().is_loading());
    assert!(state.consume_dirty());

    let (_, effects) = update(state, Msg::ViewOpened);
    assert!(effects.is_empty());
}

#[test]
fn completed_fetch_replaces_data() {
    init_logging();
    let mut state = loaded(&["a", "b"], 2);

    assert_eq!(*state.fetch_state(), FetchState::Loaded);
    assert_eq!(item_ids(&state), vec!["a", "b"]);
    assert_eq!(state.view().total, 2);
    assert!(state.consume_dirty());
}

#[test]
fn stale_result_arriving_late_is_discarded() {
    init_logging();
    let (state, first_seq) = opened();

    let (state, _) = update(state, Msg::SearchInputChanged("old".into()));
    let (state, effects) = update(state, Msg::SearchSubmitted);
    let (old_seq, _) = expect_fetch(&effects);

    let (state, _) = update(state, Msg::SearchInputChanged("new".into()));
    let (state, effects) = update(state, Msg::SearchSubmitted);
    let (new_seq, new_query) = expect_fetch(&effects);
    assert!(first_seq < old_seq && old_seq < new_seq);
    assert_eq!(new_query.search(), Some("new"));

    // Newest resolves first.
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: new_seq,
            result: Ok(data(&["fresh"], 1)),
        },
    );
    assert_eq!(item_ids(&state), vec!["fresh"]);

    // Older queries resolve afterwards and must not regress the view.
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: old_seq,
            result: Ok(data(&["stale"], 1)),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: first_seq,
            result: Err("boom".into()),
        },
    );

    assert_eq!(item_ids(&state), vec!["fresh"]);
    assert_eq!(*state.fetch_state(), FetchState::Loaded);
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: old_seq,
            result: Ok(data(&["stale"], 1)),
        },
    );
    assert!(!state.consume_dirty());
}

#[test]
fn superseded_result_arriving_first_is_discarded_and_loading_continues() {
    init_logging();
    let (state, first_seq) = opened();
    let (state, effects) = update(state, Msg::SubredditSelected("SaaS".into()));
    let (latest, _) = expect_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: first_seq,
            result: Ok(data(&["unfiltered"], 1)),
        },
    );
    assert!(state.data().is_none());
    assert_eq!(*state.fetch_state(), FetchState::Loading);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq: latest,
            result: Ok(data(&["saas"], 1)),
        },
    );
    assert_eq!(item_ids(&state), vec!["saas"]);
}

#[test]
fn failed_fetch_keeps_previous_data() {
    init_logging();
    let state = loaded(&["a"], 1);
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (seq, _) = expect_fetch(&effects);

    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Err("network error: connection refused".into()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        *state.fetch_state(),
        FetchState::Failed {
            message: "network error: connection refused".into()
        }
    );
    assert_eq!(item_ids(&state), vec!["a"]);
    assert!(!state.view().is_loading());
}

#[test]
fn failure_before_any_data_is_empty_and_flagged() {
    init_logging();
    let (state, seq) = opened();
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Err("http status 500".into()),
        },
    );
    let view = state.view();
    assert!(view.is_empty());
    assert!(matches!(view.fetch, FetchState::Failed { .. }));
    assert!(view.summary.is_none());
}

#[test]
fn search_typing_does_not_fetch_until_submitted() {
    init_logging();
    let (state, _) = opened();
    let (state, effects) = update(state, Msg::SearchInputChanged("inv".into()));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::SearchInputChanged("invoice".into()));
    assert!(effects.is_empty());
    assert_eq!(state.query().search(), None);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    let (_, query) = expect_fetch(&effects);
    assert_eq!(query.search(), Some("invoice"));

    // Resubmitting the same text changes nothing.
    let (_, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn unchanged_filter_does_not_refetch() {
    init_logging();
    let (state, _) = opened();
    let (state, effects) = update(state, Msg::CategorySelected("Finance".into()));
    assert_eq!(effects.len(), 1);
    let (_, effects) = update(state, Msg::CategorySelected("Finance".into()));
    assert!(effects.is_empty());
}

#[test]
fn sort_change_resets_page_and_replaces_items() {
    init_logging();
    let (state, _) = opened();
    let (state, effects) = update(state, Msg::SubredditSelected("startups".into()));
    let (_, _) = expect_fetch(&effects);
    let (state, effects) = update(state, Msg::SortSelected(SortField::Score));
    let (seq, query) = expect_fetch(&effects);
    assert_eq!(query.subreddit(), Some("startups"));
    assert_eq!(query.sort_by(), SortField::Score);
    assert_eq!(query.page(), 0);
    assert_eq!(query.limit(), 20);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&["x", "y", "z"], 3)),
        },
    );
    assert!(!state.view().query.has_next);

    let (state, effects) = update(state, Msg::PageRequested(2));
    let (_, query) = expect_fetch(&effects);
    assert_eq!(query.page(), 2);

    let (state, effects) = update(state, Msg::SortSelected(SortField::Severity));
    let (seq, query) = expect_fetch(&effects);
    assert_eq!(query.page(), 0);
    assert_eq!(query.sort_by(), SortField::Severity);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&["z", "y", "x"], 3)),
        },
    );
    assert_eq!(item_ids(&state), vec!["z", "y", "x"]);
    assert_eq!(state.view().total, 3);
}

#[test]
fn next_and_previous_respect_bounds() {
    init_logging();
    let state = loaded(&["a"], 45);

    let (state, effects) = update(state, Msg::PreviousPage);
    assert!(effects.is_empty());
    assert_eq!(state.query().page(), 0);

    let (state, effects) = update(state, Msg::NextPage);
    let (seq, query) = expect_fetch(&effects);
    assert_eq!(query.page(), 1);
    assert_eq!(query.offset(), 20);
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&["b"], 45)),
        },
    );

    let (state, effects) = update(state, Msg::NextPage);
    let (seq, _) = expect_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&["c"], 45)),
        },
    );
    assert_eq!(state.query().page(), 2);
    assert!(!state.view().query.has_next);

    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert_eq!(state.query().page(), 2);

    let (state, effects) = update(state, Msg::PreviousPage);
    let (_, query) = expect_fetch(&effects);
    assert_eq!(query.page(), 1);
    assert_eq!(state.query().page(), 1);
}

#[test]
fn out_of_range_page_yields_empty_items() {
    init_logging();
    let state = loaded(&["a"], 1);
    let (state, effects) = update(state, Msg::PageRequested(50));
    let (seq, query) = expect_fetch(&effects);
    assert_eq!(query.offset(), 1000);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&[], 1)),
        },
    );
    let view = state.view();
    assert!(view.items.is_empty());
    assert!(view.query.has_previous);
    assert!(!view.query.has_next);
}

#[test]
fn closing_the_view_drops_in_flight_results() {
    init_logging();
    let (state, seq) = opened();
    let (state, effects) = update(state, Msg::ViewClosed);
    assert!(effects.is_empty());
    assert_eq!(*state.fetch_state(), FetchState::Idle);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            seq,
            result: Ok(data(&["late"], 1)),
        },
    );
    assert!(state.data().is_none());
}

#[test]
fn filters_changed_while_closed_load_on_reopen() {
    init_logging();
    let (state, _) = opened();
    let (state, _) = update(state, Msg::ViewClosed);
    let (state, effects) = update(state, Msg::CategorySelected("Health".into()));
    assert!(effects.is_empty());

    let (_, effects) = update(state, Msg::ViewOpened);
    let (_, query) = expect_fetch(&effects);
    assert_eq!(query.category(), Some("Health"));
}
