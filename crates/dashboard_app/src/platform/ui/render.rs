use std::fmt::Write;

use chrono::DateTime;
use dashboard_core::{
    AppViewModel, DetailView, FetchState, FilterOption, OpportunityBand, PainPointCardView,
    ScrapeJobState, ScrapeNotice,
};

pub fn render(view: &AppViewModel) -> String {
    if !view.view_open {
        return "Dashboard closed.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "=== Pain Point Dashboard === {}", fetch_label(&view.fetch));

    if let Some(summary) = &view.summary {
        let _ = writeln!(
            out,
            "Analyzed posts: {} | Categories: {} | Avg opportunity: {:.1} | Top opportunity: {}",
            format_with_commas(summary.analyzed_posts),
            summary.category_count,
            summary.avg_opportunity_score,
            summary.top_opportunity_score
        );
    }
    let _ = writeln!(out, "Scrape: {}", scrape_label(view));

    let query = &view.query;
    let _ = writeln!(
        out,
        "Filters: sub={} cat={} sort={} {} search={}",
        query.subreddit.as_deref().unwrap_or("all"),
        query.category.as_deref().unwrap_or("all"),
        query.sort_by,
        query.order.as_str(),
        query.search.as_deref().unwrap_or("-")
    );
    render_options(&mut out, "Subreddits", &view.subreddit_options);
    render_options(&mut out, "Categories", &view.category_options);

    if !view.trending.is_empty() {
        let _ = writeln!(out, "\nTrending:");
        for card in &view.trending {
            let _ = writeln!(
                out,
                "  {:>3} {:<7} r/{} {}  [{}]",
                card.opportunity_score,
                band_label(card.band),
                card.subreddit,
                card.summary,
                card.id
            );
        }
    }

    let _ = writeln!(out);
    if view.is_empty() {
        let _ = writeln!(out, "No pain points match the current filters.");
    }
    for card in &view.items {
        render_card(&mut out, card);
    }

    if query.show_pagination {
        let _ = writeln!(
            out,
            "Page {} of {} ({} total){}{}",
            u64::from(query.page) + 1,
            query.total_pages,
            format_with_commas(view.total),
            if query.has_previous { " [p]rev" } else { "" },
            if query.has_next { " [n]ext" } else { "" }
        );
    }

    if let Some(detail) = &view.detail {
        render_detail(&mut out, detail);
    }
    out
}

fn fetch_label(fetch: &FetchState) -> String {
    match fetch {
        FetchState::Idle | FetchState::Loaded => String::new(),
        FetchState::Loading => "(loading…)".to_string(),
        FetchState::Failed { message } => format!("(refresh failed: {message})"),
    }
}

fn scrape_label(view: &AppViewModel) -> String {
    let state = match &view.scrape.state {
        ScrapeJobState::Idle => "idle".to_string(),
        ScrapeJobState::Triggering { job_id } => format!("starting job {job_id}"),
        ScrapeJobState::Polling { job_id } => format!("job {job_id} running"),
        ScrapeJobState::Failed { job_id, message } => {
            format!("job {job_id} status unknown ({message})")
        }
    };
    match &view.scrape.notice {
        Some(ScrapeNotice::Completed) => format!("{state}, last run completed"),
        Some(ScrapeNotice::RunReportedError(message)) => {
            format!("{state}, last run reported an error: {message}")
        }
        Some(ScrapeNotice::TriggerFailed(message)) => format!("{state}, could not start: {message}"),
        Some(ScrapeNotice::PollFailed(message)) => format!("{state}, polling failed: {message}"),
        None => state,
    }
}

fn render_options(out: &mut String, label: &str, options: &[FilterOption]) {
    if options.is_empty() {
        return;
    }
    let list: Vec<String> = options
        .iter()
        .map(|option| {
            let marker = if option.selected { "*" } else { "" };
            format!("{marker}{} ({})", option.value, format_with_commas(option.count))
        })
        .collect();
    let _ = writeln!(out, "{label}: {}", list.join(", "));
}

fn render_card(out: &mut String, card: &PainPointCardView) {
    let _ = writeln!(
        out,
        "{:>3} {:<7} sev {} | r/{} | {} | {} pts, {} comments  [{}]",
        card.opportunity_score,
        band_label(card.band),
        card.severity,
        card.subreddit,
        card.category,
        card.score,
        card.num_comments,
        card.id
    );
    let _ = writeln!(out, "    {}", card.summary);
    for solution in &card.solution_previews {
        let _ = writeln!(out, "      - {solution}");
    }
}

fn render_detail(out: &mut String, detail: &DetailView) {
    let _ = writeln!(out, "\n--- {} ---", detail.summary);
    let _ = writeln!(out, "Title: {}", detail.title);
    let _ = writeln!(
        out,
        "r/{} | {} | opportunity {} | severity {} | {} pts, {} comments",
        detail.subreddit,
        detail.category,
        detail.opportunity_score,
        detail.severity,
        detail.score,
        detail.num_comments
    );
    if let Some(posted) = detail.created_utc.and_then(format_timestamp) {
        let _ = writeln!(out, "Posted: {posted}");
    }
    if let Some(url) = &detail.url {
        let _ = writeln!(out, "Source: {url}");
    }
    if !detail.affected_audience.is_empty() {
        let _ = writeln!(out, "Audience: {}", detail.affected_audience);
    }
    if !detail.market_size_estimate.is_empty() {
        let _ = writeln!(out, "Market size: {}", detail.market_size_estimate);
    }
    render_list(out, "Potential solutions", &detail.potential_solutions);
    render_list(out, "Existing solutions", &detail.existing_solutions);
    if !detail.body.is_empty() {
        let _ = writeln!(out, "\n{}", detail.body);
    }
}

fn render_list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{label}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn band_label(band: OpportunityBand) -> &'static str {
    match band {
        OpportunityBand::High => "high",
        OpportunityBand::Medium => "medium",
        OpportunityBand::Low => "low",
        OpportunityBand::Minimal => "minimal",
    }
}

fn format_timestamp(secs: f64) -> Option<String> {
    let posted = DateTime::from_timestamp(secs as i64, 0)?;
    Some(posted.format("%Y-%m-%d %H:%M UTC").to_string())
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{
        update, AppState, CategoryCount, DashboardData, Msg, Page, ScrapeControlView,
        StatsSnapshot,
    };
    use pretty_assertions::assert_eq;

    fn open_view() -> AppViewModel {
        AppViewModel {
            view_open: true,
            fetch: FetchState::Loaded,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1234567), "1,234,567");
    }

    #[test]
    fn closed_view_renders_nothing_else() {
        assert_eq!(render(&AppViewModel::default()), "Dashboard closed.\n");
    }

    #[test]
    fn empty_result_says_so() {
        let text = render(&open_view());
        assert!(text.contains("No pain points match the current filters."));
        assert!(!text.contains("Page "));
    }

    fn loaded_state(page: u32) -> AppState {
        let data = DashboardData {
            page: Page {
                items: Vec::new(),
                total: 45,
            },
            stats: StatsSnapshot {
                analyzed_posts: 1500,
                avg_opportunity_score: 47.31,
                top_opportunity_score: 91,
                categories: (0..4)
                    .map(|i| CategoryCount {
                        category: format!("cat{i}"),
                        cnt: 1,
                    })
                    .collect(),
                ..StatsSnapshot::default()
            },
            trending: Vec::new(),
        };
        let (mut state, _) = update(AppState::with_page_limit(20), Msg::ViewOpened);
        if page > 0 {
            state = update(state, Msg::PageRequested(page)).0;
        }
        let seq = state.last_issued_seq();
        update(
            state,
            Msg::FetchCompleted {
                seq,
                result: Ok(data),
            },
        )
        .0
    }

    #[test]
    fn summary_line_formats_counts() {
        let text = render(&loaded_state(0).view());
        assert!(text.contains(
            "Analyzed posts: 1,500 | Categories: 4 | Avg opportunity: 47.3 | Top opportunity: 91"
        ));
    }

    #[test]
    fn pages_are_numbered_from_one() {
        let first = render(&loaded_state(0).view());
        assert!(first.contains("Page 1 of 3 (45 total) [n]ext\n"));

        let middle = render(&loaded_state(1).view());
        assert!(middle.contains("Page 2 of 3 (45 total) [p]rev [n]ext\n"));

        let last = render(&loaded_state(2).view());
        assert!(last.contains("Page 3 of 3 (45 total) [p]rev\n"));
    }

    #[test]
    fn scrape_notice_is_shown() {
        let view = AppViewModel {
            scrape: ScrapeControlView {
                state: ScrapeJobState::Idle,
                enabled: true,
                notice: Some(ScrapeNotice::RunReportedError("praw quota".to_string())),
            },
            ..open_view()
        };
        assert!(render(&view).contains("Scrape: idle, last run reported an error: praw quota"));
    }

    #[test]
    fn detail_timestamp_is_formatted_in_utc() {
        assert_eq!(
            format_timestamp(1_700_000_000.0).as_deref(),
            Some("2023-11-14 22:13 UTC")
        );
    }
}
