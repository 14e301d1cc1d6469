use crate::{
    AppState, FetchState, OpportunityBand, PainPoint, ScrapeJobState, ScrapeNotice, SortField,
    SortOrder,
};

/// Number of solution ideas shown on a card.
pub const CARD_SOLUTION_PREVIEWS: usize = 3;
pub const CARD_SOLUTION_CHARS: usize = 60;
pub const DETAIL_BODY_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub view_open: bool,
    pub fetch: FetchState,
    pub query: QueryView,
    pub summary: Option<SummaryView>,
    pub trending: Vec<TrendingCardView>,
    pub items: Vec<PainPointCardView>,
    pub total: u64,
    pub subreddit_options: Vec<FilterOption>,
    pub category_options: Vec<FilterOption>,
    pub scrape: ScrapeControlView,
    pub detail: Option<DetailView>,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let query = state.query();
        let data = state.data();
        let total = data.map(|data| data.page.total).unwrap_or(0);

        Self {
            view_open: state.is_view_open(),
            fetch: state.fetch_state().clone(),
            query: QueryView {
                subreddit: query.subreddit().map(ToOwned::to_owned),
                category: query.category().map(ToOwned::to_owned),
                sort_by: query.sort_by(),
                order: query.order(),
                search: query.search().map(ToOwned::to_owned),
                search_input: state.search_input().to_string(),
                page: query.page(),
                limit: query.limit(),
                total_pages: query.total_pages(total),
                has_next: query.has_next(total),
                has_previous: query.has_previous(),
                show_pagination: total > u64::from(query.limit()),
            },
            summary: data.map(|data| SummaryView {
                analyzed_posts: data.stats.analyzed_posts,
                category_count: data.stats.categories.len(),
                avg_opportunity_score: data.stats.avg_opportunity_score,
                top_opportunity_score: data.stats.top_opportunity_score,
            }),
            trending: data
                .map(|data| data.trending.iter().map(TrendingCardView::from).collect())
                .unwrap_or_default(),
            items: data
                .map(|data| data.page.items.iter().map(PainPointCardView::from).collect())
                .unwrap_or_default(),
            total,
            subreddit_options: data
                .map(|data| {
                    data.stats
                        .subreddits
                        .iter()
                        .map(|s| FilterOption {
                            value: s.subreddit.clone(),
                            count: s.cnt,
                            selected: query.subreddit() == Some(s.subreddit.as_str()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            category_options: data
                .map(|data| {
                    data.stats
                        .categories
                        .iter()
                        .map(|c| FilterOption {
                            value: c.category.clone(),
                            count: c.cnt,
                            selected: query.category() == Some(c.category.as_str()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            scrape: ScrapeControlView {
                state: state.scrape_state().clone(),
                enabled: !state.scrape_state().is_active() && state.is_view_open(),
                notice: state.scrape_notice().cloned(),
            },
            detail: state
                .selected_id()
                .and_then(|id| state.find_pain_point(id))
                .map(DetailView::from),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    /// Nothing to list and nothing pending.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_loading()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryView {
    pub subreddit: Option<String>,
    pub category: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub search: Option<String>,
    pub search_input: String,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub show_pagination: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryView {
    pub analyzed_posts: u64,
    pub category_count: usize,
    pub avg_opportunity_score: f64,
    pub top_opportunity_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub count: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeControlView {
    pub state: ScrapeJobState,
    pub enabled: bool,
    pub notice: Option<ScrapeNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingCardView {
    pub id: String,
    pub summary: String,
    pub subreddit: String,
    pub opportunity_score: i64,
    pub band: OpportunityBand,
}

impl From<&PainPoint> for TrendingCardView {
    fn from(item: &PainPoint) -> Self {
        Self {
            id: item.id.clone(),
            summary: headline(item),
            subreddit: item.subreddit.clone(),
            opportunity_score: item.opportunity_score,
            band: item.opportunity_band(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PainPointCardView {
    pub id: String,
    pub summary: String,
    pub title: String,
    pub subreddit: String,
    pub category: String,
    pub score: i64,
    pub num_comments: i64,
    pub severity: u8,
    pub opportunity_score: i64,
    pub band: OpportunityBand,
    pub solution_previews: Vec<String>,
}

impl From<&PainPoint> for PainPointCardView {
    fn from(item: &PainPoint) -> Self {
        Self {
            id: item.id.clone(),
            summary: headline(item),
            title: item.title.clone(),
            subreddit: item.subreddit.clone(),
            category: item.category.clone(),
            score: item.score,
            num_comments: item.num_comments,
            severity: item.severity_level(),
            opportunity_score: item.opportunity_score,
            band: item.opportunity_band(),
            solution_previews: item
                .potential_solutions
                .iter()
                .take(CARD_SOLUTION_PREVIEWS)
                .map(|s| truncate_chars(s, CARD_SOLUTION_CHARS))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub summary: String,
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    pub subreddit: String,
    pub category: String,
    pub score: i64,
    pub num_comments: i64,
    pub severity: u8,
    pub opportunity_score: i64,
    pub created_utc: Option<f64>,
    pub affected_audience: String,
    pub market_size_estimate: String,
    pub potential_solutions: Vec<String>,
    pub existing_solutions: Vec<String>,
}

impl From<&PainPoint> for DetailView {
    fn from(item: &PainPoint) -> Self {
        Self {
            id: item.id.clone(),
            summary: headline(item),
            title: item.title.clone(),
            body: item.body.chars().take(DETAIL_BODY_CHARS).collect(),
            url: item.url.clone(),
            subreddit: item.subreddit.clone(),
            category: item.category.clone(),
            score: item.score,
            num_comments: item.num_comments,
            severity: item.severity_level(),
            opportunity_score: item.opportunity_score,
            created_utc: item.created_utc,
            affected_audience: item.affected_audience.clone(),
            market_size_estimate: item.market_size_estimate.clone(),
            potential_solutions: item.potential_solutions.clone(),
            existing_solutions: item.existing_solutions.clone(),
        }
    }
}

// Older rows have no summary yet.
fn headline(item: &PainPoint) -> String {
    if item.pain_point_summary.is_empty() {
        item.title.clone()
    } else {
        item.pain_point_summary.clone()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('…');
    out
}
