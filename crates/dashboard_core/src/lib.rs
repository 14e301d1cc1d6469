//! Dashboard core: pure query/fetch/scrape state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    CategoryCount, DashboardData, ExportFormat, OpportunityBand, Page, PainPoint, StatsSnapshot,
    SubredditCount, TrendingList,
};
pub use msg::Msg;
pub use query::{QueryParams, SortField, SortOrder, DEFAULT_PAGE_LIMIT};
pub use state::{AppState, FetchSeq, FetchState, JobId, ScrapeJobState, ScrapeNotice};
pub use update::update;
pub use view_model::{
    AppViewModel, DetailView, FilterOption, PainPointCardView, QueryView, ScrapeControlView,
    SummaryView, TrendingCardView, CARD_SOLUTION_CHARS, CARD_SOLUTION_PREVIEWS, DETAIL_BODY_CHARS,
};
