use std::sync::Arc;

use dashboard_core::{DashboardData, QueryParams};
use futures_util::future::try_join3;

use crate::{ApiError, DashboardApi};

/// Size of the trending strip, independent of the page limit.
pub const TRENDING_LIMIT: u32 = 5;

/// Runs the three reads behind one dashboard refresh.
///
/// All three must succeed; the first failure fails the whole refresh so a
/// page is never shown next to stats from a different moment.
#[derive(Clone)]
pub struct DataFetcher {
    api: Arc<dyn DashboardApi>,
    trending_limit: u32,
}

impl DataFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            trending_limit: TRENDING_LIMIT,
        }
    }

    pub fn with_trending_limit(mut self, limit: u32) -> Self {
        self.trending_limit = limit.max(1);
        self
    }

    pub async fn fetch_all(&self, query: &QueryParams) -> Result<DashboardData, ApiError> {
        let (page, stats, trending) = try_join3(
            self.api.list_pain_points(query),
            self.api.stats(),
            self.api.trending(self.trending_limit),
        )
        .await?;

        Ok(DashboardData {
            page,
            stats,
            trending,
        })
    }
}
