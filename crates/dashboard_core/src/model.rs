use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single extracted problem statement with ranking metadata.
///
/// Records arrive from the backend as loosely-typed JSON. Nullable columns
/// come through as defaults rather than failing the whole page.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PainPoint {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pain_point_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subreddit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_audience: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_size_estimate: String,
    #[serde(default)]
    pub created_utc: Option<f64>,
    /// Upvotes on the source post.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_comments: i64,
    /// 0..=100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub opportunity_score: i64,
    /// 1..=5.
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: i64,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub potential_solutions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub existing_solutions: Vec<String>,
}

impl PainPoint {
    pub fn opportunity_band(&self) -> OpportunityBand {
        OpportunityBand::from_score(self.opportunity_score)
    }

    /// Severity clamped into the 1..=5 display range.
    pub fn severity_level(&self) -> u8 {
        self.severity.clamp(1, 5) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunityBand {
    High,
    Medium,
    Low,
    Minimal,
}

impl OpportunityBand {
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 75 => OpportunityBand::High,
            s if s >= 50 => OpportunityBand::Medium,
            s if s >= 25 => OpportunityBand::Low,
            _ => OpportunityBand::Minimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CategoryCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub cnt: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubredditCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subreddit: String,
    #[serde(default)]
    pub cnt: u64,
}

/// Aggregate counts used for summary cards and filter option lists.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub analyzed_posts: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_opportunity_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_opportunity_score: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subreddits: Vec<SubredditCount>,
}

/// One page of the filtered list. `total` counts every match, not just `items`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<PainPoint>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TrendingList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<PainPoint>,
}

/// Combined result of one full refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardData {
    pub page: Page,
    pub stats: StatsSnapshot,
    pub trending: Vec<PainPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything that is not a JSON array becomes an empty list; non-string
/// elements are skipped.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
