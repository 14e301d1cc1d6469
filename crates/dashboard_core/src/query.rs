use std::fmt;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    OpportunityScore,
    Score,
    Severity,
    NumComments,
    CreatedUtc,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::OpportunityScore,
        SortField::Score,
        SortField::Severity,
        SortField::NumComments,
        SortField::CreatedUtc,
    ];

    /// Wire name used in the `sort_by` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::OpportunityScore => "opportunity_score",
            SortField::Score => "score",
            SortField::Severity => "severity",
            SortField::NumComments => "num_comments",
            SortField::CreatedUtc => "created_utc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Snapshot of the user's filter, sort, search and pagination selection.
///
/// The mutators report whether the effective value changed. Any change other
/// than the page itself moves back to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    subreddit: Option<String>,
    category: Option<String>,
    sort_by: SortField,
    order: SortOrder,
    search: Option<String>,
    page: u32,
    limit: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_LIMIT)
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero limit is bumped to 1.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            subreddit: None,
            category: None,
            sort_by: SortField::default(),
            order: SortOrder::default(),
            search: None,
            page: 0,
            limit: limit.max(1),
        }
    }

    pub fn subreddit(&self) -> Option<&str> {
        self.subreddit.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit)
    }

    pub fn set_subreddit(&mut self, value: &str) -> bool {
        let next = normalize(value);
        if self.subreddit == next {
            return false;
        }
        self.subreddit = next;
        self.page = 0;
        true
    }

    pub fn set_category(&mut self, value: &str) -> bool {
        let next = normalize(value);
        if self.category == next {
            return false;
        }
        self.category = next;
        self.page = 0;
        true
    }

    pub fn set_sort(&mut self, field: SortField) -> bool {
        if self.sort_by == field {
            return false;
        }
        self.sort_by = field;
        self.page = 0;
        true
    }

    pub fn set_order(&mut self, order: SortOrder) -> bool {
        if self.order == order {
            return false;
        }
        self.order = order;
        self.page = 0;
        true
    }

    pub fn submit_search(&mut self, text: &str) -> bool {
        let next = normalize(text);
        if self.search == next {
            return false;
        }
        self.search = next;
        self.page = 0;
        true
    }

    /// Not clamped: a page past the end is a valid request with no items.
    pub fn set_page(&mut self, page: u32) -> bool {
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    /// `(page + 1) * limit < total`
    pub fn has_next(&self, total: u64) -> bool {
        (u64::from(self.page) + 1) * u64::from(self.limit) < total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }

    /// Request parameters for the list endpoint. Empty filters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset().to_string()),
            ("sort_by", self.sort_by.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
        ];
        if let Some(subreddit) = &self.subreddit {
            pairs.push(("subreddit", subreddit.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }

    /// Percent-encoded form of [`QueryParams::query_pairs`].
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
