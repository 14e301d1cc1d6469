use crate::{ExportFormat, FetchSeq, JobId, QueryParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch list, stats and trending for `query`; report back tagged with `seq`.
    FetchAll { seq: FetchSeq, query: QueryParams },
    TriggerScrape { job_id: JobId },
    CancelScrape { job_id: JobId },
    OpenExport { format: ExportFormat },
}
