use crate::model::{RawJob, ScrapeError, ScrapeRequest};

#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    /// Fetches the raw job-list JSON body for one query/city combination.
    async fn fetch_listings(&self, req: &ScrapeRequest) -> Result<String, ScrapeError>;

    /// Fetches the detail-page HTML for one listing.
    async fn fetch_detail(&self, job: &RawJob) -> Result<String, ScrapeError>;
}
