use crate::model::{RawJob, ScrapeError, ScrapeRequest};
use crate::scraper::traits::JobSource;

use reqwest::Client;

const LIST_ENDPOINT: &str = "https://www.zhipin.com/wapi/zpgeek/search/joblist.json";
const DETAIL_BASE: &str = "https://www.zhipin.com/job_detail";

pub struct ZhipinScraper {
    client: Client,
}

impl ZhipinScraper {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) CareerRadar/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build http client");

        Self { client }
    }

    fn detail_url(job: &RawJob) -> String {
        format!(
            "{}/{}.html?securityId={}&lid={}",
            DETAIL_BASE, job.encrypt_job_id, job.security_id, job.lid
        )
    }
}

#[async_trait::async_trait]
impl JobSource for ZhipinScraper {
    async fn fetch_listings(&self, req: &ScrapeRequest) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(LIST_ENDPOINT)
            .query(&[("query", req.query.as_str()), ("city", req.city_code.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::BadStatus(response.status()));
        }

        Ok(response.text().await?)
    }

    async fn fetch_detail(&self, job: &RawJob) -> Result<String, ScrapeError> {
        let url = Self::detail_url(job);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::BadStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}
