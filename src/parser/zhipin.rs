// Boss直聘-specific decoding of list responses and detail pages.
use crate::model::{ParseError, RawJob};
use scraper::{Html, Selector};
use serde_json::Value;

/// Result of decoding one list response. Malformed entries are reported with
/// their index and reason instead of failing the whole batch.
#[derive(Debug)]
pub struct ParsedBatch {
    pub jobs: Vec<RawJob>,
    pub malformed: Vec<(usize, String)>,
}

pub struct ZhipinParser;

impl ZhipinParser {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the job-list JSON body (`zpData.jobList`) into raw records.
    ///
    /// Entries are decoded one at a time so a single bad record cannot sink
    /// the rest of the response.
    pub fn parse_job_list(&self, body: &str) -> Result<ParsedBatch, ParseError> {
        let root: Value = serde_json::from_str(body)?;
        let list = root
            .pointer("/zpData/jobList")
            .and_then(Value::as_array)
            .ok_or(ParseError::MissingJobList)?;

        let mut jobs = Vec::with_capacity(list.len());
        let mut malformed = Vec::new();

        for (index, entry) in list.iter().enumerate() {
            match serde_json::from_value::<RawJob>(entry.clone()) {
                Ok(job) => jobs.push(job),
                Err(e) => malformed.push((index, e.to_string())),
            }
        }

        Ok(ParsedBatch { jobs, malformed })
    }

    /// Pulls the job-description text out of a detail page.
    ///
    /// Returns `None` when the container is absent (page behind a captcha,
    /// layout change), which the caller treats as "nothing to enrich".
    pub fn extract_job_description(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("div.job-sec-text").ok()?;

        let node = document.select(&selector).next()?;
        let text = node.text().collect::<Vec<_>>().join("\n");
        let text = text.trim().to_string();

        if text.is_empty() { None } else { Some(text) }
    }
}
