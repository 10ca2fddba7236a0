// Core structs: raw wire records, ingest listings, stored rows, errors.
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::normalizer::SalaryEstimate;

/// One entry of the job-list API response, as the site sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJob {
    #[serde(default)]
    pub encrypt_job_id: String,
    #[serde(default)]
    pub security_id: String,
    #[serde(default)]
    pub lid: String,
    pub job_name: String,
    #[serde(default)]
    pub salary_desc: Option<String>,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub job_experience: String,
    #[serde(default)]
    pub job_degree: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// A listing ready for persistence. Built once from a [`RawJob`], never
/// mutated afterwards; the raw salary text is kept next to the estimate
/// for auditability.
#[derive(Debug, Clone)]
pub struct JobListing {
    pub title: String,
    pub salary_raw: Option<String>,
    pub salary_avg: SalaryEstimate,
    pub city: String,
    pub experience: String,
    pub education: String,
    pub company: String,
    pub skills: Vec<String>,
    pub scrape_date: NaiveDate,
}

impl JobListing {
    pub fn from_raw(raw: &RawJob, scrape_date: NaiveDate) -> Self {
        let salary_avg = crate::normalizer::normalize_salary(raw.salary_desc.as_deref());
        Self {
            title: raw.job_name.clone(),
            salary_raw: raw.salary_desc.clone(),
            salary_avg,
            city: raw.city_name.clone(),
            experience: raw.job_experience.clone(),
            education: raw.job_degree.clone(),
            company: raw.brand_name.clone(),
            skills: raw.skills.clone(),
            scrape_date,
        }
    }

    /// Skill list as stored: comma-joined, matching the source delimiter.
    pub fn skills_joined(&self) -> String {
        self.skills.join(",")
    }
}

/// Row image of the `jobs` table.
#[derive(Debug, Clone)]
pub struct StoredJob {
    pub id: i64,
    pub title: String,
    pub salary_raw: Option<String>,
    pub salary_avg: Option<f64>,
    pub city: String,
    pub experience: String,
    pub education: String,
    pub company: String,
    pub skills: String,
    pub job_desc: Option<String>,
    pub scrape_date: NaiveDate,
}

impl StoredJob {
    /// Splits the stored skill string back into tokens, dropping empties.
    pub fn skill_tokens(&self) -> impl Iterator<Item = &str> {
        self.skills.split(',').filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub query: String,
    pub city_code: String,
}

/// Outcome of one batch insert. Failures carry the natural key and a reason
/// so a bad record stays diagnosable without aborting the rest of the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub title: String,
    pub company: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    BadStatus(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response body is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response carries no job list")]
    MissingJobList,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
