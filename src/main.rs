mod analyzer;
mod config;
mod model;
mod normalizer;
mod parser;
mod report;
mod scraper;
mod storage;
mod utils;

use analyzer::market::MarketFilter;
use config::{AppConfig, load_config};
use model::{JobListing, RawJob, ScrapeRequest};
use parser::ZhipinParser;
use rand::Rng;
use report::render_market_report;
use scraper::{JobSource, ZhipinScraper};
use storage::SqliteStorage;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

const DB_PATH: &str = "career_market.db";
const CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let storage = match SqliteStorage::new(DB_PATH) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {e}");
            return;
        }
    };

    // `career-radar report` prints the market report over the stored table
    // and exits; the default mode runs the scrape plan.
    if std::env::args().nth(1).as_deref() == Some("report") {
        run_report(&storage);
        return;
    }

    let config = match load_config(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {e}");
            return;
        }
    };

    run_scrape_plan(&config, &storage).await;
}

fn run_report(storage: &SqliteStorage) {
    match storage.load_all_jobs() {
        Ok(jobs) if jobs.is_empty() => {
            warn!("The store is empty; run the scraper first.");
        }
        Ok(jobs) => {
            println!("{}", render_market_report(&jobs, &MarketFilter::default()));
        }
        Err(e) => error!("Failed to load jobs: {e}"),
    }
}

async fn run_scrape_plan(config: &AppConfig, storage: &SqliteStorage) {
    let scraper = ZhipinScraper::new();
    let parser = ZhipinParser::new();

    let tasks = config.task_combinations();
    let total = tasks.len();
    info!("📊 Scrape plan ready: {total} query/city combinations.");

    for (index, (query, city)) in tasks.iter().enumerate() {
        info!("🚀 Task [{}/{}]: {} @ city {}", index + 1, total, query, city);

        process_task(&scraper, &parser, storage, query, city).await;

        if index + 1 < total {
            info!("☕ Resting {}s before the next combination...", config.delay_between_tasks);
            sleep(Duration::from_secs(config.delay_between_tasks)).await;
        }
    }

    match storage.count_jobs() {
        Ok(count) => info!("🎉 All tasks finished; the store holds {count} listings."),
        Err(e) => warn!("Count failed: {e}"),
    }
}

/// Runs one query/city combination end to end: fetch the list, parse it,
/// normalize salaries, batch-insert, then the per-listing enrichment pass.
/// Any step failing skips this task only.
async fn process_task(
    scraper: &impl JobSource,
    parser: &ZhipinParser,
    storage: &SqliteStorage,
    query: &str,
    city: &str,
) {
    let request = ScrapeRequest {
        query: query.to_string(),
        city_code: city.to_string(),
    };

    let body = match scraper.fetch_listings(&request).await {
        Ok(body) => body,
        Err(e) => {
            warn!("⚠️ Fetch failed (possibly IP-limited or a captcha): {e}");
            return;
        }
    };

    let batch = match parser.parse_job_list(&body) {
        Ok(batch) => batch,
        Err(e) => {
            warn!("Parse error: {e}");
            return;
        }
    };
    for (index, reason) in &batch.malformed {
        warn!("Record {index} skipped: {reason}");
    }

    let scrape_date = utils::today();
    let listings: Vec<JobListing> = batch
        .jobs
        .iter()
        .map(|raw| JobListing::from_raw(raw, scrape_date))
        .collect();

    let unknown_salaries = listings.iter().filter(|l| l.salary_avg.is_unknown()).count();
    if unknown_salaries > 0 {
        info!("{unknown_salaries} listings carry no usable salary range.");
    }

    let list_report = storage.insert_batch(&listings);
    info!(
        "💾 Batch stored: {} new, {} duplicates, {} failed.",
        list_report.inserted,
        list_report.duplicates,
        list_report.failures.len()
    );
    for failure in &list_report.failures {
        warn!(
            "Insert failed for {} @ {}: {}",
            failure.title, failure.company, failure.reason
        );
    }

    enrich_with_descriptions(scraper, parser, storage, &batch.jobs, &listings).await;
}

/// Second pass: fetch every listing's detail page and overwrite the stored
/// row with the full description. Paced with a randomized sleep so the
/// site's throttling stays quiet.
async fn enrich_with_descriptions(
    scraper: &impl JobSource,
    parser: &ZhipinParser,
    storage: &SqliteStorage,
    raw_jobs: &[RawJob],
    listings: &[JobListing],
) {
    for (raw, listing) in raw_jobs.iter().zip(listings) {
        info!("🔍 Fetching description: {}...", listing.title);

        let pause = rand::rng().random_range(5..=10);
        sleep(Duration::from_secs(pause)).await;

        let html = match scraper.fetch_detail(raw).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Detail fetch failed for {}: {e}", listing.title);
                continue;
            }
        };

        match parser.extract_job_description(&html) {
            Some(jd) => {
                if let Err(e) = storage.save_listing_with_description(listing, &jd) {
                    warn!("DB save error: {e}");
                } else {
                    info!("✅ Stored description ({} chars).", jd.chars().count());
                }
            }
            None => {
                warn!(
                    "⚠️ No description for {}; the page may need manual verification.",
                    listing.title
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{market, skills};

    const LIST_BODY: &str = r#"{
        "zpData": {
            "jobList": [
                {
                    "encryptJobId": "j1",
                    "jobName": "Rust工程师",
                    "salaryDesc": "8-12K",
                    "cityName": "北京",
                    "jobExperience": "1-3年",
                    "jobDegree": "本科",
                    "brandName": "Acme",
                    "skills": ["Rust", "SQL"]
                },
                {
                    "encryptJobId": "j2",
                    "jobName": "高级Rust工程师",
                    "salaryDesc": "15-25K·14薪",
                    "cityName": "北京",
                    "jobExperience": "3-5年",
                    "jobDegree": "本科",
                    "brandName": "Acme",
                    "skills": ["Rust", "Tokio"]
                },
                {
                    "encryptJobId": "j3",
                    "jobName": "数据分析师",
                    "salaryDesc": "面议",
                    "cityName": "上海",
                    "jobExperience": "1-3年",
                    "jobDegree": "硕士",
                    "brandName": "Globex",
                    "skills": ["SQL"]
                }
            ]
        }
    }"#;

    #[test]
    fn list_body_flows_from_parse_to_report() {
        let parser = ZhipinParser::new();
        let storage = SqliteStorage::new(":memory:").unwrap();

        let batch = parser.parse_job_list(LIST_BODY).unwrap();
        assert_eq!(batch.jobs.len(), 3);

        let scrape_date = utils::today();
        let listings: Vec<JobListing> = batch
            .jobs
            .iter()
            .map(|raw| JobListing::from_raw(raw, scrape_date))
            .collect();

        let report = storage.insert_batch(&listings);
        assert_eq!(report.inserted, 3);

        // Re-running the same batch only produces duplicates.
        let report = storage.insert_batch(&listings);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.duplicates, 3);

        let jobs = storage.load_all_jobs().unwrap();
        let refs: Vec<&model::StoredJob> = jobs.iter().collect();

        let summary = market::summarize(&refs);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.company_count, 2);
        // (10000 + 23333.33...) / 2 over the two known salaries.
        let mean = summary.mean_salary.unwrap();
        assert!((mean - 16666.666666666668).abs() < 1e-6);

        let top = skills::top_skills(&refs, 15);
        assert_eq!(top[0], ("Rust".to_string(), 2));
        assert_eq!(top[1], ("SQL".to_string(), 2));

        let text = render_market_report(&jobs, &MarketFilter::default());
        assert!(text.contains("samples:   3"));
    }
}
