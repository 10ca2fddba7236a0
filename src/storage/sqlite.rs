use crate::model::{BatchFailure, BatchReport, JobListing, StorageError, StoredJob};
use rusqlite::{Connection, Row, params};

/// SQLite-backed job store. One writer; the natural key
/// (job_name, company, city) guards duplicate inserts.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the store at `db_path` and applies the schema.
    /// Schema creation is idempotent; reopening an existing file is safe.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_name TEXT NOT NULL,
                salary_raw TEXT,
                salary_avg REAL,
                city TEXT NOT NULL,
                experience TEXT NOT NULL DEFAULT '',
                education TEXT NOT NULL DEFAULT '',
                company TEXT NOT NULL,
                skills TEXT NOT NULL DEFAULT '',
                job_desc TEXT,
                scrape_date TEXT NOT NULL,
                UNIQUE(job_name, company, city)
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts one listing, ignoring it when the natural key already exists.
    /// Returns the inserted-row count: 1 on a fresh insert, 0 on a duplicate.
    pub fn insert_listing(&self, listing: &JobListing) -> Result<usize, StorageError> {
        let count = self.conn.execute(
            "INSERT OR IGNORE INTO jobs
                (job_name, salary_raw, salary_avg, city, experience,
                 education, company, skills, scrape_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &listing.title,
                &listing.salary_raw,
                listing.salary_avg.monthly(),
                &listing.city,
                &listing.experience,
                &listing.education,
                &listing.company,
                listing.skills_joined(),
                &listing.scrape_date,
            ],
        )?;
        Ok(count)
    }

    /// Inserts a whole batch, one listing at a time. A failing record is
    /// recorded with its reason and the batch keeps going.
    pub fn insert_batch(&self, listings: &[JobListing]) -> BatchReport {
        let mut report = BatchReport::default();
        for listing in listings {
            match self.insert_listing(listing) {
                Ok(1) => report.inserted += 1,
                Ok(_) => report.duplicates += 1,
                Err(e) => report.failures.push(BatchFailure {
                    title: listing.title.clone(),
                    company: listing.company.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        report
    }

    /// Stores a listing enriched with its full description, overwriting any
    /// existing row with the same natural key. The enrichment pass is the
    /// one writer allowed to replace.
    pub fn save_listing_with_description(
        &self,
        listing: &JobListing,
        job_desc: &str,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO jobs
                (job_name, salary_raw, salary_avg, city, experience,
                 education, company, skills, job_desc, scrape_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &listing.title,
                &listing.salary_raw,
                listing.salary_avg.monthly(),
                &listing.city,
                &listing.experience,
                &listing.education,
                &listing.company,
                listing.skills_joined(),
                job_desc,
                &listing.scrape_date,
            ],
        )?;
        Ok(())
    }

    /// Full table scan for the aggregation layer.
    pub fn load_all_jobs(&self) -> Result<Vec<StoredJob>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, job_name, salary_raw, salary_avg, city, experience,
                    education, company, skills, job_desc, scrape_date
             FROM jobs ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], Self::map_job)?;
        let mut jobs = Vec::new();
        for job in rows {
            jobs.push(job?);
        }

        Ok(jobs)
    }

    pub fn count_jobs(&self) -> Result<usize, StorageError> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_job(row: &Row) -> Result<StoredJob, rusqlite::Error> {
        Ok(StoredJob {
            id: row.get(0)?,
            title: row.get(1)?,
            salary_raw: row.get(2)?,
            salary_avg: row.get(3)?,
            city: row.get(4)?,
            experience: row.get(5)?,
            education: row.get(6)?,
            company: row.get(7)?,
            skills: row.get(8)?,
            job_desc: row.get(9)?,
            scrape_date: row.get(10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::SalaryEstimate;
    use chrono::NaiveDate;

    fn listing(title: &str, company: &str, city: &str) -> JobListing {
        JobListing {
            title: title.into(),
            salary_raw: Some("8-12K".into()),
            salary_avg: SalaryEstimate::Monthly(10000.0),
            city: city.into(),
            experience: "3-5年".into(),
            education: "本科".into(),
            company: company.into(),
            skills: vec!["Rust".into(), "SQL".into()],
            scrape_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        }
    }

    fn open() -> SqliteStorage {
        SqliteStorage::new(":memory:").unwrap()
    }

    #[test]
    fn fresh_insert_counts_one() {
        let store = open();
        assert_eq!(store.insert_listing(&listing("a", "b", "c")).unwrap(), 1);
        assert_eq!(store.count_jobs().unwrap(), 1);
    }

    #[test]
    fn duplicate_natural_key_is_ignored_and_keeps_first_row() {
        let store = open();
        let first = listing("后端工程师", "Acme", "北京");
        assert_eq!(store.insert_listing(&first).unwrap(), 1);

        let mut second = first.clone();
        second.salary_raw = Some("20-40K".into());
        second.salary_avg = SalaryEstimate::Monthly(30000.0);
        assert_eq!(store.insert_listing(&second).unwrap(), 0);

        let jobs = store.load_all_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].salary_raw.as_deref(), Some("8-12K"));
        assert_eq!(jobs[0].salary_avg, Some(10000.0));
    }

    #[test]
    fn replace_path_overwrites_every_field() {
        let store = open();
        let first = listing("后端工程师", "Acme", "北京");
        store.insert_listing(&first).unwrap();

        let mut enriched = first.clone();
        enriched.salary_raw = Some("20-40K".into());
        enriched.salary_avg = SalaryEstimate::Monthly(30000.0);
        store
            .save_listing_with_description(&enriched, "负责核心服务开发")
            .unwrap();

        let jobs = store.load_all_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].salary_avg, Some(30000.0));
        assert_eq!(jobs[0].job_desc.as_deref(), Some("负责核心服务开发"));
    }

    #[test]
    fn unknown_salary_round_trips_as_null() {
        let store = open();
        let mut job = listing("数据分析师", "Globex", "上海");
        job.salary_raw = Some("面议".into());
        job.salary_avg = SalaryEstimate::Unknown;
        store.insert_listing(&job).unwrap();

        let jobs = store.load_all_jobs().unwrap();
        assert_eq!(jobs[0].salary_avg, None);
        assert_eq!(jobs[0].salary_raw.as_deref(), Some("面议"));
    }

    #[test]
    fn batch_report_separates_inserts_from_duplicates() {
        let store = open();
        let batch = vec![
            listing("a", "x", "北京"),
            listing("b", "x", "北京"),
            listing("a", "x", "北京"),
        ];
        let report = store.insert_batch(&batch);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.duplicates, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn reopening_the_schema_is_idempotent() {
        // Same connection path twice: CREATE TABLE IF NOT EXISTS must not
        // clash. In-memory databases are per-connection, so idempotence is
        // checked by re-running the schema batch on one handle.
        let store = open();
        store
            .conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS jobs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    job_name TEXT NOT NULL,
                    salary_raw TEXT,
                    salary_avg REAL,
                    city TEXT NOT NULL,
                    experience TEXT NOT NULL DEFAULT '',
                    education TEXT NOT NULL DEFAULT '',
                    company TEXT NOT NULL,
                    skills TEXT NOT NULL DEFAULT '',
                    job_desc TEXT,
                    scrape_date TEXT NOT NULL,
                    UNIQUE(job_name, company, city)
                );",
            )
            .unwrap();
        assert_eq!(store.count_jobs().unwrap(), 0);
    }

    #[test]
    fn skill_string_round_trips() {
        let store = open();
        store.insert_listing(&listing("a", "b", "c")).unwrap();
        let jobs = store.load_all_jobs().unwrap();
        assert_eq!(jobs[0].skills, "Rust,SQL");
        let tokens: Vec<&str> = jobs[0].skill_tokens().collect();
        assert_eq!(tokens, vec!["Rust", "SQL"]);
    }
}
