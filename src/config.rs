use serde::Deserialize;
use std::fs;

/// Scrape plan: every query is run against every city code, in order.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub queries: Vec<String>,
    pub cities: Vec<String>,
    /// Seconds to wait between two query/city combinations.
    #[serde(default = "default_delay")]
    pub delay_between_tasks: u64,
}

fn default_delay() -> u64 {
    10
}

impl AppConfig {
    /// Cartesian product of queries × cities, the task list of one run.
    pub fn task_combinations(&self) -> Vec<(String, String)> {
        let mut tasks = Vec::with_capacity(self.queries.len() * self.cities.len());
        for query in &self.queries {
            for city in &self.cities {
                tasks.push((query.clone(), city.clone()));
            }
        }
        tasks
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
