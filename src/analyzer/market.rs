//! Salary aggregates over the stored job table: filtering, descriptive
//! stats, histogram bins, and per-experience box stats.

use crate::model::StoredJob;
use std::collections::{HashMap, HashSet};

/// City/education selection. An empty selection means "keep everything",
/// mirroring a filter panel with all options checked.
#[derive(Debug, Default, Clone)]
pub struct MarketFilter {
    pub cities: Vec<String>,
    pub educations: Vec<String>,
}

impl MarketFilter {
    pub fn apply<'a>(&self, jobs: &'a [StoredJob]) -> Vec<&'a StoredJob> {
        jobs.iter()
            .filter(|j| self.cities.is_empty() || self.cities.contains(&j.city))
            .filter(|j| self.educations.is_empty() || self.educations.contains(&j.education))
            .collect()
    }
}

/// Headline metrics of a (filtered) job set.
#[derive(Debug, PartialEq)]
pub struct MarketSummary {
    pub sample_count: usize,
    pub company_count: usize,
    /// Mean over rows with a known salary; `None` when no row has one.
    pub mean_salary: Option<f64>,
}

pub fn summarize(jobs: &[&StoredJob]) -> MarketSummary {
    let companies: HashSet<&str> = jobs.iter().map(|j| j.company.as_str()).collect();
    let salaries: Vec<f64> = jobs.iter().filter_map(|j| j.salary_avg).collect();

    let mean_salary = if salaries.is_empty() {
        None
    } else {
        Some(salaries.iter().sum::<f64>() / salaries.len() as f64)
    };

    MarketSummary {
        sample_count: jobs.len(),
        company_count: companies.len(),
        mean_salary,
    }
}

#[derive(Debug, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width frequency histogram over the known salaries.
///
/// A degenerate range (all values equal) collapses into a single bin.
pub fn salary_histogram(jobs: &[&StoredJob], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = jobs.iter().filter_map(|j| j.salary_avg).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![HistogramBin { lower: min, upper: max, count: values.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1; // the maximum lands in the last bin
        }
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Five-number summary of the known salaries within one experience bucket.
#[derive(Debug)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Groups salaries by experience bucket and computes box stats per group,
/// sorted by group label. Buckets with no known salary are dropped.
pub fn salary_by_experience(jobs: &[&StoredJob]) -> Vec<BoxStats> {
    let mut grouped: HashMap<&str, Vec<f64>> = HashMap::new();
    for job in jobs {
        if let Some(v) = job.salary_avg {
            grouped.entry(job.experience.as_str()).or_default().push(v);
        }
    }

    let mut stats: Vec<BoxStats> = grouped
        .into_iter()
        .map(|(group, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            BoxStats {
                group: group.to_string(),
                count: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            }
        })
        .collect();

    stats.sort_by(|a, b| a.group.cmp(&b.group));
    stats
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    if base + 1 < sorted.len() {
        sorted[base] + rest * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}
