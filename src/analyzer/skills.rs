//! Skill-tag frequency over the flattened comma-joined skill strings.

use crate::model::StoredJob;
use std::collections::HashMap;

/// Counts every skill token across the given jobs. Counting runs over the
/// flattened token stream, so duplicates within one record all count.
pub fn skill_frequencies(jobs: &[&StoredJob]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for job in jobs {
        for token in job.skill_tokens() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// The `n` most frequent skills, ties broken by name for a stable order.
pub fn top_skills(jobs: &[&StoredJob], n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = skill_frequencies(jobs).into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}
