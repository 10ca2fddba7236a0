//! Plain-text rendering of the market report: headline metrics, salary
//! histogram, experience breakdown, and the most-wanted skills.

use crate::analyzer::market::{self, MarketFilter};
use crate::analyzer::skills;
use crate::model::StoredJob;
use crate::utils::format_yuan;
use std::fmt::Write;

const HISTOGRAM_BINS: usize = 20;
const TOP_SKILLS: usize = 15;
const BAR_WIDTH: usize = 30;

pub fn render_market_report(jobs: &[StoredJob], filter: &MarketFilter) -> String {
    let selected = filter.apply(jobs);
    let mut out = String::new();

    let summary = market::summarize(&selected);
    let _ = writeln!(out, "📋 Job market report");
    let _ = writeln!(out, "  samples:   {}", summary.sample_count);
    let _ = writeln!(out, "  companies: {}", summary.company_count);
    match summary.mean_salary {
        Some(mean) => {
            let _ = writeln!(out, "  avg pay:   {}/month", format_yuan(mean));
        }
        None => {
            let _ = writeln!(out, "  avg pay:   n/a");
        }
    }

    let bins = market::salary_histogram(&selected, HISTOGRAM_BINS);
    if !bins.is_empty() {
        let _ = writeln!(out, "\n💰 Salary distribution");
        let peak = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);
        for bin in &bins {
            let _ = writeln!(
                out,
                "  {:>10} .. {:>10}  {:<width$} {}",
                format_yuan(bin.lower),
                format_yuan(bin.upper),
                bar(bin.count, peak),
                bin.count,
                width = BAR_WIDTH,
            );
        }
    }

    let boxes = market::salary_by_experience(&selected);
    if !boxes.is_empty() {
        let _ = writeln!(out, "\n🎓 Salary by experience");
        for b in &boxes {
            let _ = writeln!(
                out,
                "  {:<10} n={:<4} min {} | q1 {} | median {} | q3 {} | max {}",
                b.group,
                b.count,
                format_yuan(b.min),
                format_yuan(b.q1),
                format_yuan(b.median),
                format_yuan(b.q3),
                format_yuan(b.max),
            );
        }
    }

    let top = skills::top_skills(&selected, TOP_SKILLS);
    if !top.is_empty() {
        let _ = writeln!(out, "\n🛠️ Top {} skills", top.len());
        let peak = top.first().map(|(_, c)| *c).unwrap_or(1).max(1);
        for (skill, count) in &top {
            let _ = writeln!(out, "  {:<20} {:<width$} {}", skill, bar(*count, peak), count, width = BAR_WIDTH);
        }
    }

    out
}

fn bar(count: usize, peak: usize) -> String {
    let len = (count * BAR_WIDTH).div_ceil(peak).min(BAR_WIDTH);
    "#".repeat(len)
}
