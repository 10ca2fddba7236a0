// Analyzer module: aggregates submodules for different aspects of the
// stored job table.

pub mod market;
pub mod skills;

pub use market::{BoxStats, HistogramBin, MarketFilter, MarketSummary};
pub use skills::top_skills;
