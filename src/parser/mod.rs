pub mod zhipin;

pub use zhipin::{ParsedBatch, ZhipinParser};
