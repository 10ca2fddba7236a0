//! Salary-text normalization.
//!
//! Listing salaries arrive as free text: `"8-12K"`, `"15-25K·14薪"`,
//! `"面议"`. This module turns such a descriptor into an estimated average
//! monthly pay in yuan, or an explicit [`SalaryEstimate::Unknown`] when the
//! text does not encode a usable low–high range. It never fails.

/// Result of normalizing one salary descriptor.
///
/// `Unknown` is a first-class outcome, not a missing value: downstream code
/// must be able to tell "no data" from "zero yuan".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SalaryEstimate {
    /// Estimated average monthly pay, in yuan.
    Monthly(f64),
    /// The descriptor is absent, negotiable, or not a low–high range.
    Unknown,
}

impl SalaryEstimate {
    pub fn monthly(self) -> Option<f64> {
        match self {
            SalaryEstimate::Monthly(v) => Some(v),
            SalaryEstimate::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, SalaryEstimate::Unknown)
    }
}

/// Marker for negotiable pay; such listings carry no usable figure.
const NEGOTIABLE: &str = "面议";

/// Marker for annual-bonus-month notation (`"·13薪"` means the monthly rate
/// is paid 13 times a year).
const BONUS_MONTH_MARKER: char = '薪';

/// Normalizes a free-text salary descriptor into an average monthly figure.
///
/// The first two digit runs are read as the low–high bounds of a monthly
/// range in thousands of yuan. When the text carries the bonus-month marker
/// and a third digit run, that run is the number of salary months per year
/// and the average is rescaled to a true monthly figure (`avg * n / 12`).
///
/// A descriptor with fewer than two digit runs (flat rates like `"10K"`
/// included) yields `Unknown`; so does any digit run too long to parse.
pub fn normalize_salary(raw: Option<&str>) -> SalaryEstimate {
    let Some(text) = raw else {
        return SalaryEstimate::Unknown;
    };
    if text.is_empty() || text.contains(NEGOTIABLE) {
        return SalaryEstimate::Unknown;
    }

    let Some(nums) = extract_digit_runs(text) else {
        return SalaryEstimate::Unknown;
    };
    if nums.len() < 2 {
        return SalaryEstimate::Unknown;
    }

    let (low, high) = (nums[0], nums[1]);
    let mut avg = (low + high) as f64 / 2.0;

    if text.contains(BONUS_MONTH_MARKER) && nums.len() >= 3 {
        avg = avg * nums[2] as f64 / 12.0;
    }

    // Source figures count thousands of yuan.
    SalaryEstimate::Monthly(avg * 1000.0)
}

/// Collects every maximal run of ASCII digits, left to right.
///
/// Returns `None` when any run overflows `u64`; the caller maps that to
/// `Unknown` rather than erroring.
fn extract_digit_runs(text: &str) -> Option<Vec<u64>> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            runs.push(current.parse().ok()?);
            current.clear();
        }
    }
    if !current.is_empty() {
        runs.push(current.parse().ok()?);
    }

    Some(runs)
}
