//! Decides whether free-form student text contains a value close
//! enough to a known answer.

use std::sync::LazyLock;

use regex::Regex;

/// Relative tolerance used when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

// Keeps the denominator positive for tiny targets. Zero targets never
// reach it, they take the absolute branch.
const EPSILON: f64 = f64::EPSILON;

// Signed integers and decimals, including bare fractions like `.5` and
// an optional exponent. Units and prose around the number are ignored.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?").expect("Invalid number regex")
});

/// Every number found in `text`, left to right. Candidates that don't
/// parse to a finite float are skipped.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// How far `value` is from `target`. Relative for non-zero targets and
/// absolute when the target is zero.
pub fn deviation(value: f64, target: f64) -> f64 {
    if target == 0.0 {
        value.abs()
    } else {
        (value - target).abs() / (target.abs() + EPSILON)
    }
}

/// Returns true as soon as any number in `text` deviates from `target`
/// by strictly less than `tolerance`.
pub fn check_numeric_match(text: &str, target: f64, tolerance: f64) -> bool {
    extract_numbers(text)
        .into_iter()
        .any(|value| deviation(value, target) < tolerance)
}
