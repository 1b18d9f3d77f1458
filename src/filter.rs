// filter.rs - length and ambiguity thresholds

use crate::error::{CleanerError, Result};

/// Thresholds and mode shared by every file of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanerConfig {
    /// Sequences with `len <= min_length` are dropped.
    pub min_length: usize,
    /// Sequences with more than this percentage of `N` are dropped.
    pub max_percent_n: f64,
    /// Collapse exact and reverse-complement duplicates.
    pub merge_duplicates: bool,
}

impl CleanerConfig {
    pub fn new(min_length: usize, max_percent_n: f64, merge_duplicates: bool) -> Result<Self> {
        if !(0.0..=100.0).contains(&max_percent_n) {
            return Err(CleanerError::InvalidConfig(format!(
                "percentage of N must be between 0 and 100, got {max_percent_n}"
            )));
        }
        Ok(CleanerConfig {
            min_length,
            max_percent_n,
            merge_duplicates,
        })
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            min_length: 0,
            max_percent_n: 100.0,
            merge_duplicates: true,
        }
    }
}

/// Why a record was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    TooAmbiguous,
}

/// Percentage of `N` symbols in an uppercased sequence.
///
/// Lengths are byte counts; the reader rejects non-ASCII sequences, so they
/// equal symbol counts.
pub fn percent_n(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let n_count = sequence.bytes().filter(|&b| b == b'N').count();
    (n_count as f64 / sequence.len() as f64) * 100.0
}

/// Check an uppercased sequence against the thresholds.
///
/// The length check runs first, so a short sequence is never also reported
/// as ambiguous. Both comparisons are strict in the direction that keeps
/// boundary values: exactly `min_length` symbols is rejected, exactly
/// `max_percent_n` percent `N` is kept.
pub fn check_sequence(sequence: &str, config: &CleanerConfig) -> Option<Rejection> {
    if sequence.len() <= config.min_length {
        Some(Rejection::TooShort)
    } else if percent_n(sequence) > config.max_percent_n {
        Some(Rejection::TooAmbiguous)
    } else {
        None
    }
}
