/// Counters for one input file. Only the dedup engine increments them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub processed: usize,
    /// Exact plus reverse-complement duplicates.
    pub repeated: usize,
    pub repeated_rc: usize,
    pub short: usize,
    pub high_n: usize,
}

impl RunStatistics {
    /// Records that passed both filters.
    pub fn retained(&self) -> usize {
        self.processed - self.short - self.high_n
    }
}
