//! Load-value frequency histogram: bumps a count for every distinct word
//! an `LW` loads, kept as a vector sorted descending by value so lookup
//! and insertion are a binary search plus a shift rather than a hash
//! table. The bookkeeping idiom (fixed capacity, fatal on overflow)
//! follows the cache and predictor tables in `Project5/cache.c` and
//! `Project6/predict.c`.

use crate::common::error::Fatal;

pub const CAPACITY: usize = 5200;

#[derive(Clone, Copy)]
struct Entry {
    value: u32,
    freq: u64,
}

pub struct LoadValueHistogram {
    entries: Vec<Entry>,
    capacity: usize,
}

impl LoadValueHistogram {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Records one loaded word. Values are kept sorted descending by
    /// value for binary search. A brand new value once the table is
    /// already at capacity is a fatal capacity overflow.
    pub fn record(&mut self, value: u32) -> Result<(), Fatal> {
        match self
            .entries
            .binary_search_by(|entry| entry.value.cmp(&value).reverse())
        {
            Ok(position) => {
                self.entries[position].freq += 1;
                Ok(())
            }
            Err(position) => {
                if self.entries.len() >= self.capacity {
                    return Err(Fatal::CapacityOverflow(
                        "load-value histogram capacity exceeded".to_string(),
                    ));
                }
                self.entries.insert(position, Entry { value, freq: 1 });
                Ok(())
            }
        }
    }

    pub fn unique_values(&self) -> usize {
        self.entries.len()
    }

    /// Re-sorts by frequency descending (ties broken by value descending,
    /// matching the insertion order's tie-break) and prints the top 10
    /// plus the total distinct-value count.
    pub fn print<W: std::io::Write>(&mut self, mut w: W) {
        self.entries
            .sort_by(|a, b| b.freq.cmp(&a.freq).then(b.value.cmp(&a.value)));

        writeln!(w).ok();
        writeln!(w, "top loaded values:").ok();
        for entry in self.entries.iter().take(10) {
            writeln!(w, "  0x{:08x}: {}", entry.value, entry.freq).ok();
        }
        writeln!(w, "distinct values loaded: {}", self.unique_values()).ok();
    }
}

impl Default for LoadValueHistogram {
    fn default() -> Self {
        Self::new()
    }
}
