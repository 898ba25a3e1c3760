//! Stride load-address predictor, consulted only on `LW`. Each entry
//! remembers the last two addresses seen at that PC and predicts the
//! next one continues the stride between them. Grounded in the BTB's
//! shape from `Project6/predict.c`, generalized to a two-deep stride
//! history indexed by PC the same way the branch predictor is.

pub const ENTRIES: usize = 16;

#[derive(Clone, Copy, Default)]
struct Entry {
    last: u32,
    second_last: u32,
    seen: bool,
}

pub struct LoadAddressPredictor {
    table: Vec<Entry>,
    pub accesses: u64,
    pub hits: u64,
}

impl LoadAddressPredictor {
    pub fn new() -> Self {
        Self::with_entries(ENTRIES)
    }

    pub fn with_entries(entries: usize) -> Self {
        Self {
            table: vec![Entry::default(); entries],
            accesses: 0,
            hits: 0,
        }
    }

    fn index(&self, instr_pc: u32) -> usize {
        ((instr_pc >> 2) as usize) % self.table.len()
    }

    /// Checks the stride prediction for `instr_pc` against the actual
    /// address just computed, then records it. Must be called exactly
    /// once per `LW`. The very first reference to a given `instr_pc` has
    /// no prior entry to consult and is not counted as an access at all
    /// — only from the second reference on is there anything for the
    /// table to have predicted.
    pub fn predict_and_update(&mut self, instr_pc: u32, actual: u32) {
        let index = self.index(instr_pc);
        let entry = &mut self.table[index];

        if entry.seen {
            self.accesses += 1;
            let predicted = entry.last.wrapping_add(entry.last.wrapping_sub(entry.second_last));
            if predicted == actual {
                self.hits += 1;
            }
        }

        entry.second_last = entry.last;
        entry.last = actual;
        entry.seen = true;
    }

    pub fn print<W: std::io::Write>(&self, mut w: W) {
        writeln!(w).ok();
        writeln!(w, "LAP accesses: {}", self.accesses).ok();
        writeln!(w, "LAP hits: {}", self.hits).ok();
        writeln!(
            w,
            "LAP hit ratio: {:.3}%",
            100.0 * self.hits as f64 / self.accesses.max(1) as f64
        )
        .ok();
    }
}

impl Default for LoadAddressPredictor {
    fn default() -> Self {
        Self::new()
    }
}
