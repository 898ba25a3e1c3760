//! Direct-mapped branch target buffer, consulted only on `JR`. Grounded
//! in `Project6/predict.c`'s `btb_table`/`btb_predict`.

pub const ENTRIES: usize = 16;

pub struct Btb {
    table: Vec<u32>,
    pub accesses: u64,
    pub hits: u64,
}

impl Btb {
    pub fn new() -> Self {
        Self::with_entries(ENTRIES)
    }

    pub fn with_entries(entries: usize) -> Self {
        Self {
            table: vec![0; entries],
            accesses: 0,
            hits: 0,
        }
    }

    fn index(&self, instr_pc: u32) -> usize {
        ((instr_pc >> 2) as usize) % self.table.len()
    }

    /// Checks the prediction for `instr_pc` against `actual_target`, then
    /// overwrites the entry. Must be called exactly once per `JR`.
    pub fn predict_and_update(&mut self, instr_pc: u32, actual_target: u32) {
        let index = self.index(instr_pc);
        self.accesses += 1;
        if self.table[index] == actual_target {
            self.hits += 1;
        }
        self.table[index] = actual_target;
    }

    pub fn print<W: std::io::Write>(&self, mut w: W) {
        writeln!(w).ok();
        writeln!(w, "BTB accesses: {}", self.accesses).ok();
        writeln!(w, "BTB hits: {}", self.hits).ok();
        writeln!(
            w,
            "BTB hit ratio: {:.3}%",
            100.0 * self.hits as f64 / self.accesses.max(1) as f64
        )
        .ok();
    }
}

impl Default for Btb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_access_to_an_entry_always_misses() {
        let mut btb = Btb::new();
        btb.predict_and_update(0x0040_0000, 0x0040_1000);
        assert_eq!(btb.hits, 0);
        assert_eq!(btb.accesses, 1);
    }

    #[test]
    fn stable_target_hits_on_repeat() {
        let mut btb = Btb::new();
        btb.predict_and_update(0x0040_0000, 0x0040_1000);
        btb.predict_and_update(0x0040_0000, 0x0040_1000);
        assert_eq!(btb.hits, 1);
        assert_eq!(btb.accesses, 2);
    }

    #[test]
    fn changing_target_misses() {
        let mut btb = Btb::new();
        btb.predict_and_update(0x0040_0000, 0x0040_1000);
        btb.predict_and_update(0x0040_0000, 0x0040_2000);
        assert_eq!(btb.hits, 0);
    }
}
