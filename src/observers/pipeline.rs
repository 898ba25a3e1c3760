//! Pipelined-cycle accountant. The executor runs every instruction
//! atomically; this observer shadows it with the dependency bookkeeping a
//! real 9-stage in-order pipeline would need, and reports the cycle count
//! (including fill/drain), bubble count, and flush count that pipeline
//! would have produced. Grounded in `Project4/cycles.c`'s
//! `ADVANCE_PIPELINE`/`RREAD`/`RWRITE`/`FLUSH`/`BUBBLE` closures.

use super::RegSlot;

pub const IF1: usize = 0;
pub const IF2: usize = 1;
pub const ID: usize = 2;
pub const EXE1: usize = 3;
pub const EXE2: usize = 4;
pub const MEM1: usize = 5;
pub const MEM2: usize = 6;
pub const MEM3: usize = 7;
pub const WB: usize = 8;
pub const STAGES: usize = 9;

pub struct PipelineAccountant {
    dest_reg: [Option<RegSlot>; STAGES],
    result_stage: [usize; STAGES],

    pub cycles: u64,
    pub bubbles: u64,
    pub flushes: u64,
}

impl PipelineAccountant {
    /// Builds the accountant and fills the pipeline with `STAGES - 1`
    /// advances, so `cycles` ends up counting fill and drain along with
    /// useful work.
    pub fn new() -> Self {
        let mut accountant = Self {
            dest_reg: [None; STAGES],
            result_stage: [0; STAGES],
            cycles: 0,
            bubbles: 0,
            flushes: 0,
        };
        for _ in 0..STAGES - 1 {
            accountant.advance();
        }
        accountant
    }

    /// Shifts both tracking arrays one position toward older stages and
    /// counts a clock. Index 0 (`IF1`) is never written directly by
    /// `write` — only by this shift — so it (and the `IF2` slot it feeds)
    /// stay at their initial "no pending write" value for the life of
    /// the run, which is exactly the behavior needed for instructions
    /// that declare no write at all.
    fn advance(&mut self) {
        for i in (1..STAGES).rev() {
            self.dest_reg[i] = self.dest_reg[i - 1];
            self.result_stage[i] = self.result_stage[i - 1];
        }
        self.cycles += 1;
    }

    /// A control-flow flush: advances the pipeline and counts it as a
    /// flush rather than useful throughput.
    pub fn flush(&mut self) {
        self.advance();
        self.flushes += 1;
    }

    fn bubble(&mut self) {
        self.advance();
        self.bubbles += 1;
    }

    /// Declares that the in-flight instruction reads `reg` at stage
    /// `consume_stage`. Reads of `$zero` are free. If an older
    /// in-flight instruction will produce `reg` too late, bubbles are
    /// inserted until forwarding can satisfy the read.
    pub fn read(&mut self, consume_stage: usize, reg: RegSlot) {
        if reg == RegSlot::Reg(0) {
            return;
        }
        for writer in (ID + 1)..STAGES {
            if self.dest_reg[writer] == Some(reg) {
                let mut available = self.result_stage[writer] as i32 - writer as i32;
                let needed = consume_stage as i32 - ID as i32;
                while available > needed {
                    self.bubble();
                    available -= 1;
                }
                break;
            }
        }
    }

    /// Declares that the in-flight instruction writes `reg`, with the
    /// value first forwardable at `produce_stage`.
    pub fn write(&mut self, produce_stage: usize, reg: RegSlot) {
        self.dest_reg[ID] = Some(reg);
        self.result_stage[ID] = produce_stage;
    }

    pub fn print<W: std::io::Write>(&self, mut w: W) {
        writeln!(w).ok();
        writeln!(w, "cycles = {}", self.cycles).ok();
        writeln!(w, "bubbles = {}", self.bubbles).ok();
        writeln!(w, "flushes = {}", self.flushes).ok();
    }
}

impl Default for PipelineAccountant {
    fn default() -> Self {
        Self::new()
    }
}
