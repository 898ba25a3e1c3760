//! Static instruction-type mix, static cycle-count model, `$zero`-read
//! counter, and the 1/2/3-instruction-ahead producer/consumer distance
//! histogram. Grounded in `Project3/stats.c`'s `itype`/`icycles`/`fcycles`
//! tables and its `RREAD`/`RWRITE`/`UPDATE_WREC` macros.

use super::RegSlot;

const OPCODE_J: u32 = 0x02;
const OPCODE_JAL: u32 = 0x03;
const OPCODE_BEQ: u32 = 0x04;
const OPCODE_BNE: u32 = 0x05;
const OPCODE_ADDIU: u32 = 0x09;
const OPCODE_ANDI: u32 = 0x0c;
const OPCODE_LUI: u32 = 0x0f;
const OPCODE_TRAP: u32 = 0x1a;
const OPCODE_LW: u32 = 0x23;
const OPCODE_SW: u32 = 0x2b;

const FUNCT_SLL: u32 = 0x00;
const FUNCT_SRA: u32 = 0x03;
const FUNCT_JR: u32 = 0x08;
const FUNCT_MFHI: u32 = 0x10;
const FUNCT_MFLO: u32 = 0x12;
const FUNCT_MULT: u32 = 0x18;
const FUNCT_DIV: u32 = 0x1a;
const FUNCT_ADDU: u32 = 0x21;
const FUNCT_SUBU: u32 = 0x23;
const FUNCT_SLT: u32 = 0x2a;

/// Static cycle cost of an I/J-type opcode, excluding the taken-branch
/// penalty (applied separately by the caller).
fn opcode_cycles(opcode: u32) -> u32 {
    match opcode {
        OPCODE_J | OPCODE_JAL => 2,
        OPCODE_BEQ | OPCODE_BNE => 1,
        OPCODE_ADDIU | OPCODE_ANDI | OPCODE_LUI => 1,
        OPCODE_TRAP => 3,
        OPCODE_LW | OPCODE_SW => 8,
        _ => 0,
    }
}

/// Static cycle cost of an R-type function code.
fn funct_cycles(funct: u32) -> u32 {
    match funct {
        FUNCT_SLL | FUNCT_SRA | FUNCT_JR => 2,
        FUNCT_MFHI | FUNCT_MFLO => 3,
        FUNCT_MULT | FUNCT_DIV => 32,
        FUNCT_ADDU | FUNCT_SUBU | FUNCT_SLT => 1,
        _ => 0,
    }
}

/// The taken-branch penalty: +2 cycles for the re-fetch and re-decode
/// a taken branch forces.
const TAKEN_BRANCH_PENALTY: u32 = 2;

#[derive(Default)]
pub struct Profiler {
    pub r_type: u64,
    pub i_type: u64,
    pub j_type: u64,

    pub zero_reads: u64,
    pub cycles: u64,

    pub one_ago: u64,
    pub two_ago: u64,
    pub three_ago: u64,

    write_record: [Option<RegSlot>; 4],
    instructions: u64,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the write-record ring. Must be called exactly once per
    /// instruction, before any `on_read`/`on_write` for that instruction.
    pub fn begin_instruction(&mut self) {
        self.write_record[3] = self.write_record[2];
        self.write_record[2] = self.write_record[1];
        self.write_record[1] = self.write_record[0];
        self.write_record[0] = None;
        self.instructions += 1;
    }

    /// Records a register/HILO read. `$zero` reads are tallied
    /// separately and never counted as a dependency. Among the last
    /// three writers, the most recent match wins.
    pub fn on_read(&mut self, reg: RegSlot) {
        if reg == RegSlot::Reg(0) {
            self.zero_reads += 1;
            return;
        }
        if self.write_record[1] == Some(reg) {
            self.one_ago += 1;
        } else if self.write_record[2] == Some(reg) {
            self.two_ago += 1;
        } else if self.write_record[3] == Some(reg) {
            self.three_ago += 1;
        }
    }

    /// Records a register/HILO write for the in-flight instruction.
    pub fn on_write(&mut self, reg: RegSlot) {
        self.write_record[0] = Some(reg);
    }

    /// Called once per retired instruction with its opcode/funct and
    /// whether a BEQ/BNE branch was taken.
    pub fn on_retire(&mut self, opcode: u32, funct: u32, branch_taken: bool) {
        match opcode {
            0x00 => self.r_type += 1,
            OPCODE_J | OPCODE_JAL | OPCODE_TRAP => self.j_type += 1,
            _ => self.i_type += 1,
        }

        self.cycles += if opcode == 0x00 {
            funct_cycles(funct)
        } else {
            opcode_cycles(opcode)
        };

        if branch_taken {
            self.cycles += TAKEN_BRANCH_PENALTY;
        }
    }

    pub fn print<W: std::io::Write>(&self, mut w: W) {
        let total = self.instructions.max(1) as f64;
        writeln!(w).ok();
        writeln!(w, "I-type: {:.1}%", 100.0 * self.i_type as f64 / total).ok();
        writeln!(w, "J-type: {:.1}%", 100.0 * self.j_type as f64 / total).ok();
        writeln!(w, "R-type: {:.1}%", 100.0 * self.r_type as f64 / total).ok();
        writeln!(
            w,
            "$zero reads per instruction: {:.1}%",
            100.0 * self.zero_reads as f64 / total
        )
        .ok();
        writeln!(w, "cycles: {}", self.cycles).ok();
        writeln!(
            w,
            "number of inputs produced 1 instructions ahead: {}",
            self.one_ago
        )
        .ok();
        writeln!(
            w,
            "number of inputs produced 2 instructions ahead: {}",
            self.two_ago
        )
        .ok();
        writeln!(
            w,
            "number of inputs produced 3 instructions ahead: {}",
            self.three_ago
        )
        .ok();
    }
}
