//! Shared helpers for assembling a tiny MIPS program out of encoded
//! instruction words and running it to completion through the real
//! `Cpu::step` loop, the way the unit tests exercise individual
//! observers in isolation and these integration tests exercise the
//! whole fetch/decode/execute/observe pipeline together.

use std::io::Cursor;

use mips_sim::common::error::Fatal;
use mips_sim::config::Config;
use mips_sim::core::cpu::{Cpu, Step};
use mips_sim::core::memory::{Memory, TEXT_BASE};

pub const ZERO: u32 = 0;
pub const T0: u32 = 8;
pub const T1: u32 = 9;
pub const T2: u32 = 10;
pub const T3: u32 = 11;

const OPCODE_FUNCTION: u32 = 0x00;
pub const OPCODE_J: u32 = 0x02;
pub const OPCODE_BEQ: u32 = 0x04;
pub const OPCODE_BNE: u32 = 0x05;
pub const OPCODE_ADDIU: u32 = 0x09;
pub const OPCODE_LUI: u32 = 0x0f;
pub const OPCODE_LW: u32 = 0x23;
pub const OPCODE_SW: u32 = 0x2b;
const OPCODE_TRAP: u32 = 0x1a;

pub const FUNCT_SRA: u32 = 0x03;
pub const FUNCT_JR: u32 = 0x08;
pub const FUNCT_DIV: u32 = 0x1a;
pub const FUNCT_ADDU: u32 = 0x21;

pub const TRAP_NEWLINE: u32 = 0x0;
pub const TRAP_PRINT: u32 = 0x1;
pub const TRAP_STOP: u32 = 0xa;

/// Encodes an R-type instruction.
pub fn r_type(funct: u32, rs: u32, rt: u32, rd: u32, shamt: u32) -> u32 {
    (OPCODE_FUNCTION << 26) | (rs << 21) | (rt << 16) | (rd << 11) | (shamt << 6) | funct
}

/// Encodes an I-type instruction with a signed 16-bit immediate.
pub fn i_type(opcode: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

/// Encodes a TRAP instruction: `rs` feeds `PRINT`, `rt` receives
/// `PROMPT`'s result, and `code` selects which trap fires.
pub fn trap(rs: u32, rt: u32, code: u32) -> u32 {
    (OPCODE_TRAP << 26) | (rs << 21) | (rt << 16) | code
}

/// Encodes a branch instruction whose target is `offset_words`
/// instructions ahead of (or behind) the delay-free post-increment PC.
pub fn branch(opcode: u32, rs: u32, rt: u32, offset_words: i16) -> u32 {
    i_type(opcode, rs, rt, offset_words)
}

pub struct RunResult {
    pub stdout: String,
    pub cpu: Cpu,
    pub result: Result<(), Fatal>,
}

/// Assembles `instrs` as a flat instruction store at `TEXT_BASE` and
/// runs it to completion (clean `STOP` or the first fatal condition)
/// with empty stdin, using default geometry for every observer.
pub fn run(instrs: &[u32]) -> RunResult {
    run_with_config(instrs, Config::default())
}

pub fn run_with_config(instrs: &[u32], config: Config) -> RunResult {
    let memory = Memory::new(instrs.to_vec(), config.memsize);
    let mut cpu = Cpu::new(TEXT_BASE, memory, &config);

    let mut input = Cursor::new(&[][..]);
    let mut output: Vec<u8> = Vec::new();

    loop {
        match cpu.step(&mut input, &mut output) {
            Ok(Step::Continue) => continue,
            Ok(Step::Halted) => {
                return RunResult {
                    stdout: String::from_utf8(output).unwrap(),
                    cpu,
                    result: Ok(()),
                };
            }
            Err(err) => {
                return RunResult {
                    stdout: String::from_utf8(output).unwrap(),
                    cpu,
                    result: Err(err),
                };
            }
        }
    }
}
