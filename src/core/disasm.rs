//! Diagnostic disassembler. Pure function from `(pc, instr)` to a
//! mnemonic line, written to stderr only when tracing is enabled.
//! Mirrors the original `Decode` debug routine's table one-to-one.

use super::decode::Decoded;

const REGNAMES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
    "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8", "$t9",
    "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

pub fn disassemble(pc: u32, instr: u32) -> String {
    let d = Decoded::new(pc.wrapping_add(4), instr);
    let rs = REGNAMES[d.rs];
    let rt = REGNAMES[d.rt];
    let rd = REGNAMES[d.rd];

    let body = match d.opcode {
        0x00 => match d.funct {
            0x00 => format!("sll {rd}, {rs}, {}", d.shamt),
            0x03 => format!("sra {rd}, {rs}, {}", d.shamt),
            0x08 => format!("jr {rs}"),
            0x10 => format!("mfhi {rd}"),
            0x12 => format!("mflo {rd}"),
            0x18 => format!("mult {rs}, {rt}"),
            0x1a => format!("div {rs}, {rt}"),
            0x21 => format!("addu {rd}, {rs}, {rt}"),
            0x23 => format!("subu {rd}, {rs}, {rt}"),
            0x2a => format!("slt {rd}, {rs}, {rt}"),
            _ => "unimplemented".to_string(),
        },
        0x02 => format!("j {:x}", d.jaddr),
        0x03 => format!("jal {:x}", d.jaddr),
        0x04 => format!("beq {rs}, {rt}, {:x}", d.baddr),
        0x05 => format!("bne {rs}, {rt}, {:x}", d.baddr),
        0x09 => format!("addiu {rt}, {rs}, {}", d.simm),
        0x0c => format!("andi {rt}, {rs}, {}", d.uimm),
        0x0f => format!("lui {rt}, {}", d.simm),
        0x1a => format!("trap {:x}", d.addr),
        0x23 => format!("lw {rt}, {}({rs})", d.simm),
        0x2b => format!("sw {rt}, {}({rs})", d.simm),
        _ => "unimplemented".to_string(),
    };

    format!("{pc:8x}: {body}")
}
