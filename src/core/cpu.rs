//! The architectural core: fetch/decode/execute loop plus the
//! instrumentation calls that feed every passive observer. Functional
//! correctness (register/memory state) and observation (cycle/hazard/
//! cache/predictor bookkeeping) are kept deliberately side by side here,
//! the way `Project4/cycles.c` and `Project5/cache.c` inline `RREAD`/
//! `RWRITE`/`CLOAD`/`CSTORE` calls directly into the same switch that
//! computes the architectural result.

use std::io::{BufRead, Write};

use crate::common::error::Fatal;
use crate::config::Config;
use crate::core::decode::Decoded;
use crate::core::disasm::disassemble;
use crate::core::memory::Memory;
use crate::core::regs::{RegisterFile, REG_RA};
use crate::observers::pipeline::{self, PipelineAccountant};
use crate::observers::{btb::Btb, cache::CacheSim, lap::LoadAddressPredictor};
use crate::observers::{lvf::LoadValueHistogram, profiler::Profiler, RegSlot};

const OPCODE_FUNCTION: u32 = 0x00;
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

const TRAP_NEWLINE: u32 = 0x00;
const TRAP_PRINT: u32 = 0x01;
const TRAP_PROMPT: u32 = 0x05;
const TRAP_STOP: u32 = 0x0a;

/// Whether the main loop should keep fetching.
pub enum Step {
    Continue,
    Halted,
}

pub struct Cpu {
    pub pc: u32,
    pub regs: RegisterFile,
    pub memory: Memory,
    pub profiler: Profiler,
    pub pipeline: PipelineAccountant,
    pub cache: CacheSim,
    pub btb: Btb,
    pub lap: LoadAddressPredictor,
    pub lvf: LoadValueHistogram,
    pub trace: bool,
    pub instructions_executed: u64,
}

impl Cpu {
    pub fn new(start: u32, memory: Memory, config: &Config) -> Self {
        Self {
            pc: start,
            regs: RegisterFile::new(crate::core::memory::DATA_BASE, config.memsize),
            memory,
            profiler: Profiler::new(),
            pipeline: PipelineAccountant::new(),
            cache: CacheSim::with_geometry(
                config.cache.associativity as u32,
                config.cache.block_size as u32,
                config.cache.sets as u32,
            ),
            btb: Btb::with_entries(config.predictors.btb_size),
            lap: LoadAddressPredictor::with_entries(config.predictors.lap_size),
            lvf: LoadValueHistogram::with_capacity(config.predictors.lvf_capacity),
            trace: config.trace,
            instructions_executed: 0,
        }
    }

    /// Executes exactly one instruction: fetch, decode, dispatch, and
    /// every observer hook that instruction triggers. Returns
    /// `Step::Halted` on a clean `STOP`; any other termination condition
    /// is a `Fatal` error.
    pub fn step<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step, Fatal> {
        let instr_pc = self.pc;
        let instr = self.memory.fetch(instr_pc)?;

        if self.trace {
            eprintln!("{}", disassemble(instr_pc, instr));
        }

        self.pc = self.pc.wrapping_add(4);
        self.regs.zero_reg0();

        self.profiler.begin_instruction();
        self.cache.on_retire();
        self.pipeline.advance();
        self.instructions_executed += 1;

        let d = Decoded::new(self.pc, instr);
        let mut branch_taken = false;

        macro_rules! reg_read {
            ($reg:expr, $stage:expr) => {{
                let slot = RegSlot::Reg($reg as u8);
                self.profiler.on_read(slot);
                self.pipeline.read($stage, slot);
            }};
        }
        macro_rules! reg_read_hilo {
            ($stage:expr) => {{
                self.profiler.on_read(RegSlot::HiLo);
                self.pipeline.read($stage, RegSlot::HiLo);
            }};
        }
        macro_rules! reg_write {
            ($reg:expr, $stage:expr) => {{
                let slot = RegSlot::Reg($reg as u8);
                self.profiler.on_write(slot);
                self.pipeline.write($stage, slot);
            }};
        }
        macro_rules! reg_write_hilo {
            ($stage:expr) => {{
                self.profiler.on_write(RegSlot::HiLo);
                self.pipeline.write($stage, RegSlot::HiLo);
            }};
        }

        match d.opcode {
            OPCODE_FUNCTION => match d.funct {
                FUNCT_SLL => {
                    reg_read!(d.rs, pipeline::EXE1);
                    let value = self.regs.read(d.rs) << d.shamt;
                    self.regs.write(d.rd, value);
                    reg_write!(d.rd, pipeline::MEM1);
                }
                FUNCT_SRA => {
                    reg_read!(d.rs, pipeline::EXE1);
                    let shifted = self.regs.read(d.rs) >> d.shamt;
                    let value = crate::common::bits::sign_extend(shifted, 32 - d.shamt);
                    self.regs.write(d.rd, value);
                    reg_write!(d.rd, pipeline::MEM1);
                }
                FUNCT_JR => {
                    reg_read!(d.rs, pipeline::ID);
                    let target = self.regs.read(d.rs);
                    self.btb.predict_and_update(instr_pc, target);
                    self.pc = target;
                    self.pipeline.flush();
                    self.pipeline.flush();
                }
                FUNCT_MFHI => {
                    reg_read_hilo!(pipeline::EXE1);
                    self.regs.write(d.rd, self.regs.hi);
                    reg_write!(d.rd, pipeline::EXE2);
                }
                FUNCT_MFLO => {
                    reg_read_hilo!(pipeline::EXE1);
                    self.regs.write(d.rd, self.regs.lo);
                    reg_write!(d.rd, pipeline::EXE2);
                }
                FUNCT_MULT => {
                    reg_read!(d.rs, pipeline::EXE1);
                    reg_read!(d.rt, pipeline::EXE1);
                    let wide = (self.regs.read(d.rs) as i32 as i64)
                        .wrapping_mul(self.regs.read(d.rt) as i32 as i64) as u64;
                    self.regs.lo = wide as u32;
                    self.regs.hi = (wide >> 32) as u32;
                    reg_write_hilo!(pipeline::WB);
                }
                FUNCT_DIV => {
                    reg_read!(d.rs, pipeline::EXE1);
                    reg_read!(d.rt, pipeline::EXE1);
                    let divisor = self.regs.read(d.rt) as i32;
                    if divisor == 0 {
                        return Err(Fatal::ArchTrap {
                            pc: instr_pc,
                            message: "division by zero".to_string(),
                        });
                    }
                    let dividend = self.regs.read(d.rs) as i32;
                    self.regs.lo = dividend.wrapping_div(divisor) as u32;
                    self.regs.hi = dividend.wrapping_rem(divisor) as u32;
                    reg_write_hilo!(pipeline::WB);
                }
                FUNCT_ADDU => {
                    reg_read!(d.rs, pipeline::EXE1);
                    reg_read!(d.rt, pipeline::EXE1);
                    let value = self.regs.read(d.rs).wrapping_add(self.regs.read(d.rt));
                    self.regs.write(d.rd, value);
                    reg_write!(d.rd, pipeline::MEM1);
                }
                FUNCT_SUBU => {
                    reg_read!(d.rs, pipeline::EXE1);
                    reg_read!(d.rt, pipeline::EXE1);
                    let value = self.regs.read(d.rs).wrapping_sub(self.regs.read(d.rt));
                    self.regs.write(d.rd, value);
                    reg_write!(d.rd, pipeline::MEM1);
                }
                FUNCT_SLT => {
                    reg_read!(d.rs, pipeline::EXE1);
                    reg_read!(d.rt, pipeline::EXE1);
                    let value = ((self.regs.read(d.rs) as i32) < (self.regs.read(d.rt) as i32))
                        as u32;
                    self.regs.write(d.rd, value);
                    reg_write!(d.rd, pipeline::MEM1);
                }
                _ => {
                    return Err(Fatal::ArchTrap {
                        pc: instr_pc,
                        message: "unimplemented instruction".to_string(),
                    })
                }
            },

            OPCODE_J => {
                self.pc = d.jaddr;
                self.pipeline.flush();
                self.pipeline.flush();
            }
            OPCODE_JAL => {
                self.regs.write(REG_RA, self.pc);
                reg_write!(REG_RA, pipeline::EXE1);
                self.pc = d.jaddr;
                self.pipeline.flush();
                self.pipeline.flush();
            }
            OPCODE_BEQ => {
                reg_read!(d.rs, pipeline::ID);
                reg_read!(d.rt, pipeline::ID);
                if self.regs.read(d.rs) == self.regs.read(d.rt) {
                    self.pc = d.baddr;
                    branch_taken = true;
                    self.pipeline.flush();
                    self.pipeline.flush();
                }
            }
            OPCODE_BNE => {
                reg_read!(d.rs, pipeline::ID);
                reg_read!(d.rt, pipeline::ID);
                if self.regs.read(d.rs) != self.regs.read(d.rt) {
                    self.pc = d.baddr;
                    branch_taken = true;
                    self.pipeline.flush();
                    self.pipeline.flush();
                }
            }
            OPCODE_ADDIU => {
                reg_read!(d.rs, pipeline::EXE1);
                let value = self.regs.read(d.rs).wrapping_add(d.simm as u32);
                self.regs.write(d.rt, value);
                reg_write!(d.rt, pipeline::MEM1);
            }
            OPCODE_ANDI => {
                reg_read!(d.rs, pipeline::EXE1);
                let value = self.regs.read(d.rs) & d.uimm;
                self.regs.write(d.rt, value);
                reg_write!(d.rt, pipeline::EXE2);
            }
            OPCODE_LUI => {
                let value = d.uimm << 16;
                self.regs.write(d.rt, value);
                reg_write!(d.rt, pipeline::EXE2);
            }
            OPCODE_TRAP => match d.addr & 0xf {
                TRAP_NEWLINE => {
                    writeln!(output).ok();
                }
                TRAP_PRINT => {
                    reg_read!(d.rs, pipeline::EXE1);
                    write!(output, " {}", self.regs.read(d.rs) as i32).ok();
                }
                TRAP_PROMPT => {
                    write!(output, "\n? ").ok();
                    output.flush().ok();
                    let mut line = String::new();
                    if input.read_line(&mut line).unwrap_or(0) == 0 {
                        return Err(Fatal::InputError(
                            "end of input while awaiting prompt".to_string(),
                        ));
                    }
                    let value: i32 = line.trim().parse().map_err(|_| {
                        Fatal::InputError("could not parse prompted integer".to_string())
                    })?;
                    self.regs.write(d.rt, value as u32);
                    reg_write!(d.rt, pipeline::MEM1);
                }
                TRAP_STOP => {
                    self.profiler.on_retire(d.opcode, d.funct, branch_taken);
                    return Ok(Step::Halted);
                }
                _ => {
                    return Err(Fatal::ArchTrap {
                        pc: instr_pc,
                        message: "unimplemented trap".to_string(),
                    })
                }
            },
            OPCODE_LW => {
                reg_read!(d.rs, pipeline::EXE1);
                let effective = self.regs.read(d.rs).wrapping_add(d.simm as u32);
                self.cache.cload(effective);
                self.lap.predict_and_update(instr_pc, effective);
                let value = self.memory.load_word(effective)?;
                self.lvf.record(value)?;
                self.regs.write(d.rt, value);
                reg_write!(d.rt, pipeline::WB);
            }
            OPCODE_SW => {
                reg_read!(d.rs, pipeline::EXE1);
                reg_read!(d.rt, pipeline::MEM1);
                let effective = self.regs.read(d.rs).wrapping_add(d.simm as u32);
                self.cache.cstore(effective);
                self.memory.store_word(self.regs.read(d.rt), effective)?;
            }

            _ => {
                return Err(Fatal::ArchTrap {
                    pc: instr_pc,
                    message: "unimplemented instruction".to_string(),
                })
            }
        }

        self.profiler.on_retire(d.opcode, d.funct, branch_taken);

        Ok(Step::Continue)
    }

    pub fn print_reports<W: Write>(&mut self, mut output: W) {
        writeln!(
            output,
            "\nprogram finished at pc = {:#010x}  ({} instructions executed)",
            self.pc, self.instructions_executed
        )
        .ok();
        self.profiler.print(&mut output);
        self.pipeline.print(&mut output);
        self.cache.print(&mut output);
        self.btb.print(&mut output);
        self.lap.print(&mut output);
        self.lvf.print(&mut output);
    }
}
