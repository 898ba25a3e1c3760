//! Passive micro-architectural observers grafted onto the architectural
//! core. Each subscribes to a subset of the instrumentation points the
//! executor emits per retired instruction (`on_read`, `on_write`,
//! `on_branch`, `on_indirect_jump`, `on_load`, `on_store`) and never
//! alters architectural state.

/// Static instruction-mix / cycle-count profiler (evolution 3).
pub mod profiler;

/// Pipelined-cycle accountant with forwarding and flush accounting
/// (evolution 4).
pub mod pipeline;

/// Set-associative write-back data cache simulator (evolution 5).
pub mod cache;

/// Direct-mapped branch target buffer (evolution 6).
pub mod btb;

/// Stride load-address predictor (evolution 6).
pub mod lap;

/// Load-value frequency histogram (evolution 6).
pub mod lvf;

/// A dependency-tracking slot: either an architectural register or the
/// paired HI/LO multiplier/divider result registers, treated as a single
/// distinct pseudo-register since MULT/DIV/MFHI/MFLO read and write them
/// as one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegSlot {
    Reg(u8),
    HiLo,
}
