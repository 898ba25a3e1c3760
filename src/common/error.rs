//! Closed set of fatal outcomes, covering the four error categories the
//! simulator recognizes: bad input, architectural traps, memory
//! protection violations, and observer capacity overflow.

use thiserror::Error;

/// A fatal condition that halts the simulator.
///
/// No error here is recoverable by the guest program; there is no in-band
/// error signaling back to the MIPS code being interpreted.
#[derive(Debug, Error)]
pub enum Fatal {
    /// Bad argv, file I/O failure, or a malformed binary header. Reported
    /// before any instruction executes.
    #[error("{0}")]
    InputError(String),

    /// An unimplemented instruction/trap or a division by zero. The
    /// run-end report is still printed, best-effort, after this fires.
    #[error("{message}: pc = {pc:#010x}")]
    ArchTrap { pc: u32, message: String },

    /// An out-of-range or misaligned memory access. The process aborts
    /// without printing a normal report.
    #[error("{0}")]
    MemoryProtection(String),

    /// The load-value histogram exceeded its bounded capacity.
    #[error("{0}")]
    CapacityOverflow(String),
}
