//! S4: a 100-iteration counted loop driven by `BNE`, checked against the
//! static profiler's own cost model end to end.

mod common;

use common::*;

#[test]
fn s4_counted_loop_matches_static_cycle_model() {
    const ITERATIONS: i16 = 100;

    let program = [
        i_type(OPCODE_ADDIU, ZERO, T0, ITERATIONS), // 0: t0 = 100
        i_type(OPCODE_ADDIU, T0, T0, -1),           // 1: loop: t0 -= 1
        branch(OPCODE_BNE, T0, ZERO, -2),           // 2: bne t0, zero, loop
        trap(0, 0, TRAP_STOP),                      // 3: stop
    ];

    let run = run(&program);
    assert!(run.result.is_ok());

    // init ADDIU + 100 * (ADDIU + BNE) + STOP
    let expected_retired = 1 + 100 * 2 + 1;
    assert_eq!(run.cpu.instructions_executed, expected_retired);

    // The branch is taken on every iteration except the last, when the
    // decremented counter finally reaches zero.
    let taken = ITERATIONS as u64 - 1;
    let addiu_cost = 1u64;
    let bne_cost = 1u64;
    let taken_penalty = 2u64;
    let trap_stop_cost = 3u64;

    let expected_cycles = (ITERATIONS as u64 + 1) * addiu_cost
        + ITERATIONS as u64 * bne_cost
        + taken * taken_penalty
        + trap_stop_cost;

    assert_eq!(run.cpu.profiler.cycles, expected_cycles);

    // Every ADDIU and BNE is I-type; TRAP is J-type; nothing is R-type.
    assert_eq!(run.cpu.profiler.i_type, ITERATIONS as u64 + 1 + ITERATIONS as u64);
    assert_eq!(run.cpu.profiler.j_type, 1);
    assert_eq!(run.cpu.profiler.r_type, 0);
}
