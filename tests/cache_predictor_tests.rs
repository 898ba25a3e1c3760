//! S5 (stride load-address predictor) and S6 (conflicting 4-way cache
//! set) end-to-end scenarios, driven through the real `Cpu::step` loop.

mod common;

use common::*;

fn stride_program(iterations: i16) -> Vec<u32> {
    vec![
        i_type(OPCODE_LUI, 0, T0, 0x1000),  // 0: t0 = 0x1000_0000
        i_type(OPCODE_ADDIU, ZERO, T1, iterations), // 1: t1 = iterations
        i_type(OPCODE_LW, T0, T2, 0),        // 2: loop: lw t2, 0(t0)
        i_type(OPCODE_ADDIU, T0, T0, 4),     // 3: t0 += 4
        i_type(OPCODE_ADDIU, T1, T1, -1),    // 4: t1 -= 1
        branch(OPCODE_BNE, T1, ZERO, -4),    // 5: bne t1, zero, loop
        trap(0, 0, TRAP_STOP),               // 6: stop
    ]
}

#[test]
fn s5_stride_pattern_hit_ratio_crosses_fifty_percent_by_third_access() {
    let run = run(&stride_program(3));
    assert!(run.result.is_ok());

    let lap = &run.cpu.lap;
    assert_eq!(lap.accesses, 2);
    assert!(
        lap.hits * 2 >= lap.accesses,
        "expected >=50% hit ratio, got {}/{}",
        lap.hits,
        lap.accesses
    );
}

#[test]
fn s5_stride_pattern_hit_ratio_exceeds_ninety_nine_percent_at_scale() {
    let run = run(&stride_program(1000));
    assert!(run.result.is_ok());

    let lap = &run.cpu.lap;
    assert!(
        lap.hits * 100 >= lap.accesses * 99,
        "expected >=99% hit ratio, got {}/{}",
        lap.hits,
        lap.accesses
    );
}

fn conflict_program(addresses: &[u32], repeats: u32) -> Vec<u32> {
    // Loads `addresses` (all mapping to the same cache set) in a cycle
    // `repeats` times, storing to each of them too so write-backs are
    // exercised, then stops.
    let mut program = Vec::new();
    for _ in 0..repeats {
        for &addr in addresses {
            // lui/addiu sequence to materialize the absolute address in $t0
            program.push(i_type(OPCODE_LUI, 0, T0, (addr >> 16) as i16));
            program.push(i_type(OPCODE_ADDIU, T0, T0, (addr & 0xffff) as i16));
            program.push(i_type(OPCODE_SW, T0, T1, 0));
        }
    }
    program.push(trap(0, 0, TRAP_STOP));
    program
}

#[test]
fn s6_four_way_conflict_set_misses_past_fourth_distinct_tag() {
    // Five addresses 0x200 (512) bytes apart, all within the data
    // segment. Since 512 = 2^9 and the default geometry's offset+index
    // span is only 9 bits (4 offset + 5 index), each one lands in the
    // same set (index 0) while its tag (bits 9 and up) is distinct.
    let addresses = [
        0x1000_0000u32,
        0x1000_0200,
        0x1000_0400,
        0x1000_0600,
        0x1000_0800,
    ];

    let run = run(&conflict_program(&addresses, 8));
    assert!(run.result.is_ok());

    let cache = &run.cpu.cache;
    // The first pass over 5 addresses in a 4-way set produces 4
    // compulsory misses plus a conflict miss on the fifth; later passes
    // keep colliding in the same set, so misses vastly outnumber the
    // initial fill and every eviction of a dirty line counts as a
    // write-back.
    assert_eq!(cache.stores, addresses.len() as u64 * 8);
    assert!(cache.store_misses > addresses.len() as u64);
    assert!(cache.write_backs > 0);
}
