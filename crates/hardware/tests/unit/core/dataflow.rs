//! End-to-end dataflow through the full pipeline.

use pretty_assertions::assert_eq;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;
use tacsim_core::host::BaseAddrs;
use tacsim_core::isa::instruction::pack_uop;

/// Full round trip: operands and micro-ops through Load/Compute, results
/// through Store, checked in external memory.
#[test]
fn vector_mac_round_trip() {
    let base = BaseAddrs::default();
    let uops: Vec<u64> = (0..4).map(|i| pack_uop(i, i, i)).collect();
    let program = ProgramBuilder::new()
        .load_uop(0, 0, 4)
        .load_inp(0, 0, 4)
        .load_wgt(0, 0, 4)
        .push_next()
        .gemm(0, 4)
        .pop_prev()
        .push_prev()
        .alu(0, 0, 4, 0)
        .push_next()
        .store(0, 0, 4)
        .pop_prev()
        .push_prev()
        .finish()
        .pop_next()
        .build();

    let mut ctx = TestContext::new()
        .load_data(base.uop, &uops)
        .load_data(base.inp, &[1, 2, 3, 4])
        .load_data(base.wgt, &[5, 6, 7, 8])
        .launch_program(&program);
    let _ = ctx.run_to_finish();

    let out: Vec<u64> = (0..4).map(|i| ctx.core().mem().read_word(base.out + i)).collect();
    assert_eq!(out, vec![5, 12, 21, 32]);
}

/// The ALU immediate lands on every produced element.
#[test]
fn alu_immediate_offsets_results() {
    let base = BaseAddrs::default();
    let program = ProgramBuilder::new()
        .load_acc(0, 0, 3)
        .alu(0, 0, 3, -1)
        .push_next()
        .store(0, 0, 3)
        .pop_prev()
        .push_prev()
        .finish()
        .pop_next()
        .build();

    let mut ctx = TestContext::new()
        .load_data(base.acc, &[10, 20, 30])
        .launch_program(&program);
    let _ = ctx.run_to_finish();

    let out: Vec<u64> = (0..3).map(|i| ctx.core().mem().read_word(base.out + i)).collect();
    assert_eq!(out, vec![9, 19, 29]);
}

/// Store honors its word offset within the output window.
#[test]
fn store_respects_dram_offset() {
    let base = BaseAddrs::default();
    let program = ProgramBuilder::new()
        .load_acc(0, 0, 1)
        .alu(0, 0, 1, 0)
        .push_next()
        .store(0, 7, 1)
        .pop_prev()
        .finish()
        .build();

    let mut ctx = TestContext::new()
        .load_data(base.acc, &[42])
        .launch_program(&program);
    let _ = ctx.run_to_finish();

    assert_eq!(ctx.core().mem().read_word(base.out + 7), 42);
    assert_eq!(ctx.core().mem().read_word(base.out), 0);
}

/// An accumulator reload followed by gemm accumulates on top of it.
#[test]
fn acc_reload_seeds_accumulation() {
    let base = BaseAddrs::default();
    let program = ProgramBuilder::new()
        .load_acc(0, 0, 2)
        .load_uop(0, 0, 2)
        .load_inp(0, 0, 2)
        .load_wgt(0, 0, 2)
        .push_next()
        .gemm(0, 2)
        .pop_prev()
        .alu(0, 0, 2, 0)
        .push_next()
        .store(0, 0, 2)
        .pop_prev()
        .push_prev()
        .finish()
        .pop_next()
        .build();

    let uops: Vec<u64> = (0..2).map(|i| pack_uop(i, i, i)).collect();
    let mut ctx = TestContext::new()
        .load_data(base.acc, &[100, 200])
        .load_data(base.uop, &uops)
        .load_data(base.inp, &[1, 2])
        .load_data(base.wgt, &[3, 4])
        .launch_program(&program);
    let _ = ctx.run_to_finish();

    let out: Vec<u64> = (0..2).map(|i| ctx.core().mem().read_word(base.out + i)).collect();
    assert_eq!(out, vec![103, 208]);
}
