//! Counter monotonicity, reset, and freeze behavior.

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;
use tacsim_core::core::CoreState;
use tacsim_core::stats::EventCounters;

fn mac_program() -> Vec<tacsim_core::isa::Instruction> {
    ProgramBuilder::new()
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
        .build()
}

fn snapshot(counters: &EventCounters) -> [u64; 9] {
    [
        counters.cycles,
        counters.fetch_active,
        counters.load_active,
        counters.compute_active,
        counters.store_active,
        counters.acc_writes,
        counters.insn_load,
        counters.insn_compute,
        counters.insn_store,
    ]
}

#[test]
fn counters_are_monotonic_while_running() {
    let program = mac_program();
    let mut ctx = TestContext::new().launch_program(&program);
    let mut previous = snapshot(ctx.core().counters());
    for _ in 0..2_000 {
        ctx.sim.tick();
        let current = snapshot(ctx.core().counters());
        for (now, before) in current.iter().zip(previous.iter()) {
            assert!(now >= before, "counter decreased: {current:?} < {previous:?}");
        }
        previous = current;
        if ctx.core().state() == CoreState::Done {
            break;
        }
    }
    assert_eq!(ctx.core().state(), CoreState::Done);
}

#[test]
fn counters_freeze_after_finish() {
    let program = mac_program();
    let mut ctx = TestContext::new().launch_program(&program);
    let _ = ctx.run_to_finish();
    let at_finish = snapshot(ctx.core().counters());
    ctx.run(500);
    assert_eq!(snapshot(ctx.core().counters()), at_finish);
}

#[test]
fn counters_reset_at_relaunch() {
    let program = mac_program();
    let mut ctx = TestContext::new().launch_program(&program);
    let _ = ctx.run_to_finish();
    assert!(ctx.core().counters().cycles > 0);

    ctx.sim.core.ack_finish();
    ctx.launch(0);
    // Armed and zeroed before the first cycle of the new run.
    assert_eq!(snapshot(ctx.core().counters()), [0; 9]);
}

#[test]
fn acc_writes_count_gemm_micro_ops() {
    let program = ProgramBuilder::new().gemm(0, 5).finish().build();
    let mut ctx = TestContext::new().launch_program(&program);
    let _ = ctx.run_to_finish();
    assert_eq!(ctx.core().counters().acc_writes, 5);
}

#[test]
fn retired_instruction_mix_matches_program() {
    let program = mac_program();
    let mut ctx = TestContext::new().launch_program(&program);
    let _ = ctx.run_to_finish();
    let counters = ctx.core().counters();
    // load_uop goes to compute; load_inp and load_wgt to the load stage.
    assert_eq!(counters.insn_load, 2);
    assert_eq!(counters.insn_compute, 4);
    assert_eq!(counters.insn_store, 1);
    assert_eq!(counters.insns_retired(), program.len() as u64);
}
