//! Dependency-token protocol safety.

use crate::common::builder::ProgramBuilder;
use crate::common::harness::{TEST_BUDGET, TestContext};
use tacsim_core::common::SimError;

#[test]
fn load_waits_for_compute_token_from_strictly_earlier_cycle() {
    // gemm posts the operand-buffer-reuse credit; the gated load must not
    // start before that post has propagated through the registered channel.
    let program = ProgramBuilder::new()
        .load_inp(0, 0, 2)
        .pop_next()
        .push_next()
        .gemm(0, 1)
        .push_prev()
        .finish()
        .pop_prev()
        .build();
    let mut ctx = TestContext::new().launch_program(&program);
    let trace = ctx.run_recording(TEST_BUDGET);
    assert!(ctx.core().finished());

    let gemm_done = trace.compute_done[0];
    let load_start = trace.load_start[0];
    // The credit is posted at retire (no earlier than done + 1) and is
    // registered, so the load can start no earlier than done + 2.
    assert!(
        load_start > gemm_done + 1,
        "load started at {load_start}, gemm done at {gemm_done}"
    );
}

#[test]
fn store_waits_for_result_token_from_strictly_earlier_cycle() {
    let program = ProgramBuilder::new()
        .alu(0, 0, 2, 0)
        .push_next()
        .store(0, 0, 2)
        .pop_prev()
        .push_prev()
        .finish()
        .pop_next()
        .build();
    let mut ctx = TestContext::new().launch_program(&program);
    let trace = ctx.run_recording(TEST_BUDGET);
    assert!(ctx.core().finished());

    let alu_done = trace.compute_done[0];
    let store_start = trace.store_start[0];
    assert!(
        store_start > alu_done + 1,
        "store started at {store_start}, alu done at {alu_done}"
    );
}

#[test]
fn compute_waits_for_operands_ready_token() {
    let program = ProgramBuilder::new()
        .load_inp(0, 0, 2)
        .push_next()
        .gemm(0, 1)
        .pop_prev()
        .finish()
        .build();
    let mut ctx = TestContext::new().launch_program(&program);
    let trace = ctx.run_recording(TEST_BUDGET);
    assert!(ctx.core().finished());

    let load_done = trace.load_done[0];
    // compute_start[0] is the gemm (the finish op pulses later).
    let gemm_start = trace.compute_start[0];
    assert!(
        gemm_start > load_done + 1,
        "gemm started at {gemm_start}, load done at {load_done}"
    );
}

#[test]
fn unsatisfied_token_stalls_forever() {
    // gemm pops an operands-ready credit nobody ever posts; the finish op
    // behind it in the same stream is never reached.
    let program = ProgramBuilder::new()
        .gemm(0, 1)
        .pop_prev()
        .finish()
        .build();
    let mut ctx = TestContext::new().load_program(&program);
    ctx.launch(program.len() as u32);
    let err = ctx.sim.run_to_finish(1_000).expect_err("program must stall");
    assert_eq!(err, SimError::CycleBudgetExhausted { cycles: 1_000 });
    assert!(!ctx.core().finished());
}

#[test]
fn gated_load_never_starts_without_token() {
    let program = ProgramBuilder::new()
        .load_inp(0, 0, 2)
        .pop_next()
        .finish()
        .build();
    let mut ctx = TestContext::new().launch_program(&program);
    let trace = ctx.run_recording(TEST_BUDGET);
    // The run finishes (the finish op has no dependencies), but the gated
    // load never observed a credit and never started.
    assert!(ctx.core().finished());
    assert!(trace.load_start.is_empty());
    assert_eq!(ctx.core().counters().insn_load, 0);
}
