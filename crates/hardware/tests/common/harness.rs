use tacsim_core::Simulator;
use tacsim_core::config::Config;
use tacsim_core::core::{Core, CoreState};
use tacsim_core::host::{BaseAddrs, LaunchRequest};
use tacsim_core::isa::Instruction;
use tacsim_core::sim::loader;

/// Default cycle budget for `run_to_finish` in tests.
pub const TEST_BUDGET: u64 = 50_000;

/// Cycle-stamped stage edges recorded while running.
#[derive(Debug, Default)]
pub struct EdgeTrace {
    pub load_start: Vec<u64>,
    pub load_done: Vec<u64>,
    pub compute_start: Vec<u64>,
    pub compute_done: Vec<u64>,
    pub store_start: Vec<u64>,
    pub store_done: Vec<u64>,
}

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Self::fast_config())
    }

    pub fn with_config(config: Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let sim = Simulator::new(&config).expect("test config must elaborate");
        Self { sim }
    }

    /// Small memory and single-cycle latency: keeps test runs short without
    /// changing any protocol behavior.
    pub fn fast_config() -> Config {
        let mut config = Config::default();
        config.memory.size_words = 1 << 16;
        config.memory.latency = 1;
        config
    }

    /// Convenience accessor for the core.
    pub fn core(&self) -> &Core {
        &self.sim.core
    }

    /// Places a program image at the default instruction window.
    pub fn load_program(mut self, insns: &[Instruction]) -> Self {
        loader::load_program(self.sim.core.mem_mut(), BaseAddrs::default().insn, insns)
            .expect("program image must fit");
        self
    }

    /// Places a data image at the given word offset.
    pub fn load_data(mut self, base: u64, words: &[u64]) -> Self {
        loader::load_data(self.sim.core.mem_mut(), base, words).expect("data image must fit");
        self
    }

    /// Launches over the default windows with the given instruction count.
    pub fn launch(&mut self, insn_count: u32) {
        self.sim
            .launch(&LaunchRequest::with_count(insn_count))
            .expect("launch from idle");
    }

    /// Loads a program at the default windows and launches it.
    pub fn launch_program(mut self, insns: &[Instruction]) -> Self {
        self = self.load_program(insns);
        self.launch(insns.len() as u32);
        self
    }

    /// Runs for a fixed number of cycles.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.tick();
        }
    }

    /// Runs until the host-visible finish flag asserts; panics on stall.
    pub fn run_to_finish(&mut self) -> u64 {
        self.sim
            .run_to_finish(TEST_BUDGET)
            .expect("program must finish within the test budget")
    }

    /// Runs until finish (or the budget), recording stage edges by cycle.
    pub fn run_recording(&mut self, max_cycles: u64) -> EdgeTrace {
        let mut trace = EdgeTrace::default();
        for _ in 0..max_cycles {
            self.sim.tick();
            // The finish cycle advances no stage; stop before re-reading
            // pulses held over from the last running cycle.
            if self.sim.core.state() == CoreState::Done {
                break;
            }
            let cycle = self.sim.core.cycle();
            let (start, done) = self.sim.core.load_pulses();
            if start {
                trace.load_start.push(cycle);
            }
            if done {
                trace.load_done.push(cycle);
            }
            let (start, done) = self.sim.core.compute_pulses();
            if start {
                trace.compute_start.push(cycle);
            }
            if done {
                trace.compute_done.push(cycle);
            }
            let (start, done) = self.sim.core.store_pulses();
            if start {
                trace.store_start.push(cycle);
            }
            if done {
                trace.store_done.push(cycle);
            }
        }
        trace
    }
}
