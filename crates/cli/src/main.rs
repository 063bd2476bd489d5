//! Tensor-accelerator core simulator CLI.
//!
//! This binary provides a single entry point for running programs on the
//! simulated core. It performs:
//! 1. **Program run:** Load a JSON program description, launch, run to finish.
//! 2. **Demo run:** Execute a built-in vector multiply-accumulate program.
//!
//! Statistics are printed at finish; stage start/done edges go to the
//! diagnostic trace surface (enable with `--trace` or `RUST_LOG`).

use clap::{Parser, Subcommand};
use std::{fs, process};

use tacsim_core::config::Config;
use tacsim_core::host::BaseAddrs;
use tacsim_core::isa::{DepFlags, Region};
use tacsim_core::sim::Simulator;
use tacsim_core::sim::program::{DataSpec, InsnSpec, ProgramSpec, UopSpec};

#[derive(Parser, Debug)]
#[command(
    name = "tacsim",
    author,
    version,
    about = "Cycle-level tensor accelerator core simulator",
    long_about = "Run a JSON program description on the simulated execution core.\n\nExamples:\n  tacsim run -p programs/mac.json\n  tacsim run -p programs/mac.json --config config.json --trace\n  tacsim demo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON program description.
    Run {
        /// Program description file.
        #[arg(short, long)]
        program: String,

        /// Optional JSON configuration file (defaults otherwise).
        #[arg(short, long)]
        config: Option<String>,

        /// Emit stage start/done edges to stderr.
        #[arg(long)]
        trace: bool,

        /// Cycle budget before declaring the run stalled.
        #[arg(long, default_value_t = 1_000_000)]
        max_cycles: u64,

        /// Words of the output window to dump after finish.
        #[arg(long, default_value_t = 0)]
        dump_out: u64,
    },

    /// Run the built-in vector multiply-accumulate demo program.
    Demo {
        /// Emit stage start/done edges to stderr.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            program,
            config,
            trace,
            max_cycles,
            dump_out,
        } => cmd_run(&program, config.as_deref(), trace, max_cycles, dump_out),
        Commands::Demo { trace } => {
            cmd_run_spec(&demo_spec(), Config::default(), trace, 100_000, 4);
        }
    }
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        tracing_subscriber::EnvFilter::new("tacsim=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read file '{}': {}", path, e);
        process::exit(1);
    })
}

/// Runs a program description file: parse, launch, loop until finish.
fn cmd_run(
    program_path: &str,
    config_path: Option<&str>,
    trace: bool,
    max_cycles: u64,
    dump_out: u64,
) {
    let config: Config = config_path.map_or_else(Config::default, |path| {
        serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: Bad configuration '{}': {}", path, e);
            process::exit(1);
        })
    });

    let spec = ProgramSpec::from_json(&read_file(program_path)).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Bad program '{}': {}", program_path, e);
        process::exit(1);
    });

    cmd_run_spec(&spec, config, trace, max_cycles, dump_out);
}

fn cmd_run_spec(
    spec: &ProgramSpec,
    mut config: Config,
    trace: bool,
    max_cycles: u64,
    dump_out: u64,
) {
    init_tracing(trace);
    config.general.trace_edges = config.general.trace_edges || trace;

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Configuration rejected: {}", e);
        process::exit(1);
    });

    if let Err(e) = sim.launch_program(spec) {
        eprintln!("[!] FATAL: Launch failed: {}", e);
        process::exit(1);
    }

    match sim.run_to_finish(max_cycles) {
        Ok(cycles) => {
            println!("Finished in {} cycles.", cycles);
            sim.core.counters().print();
            if dump_out > 0 {
                println!("\nOUTPUT WINDOW");
                for i in 0..dump_out {
                    let addr = spec.base.out + i;
                    println!("  out[{:<4}] = {}", i, sim.core.mem().read_word(addr));
                }
            }
        }
        Err(e) => {
            eprintln!("[!] Run failed: {}", e);
            sim.core.counters().print();
            process::exit(1);
        }
    }
}

/// Built-in demo: a 4-element vector multiply-accumulate.
///
/// Loads operands and micro-ops, accumulates `inp[i] * wgt[i]`, produces
/// the result window, stores it, and finishes once the store has drained.
fn demo_spec() -> ProgramSpec {
    let none = DepFlags::default();
    ProgramSpec {
        base: BaseAddrs::default(),
        data: DataSpec {
            uop: (0..4).map(|i| UopSpec { acc: i, inp: i, wgt: i }).collect(),
            inp: vec![1, 2, 3, 4],
            wgt: vec![5, 6, 7, 8],
            acc: Vec::new(),
        },
        insns: vec![
            InsnSpec::Load { region: Region::Uop, sram: 0, dram: 0, len: 4, deps: none },
            InsnSpec::Load { region: Region::Inp, sram: 0, dram: 0, len: 4, deps: none },
            InsnSpec::Load {
                region: Region::Wgt,
                sram: 0,
                dram: 0,
                len: 4,
                deps: DepFlags { push_next: true, ..none },
            },
            InsnSpec::Gemm {
                uop_base: 0,
                uops: 4,
                deps: DepFlags { pop_prev: true, push_prev: true, ..none },
            },
            InsnSpec::Alu {
                dst: 0,
                src: 0,
                len: 4,
                imm: 0,
                deps: DepFlags { push_next: true, ..none },
            },
            InsnSpec::Store {
                sram: 0,
                dram: 0,
                len: 4,
                deps: DepFlags { pop_prev: true, push_prev: true, ..none },
            },
            InsnSpec::Finish { deps: DepFlags { pop_next: true, ..none } },
        ],
    }
}
