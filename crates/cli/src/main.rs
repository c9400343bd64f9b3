//! RV32IM functional emulator CLI.
//!
//! This binary is the process boundary around the emulator library. It
//! performs:
//! 1. **Argument handling:** A required image path plus optional JSON
//!    configuration, tracing, and statistics flags.
//! 2. **Setup:** Tracing subscriber, configuration, machine construction,
//!    and image loading — load failures are reported before any
//!    instruction executes.
//! 3. **Execution:** Drives the engine run loop and exits the process with
//!    the guest's exit code, or reports the fatal fault with a register
//!    dump and exits non-zero.

use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rv32emu_core::core::pipeline::Engine;
use rv32emu_core::core::MachineState;
use rv32emu_core::sim::loader;
use rv32emu_core::Config;

#[derive(Parser, Debug)]
#[command(
    name = "rv32emu",
    version,
    about = "RV32IM functional emulator",
    long_about = "Interpret a little-endian 32-bit RISC-V ELF image, one \
                  instruction per cycle, until the guest exits.\n\nExamples:\n  \
                  rv32emu program.elf\n  rv32emu program.elf --trace\n  \
                  rv32emu program.elf --config machine.json --stats"
)]
struct Cli {
    /// RV32 ELF image to execute.
    image: Option<String>,

    /// JSON configuration file (defaults apply to absent fields).
    #[arg(long)]
    config: Option<String>,

    /// Trace every pipeline stage to stderr.
    #[arg(long)]
    trace: bool,

    /// Print retired-instruction statistics after the run.
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    let Some(image) = cli.image else {
        eprintln!("Error: must provide an image path");
        eprintln!();
        eprintln!("  rv32emu <image> [--config <file>] [--trace] [--stats]");
        process::exit(1);
    };

    let mut config = match cli.config {
        Some(path) => load_config(&path),
        None => Config::default(),
    };
    if cli.trace {
        config.general.trace_instructions = true;
    }

    init_tracing(config.general.trace_instructions);

    let mut machine = MachineState::new(&config);
    if let Err(err) = loader::load_image(&mut machine, &image) {
        eprintln!("Error loading '{image}': {err}");
        process::exit(1);
    }

    let mut engine = Engine::new();
    match engine.run(&mut machine) {
        Ok(code) => {
            if cli.stats {
                engine.stats().print();
            }
            process::exit(code);
        }
        Err(err) => {
            eprintln!("\n[!] FATAL: {err}");
            machine.regs.dump();
            if cli.stats {
                engine.stats().print();
            }
            process::exit(1);
        }
    }
}

/// Reads and parses a JSON configuration file; exits the process on error.
fn load_config(path: &str) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Error reading config '{path}': {err}");
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|err| {
        eprintln!("Error parsing config '{path}': {err}");
        process::exit(1);
    })
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--trace` enables per-stage events
/// from the emulator library and the default shows warnings only.
fn init_tracing(trace_instructions: bool) {
    let fallback = if trace_instructions {
        "rv32emu_core=trace"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
