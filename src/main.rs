//! CLI entry point for the MIPS-I micro-architectural simulator.
//!
//! Loads a binary image, builds the architectural core and its
//! observers from a (possibly absent) TOML config, runs the fetch/
//! decode/execute loop to completion, and prints the end-of-run report.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use mips_sim::common::error::Fatal;
use mips_sim::config::Config;
use mips_sim::core::cpu::{Cpu, Step};
use mips_sim::core::memory::Memory;
use mips_sim::sim::loader;

/// Command-line arguments for the simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "CS3339 MIPS Interpreter")]
struct Args {
    /// Flat binary image to run.
    binary: PathBuf,

    /// Optional TOML config file (memory size, cache geometry, predictor
    /// table sizes). Missing fields fall back to the standard defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force the per-instruction disassembly trace on, overriding the
    /// config file's `trace` setting.
    #[arg(long)]
    trace: bool,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            eprintln!("warning: could not parse config {}: {err}", path.display());
            Config::default()
        }),
        Err(err) => {
            eprintln!("warning: could not read config {}: {err}", path.display());
            Config::default()
        }
    }
}

fn main() {
    let args = Args::parse();
    let mut config = load_config(args.config.as_ref());
    if args.trace {
        config.trace = true;
    }

    let image = loader::load_binary(&args.binary).unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(1);
    });

    println!("CS3339 MIPS Interpreter");
    println!("running {}", args.binary.display());

    let memory = Memory::new(image.instructions, config.memsize);
    let mut cpu = Cpu::new(image.start, memory, &config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    loop {
        match cpu.step(&mut input, &mut output) {
            Ok(Step::Continue) => {}
            Ok(Step::Halted) => {
                output.flush().ok();
                cpu.print_reports(&mut output);
                process::exit(0);
            }
            Err(err @ Fatal::ArchTrap { .. }) => {
                output.flush().ok();
                eprintln!("{err}");
                cpu.print_reports(&mut output);
                process::exit(1);
            }
            Err(err) => {
                output.flush().ok();
                eprintln!("{err}");
                process::exit(1);
            }
        }
    }
}
