use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use ls8::bytecode::disassemble;
use ls8::loader::load_file;
use ls8::{Config, Console, Cpu, RunState};

/// Runs an LS-8 program.
#[derive(Parser, Debug)]
#[command(name = "ls8", version)]
struct Args {
  /// Program file: one binary byte per line, `#` starts a comment
  program: PathBuf,

  /// Abort after executing this many instructions
  #[arg(long)]
  max_steps: Option<u64>,

  /// Print a trace line to stderr before every instruction
  #[arg(long)]
  trace: bool,

  /// Print the disassembled program instead of running it
  #[arg(long)]
  disassemble: bool,

  /// Log at debug level unless `RUST_LOG` says otherwise
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let default_level = match args.verbose {
    true  => LevelFilter::DEBUG,
    false => LevelFilter::WARN
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
    )
    .with_writer(std::io::stderr)
    .init();

  #[cfg(feature = "trace_computation")]
  info!("Computation tracing ENABLED");

  let program = load_file(&args.program)
    .with_context(|| format!("failed to load {}", args.program.display()))?;

  if args.disassemble {
    for line in disassemble(&program) {
      println!("{}", line);
    }
    return Ok(());
  }

  let mut cpu = Cpu::with_config(Config { max_steps: args.max_steps });
  cpu.load(&program)?;

  let mut console = Console;
  let result = match args.trace {

    true  => {
      loop {
        eprintln!("{}", cpu.trace_line());
        match cpu.step(&mut console) {
          Ok(RunState::Halted) => break Ok(()),
          Ok(_)                => {}
          Err(fault)           => break Err(fault),
        }
      }
    }

    false => cpu.run(&mut console)

  };

  if let Err(fault) = result {
    eprintln!("{}", cpu.trace_line());
    if let Some(opcode) = fault.opcode {
      eprintln!("opcode at fault: {:#010b}", opcode);
    }
    return Err(fault).with_context(|| format!("{} did not run to completion", args.program.display()));
  }

  info!(executed = cpu.executed(), "program halted");
  Ok(())
}
