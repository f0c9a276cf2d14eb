//! An emulator for the LS-8, an 8-bit machine with eight registers, 256 bytes of memory and a
//! downward growing stack.
//!
//! ```
//! use ls8::{bytecode::parse_program, Cpu};
//!
//! let program = parse_program("10000010\n0\n1001\n01000111\n0\n1\n").unwrap();
//! let mut cpu = Cpu::new();
//! cpu.load(&program).unwrap();
//!
//! let mut out: Vec<u8> = Vec::new();
//! cpu.run(&mut out).unwrap();
//! assert_eq!(out, vec![9]);
//! ```

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod alu;
pub mod bytecode;
pub mod cpu;
pub mod error;
pub mod loader;
pub mod output;
pub mod state;

pub use cpu::{Config, Cpu, RunState};
pub use error::{Fault, LoadError, VmError};
pub use output::{Console, Output};
pub use state::{Flags, MachineState};
