//! The LS-8 dispatch engine: fetches the opcode at the PC, decodes it into an `Operation`, and
//! executes it against a `MachineState`.

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};
use strum_macros::Display as StrumDisplay;
use tracing::{debug, trace};

use crate::address::Address;
use crate::alu::alu;
use crate::bytecode::{decode_instruction, try_decode_operation, Instruction, Operation};
use crate::error::{Fault, LoadError, VmError};
use crate::output::Output;
use crate::state::{Flags, MachineState, MEMORY_SIZE, SP};

// Number of memory cells shown around the PC by `Display`.
const MEMORY_WINDOW: usize = 8;

#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug)]
pub enum RunState {
  Ready,
  Running,
  Halted
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
  /// Fault with `StepLimitExceeded` once this many instructions have executed. `None` lets a
  /// program run until it halts.
  pub max_steps: Option<u64>,
}

/// Where the PC goes after an instruction has executed.
enum Flow {
  /// Past the instruction, by its width.
  Advance,
  Jump(usize),
  Halt
}

pub struct Cpu {
  state     : MachineState,
  run_state : RunState,
  config    : Config,
  executed  : u64,          // Instructions retired since construction or `reset`
}

impl Default for Cpu {
  fn default() -> Self {
    Cpu::new()
  }
}

impl Cpu {

  // region Display methods

  fn make_register_table(
      name      : &str,
      cells     : &[u8],
      highlight : Option<usize>,
      start     : usize
    ) -> Table
  {

    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in cells.iter().enumerate() {
      let contents = format!("{:#04x} {:>3}", cell, cell);
      match Some(i) == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{}] =", name, i+start), contents]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{}] =", name, i+start), contents]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  /// One line summary of the machine: `TRACE: PC | RAM[PC] RAM[PC+1] RAM[PC+2] | R0 .. R7`.
  pub fn trace_line(&self) -> String {
    let pc  = self.state.pc();
    let ram = |offset: usize| self.state.ram_read(pc + offset).unwrap_or(0);

    let mut line = format!("TRACE: {:02X} | {:02X} {:02X} {:02X} |", pc, ram(0), ram(1), ram(2));
    for value in self.state.registers().iter() {
      line.push_str(&format!(" {:02X}", value));
    }
    line
  }

  // endregion

  pub fn new() -> Cpu {
    Cpu::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Cpu {
    Cpu {
      state     : MachineState::new(),
      run_state : RunState::Ready,
      config,
      executed  : 0,
    }
  }

  pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
    self.state.load(program)?;
    debug!(bytes = program.len(), "program loaded");
    Ok(())
  }

  /// Returns the machine to its freshly constructed state. The configuration is kept.
  pub fn reset(&mut self) {
    self.state.reset();
    self.run_state = RunState::Ready;
    self.executed  = 0;
  }

  pub fn state(&self) -> &MachineState {
    &self.state
  }

  pub fn state_mut(&mut self) -> &mut MachineState {
    &mut self.state
  }

  pub fn run_state(&self) -> RunState {
    self.run_state
  }

  pub fn executed(&self) -> u64 {
    self.executed
  }

  // region Execution

  /// Executes instructions until `HLT` or a fault. A halted machine returns immediately.
  pub fn run(&mut self, out: &mut dyn Output) -> Result<(), Fault> {
    loop {
      if self.step(out)? == RunState::Halted {
        return Ok(());
      }
    }
  }

  /**
    Executes the single instruction at the PC.

    On a fault the PC is left at the faulting instruction and the machine halts, so the state
    can be inspected but not run further.
  */
  pub fn step(&mut self, out: &mut dyn Output) -> Result<RunState, Fault> {
    if self.run_state == RunState::Halted {
      return Ok(RunState::Halted);
    }
    self.run_state = RunState::Running;

    let pc = self.state.pc();
    match self.execute(pc, out) {

      Ok((instruction, flow)) => {
        self.executed += 1;
        match flow {
          Flow::Advance      => self.state.set_pc(pc + instruction.width()),
          Flow::Jump(target) => {
            debug_assert!(instruction.operation().sets_pc(), "{} cannot redirect the PC", instruction);
            self.state.set_pc(target)
          }
          Flow::Halt         => {
            self.run_state = RunState::Halted;
            debug!(pc, executed = self.executed, "halted");
          }
        }

        trace!(pc, "{:<12} {}", instruction.to_string(), self.trace_line());
        #[cfg(feature = "trace_computation")] trace!("\n{}", self);

        Ok(self.run_state)
      }

      Err(source) => {
        self.run_state = RunState::Halted;
        let fault = Fault { pc, opcode: self.state.ram_read(pc).ok(), source };
        debug!(%fault, executed = self.executed, "run aborted");
        Err(fault)
      }

    }
  }

  fn execute(&mut self, pc: usize, out: &mut dyn Output) -> Result<(Instruction, Flow), VmError> {
    if let Some(limit) = self.config.max_steps {
      if self.executed >= limit {
        return Err(VmError::StepLimitExceeded(limit));
      }
    }

    // Fetch and decode
    let opcode = try_decode_operation(self.state.ram_read(pc)?)?;
    let mut operands = [0u8; 2];
    for (i, operand) in operands.iter_mut().take(opcode.operand_count()).enumerate() {
      *operand = self.state.value_at(Address::Memory(pc) + 1 + i)?;
    }
    let instruction = decode_instruction(opcode, &operands);

    let a = Address::Register(operands[0] as usize);
    let b = Address::Register(operands[1] as usize);

    // Execute
    let flow = match opcode {

      Operation::LoadImmediate => {
        self.state.set_value_at(a, operands[1])?;
        Flow::Advance
      }

      Operation::Print => {
        out.emit(self.state.value_at(a)?);
        Flow::Advance
      }

      Operation::Push => {
        let value = self.state.value_at(a)?;
        self.state.push(value)?;
        Flow::Advance
      }

      Operation::Pop => {
        // Validate the destination before the stack pointer moves.
        self.state.value_at(a)?;
        let value = self.state.pop()?;
        self.state.set_value_at(a, value)?;
        Flow::Advance
      }

      Operation::Call => {
        let target         = self.state.value_at(a)?;
        let return_address = pc + opcode.width();
        let return_address = u8::try_from(return_address)
                               .map_err(|_| VmError::InvalidAddress(return_address))?;
        self.state.push(return_address)?;
        Flow::Jump(target as usize)
      }

      Operation::Return => Flow::Jump(self.state.pop()? as usize),

      Operation::Jump => Flow::Jump(self.state.value_at(a)? as usize),

      Operation::JumpIfEqual => {
        self.branch_if(self.state.flags().contains(Flags::EQUAL), a)?
      }

      Operation::JumpIfNotEqual => {
        self.branch_if(!self.state.flags().contains(Flags::EQUAL), a)?
      }

      Operation::Compare => {
        let flags = match self.state.value_at(a)?.cmp(&self.state.value_at(b)?) {
          Ordering::Less    => Flags::LESS,
          Ordering::Greater => Flags::GREATER,
          Ordering::Equal   => Flags::EQUAL,
        };
        self.state.set_flags(flags);
        Flow::Advance
      }

      | Operation::Add
      | Operation::Subtract
      | Operation::Multiply
      | Operation::And
      | Operation::Or
      | Operation::Xor => {
        alu(&mut self.state, opcode, a.idx(), b.idx())?;
        Flow::Advance
      }

      Operation::Halt => Flow::Halt,

    };

    Ok((instruction, flow))
  }

  /// Jumps to the address held in `register` if `condition` holds. The register is read either
  /// way, so an invalid operand faults whether or not the branch is taken.
  fn branch_if(&self, condition: bool, register: Address) -> Result<Flow, VmError> {
    let target = self.state.value_at(register)?;
    match condition {
      true  => Ok(Flow::Jump(target as usize)),
      false => Ok(Flow::Advance)
    }
  }

  // endregion

}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Cpu {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let pc = self.state.pc();
    let sp = self.state.sp() as usize;
    let ram = self.state.ram();

    let r_table = Cpu::make_register_table("R", self.state.registers(), Some(SP), 0);

    let start   = pc.min(MEMORY_SIZE).saturating_sub(2);
    let end     = (start + MEMORY_WINDOW).min(MEMORY_SIZE);
    let m_table = Cpu::make_register_table("RAM", &ram[start..end], pc.checked_sub(start), start);

    // Top of the stack first. Empty when SP is at or above the stack base.
    let bottom  = (self.state.stack_base() as usize).max(sp);
    let s_table = Cpu::make_register_table("RAM", &ram[sp..bottom], Some(0), sp);

    let mut combined_table = table!([r_table, m_table, s_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Memory", ub->"Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(
      f,
      "State: {}\tFlags: {:?}\tExecuted: {}\n{}",
      self.run_state,
      self.state.flags(),
      self.executed,
      combined_table
    )
  }
}
