//! The architectural state of an LS-8: register file, memory, flags and program counter.

use bitflags::bitflags;

use crate::address::{Address, AddressNumberType};
use crate::error::{LoadError, VmError};

pub const REGISTER_COUNT: usize = 8;
pub const MEMORY_SIZE: usize = 256;
/// Index of the register holding the stack pointer.
pub const SP: usize = 7;
/// Initial stack pointer. The stack grows down from here.
pub const STACK_TOP: u8 = 0xF4;

bitflags! {
  /// Outcome of the most recent `CMP`. At most one bit is ever set.
  #[derive(Default)]
  pub struct Flags: u8 {
    const EQUAL   = 0b0000_0001;
    const GREATER = 0b0000_0010;
    const LESS    = 0b0000_0100;
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MachineState {

  // Memory Store
  ram: [u8; MEMORY_SIZE],

  // Registers //
  registers : [u8; REGISTER_COUNT], // R0-R7, R7 is the stack pointer
  flags     : Flags,
  pc        : usize,                // Program counter, a cursor into `ram`

  // Length of the loaded program, which is the floor of the stack.
  program_len: usize,
  // Highest address the stack pointer has been set to. The stack is empty when SP reaches it.
  stack_base: u8,
}

impl Default for MachineState {
  fn default() -> Self {
    MachineState::new()
  }
}

impl MachineState {

  pub fn new() -> MachineState {
    let mut registers = [0; REGISTER_COUNT];
    registers[SP] = STACK_TOP;

    MachineState {
      ram         : [0; MEMORY_SIZE],
      registers,
      flags       : Flags::empty(),
      pc          : 0,
      program_len : 0,
      stack_base  : STACK_TOP,
    }
  }

  /// Restores the state `new` produces, discarding any loaded program.
  pub fn reset(&mut self) {
    *self = MachineState::new();
  }

  /// Copies `program` into memory starting at address 0.
  pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
    if program.len() > MEMORY_SIZE {
      return Err(LoadError::ProgramTooLarge { len: program.len() });
    }
    self.ram[..program.len()].copy_from_slice(program);
    self.program_len = program.len();
    Ok(())
  }

  // region Accessors

  pub fn register(&self, index: usize) -> Result<u8, VmError> {
    self.registers.get(index).copied().ok_or(VmError::InvalidRegister(index))
  }

  pub fn set_register(&mut self, index: usize, value: u8) -> Result<(), VmError> {
    let register = self.registers.get_mut(index).ok_or(VmError::InvalidRegister(index))?;
    *register = value;
    if index == SP {
      self.stack_base = self.stack_base.max(value);
    }
    Ok(())
  }

  pub fn ram_read(&self, address: AddressNumberType) -> Result<u8, VmError> {
    self.ram.get(address).copied().ok_or(VmError::InvalidAddress(address))
  }

  pub fn ram_write(&mut self, address: AddressNumberType, value: u8) -> Result<(), VmError> {
    let cell = self.ram.get_mut(address).ok_or(VmError::InvalidAddress(address))?;
    *cell = value;
    Ok(())
  }

  /// Reads whichever store `address` points into.
  pub fn value_at(&self, address: Address) -> Result<u8, VmError> {
    match address {
      Address::Register(i) => self.register(i),
      Address::Memory(i)   => self.ram_read(i)
    }
  }

  pub fn set_value_at(&mut self, address: Address, value: u8) -> Result<(), VmError> {
    match address {
      Address::Register(i) => self.set_register(i, value),
      Address::Memory(i)   => self.ram_write(i, value)
    }
  }

  pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
    &self.registers
  }

  pub fn ram(&self) -> &[u8; MEMORY_SIZE] {
    &self.ram
  }

  pub fn flags(&self) -> Flags {
    self.flags
  }

  pub fn set_flags(&mut self, flags: Flags) {
    self.flags = flags;
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn set_pc(&mut self, pc: usize) {
    self.pc = pc;
  }

  pub fn sp(&self) -> u8 {
    self.registers[SP]
  }

  pub fn program_len(&self) -> usize {
    self.program_len
  }

  /// Address one past the bottom of the stack: `STACK_TOP`, or higher if a program has moved
  /// the stack pointer above it.
  pub fn stack_base(&self) -> u8 {
    self.stack_base
  }

  // endregion

  // region Stack

  /**
    Decrements the stack pointer and stores `value` at the new top of the stack.

    The stack may not grow into the loaded program, nor below address 0.
  */
  pub fn push(&mut self, value: u8) -> Result<(), VmError> {
    let sp = self.sp();
    match sp.checked_sub(1) {

      Some(top) if top as usize >= self.program_len => {
        self.ram[top as usize] = value;
        self.registers[SP] = top;
        Ok(())
      }

      _ => Err(VmError::StackOverflow { sp })

    }
  }

  /**
    Reads the top of the stack and increments the stack pointer. Fails on an empty stack, that
    is once SP has climbed back to `stack_base`.

    Writing SP through `set_register` raises `stack_base` when the new value lies above it, so
    a relocated stack pops everything it pushed. Since `stack_base` never exceeds `0xFF`, the
    increment cannot wrap.
  */
  pub fn pop(&mut self) -> Result<u8, VmError> {
    let sp = self.sp();
    if sp >= self.stack_base {
      return Err(VmError::StackUnderflow { sp });
    }
    let value = self.ram[sp as usize];
    self.registers[SP] = sp + 1;
    Ok(value)
  }

  // endregion

}
