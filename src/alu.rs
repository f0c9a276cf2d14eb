//! The arithmetic/logic unit. Every operation reads registers `a` and `b` and writes the result,
//! truncated to 8 bits, back into `a`. The ALU never touches the flags or the PC.

use crate::bytecode::Operation;
use crate::error::VmError;
use crate::state::MachineState;

pub fn alu(state: &mut MachineState, op: Operation, reg_a: usize, reg_b: usize)
  -> Result<(), VmError>
{
  // Opcodes without the ALU bit are rejected before any operand is read.
  if !op.is_alu() {
    return Err(VmError::UnsupportedOperation(op));
  }
  let a = state.register(reg_a)?;
  let b = state.register(reg_b)?;
  let result = apply(op, a, b)?;
  state.set_register(reg_a, result)
}

fn apply(op: Operation, a: u8, b: u8) -> Result<u8, VmError> {
  match op {
    Operation::Add      => Ok(a.wrapping_add(b)),
    Operation::Subtract => Ok(a.wrapping_sub(b)),
    Operation::Multiply => Ok(a.wrapping_mul(b)),
    Operation::And      => Ok(a & b),
    Operation::Or       => Ok(a | b),
    Operation::Xor      => Ok(a ^ b),
    _                   => Err(VmError::UnsupportedOperation(op))
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  fn with_registers(r0: u8, r1: u8) -> MachineState {
    let mut state = MachineState::new();
    state.set_register(0, r0).unwrap();
    state.set_register(1, r1).unwrap();
    state
  }

  fn run(op: Operation, r0: u8, r1: u8) -> u8 {
    let mut state = with_registers(r0, r1);
    alu(&mut state, op, 0, 1).unwrap();
    assert_eq!(state.register(1), Ok(r1), "{} must not change register b", op);
    state.register(0).unwrap()
  }

  #[test]
  fn arithmetic() {
    assert_eq!(run(Operation::Add, 10, 3), 13);
    assert_eq!(run(Operation::Multiply, 10, 3), 30);
    assert_eq!(run(Operation::Subtract, 10, 3), 7);
  }

  #[test]
  fn arithmetic_wraps_to_eight_bits() {
    assert_eq!(run(Operation::Add, 250, 10), 4);
    assert_eq!(run(Operation::Subtract, 3, 10), 249);
    assert_eq!(run(Operation::Multiply, 16, 17), 16);
  }

  #[test]
  fn bitwise_truth_tables() {
    // Each pair covers all four input bit combinations.
    let (a, b) = (0b1100_1100, 0b1010_1010);
    assert_eq!(run(Operation::And, a, b), 0b1000_1000);
    assert_eq!(run(Operation::Or,  a, b), 0b1110_1110);
    assert_eq!(run(Operation::Xor, a, b), 0b0110_0110);

    assert_eq!(run(Operation::And, 0xFF, 0x0F), 0x0F);
    assert_eq!(run(Operation::Or,  0xF0, 0x0F), 0xFF);
    assert_eq!(run(Operation::Xor, 0xFF, 0xFF), 0x00);
  }

  #[test]
  fn same_register_on_both_sides() {
    let mut state = with_registers(10, 0);
    alu(&mut state, Operation::Add, 0, 0).unwrap();
    assert_eq!(state.register(0), Ok(20));
  }

  #[test]
  fn non_alu_operations_are_rejected() {
    for &op in [Operation::Compare, Operation::LoadImmediate, Operation::Halt].iter() {
      let mut state = with_registers(5, 5);
      assert_eq!(alu(&mut state, op, 0, 1), Err(VmError::UnsupportedOperation(op)));
      assert_eq!(state, with_registers(5, 5));
    }

    let mut state = MachineState::new();
    assert_eq!(
      alu(&mut state, Operation::Halt, 9, 0),
      Err(VmError::UnsupportedOperation(Operation::Halt))
    );
  }

  #[test]
  fn register_operands_are_range_checked() {
    let mut state = MachineState::new();
    assert_eq!(alu(&mut state, Operation::Add, 0, 9), Err(VmError::InvalidRegister(9)));
    assert_eq!(alu(&mut state, Operation::Add, 8, 0), Err(VmError::InvalidRegister(8)));
  }
}
