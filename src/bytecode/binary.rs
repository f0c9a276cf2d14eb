/*!
  This module is responsible for decoding binary instructions.

*/
use std::convert::TryFrom;

use super::{Operation, Instruction};
use crate::error::VmError;

/// Decodes an opcode byte. Bytes that are not an `Operation` are illegal instructions.
pub fn try_decode_operation(opcode: u8) -> Result<Operation, VmError> {
  Operation::try_from(opcode).map_err(|e| VmError::IllegalInstruction(e.number))
}

/**
  Builds the instruction for `opcode` from the bytes that followed it in memory. It is the
  caller's responsibility to supply at least `opcode.operand_count()` operands; extra operands
  are ignored.
*/
pub fn decode_instruction(opcode: Operation, operands: &[u8]) -> Instruction {
  match opcode.operand_count() {
    0 => Instruction::Nullary(opcode),
    1 => Instruction::Unary { opcode, a: operands[0] },
    _ => Instruction::Binary { opcode, a: operands[0], b: operands[1] },
  }
}

/**
  Renders `program` as one line of assembly per instruction, prefixed with its address. Bytes
  that do not start a complete instruction, such as trailing data, are rendered as `.byte`.

  Decoding is linear, so data embedded between instructions is misread as code.
*/
pub fn disassemble(program: &[u8]) -> Vec<String> {
  let mut lines = Vec::new();
  let mut address = 0;

  while address < program.len() {
    let decoded = try_decode_operation(program[address]).ok().and_then(|opcode| {
      program
        .get(address + 1..address + opcode.width())
        .map(|operands| decode_instruction(opcode, operands))
    });

    match decoded {

      Some(instruction) => {
        lines.push(format!("{:02X}: {}", address, instruction));
        address += instruction.width();
      }

      None => {
        lines.push(format!("{:02X}: .byte {:#010b}", address, program[address]));
        address += 1;
      }

    }
  }

  lines
}
