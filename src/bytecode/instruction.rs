use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

/**
  Opcodes of the LS-8.

  The opcode byte is a small bit field, `AABCDDDD`:

  ```text
      AA    number of operand bytes that follow the opcode (0-2)
      B     1 if the operation is carried out by the ALU
      C     1 if the instruction sets the PC itself
      DDDD  instruction identifier
  ```

  Consequently the discriminants below are the machine encoding and must not be reordered or
  renumbered. The helpers `operand_count`, `is_alu` and `sets_pc` read the fields directly.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum Operation {
  // No operands //
  #[strum(serialize = "HLT")]
  Halt           = 0b0000_0001, // halt
  #[strum(serialize = "RET")]
  Return         = 0b0001_0001, // ret

  // One operand //
  #[strum(serialize = "PUSH")]
  Push           = 0b0100_0101, // push( register )
  #[strum(serialize = "POP")]
  Pop            = 0b0100_0110, // pop( register )
  #[strum(serialize = "PRN")]
  Print          = 0b0100_0111, // prn( register )
  #[strum(serialize = "CALL")]
  Call           = 0b0101_0000, // call( register )
  #[strum(serialize = "JMP")]
  Jump           = 0b0101_0100, // jmp( register )
  #[strum(serialize = "JEQ")]
  JumpIfEqual    = 0b0101_0101, // jeq( register )
  #[strum(serialize = "JNE")]
  JumpIfNotEqual = 0b0101_0110, // jne( register )

  // Two operands //
  #[strum(serialize = "LDI")]
  LoadImmediate  = 0b1000_0010, // ldi( register, immediate )
  #[strum(serialize = "ADD")]
  Add            = 0b1010_0000, // add( register, register )
  #[strum(serialize = "SUB")]
  Subtract       = 0b1010_0001, // sub( register, register )
  #[strum(serialize = "MUL")]
  Multiply       = 0b1010_0010, // mul( register, register )
  #[strum(serialize = "CMP")]
  Compare        = 0b1010_0111, // cmp( register, register )
  #[strum(serialize = "AND")]
  And            = 0b1010_1000, // and( register, register )
  #[strum(serialize = "OR")]
  Or             = 0b1010_1010, // or( register, register )
  #[strum(serialize = "XOR")]
  Xor            = 0b1010_1011, // xor( register, register )
}

const OPERAND_COUNT_SHIFT: u8 = 6;
const ALU_BIT: u8 = 0b0010_0000;
const SETS_PC_BIT: u8 = 0b0001_0000;

impl Operation{
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn mnemonic(&self) -> &'static str {
    (*self).into()
  }

  /// Number of operand bytes following the opcode.
  pub fn operand_count(&self) -> usize {
    (self.code() >> OPERAND_COUNT_SHIFT) as usize
  }

  /// Total size in bytes of the instruction, opcode included.
  pub fn width(&self) -> usize {
    self.operand_count() + 1
  }

  pub fn is_alu(&self) -> bool {
    self.code() & ALU_BIT != 0
  }

  pub fn sets_pc(&self) -> bool {
    self.code() & SETS_PC_BIT != 0
  }
}

/// Holds the decoded components of an instruction. As such, it enumerates the possible
/// operand combinations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:8][Operand:8][Operand:8]
  Binary {
    opcode: Operation,
    a: u8,
    b: u8
  },
  /// [OpCode:8][Operand:8]
  Unary {
    opcode: Operation,
    a: u8
  },
  /// [OpCode:8]
  Nullary(Operation),
}

impl Instruction {
  pub fn operation(&self) -> Operation {
    match self {
      | Instruction::Binary { opcode, .. }
      | Instruction::Unary { opcode, .. }
      | Instruction::Nullary(opcode) => *opcode
    }
  }

  pub fn width(&self) -> usize {
    self.operation().width()
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{

      Instruction::Binary{opcode: Operation::LoadImmediate, a, b} => {
        write!(f, "{} R{}, {}", Operation::LoadImmediate.mnemonic(), a, b)
      }

      Instruction::Binary{opcode, a, b} => {
        write!(f, "{} R{}, R{}", opcode.mnemonic(), a, b)
      }

      Instruction::Unary { opcode, a} => {
        write!(f, "{} R{}", opcode.mnemonic(), a)
      }

      Instruction::Nullary(opcode) => {
        write!(f, "{}", opcode.mnemonic())
      }

    }
  }
}
