/*!

  LS-8 programs are plain byte strings. Every instruction is an opcode byte followed by zero,
  one or two operand bytes, and the opcode itself says how many operands follow (see
  `Operation`). Operands are register indices, except the second operand of `LDI`, which is an
  immediate value.

  Only the opcode is represented as an enum. Operands are decoded on demand into an
  `Instruction` when the opcode has been fetched, so memory holds nothing but bytes and a
  program may freely treat its own code as data.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::parse_program;
pub use binary::{decode_instruction, disassemble, try_decode_operation};
pub use instruction::{Instruction, Operation};
