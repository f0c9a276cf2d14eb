//! An `Either` type that holds the address of either a register or a memory cell, with some
//! convenience functions.

use std::ops::Add;
use std::fmt::{Display, Formatter};

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store. It is wider
// than the machine word so that out-of-range addresses can be represented and reported.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Address{
  /// An index into `RAM`.
  Memory(AddressNumberType),
  /// An index into the register file `R`.
  Register(AddressNumberType)
}

impl Address {
  /// Converts the address to an index into the corresponding store.
  pub fn idx(&self) -> AddressNumberType {
    match self{
      | Address::Memory(i)
      | Address::Register(i) => *i
    }
  }

}


impl Display for Address{
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{
      Address::Memory(i) => {
        write!(f, "RAM[{:#04x}]", i)
      },
      Address::Register(i) => {
        write!(f, "R{}", i)
      }
    }
  }
}

// Increment an address
impl Add<AddressNumberType> for Address{
  type Output = Address;
  fn add(self, rhs: AddressNumberType) -> Address{
    match self{
      Address::Memory(i) => {
        Address::Memory(i+rhs)
      },
      Address::Register(i) => {
        Address::Register(i+rhs)
      }
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_names_the_store() {
    assert_eq!(Address::Register(3).to_string(), "R3");
    assert_eq!(Address::Memory(0xF3).to_string(), "RAM[0xf3]");
  }

  #[test]
  fn addition_stays_in_the_same_store() {
    assert_eq!(Address::Memory(254) + 2, Address::Memory(256));
    assert_eq!(Address::Register(1) + 1, Address::Register(2));
  }
}
