//! Where `PRN` sends its values.

/// Receives the value of every `PRN`, in program order.
pub trait Output {
  fn emit(&mut self, value: u8);
}

/// Collects emitted values.
impl Output for Vec<u8> {
  fn emit(&mut self, value: u8) {
    self.push(value);
  }
}

/// Prints each emitted value in decimal on its own line of standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl Output for Console {
  fn emit(&mut self, value: u8) {
    println!("{}", value);
  }
}
