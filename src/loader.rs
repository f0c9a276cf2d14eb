//! Reads program files from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bytecode::parse_program;
use crate::error::LoadError;

/// Reads and parses the program text at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
  let path    = path.as_ref();
  let text    = fs::read_to_string(path)?;
  let program = parse_program(&text)?;
  debug!(path = %path.display(), bytes = program.len(), "program parsed");
  Ok(program)
}


#[cfg(test)]
mod tests {
  use std::io::ErrorKind;

  use super::*;
  use crate::cpu::Cpu;
  use crate::error::Fault;

  fn run_text(text: &str) -> (Vec<u8>, Result<(), Fault>) {
    let mut cpu = Cpu::new();
    cpu.load(&parse_program(text).unwrap()).unwrap();
    let mut out: Vec<u8> = Vec::new();
    let result = cpu.run(&mut out);
    (out, result)
  }

  #[test]
  fn print8_demo() {
    let (out, result) = run_text(include_str!("../demos/print8.ls8"));
    assert_eq!(result, Ok(()));
    assert_eq!(out, vec![8]);
  }

  #[test]
  fn mult_demo() {
    let (out, result) = run_text(include_str!("../demos/mult.ls8"));
    assert_eq!(result, Ok(()));
    assert_eq!(out, vec![72]);
  }

  #[test]
  fn stack_demo() {
    let (out, result) = run_text(include_str!("../demos/stack.ls8"));
    assert_eq!(result, Ok(()));
    assert_eq!(out, vec![2, 4, 1]);
  }

  #[test]
  fn call_demo() {
    let (out, result) = run_text(include_str!("../demos/call.ls8"));
    assert_eq!(result, Ok(()));
    assert_eq!(out, vec![20, 30, 36, 60]);
  }

  #[test]
  fn compare_demo() {
    let (out, result) = run_text(include_str!("../demos/compare.ls8"));
    assert_eq!(result, Ok(()));
    assert_eq!(out, vec![1, 2, 3]);
  }

  #[test]
  fn file_round_trip() {
    let path = std::env::temp_dir().join(format!("ls8-loader-{}.ls8", std::process::id()));
    fs::write(&path, include_str!("../demos/print8.ls8")).unwrap();
    let program = load_file(&path);
    fs::remove_file(&path).unwrap();
    assert_eq!(program.unwrap(), vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]);
  }

  #[test]
  fn missing_file_is_an_io_error() {
    match load_file("this/file/does/not/exist.ls8") {
      Err(LoadError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
