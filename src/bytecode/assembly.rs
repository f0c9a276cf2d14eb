/*!
  The human readable textual form of a program is a list of bytes written in binary, one per
  line. A `#` starts a comment that runs to the end of the line, and blank lines are ignored:

  ```text
  # print8.ls8
  10000010 # LDI R0,8
  00000000
  00001000
  ```
*/

use nom::{
  bytes::complete::take_while1,
  character::complete::{
    char as one_char,
    not_line_ending,
    space0
  },
  combinator::{all_consuming, map_res, opt},
  sequence::{delimited, pair, preceded},
  IResult
};

use crate::error::LoadError;
use crate::state::MEMORY_SIZE;

fn is_binary_digit(c: char) -> bool {
  c == '0' || c == '1'
}

fn comment(input: &str) -> IResult<&str, &str> {
  preceded(one_char('#'), not_line_ending)(input)
}

fn byte(input: &str) -> IResult<&str, u8> {
  map_res(take_while1(is_binary_digit), |digits: &str| u8::from_str_radix(digits, 2))(input)
}

/// A whole line: an optional byte, then an optional comment, with whitespace allowed around both.
fn line(input: &str) -> IResult<&str, Option<u8>> {
  all_consuming(delimited(space0, opt(byte), pair(space0, opt(comment))))(input)
}

/// Parses program text into the bytes to load at address 0.
pub fn parse_program(text: &str) -> Result<Vec<u8>, LoadError> {
  let mut program = Vec::new();

  for (idx, source_line) in text.lines().enumerate() {
    match line(source_line) {
      Ok((_rest, Some(value))) => program.push(value),
      Ok((_rest, None))        => {}
      Err(_e)                  => {
        return Err(LoadError::Syntax {
          line: idx + 1,
          text: source_line.trim().to_string()
        });
      }
    }
  }

  if program.len() > MEMORY_SIZE {
    return Err(LoadError::ProgramTooLarge { len: program.len() });
  }
  Ok(program)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comments_and_blank_lines_are_skipped() {
    let text = "# print8.ls8\n\
                \n\
                10000010 # LDI R0,8\n\
                00000000\n\
                \t00001000   \n\
                01000111# PRN R0\n\
                00000000\n\
                00000001 # HLT\n";
    assert_eq!(
      parse_program(text).unwrap(),
      vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
    );
  }

  #[test]
  fn windows_line_endings_are_accepted() {
    assert_eq!(parse_program("00000001 # HLT\r\n1\r\n").unwrap(), vec![1, 1]);
  }

  #[test]
  fn empty_text_is_an_empty_program() {
    assert!(parse_program("").unwrap().is_empty());
    assert!(parse_program("# nothing here\n   \n").unwrap().is_empty());
  }

  #[test]
  fn bad_lines_report_their_line_number() {
    match parse_program("00000001\n  00000012 # oops\n") {
      Err(LoadError::Syntax { line, text }) => {
        assert_eq!(line, 2);
        assert_eq!(text, "00000012 # oops");
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn values_wider_than_a_byte_are_rejected() {
    match parse_program("100000000\n") {
      Err(LoadError::Syntax { line, .. }) => assert_eq!(line, 1),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn programs_larger_than_memory_are_rejected() {
    let text = "00000000\n".repeat(MEMORY_SIZE + 1);
    match parse_program(&text) {
      Err(LoadError::ProgramTooLarge { len }) => assert_eq!(len, MEMORY_SIZE + 1),
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
