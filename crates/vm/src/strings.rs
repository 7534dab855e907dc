//! `INT2CHAR`/`STRI2INT`/`CONCAT`/`STRLEN`/`GETCHAR`/`SETCHAR`/`TYPE`.

use loader::Argument;
use num_traits::ToPrimitive;
use value::Value;

use crate::{Fault, Flow, Machine, VarRef};

impl<'io> Machine<'io> {
  pub(crate) fn op_int2char(&mut self, var: &Argument, symb: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let code = self.require_int(symb)?;
    let code = code
      .to_u32()
      .ok_or_else(|| Fault::BadStringOperation("int value is not a valid Unicode scalar".into()))?;
    let ch = char::from_u32(code)
      .ok_or_else(|| Fault::BadStringOperation("int value is not a valid Unicode scalar".into()))?;

    self.frames.write(&dest, Value::str(ch.to_string()))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_stri2int(&mut self, var: &Argument, symb1: &Argument, symb2: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let s = self.require_str(symb1)?;
    let index = self.require_index(symb2, &s)?;
    let ch = s.chars().nth(index).expect("index already bounds-checked");

    self.frames.write(&dest, Value::int(ch as u32))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_concat(&mut self, var: &Argument, symb1: &Argument, symb2: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let a = self.require_str(symb1)?;
    let b = self.require_str(symb2)?;

    self.frames.write(&dest, Value::str(format!("{a}{b}")))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_strlen(&mut self, var: &Argument, symb: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let s = self.require_str(symb)?;
    self.frames.write(&dest, Value::int(s.chars().count() as i64))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_getchar(&mut self, var: &Argument, symb1: &Argument, symb2: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let s = self.require_str(symb1)?;
    let index = self.require_index(symb2, &s)?;
    let ch = s.chars().nth(index).expect("index already bounds-checked");

    self.frames.write(&dest, Value::str(ch.to_string()))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_setchar(&mut self, var: &Argument, symb1: &Argument, symb2: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    let current = self.frames.read(&dest)?;
    let mut chars: Vec<char> = current
      .as_str()
      .ok_or_else(|| Fault::WrongType("SETCHAR requires a string destination".into()))?
      .chars()
      .collect();

    let index = self.require_index_into(symb1, chars.len())?;
    let replacement = self.require_str(symb2)?;
    let first = replacement
      .chars()
      .next()
      .ok_or_else(|| Fault::BadStringOperation("SETCHAR replacement string is empty".into()))?;

    chars[index] = first;
    self
      .frames
      .write(&dest, Value::str(chars.into_iter().collect::<String>()))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_type(&mut self, var: &Argument, symb: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let type_name = if symb.type_name == "var" {
      match self.frames.type_of(&VarRef::parse(&symb.lexeme))? {
        Some(tag) => tag.to_string(),
        None => String::new(),
      }
    } else {
      symb.type_name.clone()
    };

    self.frames.write(&dest, Value::str(type_name))?;
    Ok(Flow::Next)
  }

  fn require_int(&self, symb: &Argument) -> Result<num_bigint::BigInt, Fault> {
    self
      .resolve(symb)?
      .as_int()
      .cloned()
      .ok_or_else(|| Fault::WrongType("expected an int operand".into()))
  }

  fn require_str(&self, symb: &Argument) -> Result<String, Fault> {
    self
      .resolve(symb)?
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| Fault::WrongType("expected a string operand".into()))
  }

  fn require_index(&self, symb: &Argument, s: &str) -> Result<usize, Fault> {
    self.require_index_into(symb, s.chars().count())
  }

  fn require_index_into(&self, symb: &Argument, len: usize) -> Result<usize, Fault> {
    let index = self.require_int(symb)?;
    let index = index
      .to_i64()
      .and_then(|i| usize::try_from(i).ok())
      .ok_or_else(|| Fault::BadStringOperation("string index out of bounds".into()))?;
    if index >= len {
      return Err(Fault::BadStringOperation("string index out of bounds".into()));
    }
    Ok(index)
  }
}
