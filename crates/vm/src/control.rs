//! `JUMP`/`JUMPIFEQ`/`JUMPIFNEQ`/`CALL`/`RETURN`/`EXIT`/`BREAK`.

use std::io::Write as _;

use loader::Argument;

use crate::{Fault, Flow, Machine};

impl<'io> Machine<'io> {
  pub(crate) fn op_jump(&mut self, label: &Argument) -> Result<Flow, Fault> {
    Ok(Flow::Jump(self.label_target(&label.lexeme)?))
  }

  pub(crate) fn op_jumpif(
    &mut self,
    label: &Argument,
    symb1: &Argument,
    symb2: &Argument,
    wants_equal: bool,
  ) -> Result<Flow, Fault> {
    let lhs = self.resolve(symb1)?;
    let rhs = self.resolve(symb2)?;
    if lhs.tag() != rhs.tag() && !lhs.is_nil() && !rhs.is_nil() {
      return Err(Fault::WrongType(format!(
        "cannot compare `{}` with `{}`",
        lhs.tag(),
        rhs.tag()
      )));
    }

    if (lhs == rhs) == wants_equal {
      Ok(Flow::Jump(self.label_target(&label.lexeme)?))
    } else {
      Ok(Flow::Next)
    }
  }

  pub(crate) fn op_call(&mut self, label: &Argument) -> Result<Flow, Fault> {
    let target = self.label_target(&label.lexeme)?;
    self.call_stack.push(self.pc + 1);
    Ok(Flow::Jump(target))
  }

  pub(crate) fn op_return(&mut self) -> Result<Flow, Fault> {
    let target = self
      .call_stack
      .pop()
      .ok_or_else(|| Fault::MissingValue("call stack is empty".into()))?;
    Ok(Flow::Jump(target))
  }

  pub(crate) fn op_exit(&mut self, symb: &Argument) -> Result<Flow, Fault> {
    let code = self
      .resolve(symb)?
      .as_int()
      .cloned()
      .ok_or_else(|| Fault::WrongType("EXIT requires an int operand".into()))?;

    let code = code
      .to_string()
      .parse::<i64>()
      .map_err(|_| Fault::BadValue("EXIT code out of range".into()))?;
    if !(0..=49).contains(&code) {
      return Err(Fault::BadValue(format!("EXIT code {code} is outside 0..=49")));
    }

    Ok(Flow::Exit(code as i32))
  }

  pub(crate) fn op_break(&mut self) -> Result<Flow, Fault> {
    writeln!(self.err, "position: {}", self.pc).ok();
    writeln!(self.err, "{}", self.frames.describe(crate::FrameId::Global)).ok();
    writeln!(self.err, "{}", self.frames.describe(crate::FrameId::Local)).ok();
    writeln!(self.err, "{}", self.frames.describe(crate::FrameId::Temporary)).ok();
    writeln!(self.err, "executed: {}", self.executed).ok();
    Ok(Flow::Next)
  }
}
