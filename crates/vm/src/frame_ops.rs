//! Frame lifecycle, variable declaration, data-stack, and `MOVE`.

use loader::Argument;

use crate::{Fault, Flow, Machine, VarRef};

impl<'io> Machine<'io> {
  pub(crate) fn op_create_frame(&mut self) -> Result<Flow, Fault> {
    self.frames.create_frame();
    Ok(Flow::Next)
  }

  pub(crate) fn op_push_frame(&mut self) -> Result<Flow, Fault> {
    self.frames.push_frame()?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_pop_frame(&mut self) -> Result<Flow, Fault> {
    self.frames.pop_frame()?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_defvar(&mut self, var: &Argument) -> Result<Flow, Fault> {
    self.frames.declare(&VarRef::parse(&var.lexeme))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_move(&mut self, var: &Argument, symb: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;
    let value = self.resolve(symb)?;
    self.frames.write(&dest, value)?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_pushs(&mut self, symb: &Argument) -> Result<Flow, Fault> {
    let value = self.resolve(symb)?;
    self.data_stack.push(value);
    Ok(Flow::Next)
  }

  pub(crate) fn op_pops(&mut self, var: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;
    let value = self
      .data_stack
      .pop()
      .ok_or_else(|| Fault::MissingValue("data stack is empty".into()))?;
    self.frames.write(&dest, value)?;
    Ok(Flow::Next)
  }
}
