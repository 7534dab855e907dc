//! `LT`/`GT`/`EQ`: same-tag comparison, with `nil` only ever equal to itself.

use loader::Argument;
use value::Value;

use crate::{Fault, Flow, Machine, VarRef};

#[derive(Clone, Copy)]
pub(crate) enum Op {
  Lt,
  Gt,
  Eq,
}

impl<'io> Machine<'io> {
  pub(crate) fn op_relational(
    &mut self,
    var: &Argument,
    symb1: &Argument,
    symb2: &Argument,
    op: Op,
  ) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let lhs = self.resolve(symb1)?;
    let rhs = self.resolve(symb2)?;

    if lhs.tag() != rhs.tag() && !lhs.is_nil() && !rhs.is_nil() {
      return Err(Fault::WrongType(format!(
        "cannot compare `{}` with `{}`",
        lhs.tag(),
        rhs.tag()
      )));
    }

    let result = match op {
      Op::Eq => lhs == rhs,
      Op::Lt => {
        if lhs.is_nil() || rhs.is_nil() {
          return Err(Fault::WrongType("LT does not accept nil operands".into()));
        }
        lhs < rhs
      }
      Op::Gt => {
        if lhs.is_nil() || rhs.is_nil() {
          return Err(Fault::WrongType("GT does not accept nil operands".into()));
        }
        lhs > rhs
      }
    };

    self.frames.write(&dest, Value::bool(result))?;
    Ok(Flow::Next)
  }
}
