//! `AND`/`OR`/`NOT`: strict boolean logic, no truthiness coercion.

use loader::Argument;
use value::Value;

use crate::{Fault, Flow, Machine, VarRef};

#[derive(Clone, Copy)]
pub(crate) enum Op {
  And,
  Or,
}

impl<'io> Machine<'io> {
  pub(crate) fn op_and_or(
    &mut self,
    var: &Argument,
    symb1: &Argument,
    symb2: &Argument,
    op: Op,
  ) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let lhs = self.require_bool(symb1)?;
    let rhs = self.require_bool(symb2)?;
    let result = match op {
      Op::And => lhs && rhs,
      Op::Or => lhs || rhs,
    };

    self.frames.write(&dest, Value::bool(result))?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_not(&mut self, var: &Argument, symb: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);
    self.frames.ensure_declared(&dest)?;

    let value = self.require_bool(symb)?;
    self.frames.write(&dest, Value::bool(!value))?;
    Ok(Flow::Next)
  }

  fn require_bool(&self, symb: &Argument) -> Result<bool, Fault> {
    self
      .resolve(symb)?
      .as_bool()
      .ok_or_else(|| Fault::WrongType("AND/OR/NOT require bool operands".into()))
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use loader::tree::XmlElement;

  use crate::Machine;

  fn el(name: &str) -> XmlElement {
    XmlElement::new(name)
  }

  fn arg(position: u32, ty: &str, text: &str) -> XmlElement {
    el(&format!("arg{position}")).with_attr("type", ty).with_text(text)
  }

  fn instr(order: &str, opcode: &str, args: Vec<XmlElement>) -> XmlElement {
    let mut i = el("instruction").with_attr("order", order).with_attr("opcode", opcode);
    i.children = args;
    i
  }

  fn run(instructions: Vec<XmlElement>) -> String {
    let mut root = el("program").with_attr("language", "IPPcode23");
    root.children = instructions;
    let program = loader::load(&root).unwrap();
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    m.run().unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn and_or_not_use_strict_boolean_logic() {
    let out = run(vec![
      instr("1", "DEFVAR", vec![arg(1, "var", "GF@a")]),
      instr(
        "2",
        "AND",
        vec![arg(1, "var", "GF@a"), arg(2, "bool", "true"), arg(3, "bool", "false")],
      ),
      instr("3", "WRITE", vec![arg(1, "var", "GF@a")]),
      instr("4", "DEFVAR", vec![arg(1, "var", "GF@b")]),
      instr(
        "5",
        "OR",
        vec![arg(1, "var", "GF@b"), arg(2, "bool", "true"), arg(3, "bool", "false")],
      ),
      instr("6", "WRITE", vec![arg(1, "var", "GF@b")]),
      instr("7", "DEFVAR", vec![arg(1, "var", "GF@c")]),
      instr("8", "NOT", vec![arg(1, "var", "GF@c"), arg(2, "bool", "true")]),
      instr("9", "WRITE", vec![arg(1, "var", "GF@c")]),
    ]);
    assert_eq!(out, "falsetruefalse");
  }
}
