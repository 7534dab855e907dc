//! `ADD`/`SUB`/`MUL`/`IDIV`: integer arithmetic with floor division.

use loader::Argument;
use value::Value;

use crate::{Fault, Flow, Machine, VarRef};

#[derive(Clone, Copy)]
pub(crate) enum Op {
  Add,
  Sub,
  Mul,
  IDiv,
}

impl<'io> Machine<'io> {
  pub(crate) fn op_arith(
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
    let (lhs, rhs) = match (lhs.as_int(), rhs.as_int()) {
      (Some(a), Some(b)) => (a.clone(), b.clone()),
      _ => return Err(Fault::WrongType("ADD/SUB/MUL/IDIV require int operands".into())),
    };

    let result = match op {
      Op::Add => lhs + rhs,
      Op::Sub => lhs - rhs,
      Op::Mul => lhs * rhs,
      Op::IDiv => {
        if rhs == num_bigint::BigInt::from(0) {
          return Err(Fault::BadValue("division by zero".into()));
        }
        floor_div(lhs, rhs)
      }
    };

    self.frames.write(&dest, Value::int(result))?;
    Ok(Flow::Next)
  }
}

/// Python-style floor division, matching IPPcode23's `//` semantics.
fn floor_div(a: num_bigint::BigInt, b: num_bigint::BigInt) -> num_bigint::BigInt {
  let (q, r) = (a.clone() / b.clone(), a % b.clone());
  if !r.eq_zero() && (r.is_negative() != b.is_negative()) {
    q - num_bigint::BigInt::from(1)
  } else {
    q
  }
}

trait BigIntSign {
  fn eq_zero(&self) -> bool;
  fn is_negative(&self) -> bool;
}

impl BigIntSign for num_bigint::BigInt {
  fn eq_zero(&self) -> bool {
    *self == num_bigint::BigInt::from(0)
  }

  fn is_negative(&self) -> bool {
    *self < num_bigint::BigInt::from(0)
  }
}
