//! `READ`/`WRITE`/`DPRINT`.

use std::io::{BufRead as _, Write as _};

use loader::Argument;
use value::Value;

use crate::{Fault, Flow, Machine, VarRef};

impl<'io> Machine<'io> {
  pub(crate) fn op_read(&mut self, var: &Argument, type_arg: &Argument) -> Result<Flow, Fault> {
    let dest = VarRef::parse(&var.lexeme);

    let mut line = String::new();
    let value = match self.input.read_line(&mut line) {
      Ok(0) => Value::nil(),
      Ok(_) => {
        let text = line.trim_end_matches(['\n', '\r']);
        match type_arg.lexeme.as_str() {
          "int" => value::parse_int(text).map(Value::int).unwrap_or(Value::nil()),
          "bool" => Value::bool(text.eq_ignore_ascii_case("true")),
          "string" => Value::str(text),
          other => return Err(Fault::WrongType(format!("unknown READ target type `{other}`"))),
        }
      }
      Err(_) => Value::nil(),
    };

    self.frames.write(&dest, value)?;
    Ok(Flow::Next)
  }

  pub(crate) fn op_write(&mut self, symb: &Argument) -> Result<Flow, Fault> {
    let value = self.resolve(symb)?;
    write!(self.out, "{value}").map_err(|e| Fault::BadValue(format!("write failed: {e}")))?;
    Ok(Flow::Next)
  }

  /// Prints the operand's raw source lexeme, not its resolved value — this
  /// is a load-time debugging aid, distinct from `WRITE`.
  pub(crate) fn op_dprint(&mut self, symb: &Argument) -> Result<Flow, Fault> {
    writeln!(self.err, "{}", symb.lexeme).map_err(|e| Fault::BadValue(format!("write failed: {e}")))?;
    Ok(Flow::Next)
  }
}
