//! Executes a [`loader::Program`] against the tagged-value model in `value`.

mod arith;
mod control;
mod error;
mod frame;
mod frame_ops;
mod io;
mod logic;
mod relational;
mod strings;

use std::io::{BufRead, Write};

pub use error::Fault;
pub use frame::{FrameId, VarRef};
use loader::{Argument, Instruction, Program};
use value::Value;

/// What the dispatcher should do after an instruction has run.
pub(crate) enum Flow {
  Next,
  Jump(usize),
  Exit(i32),
}

/// A running program: its frames, stacks, program counter, and I/O.
///
/// I/O handles are borrowed rather than owned so a caller can keep writing
/// diagnostics (e.g. the failing instruction's location) after [`Machine::run`]
/// returns an error.
pub struct Machine<'io> {
  program: Program,
  frames: frame::Frames,
  data_stack: Vec<Value>,
  call_stack: Vec<usize>,
  pc: usize,
  executed: u64,
  input: &'io mut dyn BufRead,
  out: &'io mut dyn Write,
  err: &'io mut dyn Write,
}

impl<'io> Machine<'io> {
  pub fn new(
    program: Program,
    input: &'io mut dyn BufRead,
    out: &'io mut dyn Write,
    err: &'io mut dyn Write,
  ) -> Self {
    Self {
      program,
      frames: frame::Frames::new(),
      data_stack: Vec::new(),
      call_stack: Vec::new(),
      pc: 0,
      executed: 0,
      input,
      out,
      err,
    }
  }

  /// Runs to completion: either falling off the end of the program (exit
  /// code 0), hitting `EXIT`, or returning the first [`Fault`] raised.
  pub fn run(&mut self) -> Result<i32, Fault> {
    loop {
      let Some(instruction) = self.program.instructions.get(self.pc).cloned() else {
        return Ok(0);
      };

      let flow = self.dispatch(&instruction)?;
      self.executed += 1;

      match flow {
        Flow::Next => self.pc += 1,
        Flow::Jump(target) => self.pc = target,
        Flow::Exit(code) => return Ok(code),
      }
    }
  }

  fn dispatch(&mut self, instruction: &Instruction) -> Result<Flow, Fault> {
    use op::Opcode::*;

    let a = &instruction.args;
    match instruction.opcode {
      CreateFrame => self.op_create_frame(),
      PushFrame => self.op_push_frame(),
      PopFrame => self.op_pop_frame(),
      DefVar => self.op_defvar(&a[0]),
      Move => self.op_move(&a[0], &a[1]),
      PushS => self.op_pushs(&a[0]),
      PopS => self.op_pops(&a[0]),

      Add => self.op_arith(&a[0], &a[1], &a[2], arith::Op::Add),
      Sub => self.op_arith(&a[0], &a[1], &a[2], arith::Op::Sub),
      Mul => self.op_arith(&a[0], &a[1], &a[2], arith::Op::Mul),
      IDiv => self.op_arith(&a[0], &a[1], &a[2], arith::Op::IDiv),

      Lt => self.op_relational(&a[0], &a[1], &a[2], relational::Op::Lt),
      Gt => self.op_relational(&a[0], &a[1], &a[2], relational::Op::Gt),
      Eq => self.op_relational(&a[0], &a[1], &a[2], relational::Op::Eq),

      And => self.op_and_or(&a[0], &a[1], &a[2], logic::Op::And),
      Or => self.op_and_or(&a[0], &a[1], &a[2], logic::Op::Or),
      Not => self.op_not(&a[0], &a[1]),

      Int2Char => self.op_int2char(&a[0], &a[1]),
      Stri2Int => self.op_stri2int(&a[0], &a[1], &a[2]),
      Concat => self.op_concat(&a[0], &a[1], &a[2]),
      StrLen => self.op_strlen(&a[0], &a[1]),
      GetChar => self.op_getchar(&a[0], &a[1], &a[2]),
      SetChar => self.op_setchar(&a[0], &a[1], &a[2]),
      Type => self.op_type(&a[0], &a[1]),

      Read => self.op_read(&a[0], &a[1]),
      Write => self.op_write(&a[0]),
      DPrint => self.op_dprint(&a[0]),

      Label => Ok(Flow::Next),
      Jump => self.op_jump(&a[0]),
      JumpIfEq => self.op_jumpif(&a[0], &a[1], &a[2], true),
      JumpIfNeq => self.op_jumpif(&a[0], &a[1], &a[2], false),
      Call => self.op_call(&a[0]),
      Return => self.op_return(),
      Exit => self.op_exit(&a[0]),
      Break => self.op_break(),
    }
  }

  /// Evaluates a `var`/`int`/`bool`/`string`/`nil`-typed operand to a value.
  fn resolve(&self, arg: &Argument) -> Result<Value, Fault> {
    match arg.type_name.as_str() {
      "var" => self.frames.read(&VarRef::parse(&arg.lexeme)),
      "int" => Ok(Value::int(
        value::parse_int(&arg.lexeme).expect("loader validated int lexeme"),
      )),
      "bool" => Ok(Value::bool(arg.lexeme == "true")),
      "string" => Ok(Value::str(value::decode_string(&arg.lexeme))),
      "nil" => Ok(Value::nil()),
      "label" | "type" => Err(Fault::WrongType(format!(
        "`{}` is not valid as a symbolic operand",
        arg.type_name
      ))),
      other => unreachable!("loader validated symb type, got `{other}`"),
    }
  }

  fn label_target(&self, label: &str) -> Result<usize, Fault> {
    self
      .program
      .labels
      .get(label)
      .copied()
      .ok_or_else(|| Fault::UndefinedLabel(label.to_string()))
  }

  /// The order and mnemonic of the instruction at the current program
  /// counter, for diagnostics after [`Machine::run`] returns an error.
  pub fn current_instruction(&self) -> Option<(u64, &'static str)> {
    self
      .program
      .instructions
      .get(self.pc)
      .map(|i| (i.order, i.opcode.name()))
  }

  /// How many instructions completed successfully before the run ended.
  pub fn executed_count(&self) -> u64 {
    self.executed
  }

  /// Reborrows the diagnostic stream, for a caller that wants to keep
  /// writing to it after [`Machine::run`] has returned.
  pub fn err_mut(&mut self) -> &mut dyn Write {
    self.err
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use loader::tree::XmlElement;

  use super::*;

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

  fn program(instructions: Vec<XmlElement>) -> Program {
    let mut root = el("program").with_attr("language", "IPPcode23");
    root.children = instructions;
    loader::load(&root).unwrap()
  }

  #[test]
  fn runs_add_and_write() {
    let program = program(vec![
      instr("1", "DEFVAR", vec![arg(1, "var", "GF@x")]),
      instr(
        "2",
        "ADD",
        vec![arg(1, "var", "GF@x"), arg(2, "int", "2"), arg(3, "int", "3")],
      ),
      instr("3", "WRITE", vec![arg(1, "var", "GF@x")]),
    ]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);

    let code = m.run().unwrap();
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "5");
  }

  #[test]
  fn division_by_zero_is_a_fault() {
    let program = program(vec![
      instr("1", "DEFVAR", vec![arg(1, "var", "GF@x")]),
      instr(
        "2",
        "IDIV",
        vec![arg(1, "var", "GF@x"), arg(2, "int", "1"), arg(3, "int", "0")],
      ),
    ]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    assert_eq!(m.run().unwrap_err().code(), 57);
  }

  #[test]
  fn undeclared_variable_is_a_fault() {
    let program = program(vec![instr("1", "WRITE", vec![arg(1, "var", "GF@nope")])]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    assert_eq!(m.run().unwrap_err().code(), 54);
  }

  #[test]
  fn uninitialized_variable_is_a_fault() {
    let program = program(vec![
      instr("1", "DEFVAR", vec![arg(1, "var", "GF@x")]),
      instr("2", "WRITE", vec![arg(1, "var", "GF@x")]),
    ]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    assert_eq!(m.run().unwrap_err().code(), 56);
  }

  #[test]
  fn call_and_return_roundtrip() {
    let program = program(vec![
      instr("1", "CALL", vec![arg(1, "label", "sub")]),
      instr("2", "EXIT", vec![arg(1, "int", "0")]),
      instr("3", "LABEL", vec![arg(1, "label", "sub")]),
      instr("4", "WRITE", vec![arg(1, "string", "hi")]),
      instr("5", "RETURN", vec![]),
    ]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    let code = m.run().unwrap();
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "hi");
  }

  #[test]
  fn exit_out_of_range_is_a_fault() {
    let program = program(vec![instr("1", "EXIT", vec![arg(1, "int", "50")])]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    assert_eq!(m.run().unwrap_err().code(), 57);
  }

  #[test]
  fn frame_stack_roundtrips() {
    let program = program(vec![
      instr("1", "CREATEFRAME", vec![]),
      instr("2", "DEFVAR", vec![arg(1, "var", "TF@x")]),
      instr("3", "MOVE", vec![arg(1, "var", "TF@x"), arg(2, "string", "a")]),
      instr("4", "PUSHFRAME", vec![]),
      instr("5", "WRITE", vec![arg(1, "var", "LF@x")]),
      instr("6", "POPFRAME", vec![]),
    ]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    let code = m.run().unwrap();
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "a");
  }

  #[test]
  fn current_instruction_reports_failing_opcode() {
    let program = program(vec![instr("7", "WRITE", vec![arg(1, "var", "GF@nope")])]);
    let (mut input, mut out, mut err) = (Cursor::new(Vec::new()), Vec::new(), Vec::new());
    let mut m = Machine::new(program, &mut input, &mut out, &mut err);
    assert!(m.run().is_err());
    assert_eq!(m.current_instruction(), Some((7, "WRITE")));
  }
}
