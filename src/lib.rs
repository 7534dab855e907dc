//! The pure core of the interpreter: parse, load, execute.
//!
//! [`run`] takes already-materialized I/O (XML text, an input stream, and
//! output/diagnostic sinks) and returns the process exit code, with no
//! dependency on `std::env` or the filesystem — the binary in `main.rs` is
//! the thin wrapper that supplies those.

mod xml;

use std::io::{BufRead, Write};

/// Runs one IPPcode23 program and returns the process exit code.
///
/// Exit codes follow the fixed taxonomy: `0` normal, `31` malformed XML,
/// `32` bad program structure, `52`–`58` runtime faults, or whatever code
/// an `EXIT` instruction requested.
pub fn run(source: &str, input: &mut dyn BufRead, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
  let tree = match xml::parse(source) {
    Ok(tree) => tree,
    Err(e) => {
      report(err, 31, &e.to_string(), None);
      return 31;
    }
  };

  let program = match loader::load(&tree) {
    Ok(program) => program,
    Err(e) => {
      report(err, e.code(), &e.to_string(), None);
      return e.code();
    }
  };

  let mut machine = vm::Machine::new(program, input, out, err);
  match machine.run() {
    Ok(code) => code,
    Err(fault) => {
      let code = fault.code();
      let location = machine
        .current_instruction()
        .map(|(order, opcode)| diag::Location { order, opcode });
      let message = fault.to_string();
      report(machine_err(&mut machine), code, &message, location);
      code
    }
  }
}

// `machine` still owns the borrowed `err` handle; reborrowing it here keeps
// the call site above readable without fighting the borrow checker twice.
fn machine_err<'a>(machine: &'a mut vm::Machine<'_>) -> &'a mut dyn Write {
  machine.err_mut()
}

fn report(err: &mut dyn Write, code: i32, message: &str, location: Option<diag::Location>) {
  let mut report = diag::Report::new(code, message.to_string());
  if let Some(location) = location {
    report = report.at(location);
  }
  let _ = report.emit(err);
}
