//! Rendering of interpreter faults to a diagnostic stream.
//!
//! The numeric code is the primary signal the process exits with; the
//! message and instruction location are advisory, printed to stderr.

mod style;

use std::fmt;
use std::io::{self, Write};

use beef::lean::Cow;
pub use style::Style;

/// Where in the instruction stream a fault was raised.
#[derive(Debug, Clone, Copy)]
pub struct Location {
  pub order: u64,
  pub opcode: &'static str,
}

/// A single diagnostic: a numeric code, a message, and (for execution-time
/// faults) the instruction that raised it.
pub struct Report<'a> {
  code: i32,
  message: Cow<'a, str>,
  location: Option<Location>,
  style: Style,
}

impl<'a> Report<'a> {
  pub fn new(code: i32, message: impl Into<Cow<'a, str>>) -> Self {
    Self {
      code,
      message: message.into(),
      location: None,
      style: Style::plain(),
    }
  }

  pub fn at(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  pub fn colored(mut self, enabled: bool) -> Self {
    self.style = Style::new(enabled);
    self
  }

  pub fn code(&self) -> i32 {
    self.code
  }

  pub fn emit(&self, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{self}")
  }
}

impl fmt::Display for Report<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}: {}",
      self.style.error(format!("error {}", self.code)),
      self.message
    )?;
    if let Some(loc) = self.location {
      write!(
        f,
        " ({} {}, {})",
        self.style.muted("instruction"),
        loc.order,
        loc.opcode
      )?;
    }
    Ok(())
  }
}
