//! The global/local/temporary frame stack and variable storage.

use indexmap::IndexMap;
use value::Value;

use crate::error::Fault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameId {
  Global,
  Local,
  Temporary,
}

impl FrameId {
  fn name(self) -> &'static str {
    match self {
      FrameId::Global => "GF",
      FrameId::Local => "LF",
      FrameId::Temporary => "TF",
    }
  }
}

/// A variable reference split from a `var`-typed lexeme like `GF@counter`.
#[derive(Debug, Clone)]
pub struct VarRef {
  pub frame: FrameId,
  pub name: String,
}

impl VarRef {
  /// Parses a `var` lexeme already validated by the loader, so the `@` is
  /// guaranteed present and the frame prefix is one of `GF`/`LF`/`TF`.
  pub fn parse(lexeme: &str) -> Self {
    let (frame, name) = lexeme.split_once('@').expect("loader validated var shape");
    let frame = match frame {
      "GF" => FrameId::Global,
      "LF" => FrameId::Local,
      "TF" => FrameId::Temporary,
      other => unreachable!("loader validated frame prefix, got `{other}`"),
    };
    VarRef {
      frame,
      name: name.to_string(),
    }
  }
}

type Slots = IndexMap<String, Option<Value>>;

#[derive(Debug, Default)]
pub struct Frames {
  global: Slots,
  temporary: Option<Slots>,
  local_stack: Vec<Slots>,
}

impl Frames {
  pub fn new() -> Self {
    Self::default()
  }

  fn slots(&self, frame: FrameId) -> Result<&Slots, Fault> {
    match frame {
      FrameId::Global => Ok(&self.global),
      FrameId::Local => self.local_stack.last().ok_or_else(|| Fault::NoSuchFrame("LF".into())),
      FrameId::Temporary => self.temporary.as_ref().ok_or_else(|| Fault::NoSuchFrame("TF".into())),
    }
  }

  fn slots_mut(&mut self, frame: FrameId) -> Result<&mut Slots, Fault> {
    match frame {
      FrameId::Global => Ok(&mut self.global),
      FrameId::Local => self
        .local_stack
        .last_mut()
        .ok_or_else(|| Fault::NoSuchFrame("LF".into())),
      FrameId::Temporary => self.temporary.as_mut().ok_or_else(|| Fault::NoSuchFrame("TF".into())),
    }
  }

  pub fn declare(&mut self, var: &VarRef) -> Result<(), Fault> {
    let slots = self.slots_mut(var.frame)?;
    if slots.contains_key(&var.name) {
      return Err(Fault::RedefinedVariable(var.name.clone()));
    }
    slots.insert(var.name.clone(), None);
    Ok(())
  }

  /// Confirms `var` is declared, without reading its value. Several opcodes
  /// check their destination before evaluating their source operands.
  pub fn ensure_declared(&self, var: &VarRef) -> Result<(), Fault> {
    let slots = self.slots(var.frame)?;
    if !slots.contains_key(&var.name) {
      return Err(Fault::UndeclaredVariable(var.name.clone()));
    }
    Ok(())
  }

  pub fn read(&self, var: &VarRef) -> Result<Value, Fault> {
    let slots = self.slots(var.frame)?;
    match slots.get(&var.name) {
      None => Err(Fault::UndeclaredVariable(var.name.clone())),
      Some(None) => Err(Fault::MissingValue(format!(
        "variable `{}` has no value",
        var.name
      ))),
      Some(Some(value)) => Ok(value.clone()),
    }
  }

  /// Reads a variable's tag, treating an uninitialized variable as empty
  /// rather than a fault (`TYPE` is the only opcode that wants this).
  pub fn type_of(&self, var: &VarRef) -> Result<Option<value::Tag>, Fault> {
    let slots = self.slots(var.frame)?;
    match slots.get(&var.name) {
      None => Err(Fault::UndeclaredVariable(var.name.clone())),
      Some(None) => Ok(None),
      Some(Some(value)) => Ok(Some(value.tag())),
    }
  }

  pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), Fault> {
    let slots = self.slots_mut(var.frame)?;
    match slots.get_mut(&var.name) {
      None => Err(Fault::UndeclaredVariable(var.name.clone())),
      Some(slot) => {
        *slot = Some(value);
        Ok(())
      }
    }
  }

  pub fn create_frame(&mut self) {
    self.temporary = Some(IndexMap::new());
  }

  pub fn push_frame(&mut self) -> Result<(), Fault> {
    let tf = self.temporary.take().ok_or_else(|| Fault::NoSuchFrame("TF".into()))?;
    self.local_stack.push(tf);
    Ok(())
  }

  pub fn pop_frame(&mut self) -> Result<(), Fault> {
    let lf = self.local_stack.pop().ok_or_else(|| Fault::NoSuchFrame("LF".into()))?;
    self.temporary = Some(lf);
    Ok(())
  }

  pub fn describe(&self, frame: FrameId) -> String {
    match self.slots(frame) {
      Ok(slots) => format!("{}: {} variable(s)", frame.name(), slots.len()),
      Err(_) => format!("{}: <undefined>", frame.name()),
    }
  }
}
