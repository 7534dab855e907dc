use thiserror::Error;

/// A runtime failure, with its numeric exit code implied by the variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Fault {
  #[error("label `{0}` is not defined")]
  UndefinedLabel(String),
  #[error("variable `{0}` is already defined")]
  RedefinedVariable(String),
  #[error("{0}")]
  WrongType(String),
  #[error("variable `{0}` is not defined")]
  UndeclaredVariable(String),
  #[error("frame `{0}` does not exist")]
  NoSuchFrame(String),
  #[error("{0}")]
  MissingValue(String),
  #[error("{0}")]
  BadValue(String),
  #[error("{0}")]
  BadStringOperation(String),
}

impl Fault {
  /// The numeric exit code this failure maps to.
  pub fn code(&self) -> i32 {
    match self {
      Fault::UndefinedLabel(_) | Fault::RedefinedVariable(_) => 52,
      Fault::WrongType(_) => 53,
      Fault::UndeclaredVariable(_) => 54,
      Fault::NoSuchFrame(_) => 55,
      Fault::MissingValue(_) => 56,
      Fault::BadValue(_) => 57,
      Fault::BadStringOperation(_) => 58,
    }
  }
}
