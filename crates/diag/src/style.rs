use std::fmt;

use owo_colors::{OwoColorize, Style as AnsiStyle};

#[derive(Debug, Clone, Copy)]
pub struct Style {
  enabled: bool,
}

impl Style {
  pub fn plain() -> Self {
    Self { enabled: false }
  }

  pub fn new(enabled: bool) -> Self {
    Self { enabled }
  }

  pub fn error<T: fmt::Display>(&self, inner: T) -> Styled<T> {
    Styled {
      inner,
      style: self.enabled.then(|| AnsiStyle::new().red().bold()),
    }
  }

  pub fn muted<T: fmt::Display>(&self, inner: T) -> Styled<T> {
    Styled {
      inner,
      style: self.enabled.then(|| AnsiStyle::new().dimmed()),
    }
  }
}

pub struct Styled<T: fmt::Display> {
  inner: T,
  style: Option<AnsiStyle>,
}

impl<T: fmt::Display> fmt::Display for Styled<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.style {
      Some(style) => write!(f, "{}", self.inner.style(style)),
      None => write!(f, "{}", self.inner),
    }
  }
}
