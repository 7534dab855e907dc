//! The element-tree shape the loader consumes.
//!
//! This is deliberately independent of any particular XML library: reading
//! raw XML text into this tree is an external concern (see the crate-level
//! docs); the loader only ever walks [`XmlElement`] values.

/// One element of a parsed XML document: a tag name, its attributes, any
/// child elements, and its direct text content.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
  pub name: String,
  pub attributes: Vec<(String, String)>,
  pub children: Vec<XmlElement>,
  pub text: String,
}

impl XmlElement {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      attributes: Vec::new(),
      children: Vec::new(),
      text: String::new(),
    }
  }

  pub fn attr(&self, key: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.push((key.into(), value.into()));
    self
  }

  pub fn with_child(mut self, child: XmlElement) -> Self {
    self.children.push(child);
    self
  }

  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = text.into();
    self
  }
}
