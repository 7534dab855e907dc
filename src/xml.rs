//! Turns raw XML text into the dependency-free [`loader::tree::XmlElement`]
//! shape the loader consumes.
//!
//! This is the only place in the workspace that depends on an XML tokenizer;
//! the core crates never see `quick_xml` types.

use loader::tree::XmlElement;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("malformed XML: {0}")]
pub struct XmlError(String);

/// Parses `source` into an element tree rooted at its single root element.
pub fn parse(source: &str) -> Result<XmlElement, XmlError> {
  let mut reader = Reader::from_str(source);
  reader.config_mut().trim_text(true);

  let mut stack: Vec<XmlElement> = Vec::new();
  let mut root: Option<XmlElement> = None;

  loop {
    match reader.read_event().map_err(|e| XmlError(e.to_string()))? {
      Event::Start(start) => {
        stack.push(build_element(&start)?);
      }
      Event::Empty(start) => {
        let element = build_element(&start)?;
        attach(&mut stack, &mut root, element)?;
      }
      Event::End(_) => {
        let element = stack.pop().ok_or_else(|| XmlError("unbalanced closing tag".into()))?;
        attach(&mut stack, &mut root, element)?;
      }
      Event::Text(text) => {
        let decoded = text.unescape().map_err(|e| XmlError(e.to_string()))?.into_owned();
        if let Some(top) = stack.last_mut() {
          top.text.push_str(&decoded);
        }
      }
      Event::CData(cdata) => {
        let decoded = String::from_utf8_lossy(cdata.as_ref()).into_owned();
        if let Some(top) = stack.last_mut() {
          top.text.push_str(&decoded);
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  root.ok_or_else(|| XmlError("document has no root element".into()))
}

fn build_element(start: &quick_xml::events::BytesStart) -> Result<XmlElement, XmlError> {
  let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
  let mut element = XmlElement::new(name);

  for attr in start.attributes() {
    let attr = attr.map_err(|e| XmlError(e.to_string()))?;
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr
      .unescape_value()
      .map_err(|e| XmlError(e.to_string()))?
      .into_owned();
    element.attributes.push((key, value));
  }

  Ok(element)
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), XmlError> {
  match stack.last_mut() {
    Some(parent) => parent.children.push(element),
    None => {
      if root.is_some() {
        return Err(XmlError("document has more than one root element".into()));
      }
      *root = Some(element);
    }
  }
  Ok(())
}
