//! Anchored lexical patterns for argument text, one per `type` attribute.

use once_cell::sync::Lazy;
use regex::Regex;

static VAR: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(LF|TF|GF)@[A-Za-z_\-$&%*!?][A-Za-z0-9_\-$&%*!?]*$").unwrap());
static TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(bool|int|string)$").unwrap());
static LABEL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-Za-z_\-$&%*!?][A-Za-z0-9_\-$&%*!?]*$").unwrap());
static NIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^nil$").unwrap());
static BOOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(true|false)$").unwrap());
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[^\\]|\\\d{3})*$").unwrap());

/// Matches `lexeme` against the lexical rule for argument type `kind`
/// (`var`, `label`, `type`, `nil`, `bool`, `int`, `string`). An unknown
/// `kind` never matches.
pub fn matches(kind: &str, lexeme: &str) -> bool {
  match kind {
    "var" => VAR.is_match(lexeme),
    "type" => TYPE.is_match(lexeme),
    "label" => LABEL.is_match(lexeme),
    "nil" => NIL.is_match(lexeme),
    "bool" => BOOL.is_match(lexeme),
    "int" => is_valid_int(lexeme),
    "string" => STRING.is_match(lexeme),
    _ => false,
  }
}

/// Checks the `int` grammar: optional sign, then decimal (no leading zero
/// unless the literal is exactly zero), octal (`0`/`0o`/`0O` prefix), or
/// hexadecimal (`0x`/`0X` prefix), with non-repeating `_` digit separators.
///
/// This can't be expressed as a single `regex` crate pattern because the
/// reference grammar relies on lookahead; the shape is checked procedurally
/// instead, mirroring [`value::parse_int`](../../value/fn.parse_int.html).
fn is_valid_int(lexeme: &str) -> bool {
  let rest = lexeme.strip_prefix(['+', '-']).unwrap_or(lexeme);
  if rest.is_empty() || rest.contains("__") {
    return false;
  }

  let (digits, radix) = if let Some(d) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
    (d, 16)
  } else if let Some(d) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
    (d, 8)
  } else if rest.len() > 1 && rest.starts_with('0') {
    (&rest[1..], 8)
  } else {
    (rest, 10)
  };

  if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
    return false;
  }

  digits.chars().all(|c| c == '_' || c.is_digit(radix))
}
