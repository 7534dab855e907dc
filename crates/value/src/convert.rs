use num_bigint::BigInt;
use num_traits::Num;

/// Parses an IPPcode23 integer literal.
///
/// Accepts an optional sign, then one of: decimal (no leading zero unless the
/// whole literal is zero), octal (`0`, `0o` or `0O` prefix), or hexadecimal
/// (`0x`/`0X` prefix). `_` may separate digit groups but may not repeat.
pub fn parse_int(lexeme: &str) -> Option<BigInt> {
  let lexeme = lexeme.trim();
  if lexeme.is_empty() || lexeme.contains("__") {
    return None;
  }

  let (negative, rest) = match lexeme.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, lexeme.strip_prefix('+').unwrap_or(lexeme)),
  };

  let (radix, digits) = if let Some(digits) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
    (16, digits)
  } else if let Some(digits) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
    (8, digits)
  } else if rest.len() > 1 && rest.starts_with('0') {
    // A bare leading zero without an `o`/`O` marker is still octal, as long
    // as every remaining digit fits (matches the reference `0[oO]?[0-7]+`).
    (8, &rest[1..])
  } else {
    (10, rest)
  };

  if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
    return None;
  }

  let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
  if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
    return None;
  }

  let magnitude = BigInt::from_str_radix(&cleaned, radix).ok()?;
  Some(if negative { -magnitude } else { magnitude })
}

/// Decodes `\DDD` escapes (three decimal digits, `000`-`999`) into the
/// Unicode scalar value they name. Any other character passes through
/// unchanged.
pub fn decode_string(lexeme: &str) -> String {
  let chars: Vec<char> = lexeme.chars().collect();
  let mut out = String::with_capacity(chars.len());

  let mut i = 0;
  while i < chars.len() {
    if chars[i] == '\\' && i + 3 < chars.len() {
      let digits: String = chars[i + 1..i + 4].iter().collect();
      if digits.chars().all(|c| c.is_ascii_digit()) {
        if let Some(ch) = digits.parse::<u32>().ok().and_then(char::from_u32) {
          out.push(ch);
          i += 4;
          continue;
        }
      }
    }
    out.push(chars[i]);
    i += 1;
  }

  out
}
