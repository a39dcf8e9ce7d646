//! Parser for the mapping literal a model writes when asked for "a Python
//! dictionary": either quote style, `True`/`None` as well as `true`/`null`,
//! trailing commas. Nested containers are validated but only kept as text.

use serde_json::{Map, Value};

use crate::ai_agent::parsing::extract::ParseError;
use crate::ai_agent::parsing::score::{ScoreMap, ScoreValue};

struct LiteralParser<'a> {
  src: &'a str,
  pos: usize,
}

pub fn parse_literal(record: &str) -> Result<ScoreMap, ParseError> {
  let mut parser = LiteralParser { src: record, pos: 0 };
  parser.skip_whitespace();
  if parser.peek() != Some('{') {
    return Err(parser.error("expected '{' at start of mapping"));
  }

  let map : ScoreMap = parser.mapping()?;
  parser.skip_whitespace();
  if parser.pos < parser.src.len() {
    return Err(parser.error("unexpected characters after mapping"));
  }
  return Ok(map);
}

impl<'a> LiteralParser<'a> {

  fn error(&self, message: &str) -> ParseError {
    ParseError::Syntax { offset: self.pos, message: message.to_string() }
  }

  fn peek(&self) -> Option<char> {
    self.src[self.pos..].chars().next()
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.pos += c.len_utf8();
    Some(c)
  }

  fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
    match self.peek() {
      Some(c) if c == wanted => { self.pos += 1; Ok(()) },
      Some(c) => Err(self.error(&format!("expected '{}' but found '{}'", wanted, c))),
      None => Err(self.error(&format!("expected '{}' but reached end of input", wanted))),
    }
  }

  fn skip_whitespace(&mut self) {
    while let Some(c) = self.peek() {
      if !c.is_whitespace() {
        break;
      }
      self.pos += c.len_utf8();
    }
  }

  fn mapping(&mut self) -> Result<ScoreMap, ParseError> {
    self.expect('{')?;
    let mut map : ScoreMap = ScoreMap::new();

    loop {
      self.skip_whitespace();
      if self.peek() == Some('}') {
        self.pos += 1;
        return Ok(map);
      }

      let key_start = self.pos;
      let key : String = match self.value()? {
        ScoreValue::Text(key) => key,
        other => return Err(ParseError::Syntax {
          offset: key_start,
          message: format!("mapping keys must be strings, found {}", other.type_name()),
        }),
      };

      self.skip_whitespace();
      self.expect(':')?;
      self.skip_whitespace();
      let value : ScoreValue = self.value()?;
      map.insert(key, value);

      self.skip_whitespace();
      match self.peek() {
        Some(',') => { self.pos += 1; },
        Some('}') => {},
        Some(c) => return Err(self.error(&format!("expected ',' or '}}' but found '{}'", c))),
        None => return Err(self.error("unterminated mapping")),
      }
    }
  }

  fn value(&mut self) -> Result<ScoreValue, ParseError> {
    match self.peek() {
      Some('\'') | Some('"') => self.string().map(ScoreValue::Text),
      Some('{') | Some('[') | Some('(') => self.container(),
      Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
      Some(c) if c.is_alphabetic() => self.identifier(),
      Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
      None => Err(self.error("expected a value but reached end of input")),
    }
  }

  fn string(&mut self) -> Result<String, ParseError> {
    let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
    let mut out = String::new();

    loop {
      let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;
      if c == quote {
        return Ok(out);
      }
      if c != '\\' {
        out.push(c);
        continue;
      }

      let escaped = self.bump().ok_or_else(|| self.error("unterminated escape sequence"))?;
      match escaped {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        '0' => out.push('\0'),
        'u' => out.push(self.unicode_escape()?),
        '\\' | '\'' | '"' | '/' => out.push(escaped),
        other => { out.push('\\'); out.push(other); },
      }
    }
  }

  fn unicode_escape(&mut self) -> Result<char, ParseError> {
    let end = self.pos + 4;
    let hex = self.src.get(self.pos..end).ok_or_else(|| self.error("truncated \\u escape"))?;
    let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid \\u escape"))?;
    let c = char::from_u32(code).ok_or_else(|| self.error("\\u escape is not a valid character"))?;
    self.pos = end;
    Ok(c)
  }

  fn number(&mut self) -> Result<ScoreValue, ParseError> {
    let start = self.pos;
    if matches!(self.peek(), Some('-') | Some('+')) {
      self.pos += 1;
    }

    let mut digits = 0;
    let mut is_float = false;
    while let Some(c) = self.peek() {
      match c {
        '0'..='9' => { digits += 1; },
        '.' if !is_float => { is_float = true; },
        'e' | 'E' if digits > 0 => {
          is_float = true;
          self.pos += 1;
          if matches!(self.peek(), Some('-') | Some('+')) {
            self.pos += 1;
          }
          continue;
        },
        _ => break,
      }
      self.pos += 1;
    }

    if digits == 0 {
      return Err(ParseError::Syntax { offset: start, message: "malformed number".to_string() });
    }

    let text = &self.src[start..self.pos];
    if !is_float {
      if let Ok(i) = text.parse::<i64>() {
        return Ok(ScoreValue::Integer(i));
      }
    }
    text.parse::<f64>()
      .map(ScoreValue::Float)
      .map_err(|_| ParseError::Syntax { offset: start, message: format!("malformed number '{}'", text) })
  }

  fn identifier(&mut self) -> Result<ScoreValue, ParseError> {
    let start = self.pos;
    while let Some(c) = self.peek() {
      if !(c.is_alphanumeric() || c == '_') {
        break;
      }
      self.pos += c.len_utf8();
    }

    match &self.src[start..self.pos] {
      "True" | "true" => Ok(ScoreValue::Bool(true)),
      "False" | "false" => Ok(ScoreValue::Bool(false)),
      "None" | "null" => Ok(ScoreValue::Null),
      other => Err(ParseError::Syntax { offset: start, message: format!("unexpected identifier '{}'", other) }),
    }
  }

  /// Nested dict, list or tuple. Keeps the source text and the structure.
  fn container(&mut self) -> Result<ScoreValue, ParseError> {
    let start = self.pos;
    let structure : Value = self.nested()?;
    Ok(ScoreValue::Unrecognized { raw: self.src[start..self.pos].to_string(), structure })
  }

  fn nested(&mut self) -> Result<Value, ParseError> {
    let close = match self.bump() {
      Some('{') => '}',
      Some('[') => ']',
      _ => ')',
    };
    let mut items : Vec<Value> = Vec::new();
    let mut object : Map<String, Value> = Map::new();

    loop {
      self.skip_whitespace();
      if self.peek() == Some(close) {
        self.pos += 1;
        return Ok(if close == '}' { Value::Object(object) } else { Value::Array(items) });
      }

      let item : ScoreValue = self.value()?;
      self.skip_whitespace();
      if close == '}' {
        self.expect(':')?;
        self.skip_whitespace();
        let value : Value = self.value()?.to_json();
        self.skip_whitespace();
        // JSON objects only take string keys; other literal keys use their text
        let key : String = match item {
          ScoreValue::Text(key) => key,
          other => other.to_string(),
        };
        object.insert(key, value);
      } else {
        items.push(item.to_json());
      }

      match self.peek() {
        Some(',') => { self.pos += 1; },
        Some(c) if c == close => {},
        Some(c) => return Err(self.error(&format!("expected ',' or '{}' but found '{}'", close, c))),
        None => return Err(self.error("unterminated container")),
      }
    }
  }
}
