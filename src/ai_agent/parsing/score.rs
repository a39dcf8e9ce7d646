use std::fmt;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// One value out of the model's mapping. The model is free to put anything
/// there, so nothing is assumed numeric until `to_f64` says so.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreValue {
  Integer(i64),
  Float(f64),
  Text(String),
  Bool(bool),
  Null,
  /// Nested containers: the source text plus the structure for the JSON view.
  Unrecognized { raw: String, structure: Value },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
  #[error("could not convert string to float: '{0}'")]
  NotANumber(String),

  #[error("value is not a finite number: {0}")]
  NotFinite(String),

  #[error("cannot convert {0} to float")]
  Unsupported(&'static str),
}

impl ScoreValue {
  pub fn type_name(&self) -> &'static str {
    match self {
      ScoreValue::Integer(_) => "integer",
      ScoreValue::Float(_) => "float",
      ScoreValue::Text(_) => "text",
      ScoreValue::Bool(_) => "boolean",
      ScoreValue::Null => "null",
      ScoreValue::Unrecognized { .. } => "container",
    }
  }

  pub fn to_f64(&self) -> Result<f64, CoercionError> {
    let value : f64 = match self {
      ScoreValue::Integer(i) => *i as f64,
      ScoreValue::Float(f) => *f,
      ScoreValue::Bool(b) => if *b { 1.0 } else { 0.0 },
      ScoreValue::Text(s) => s.trim().parse::<f64>().map_err(|_| CoercionError::NotANumber(s.clone()))?,
      ScoreValue::Null | ScoreValue::Unrecognized { .. } => return Err(CoercionError::Unsupported(self.type_name())),
    };

    if !value.is_finite() {
      return Err(CoercionError::NotFinite(self.to_string()));
    }
    return Ok(value);
  }

  pub fn to_json(&self) -> Value {
    match self {
      ScoreValue::Integer(i) => Value::from(*i),
      ScoreValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
      ScoreValue::Text(s) => Value::String(s.clone()),
      ScoreValue::Bool(b) => Value::Bool(*b),
      ScoreValue::Null => Value::Null,
      ScoreValue::Unrecognized { structure, .. } => structure.clone(),
    }
  }
}

/// Formats a float the way the model wrote it: integral values keep a
/// trailing `.0` so `7.0` does not turn into `7`.
pub fn format_float(value: f64) -> String {
  if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
    return format!("{:.1}", value);
  }
  value.to_string()
}

impl fmt::Display for ScoreValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScoreValue::Integer(i) => write!(f, "{}", i),
      ScoreValue::Float(v) => f.write_str(&format_float(*v)),
      ScoreValue::Text(s) => f.write_str(s),
      ScoreValue::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
      ScoreValue::Null => f.write_str("None"),
      ScoreValue::Unrecognized { raw, .. } => f.write_str(raw),
    }
  }
}

/// Parameter name to value, in the order the model emitted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMap {
  entries: Vec<(String, ScoreValue)>,
}

impl ScoreMap {
  pub fn new() -> Self {
    ScoreMap { entries: Vec::new() }
  }

  /// A repeated key keeps its first position and takes the latest value.
  pub fn insert(&mut self, key: String, value: ScoreValue) {
    match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((key, value)),
    }
  }

  pub fn get(&self, key: &str) -> Option<&ScoreValue> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoreValue)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn to_json(&self) -> Value {
    let mut map : Map<String, Value> = Map::new();
    for (key, value) in self.iter() {
      map.insert(key.to_string(), value.to_json());
    }
    return Value::Object(map);
  }
}
