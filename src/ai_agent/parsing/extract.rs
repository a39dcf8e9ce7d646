use thiserror::Error;

use crate::ai_agent::parsing::literal::parse_literal;
use crate::ai_agent::parsing::score::ScoreMap;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
  #[error("no brace-delimited mapping found in the response")]
  NoRecord,

  #[error("the response mapping is empty")]
  EmptyRecord,

  #[error("invalid mapping literal at offset {offset}: {message}")]
  Syntax { offset: usize, message: String },
}

/// Returns the first `{ ... }` span whose braces balance, skipping braces
/// that sit inside quoted strings. Only the first `{` is ever considered.
pub fn find_record(text: &str) -> Option<&str> {
  let start : usize = text.find('{')?;
  let mut depth : usize = 0;
  let mut quote : Option<char> = None;
  let mut escaped : bool = false;

  for (i, c) in text[start..].char_indices() {
    if let Some(q) = quote {
      if escaped {
        escaped = false;
      } else if c == '\\' {
        escaped = true;
      } else if c == q {
        quote = None;
      }
      continue;
    }

    match c {
      '\'' | '"' => quote = Some(c),
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..=start + i]);
        }
      },
      _ => {}
    }
  }

  None
}

pub fn extract_scores(text: &str) -> Result<ScoreMap, ParseError> {
  let record : &str = find_record(text).ok_or(ParseError::NoRecord)?;
  let scores : ScoreMap = parse_literal(record)?;
  if scores.is_empty() {
    return Err(ParseError::EmptyRecord);
  }
  return Ok(scores);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai_agent::parsing::score::ScoreValue;

  #[test]
  fn extracts_mapping_from_surrounding_prose() {
    let raw = r#"Here you go: {"Business Quality": 7, "Overall score": 7.0} Thanks!"#;
    assert_eq!(find_record(raw), Some(r#"{"Business Quality": 7, "Overall score": 7.0}"#));

    let scores = extract_scores(raw).unwrap();
    let entries: Vec<(&str, &ScoreValue)> = scores.iter().collect();
    assert_eq!(entries, vec![
      ("Business Quality", &ScoreValue::Integer(7)),
      ("Overall score", &ScoreValue::Float(7.0)),
    ]);
  }

  #[test]
  fn reparsing_the_extracted_record_is_stable() {
    let raw = "Sure!\n{'Valuation': 6, 'Notes': {'source': 'filings'}, 'Overall score': 6.2}\nDone {x}";
    let record = find_record(raw).unwrap();
    assert_eq!(find_record(record), Some(record));
    assert_eq!(extract_scores(record), extract_scores(raw));
  }

  #[test]
  fn nested_braces_do_not_truncate() {
    let raw = "{'Valuation': 6, 'Notes': {'source': 'filings'}, 'Growth Potential': 8}";
    assert_eq!(find_record(raw), Some(raw));
    let scores = extract_scores(raw).unwrap();
    assert_eq!(scores.get("Growth Potential"), Some(&ScoreValue::Integer(8)));
  }

  #[test]
  fn braces_inside_strings_are_ignored() {
    let raw = r#"{"Comment": "uses {curly} and \"}\" chars", "Valuation": 5} trailing }"#;
    let scores = extract_scores(raw).unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores.get("Valuation"), Some(&ScoreValue::Integer(5)));
  }

  #[test]
  fn no_braces_is_no_record() {
    assert_eq!(find_record("I cannot answer that."), None);
    assert_eq!(extract_scores("I cannot answer that."), Err(ParseError::NoRecord));
  }

  #[test]
  fn unbalanced_braces_is_no_record() {
    assert_eq!(extract_scores("{'Valuation': 5, 'Profitability': 6"), Err(ParseError::NoRecord));
  }

  #[test]
  fn empty_mapping_is_a_failed_parse() {
    assert_eq!(extract_scores("result: {}"), Err(ParseError::EmptyRecord));
  }

  #[test]
  fn malformed_literal_is_a_syntax_error() {
    let err = extract_scores("{Valuation: 5}").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
    assert!(err.to_string().contains("Valuation"));
  }
}
