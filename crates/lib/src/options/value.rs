use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed option value.
///
/// Booleans are the common case; `Choice` carries the value of an enumerated
/// option verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Choice(String),
}

impl OptionValue {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      Self::Choice(_) => None,
    }
  }

  /// The value as a CMake cache variable: `ON`/`OFF` for booleans, the literal
  /// string otherwise.
  pub fn to_cmake(&self) -> String {
    match self {
      Self::Bool(true) => "ON".to_string(),
      Self::Bool(false) => "OFF".to_string(),
      Self::Choice(s) => s.clone(),
    }
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Bool(true) => write!(f, "True"),
      Self::Bool(false) => write!(f, "False"),
      Self::Choice(s) => write!(f, "{}", s),
    }
  }
}

/// Parse the boolean spellings accepted on the command line and in profiles.
pub fn parse_bool(raw: &str) -> Option<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "on" | "yes" => Some(true),
    "false" | "0" | "off" | "no" => Some(false),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn booleans_render_as_on_off() {
    assert_eq!(OptionValue::Bool(true).to_cmake(), "ON");
    assert_eq!(OptionValue::Bool(false).to_cmake(), "OFF");
    assert_eq!(OptionValue::Choice("Release".into()).to_cmake(), "Release");
  }

  #[test]
  fn parse_bool_spellings() {
    assert_eq!(parse_bool("True"), Some(true));
    assert_eq!(parse_bool(" off "), Some(false));
    assert_eq!(parse_bool("zlib"), None);
  }
}
