//! Option resolution.
//!
//! Options start from the catalog defaults for the target platform. Options
//! whose [`Availability`] excludes the target OS are dropped from the set
//! entirely rather than defaulted, so later phases see them as absent.

pub mod catalog;
pub mod value;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::platform::{Os, Settings};

pub use catalog::{Availability, CATALOG, OptionDecl, OptionKind};
pub use value::{OptionValue, parse_bool};

/// Errors from setting option values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
  #[error("unknown option '{0}'")]
  UnknownOption(String),

  #[error("option '{name}' does not exist when targeting {os}")]
  NotAvailable { name: String, os: Os },

  #[error("invalid value '{value}' for option '{name}', expected one of {expected}")]
  InvalidValue {
    name: String,
    value: String,
    expected: String,
  },

  #[error("malformed assignment '{0}', expected name=value")]
  MalformedAssignment(String),
}

/// The resolved option set of one recipe invocation.
///
/// Iteration order is sorted by name, so anything derived from it is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Options {
  values: BTreeMap<String, OptionValue>,
  #[serde(skip)]
  catalog: &'static [OptionDecl],
  #[serde(skip)]
  os: Os,
}

impl Options {
  /// Catalog defaults for `settings`, with unavailable options removed.
  pub fn resolve(settings: &Settings) -> Self {
    Self::resolve_from(CATALOG, settings.os)
  }

  /// Resolve an arbitrary catalog for `os`.
  pub fn resolve_from(catalog: &'static [OptionDecl], os: Os) -> Self {
    let values = catalog
      .iter()
      .filter(|decl| {
        let available = decl.availability.includes(os);
        if !available {
          debug!(option = decl.name, os = %os, "option removed for target platform");
        }
        available
      })
      .map(|decl| (decl.name.to_string(), decl.default_value()))
      .collect();

    Self {
      values,
      catalog,
      os,
    }
  }

  pub fn get(&self, name: &str) -> Option<&OptionValue> {
    self.values.get(name)
  }

  /// Boolean value of `name`, `None` if absent or not a boolean.
  pub fn get_bool(&self, name: &str) -> Option<bool> {
    self.get(name).and_then(OptionValue::as_bool)
  }

  /// True only if `name` exists and is a true boolean.
  pub fn is_enabled(&self, name: &str) -> bool {
    self.get_bool(name).unwrap_or(false)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn shared(&self) -> bool {
    self.is_enabled(catalog::SHARED)
  }

  /// The position-independent-code option, `None` where the platform lacks it.
  pub fn fpic(&self) -> Option<bool> {
    self.get_bool(catalog::FPIC)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The catalog entry for `name`.
  pub fn declaration(&self, name: &str) -> Option<OptionDecl> {
    catalog::find(self.catalog, name)
  }

  /// Set `name` from its textual form, validated against the option's domain.
  pub fn set(&mut self, name: &str, raw: &str) -> Result<(), OptionsError> {
    let decl = self.available_decl(name)?;
    let invalid = || OptionsError::InvalidValue {
      name: name.to_string(),
      value: raw.to_string(),
      expected: decl.domain(),
    };

    let value = match decl.kind {
      OptionKind::Bool { .. } => OptionValue::Bool(parse_bool(raw).ok_or_else(invalid)?),
      OptionKind::Choice { choices, .. } => {
        if !choices.contains(&raw) {
          return Err(invalid());
        }
        OptionValue::Choice(raw.to_string())
      }
    };

    debug!(option = name, value = %value, "option override");
    self.values.insert(name.to_string(), value);
    Ok(())
  }

  /// Set `name` from an already typed value.
  ///
  /// A string given for a boolean option goes through the same parsing as
  /// [`Options::set`].
  pub fn set_value(&mut self, name: &str, value: &OptionValue) -> Result<(), OptionsError> {
    match value {
      OptionValue::Bool(b) => {
        let decl = self.available_decl(name)?;
        match decl.kind {
          OptionKind::Bool { .. } => {
            self.values.insert(name.to_string(), OptionValue::Bool(*b));
            Ok(())
          }
          OptionKind::Choice { .. } => Err(OptionsError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: decl.domain(),
          }),
        }
      }
      OptionValue::Choice(raw) => self.set(name, raw),
    }
  }

  /// Apply a `name=value` assignment.
  pub fn assign(&mut self, assignment: &str) -> Result<(), OptionsError> {
    let (name, value) = split_assignment(assignment)
      .ok_or_else(|| OptionsError::MalformedAssignment(assignment.to_string()))?;
    self.set(name, value)
  }

  fn available_decl(&self, name: &str) -> Result<OptionDecl, OptionsError> {
    let decl = catalog::find(self.catalog, name).ok_or_else(|| OptionsError::UnknownOption(name.to_string()))?;
    if !self.values.contains_key(name) {
      return Err(OptionsError::NotAvailable {
        name: name.to_string(),
        os: self.os,
      });
    }
    Ok(decl)
  }
}

/// Split `name=value`, trimming whitespace around both halves.
pub fn split_assignment(assignment: &str) -> Option<(&str, &str)> {
  let (name, value) = assignment.split_once('=')?;
  let name = name.trim();
  if name.is_empty() {
    return None;
  }
  Some((name, value.trim()))
}
