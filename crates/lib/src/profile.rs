//! Profiles: TOML files carrying the inputs of one recipe invocation.
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! build_type = "Debug"
//!
//! [options]
//! shared = true
//! with_stlimporter = true
//!
//! [options.magnum]
//! with_tgaimporter = true
//!
//! [dependencies]
//! magnum = "/opt/pkgs/magnum"
//! corrade = "/opt/pkgs/corrade"
//!
//! [source]
//! kind = "path"
//! path = "/src/magnum-plugins"
//! ```
//!
//! A table under `[options]` holds options requested for the dependency of
//! that name; plain values are options of this package.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::deps::DependencyOptions;
use crate::options::{OptionValue, Options, OptionsError};
use crate::platform::{Settings, SettingsError};
use crate::source::SourceSpec;
use crate::toolchain::DependencyRoots;

#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("failed to read profile '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse profile: {0}")]
  Parse(#[from] toml::de::Error),
}

/// A value under `[options]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileOption {
  Value(OptionValue),
  Scoped(BTreeMap<String, OptionValue>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
  pub settings: BTreeMap<String, String>,
  pub options: BTreeMap<String, ProfileOption>,
  pub dependencies: BTreeMap<String, PathBuf>,
  pub source: Option<SourceSpec>,
}

impl Profile {
  pub fn load(path: &Path) -> Result<Self, ProfileError> {
    let content = fs::read_to_string(path).map_err(|e| ProfileError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    let profile = Self::from_toml(&content)?;
    debug!(path = %path.display(), options = profile.options.len(), "loaded profile");
    Ok(profile)
  }

  pub fn from_toml(content: &str) -> Result<Self, ProfileError> {
    Ok(toml::from_str(content)?)
  }

  /// Apply `[settings]` on top of `settings`.
  ///
  /// `os` is applied first so that an explicit `compiler` is not reset by it.
  pub fn apply_settings(&self, settings: &mut Settings) -> Result<(), SettingsError> {
    if let Some(os) = self.settings.get("os") {
      settings.set("os", os)?;
    }
    for (key, value) in self.settings.iter().filter(|(k, _)| k.as_str() != "os") {
      settings.set(key, value)?;
    }
    Ok(())
  }

  /// Apply this package's `[options]` values on top of `options`.
  pub fn apply_options(&self, options: &mut Options) -> Result<(), OptionsError> {
    for (name, option) in &self.options {
      if let ProfileOption::Value(value) = option {
        options.set_value(name, value)?;
      }
    }
    Ok(())
  }

  /// Options requested for dependencies, from the scoped `[options.<dep>]` tables.
  pub fn dependency_options(&self) -> DependencyOptions {
    self
      .options
      .iter()
      .filter_map(|(name, option)| match option {
        ProfileOption::Scoped(values) => Some((name.clone(), values.clone())),
        ProfileOption::Value(_) => None,
      })
      .collect()
  }

  pub fn dependency_roots(&self) -> DependencyRoots {
    self.dependencies.clone()
  }
}
