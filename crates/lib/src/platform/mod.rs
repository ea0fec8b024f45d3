//! Target settings: the os/arch/compiler/build type a package is built for.

pub mod arch;
pub mod compiler;
pub mod os;
pub mod paths;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arch::Arch;
pub use compiler::{BuildType, Compiler};
pub use os::Os;

/// Errors from applying a setting override.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
  #[error("unknown setting '{0}' (expected one of: os, arch, compiler, build_type)")]
  UnknownSetting(String),

  #[error("invalid value '{value}' for setting '{setting}'")]
  InvalidValue { setting: String, value: String },

  #[error("host platform is not supported: {os}/{arch}")]
  UnsupportedHost { os: String, arch: String },
}

/// The settings a single recipe invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
  pub os: Os,
  pub arch: Arch,
  pub compiler: Compiler,
  pub build_type: BuildType,
}

impl Settings {
  /// Settings for `os` with that OS's default compiler and a Release build
  pub fn for_os(os: Os, arch: Arch) -> Self {
    Self {
      os,
      arch,
      compiler: Compiler::default_for(os),
      build_type: BuildType::default(),
    }
  }

  /// Detect settings for the running host, with `os` and `arch` taking the
  /// place of detection when given.
  pub fn detect_with(os: Option<Os>, arch: Option<Arch>) -> Result<Self, SettingsError> {
    match (os.or_else(Os::current), arch.or_else(Arch::current)) {
      (Some(os), Some(arch)) => Ok(Self::for_os(os, arch)),
      _ => Err(SettingsError::UnsupportedHost {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
      }),
    }
  }

  /// Apply a single `key=value` override.
  ///
  /// Changing `os` also resets the compiler to that OS's default; set
  /// `compiler` afterwards to pick a different one.
  pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidValue {
      setting: key.to_string(),
      value: value.to_string(),
    };

    match key {
      "os" => {
        self.os = value.parse().map_err(|_| invalid())?;
        self.compiler = Compiler::default_for(self.os);
      }
      "arch" => self.arch = value.parse().map_err(|_| invalid())?,
      "compiler" => self.compiler = value.parse().map_err(|_| invalid())?,
      "build_type" => self.build_type = value.parse().map_err(|_| invalid())?,
      _ => return Err(SettingsError::UnknownSetting(key.to_string())),
    }
    Ok(())
  }

  /// Returns the platform triple string (e.g., "x86_64-Linux-gcc")
  pub fn triple(&self) -> String {
    format!("{}-{}-{}", self.arch, self.os, self.compiler)
  }
}

impl fmt::Display for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.triple(), self.build_type)
  }
}
