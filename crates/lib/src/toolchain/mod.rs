//! Build configuration generation.
//!
//! Turns resolved options into the flat map of CMake cache variables the
//! upstream build reads, and writes it out as an initial-cache script that is
//! handed to `cmake -C`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::consts::TOOLCHAIN_FILE;
use crate::deps::{ASSIMP, CORRADE, MAGNUM};
use crate::options::{OptionValue, Options};
use crate::platform::BuildType;

pub const BUILD_STATIC: &str = "BUILD_STATIC";
pub const BUILD_STATIC_PIC: &str = "BUILD_STATIC_PIC";
pub const LIB_SUFFIX: &str = "LIB_SUFFIX";
pub const CMAKE_BUILD_TYPE: &str = "CMAKE_BUILD_TYPE";

/// Install folders of dependency packages, keyed by package name.
pub type DependencyRoots = BTreeMap<String, PathBuf>;

/// Variable name -> value, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildConfig {
  variables: BTreeMap<String, String>,
}

impl BuildConfig {
  /// Derive the configuration map from `options` alone.
  ///
  /// Every option becomes an upper-cased variable. `BUILD_STATIC` is the
  /// negation of `shared`, `BUILD_STATIC_PIC` requires a static build and a
  /// true `fPIC` option (absent on Windows), and `LIB_SUFFIX` is forced empty
  /// so Corrade's CMake does not install into e.g. `lib64`.
  pub fn from_options(options: &Options) -> Self {
    let mut config = Self::default();
    for (name, value) in options.iter() {
      config.set_value(name, value);
    }

    let build_static = !options.shared();
    let static_pic = build_static && options.fpic().unwrap_or(false);

    config.set(LIB_SUFFIX, "");
    config.set_value(BUILD_STATIC, &OptionValue::Bool(build_static));
    config.set_value(BUILD_STATIC_PIC, &OptionValue::Bool(static_pic));
    config
  }

  pub fn with_build_type(mut self, build_type: BuildType) -> Self {
    self.set(CMAKE_BUILD_TYPE, build_type.as_str());
    self
  }

  /// Point `find_package` at dependency install folders via `<Name>_ROOT`.
  pub fn with_dependency_roots(mut self, roots: &DependencyRoots) -> Self {
    for (package, path) in roots {
      let var = format!("{}_ROOT", cmake_package_name(package));
      self.set(&var, &cmake_path(path));
    }
    self
  }

  /// Set a variable verbatim; the name keeps its case.
  pub fn set(&mut self, name: &str, value: &str) {
    self.variables.insert(name.to_string(), value.to_string());
  }

  /// Set an option-derived variable; the name is upper-cased.
  fn set_value(&mut self, name: &str, value: &OptionValue) {
    self.variables.insert(name.to_uppercase(), value.to_cmake());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.variables.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.variables.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variables.is_empty()
  }

  /// Render as a CMake initial-cache script.
  pub fn to_cache_script(&self) -> String {
    let mut script = String::from("# Generated by magnum-recipe. Do not edit.\n");
    for (name, value) in self.iter() {
      script.push_str(&format!(
        "set({} \"{}\" CACHE STRING \"\" FORCE)\n",
        name,
        escape_cmake(value)
      ));
    }
    script
  }

  /// Write the cache script into `generators_dir`, returning its path.
  pub fn write_cache_script(&self, generators_dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(generators_dir)?;
    let path = generators_dir.join(TOOLCHAIN_FILE);
    fs::write(&path, self.to_cache_script())?;
    info!(path = %path.display(), variables = self.len(), "wrote build configuration");
    Ok(path)
  }
}

/// Full phase 4: options plus build type and dependency roots.
pub fn generate_build_config(options: &Options, build_type: BuildType, roots: &DependencyRoots) -> BuildConfig {
  let config = BuildConfig::from_options(options)
    .with_build_type(build_type)
    .with_dependency_roots(roots);
  debug!(variables = config.len(), "generated build configuration");
  config
}

/// CMake package name for a dependency, as used in `find_package`.
pub fn cmake_package_name(package: &str) -> String {
  match package {
    CORRADE => "Corrade".to_string(),
    MAGNUM => "Magnum".to_string(),
    ASSIMP => "Assimp".to_string(),
    other => {
      let mut chars = other.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
      }
    }
  }
}

fn cmake_path(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

fn escape_cmake(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"").replace('$', "\\$")
}
