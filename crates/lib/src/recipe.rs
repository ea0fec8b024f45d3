//! The recipe processor.
//!
//! Drives the six phases in order: resolve options, declare dependencies,
//! acquire source, generate the build configuration, build, package. The first
//! two run on construction; the rest are explicit calls so the CLI can stop
//! after any of them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::consts::{PACKAGE_NAME, PACKAGE_VERSION, SOURCE_SUBFOLDER, UPSTREAM_URL};
use crate::deps::{Dependencies, declare_dependencies_with};
use crate::execute::{Cmake, ExecuteError};
use crate::options::{Options, OptionsError, split_assignment};
use crate::package::{PackageError, PackageInfo, PackageInputs, package};
use crate::platform::paths::{store_dir, work_dir};
use crate::platform::{Arch, Os, Settings, SettingsError};
use crate::profile::{Profile, ProfileError};
use crate::source::{FetchError, SOURCE_SUBSTITUTIONS, SourceReport, SourceSpec, acquire_source};
use crate::toolchain::{BuildConfig, DependencyRoots, generate_build_config};
use crate::util::hash::{HashError, Hashable, PackageId};

/// Static description of the packaged library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecipeMetadata {
  pub name: &'static str,
  pub version: &'static str,
  pub description: &'static str,
  pub topics: &'static [&'static str],
  pub url: &'static str,
  pub homepage: &'static str,
  pub license: &'static str,
  pub author: &'static str,
  pub source_url: &'static str,
  pub source_rev: &'static str,
}

pub const RECIPE: RecipeMetadata = RecipeMetadata {
  name: PACKAGE_NAME,
  version: PACKAGE_VERSION,
  description: "Magnum-Plugins - Lightweight and modular C++11/C++14 graphics middleware for games and data visualization",
  topics: &["corrade", "graphics", "rendering", "3d", "2d", "opengl"],
  url: "https://github.com/TUM-CONAN/conan-magnum-plugins",
  homepage: "https://magnum.graphics",
  license: "MIT",
  author: "ulrich eck (forked on github)",
  source_url: UPSTREAM_URL,
  source_rev: "v2020.06",
};

/// Errors from any recipe phase.
#[derive(Debug, Error)]
pub enum RecipeError {
  #[error(transparent)]
  Settings(#[from] SettingsError),

  #[error("malformed setting '{0}', expected key=value")]
  MalformedSetting(String),

  #[error(transparent)]
  Options(#[from] OptionsError),

  #[error(transparent)]
  Profile(#[from] ProfileError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Execute(#[from] ExecuteError),

  #[error(transparent)]
  Package(#[from] PackageError),

  #[error("failed to compute package id: {0}")]
  Hash(#[from] HashError),

  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Where sources, builds and packages live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub work_dir: PathBuf,
  pub store_dir: PathBuf,
}

impl Default for Layout {
  fn default() -> Self {
    Self::new(work_dir(), store_dir())
  }
}

impl Layout {
  pub fn new(work_dir: PathBuf, store_dir: PathBuf) -> Self {
    Self { work_dir, store_dir }
  }

  pub fn source_dir(&self) -> PathBuf {
    self.work_dir.join(SOURCE_SUBFOLDER)
  }

  pub fn download_dir(&self) -> PathBuf {
    self.work_dir.join("downloads")
  }

  pub fn build_dir(&self, settings: &Settings) -> PathBuf {
    self.work_dir.join("build").join(settings.build_type.as_str())
  }

  pub fn generators_dir(&self, settings: &Settings) -> PathBuf {
    self.build_dir(settings).join("generators")
  }

  pub fn package_dir(&self, id: &PackageId) -> PathBuf {
    self.store_dir.join(PACKAGE_NAME).join(PACKAGE_VERSION).join(&id.0)
  }
}

/// Command-line overrides, applied after the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
  /// `key=value` settings.
  pub settings: Vec<String>,
  /// `name=value` options.
  pub options: Vec<String>,
}

/// Inputs that select one binary package.
#[derive(Serialize)]
struct PackageKey<'a> {
  settings: &'a Settings,
  options: &'a Options,
  requires: Vec<String>,
}

impl Hashable for PackageKey<'_> {}

/// Output of the configuration phase.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
  pub config: BuildConfig,
  pub cache_script: PathBuf,
}

/// Everything a full run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOutcome {
  pub source: SourceReport,
  pub generated: Generated,
  pub package: PackageInfo,
}

/// Host settings to start resolution from.
///
/// An `os` or `arch` pinned by the profile or `overrides` replaces detection
/// of that part, so an unrecognized host can still target a known platform.
pub fn host_settings(profile: &Profile, overrides: &Overrides) -> Result<Settings, RecipeError> {
  let mut pinned: BTreeMap<&str, &str> = profile
    .settings
    .iter()
    .map(|(key, value)| (key.as_str(), value.as_str()))
    .collect();
  for assignment in &overrides.settings {
    let (key, value) =
      split_assignment(assignment).ok_or_else(|| RecipeError::MalformedSetting(assignment.clone()))?;
    pinned.insert(key, value);
  }

  let invalid = |setting: &str, value: &str| SettingsError::InvalidValue {
    setting: setting.to_string(),
    value: value.to_string(),
  };
  let os = match pinned.get("os") {
    Some(value) => Some(value.parse::<Os>().map_err(|_| invalid("os", value))?),
    None => None,
  };
  let arch = match pinned.get("arch") {
    Some(value) => Some(value.parse::<Arch>().map_err(|_| invalid("arch", value))?),
    None => None,
  };
  Ok(Settings::detect_with(os, arch)?)
}

#[derive(Debug, Clone)]
pub struct RecipeProcessor {
  settings: Settings,
  options: Options,
  dependencies: Dependencies,
  dependency_roots: DependencyRoots,
  source: SourceSpec,
  layout: Layout,
  cmake: Cmake,
}

impl RecipeProcessor {
  /// Resolve settings and options and declare dependencies.
  ///
  /// `host` is the starting point; the profile and then `overrides` are
  /// applied on top of it.
  pub fn new(profile: &Profile, host: Settings, overrides: &Overrides, layout: Layout) -> Result<Self, RecipeError> {
    let mut settings = host;
    profile.apply_settings(&mut settings)?;
    for assignment in &overrides.settings {
      let (key, value) =
        split_assignment(assignment).ok_or_else(|| RecipeError::MalformedSetting(assignment.clone()))?;
      settings.set(key, value)?;
    }

    let mut options = Options::resolve(&settings);
    profile.apply_options(&mut options)?;
    for assignment in &overrides.options {
      options.assign(assignment)?;
    }

    let dependencies = declare_dependencies_with(&options, &profile.dependency_options());
    info!(
      settings = %settings,
      options = options.len(),
      requires = dependencies.len(),
      "recipe resolved"
    );

    Ok(Self {
      settings,
      options,
      dependencies,
      dependency_roots: profile.dependency_roots(),
      source: profile.source.clone().unwrap_or_default(),
      layout,
      cmake: Cmake::default(),
    })
  }

  pub fn with_cmake(mut self, cmake: Cmake) -> Self {
    self.cmake = cmake;
    self
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  pub fn dependencies(&self) -> &Dependencies {
    &self.dependencies
  }

  pub fn dependency_roots(&self) -> &DependencyRoots {
    &self.dependency_roots
  }

  pub fn source(&self) -> &SourceSpec {
    &self.source
  }

  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  pub fn package_id(&self) -> Result<PackageId, RecipeError> {
    let key = PackageKey {
      settings: &self.settings,
      options: &self.options,
      requires: self.dependencies.references(),
    };
    Ok(key.compute_hash()?)
  }

  pub fn package_dir(&self) -> Result<PathBuf, RecipeError> {
    Ok(self.layout.package_dir(&self.package_id()?))
  }

  /// Fetch and patch the source into the work folder.
  pub async fn acquire_source(&self) -> Result<SourceReport, RecipeError> {
    self.acquire_source_into(&self.layout.source_dir()).await
  }

  /// Fetch and patch the source into `dest`.
  pub async fn acquire_source_into(&self, dest: &Path) -> Result<SourceReport, RecipeError> {
    let report = acquire_source(&self.source, dest, &self.layout.download_dir(), SOURCE_SUBSTITUTIONS).await?;
    Ok(report)
  }

  /// The configuration map, without touching the filesystem.
  pub fn build_config(&self) -> BuildConfig {
    generate_build_config(&self.options, self.settings.build_type, &self.dependency_roots)
  }

  /// Generate the configuration and write the cache script.
  pub fn generate(&self) -> Result<Generated, RecipeError> {
    let config = self.build_config();
    let generators_dir = self.layout.generators_dir(&self.settings);
    let cache_script = config
      .write_cache_script(&generators_dir)
      .map_err(|e| RecipeError::Io {
        path: generators_dir.clone(),
        source: e,
      })?;
    Ok(Generated { config, cache_script })
  }

  /// Configure and build with CMake.
  pub async fn build(&self, generated: &Generated) -> Result<(), RecipeError> {
    let build_dir = self.layout.build_dir(&self.settings);
    fs::create_dir_all(&build_dir).map_err(|e| RecipeError::Io {
      path: build_dir.clone(),
      source: e,
    })?;

    self
      .cmake
      .configure(&self.layout.source_dir(), &build_dir, &generated.cache_script)
      .await?;
    self.cmake.build(&build_dir, self.settings.build_type).await?;
    info!(build_dir = %build_dir.display(), "build finished");
    Ok(())
  }

  /// Install the build into the store.
  pub async fn package(&self) -> Result<PackageInfo, RecipeError> {
    let package_id = self.package_id()?;
    let package_dir = self.layout.package_dir(&package_id);
    let source_dir = self.layout.source_dir();
    let build_dir = self.layout.build_dir(&self.settings);

    let inputs = PackageInputs {
      settings: &self.settings,
      options: &self.options,
      dependencies: &self.dependencies,
      package_id: &package_id,
      source_dir: &source_dir,
      build_dir: &build_dir,
      package_dir: &package_dir,
    };
    Ok(package(&self.cmake, &inputs).await?)
  }

  /// Run every phase after construction.
  pub async fn create(&self) -> Result<CreateOutcome, RecipeError> {
    let source = self.acquire_source().await?;
    let generated = self.generate()?;
    self.build(&generated).await?;
    let package = self.package().await?;
    Ok(CreateOutcome {
      source,
      generated,
      package,
    })
  }
}
