//! Packaging: install the build into the package folder and describe what
//! consumers need to link against it.

pub mod link;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{PACKAGE_INFO_FILE, PACKAGE_NAME, PACKAGE_VERSION};
use crate::deps::Dependencies;
use crate::execute::{Cmake, ExecuteError};
use crate::options::Options;
use crate::platform::{Os, Settings};
use crate::util::hash::PackageId;

pub use link::{LINK_TABLE, LinkRule, Linkage, SystemLinks, link_arg, system_links};

/// License files looked for at the source root, in order.
pub const LICENSE_FILES: &[&str] = &["LICENSE", "COPYING"];

const LIBRARY_EXTENSIONS: &[&str] = &["a", "lib", "so", "dylib"];

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Execute(#[from] ExecuteError),

  #[error("failed to serialize package info: {0}")]
  Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PackageError + '_ {
  move |source| PackageError::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// Consumer-facing description of an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
  pub package_id: PackageId,
  pub settings: Settings,
  pub options: serde_json::Value,
  pub package_folder: PathBuf,
  pub include_dirs: Vec<String>,
  pub lib_dirs: Vec<String>,
  pub bin_dirs: Vec<String>,
  /// Packaged libraries followed by required system libraries.
  pub libs: Vec<String>,
  pub exelinkflags: Vec<String>,
  /// References of the declared dependencies.
  pub requires: Vec<String>,
}

impl PackageInfo {
  /// Libraries rendered as linker arguments for the package's compiler.
  pub fn link_args(&self) -> Vec<String> {
    self
      .libs
      .iter()
      .map(|lib| link_arg(lib, self.settings.compiler))
      .chain(self.exelinkflags.iter().cloned())
      .collect()
  }

  pub fn load(package_dir: &Path) -> Result<Self, PackageError> {
    let path = package_dir.join(PACKAGE_INFO_FILE);
    let content = fs::read_to_string(&path).map_err(io_err(&path))?;
    Ok(serde_json::from_str(&content)?)
  }
}

/// Everything the packaging phase reads.
#[derive(Debug, Clone, Copy)]
pub struct PackageInputs<'a> {
  pub settings: &'a Settings,
  pub options: &'a Options,
  pub dependencies: &'a Dependencies,
  pub package_id: &'a PackageId,
  pub source_dir: &'a Path,
  pub build_dir: &'a Path,
  pub package_dir: &'a Path,
}

/// Install the build into `inputs.package_dir` and write its package info.
///
/// The package folder is recreated from scratch.
pub async fn package(cmake: &Cmake, inputs: &PackageInputs<'_>) -> Result<PackageInfo, PackageError> {
  let package_dir = inputs.package_dir;
  if package_dir.exists() {
    fs::remove_dir_all(package_dir).map_err(io_err(package_dir))?;
  }
  fs::create_dir_all(package_dir).map_err(io_err(package_dir))?;

  copy_licenses(inputs.source_dir, &package_dir.join("licenses"))?;

  cmake
    .install(inputs.build_dir, inputs.settings.build_type, package_dir)
    .await?;

  let info = package_info(inputs)?;
  let info_path = package_dir.join(PACKAGE_INFO_FILE);
  let temp_path = package_dir.join(format!("{}.tmp", PACKAGE_INFO_FILE));
  fs::write(&temp_path, serde_json::to_string_pretty(&info)?).map_err(io_err(&temp_path))?;
  fs::rename(&temp_path, &info_path).map_err(io_err(&info_path))?;

  info!(
    package = %package_dir.display(),
    libs = info.libs.len(),
    "package created"
  );
  Ok(info)
}

/// Describe the installed package without running anything.
pub fn package_info(inputs: &PackageInputs<'_>) -> Result<PackageInfo, PackageError> {
  let settings = inputs.settings;
  let mut libs = collect_libs(&inputs.package_dir.join("lib"))?;
  if settings.os == Os::Windows {
    for lib in collect_libs(&inputs.package_dir.join("bin"))? {
      if !libs.contains(&lib) {
        libs.push(lib);
      }
    }
  }

  let links = system_links(settings.os, Linkage::from_shared(inputs.options.shared()));
  debug!(os = %settings.os, system_libs = ?links.system_libs, exelinkflags = ?links.exelinkflags, "system link entries");
  libs.extend(links.system_libs);

  Ok(PackageInfo {
    name: PACKAGE_NAME.to_string(),
    version: PACKAGE_VERSION.to_string(),
    package_id: inputs.package_id.clone(),
    settings: *settings,
    options: serde_json::to_value(inputs.options)?,
    package_folder: inputs.package_dir.to_path_buf(),
    include_dirs: vec!["include".to_string()],
    lib_dirs: vec!["lib".to_string()],
    bin_dirs: vec!["bin".to_string()],
    libs,
    exelinkflags: links.exelinkflags,
    requires: inputs.dependencies.references(),
  })
}

/// Copy any license file from `source_dir` into `dest`.
///
/// Returns the number of files copied. Finding none is logged, not fatal.
pub fn copy_licenses(source_dir: &Path, dest: &Path) -> Result<usize, PackageError> {
  let mut copied = 0;
  for name in LICENSE_FILES {
    let src = source_dir.join(name);
    if !src.is_file() {
      continue;
    }
    fs::create_dir_all(dest).map_err(io_err(dest))?;
    let target = dest.join(name);
    fs::copy(&src, &target).map_err(io_err(&target))?;
    copied += 1;
  }

  if copied == 0 {
    warn!(source = %source_dir.display(), "no license file found in source");
  }
  Ok(copied)
}

/// Library names found directly in `lib_dir`, sorted.
///
/// `libfoo.so` and `foo.lib` both yield `foo`. A missing folder yields nothing.
pub fn collect_libs(lib_dir: &Path) -> Result<Vec<String>, PackageError> {
  if !lib_dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut libs = Vec::new();
  for entry in fs::read_dir(lib_dir).map_err(io_err(lib_dir))? {
    let entry = entry.map_err(io_err(lib_dir))?;
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    if let Some(name) = library_name(&path) {
      if !libs.contains(&name) {
        libs.push(name);
      }
    }
  }
  libs.sort();
  Ok(libs)
}

fn library_name(path: &Path) -> Option<String> {
  let ext = path.extension()?.to_str()?;
  if !LIBRARY_EXTENSIONS.contains(&ext) {
    return None;
  }
  let stem = path.file_stem()?.to_str()?;
  let name = if ext == "lib" {
    stem
  } else {
    stem.strip_prefix("lib").unwrap_or(stem)
  };
  (!name.is_empty()).then(|| name.to_string())
}
