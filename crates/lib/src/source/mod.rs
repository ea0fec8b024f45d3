//! Source acquisition.
//!
//! Fetches the pinned upstream tree into the work folder and applies the
//! recipe's text substitutions. Three kinds of source are supported:
//! - `git`: clone a tag or branch (the default, pinned to `v2020.06`)
//! - `url`: download a `.tar.gz` verified by SHA256
//! - `path`: copy a local tree, for offline builds

pub mod archive;
pub mod git;
pub mod local;
pub mod patch;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::consts::{PACKAGE_VERSION, UPSTREAM_URL};

pub use patch::{PatchReport, SOURCE_SUBSTITUTIONS, Substitution, apply_substitutions, replace_in_file};

/// Errors that can occur while acquiring sources.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Failed to clone a git repository.
  #[error("failed to clone repository '{url}': {source}")]
  Clone {
    url: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// Failed to check out a revision.
  #[error("failed to checkout revision '{rev}': {source}")]
  Checkout {
    rev: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// Failed to find the specified revision.
  #[error("revision '{rev}' not found in repository")]
  RevisionNotFound { rev: String },

  /// HTTP download failed.
  #[error("download failed for {url}: {message}")]
  Download { url: String, message: String },

  /// SHA256 hash mismatch after download.
  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  /// Archive could not be unpacked.
  #[error("failed to extract '{path}': {source}")]
  Extract {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A local source path does not exist.
  #[error("path does not exist: {0}")]
  PathNotFound(PathBuf),

  /// The destination overlaps a local source tree.
  #[error("destination '{dest}' overlaps source '{src}'")]
  Overlap { src: PathBuf, dest: PathBuf },

  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Patch(#[from] patch::PatchError),
}

/// Where the upstream source comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum SourceSpec {
  Git { url: String, rev: String },
  Url { url: String, sha256: String },
  Path { path: PathBuf },
}

impl Default for SourceSpec {
  fn default() -> Self {
    Self::Git {
      url: UPSTREAM_URL.to_string(),
      rev: format!("v{}", PACKAGE_VERSION),
    }
  }
}

impl SourceSpec {
  /// Short human readable description.
  pub fn describe(&self) -> String {
    match self {
      Self::Git { url, rev } => format!("{}@{}", url, rev),
      Self::Url { url, .. } => url.clone(),
      Self::Path { path } => path.display().to_string(),
    }
  }
}

/// Result of acquiring and patching a source tree.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
  pub source_dir: PathBuf,
  /// Commit the git revision resolved to, when the source is a git checkout.
  pub commit: Option<String>,
  pub patches: PatchReport,
}

/// Fetch `spec` into `dest` and apply `substitutions`.
///
/// `download_dir` holds downloaded archives between runs.
pub async fn acquire_source(
  spec: &SourceSpec,
  dest: &Path,
  download_dir: &Path,
  substitutions: &[Substitution],
) -> Result<SourceReport, FetchError> {
  info!(source = %spec.describe(), dest = %dest.display(), "acquiring source");

  let commit = match spec {
    SourceSpec::Git { url, rev } => Some(git::fetch_git(url, rev, dest)?),
    SourceSpec::Url { url, sha256 } => {
      archive::fetch_archive(url, sha256, dest, download_dir).await?;
      None
    }
    SourceSpec::Path { path } => {
      local::copy_tree(path, dest)?;
      None
    }
  };

  let patches = apply_substitutions(dest, substitutions)?;
  info!(applied = patches.applied(), total = patches.outcomes.len(), "source patched");

  Ok(SourceReport {
    source_dir: dest.to_path_buf(),
    commit,
    patches,
  })
}

/// Remove `dir` if present and recreate it empty.
pub(crate) fn reset_dir(dir: &Path) -> Result<(), FetchError> {
  let io_err = |e| FetchError::Io {
    path: dir.to_path_buf(),
    source: e,
  };
  if dir.exists() {
    fs::remove_dir_all(dir).map_err(io_err)?;
  }
  fs::create_dir_all(dir).map_err(io_err)
}
