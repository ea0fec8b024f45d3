//! Literal find-and-replace edits on fetched upstream files.
//!
//! These are plain substring replacements. When the search text is missing
//! (upstream drifted) the file is left byte-for-byte unchanged and nothing is
//! raised; the miss is logged and recorded in the [`PatchReport`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PatchError {
  #[error("failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// One replacement, applied to every occurrence of `search` in `file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
  /// Path relative to the source root.
  pub file: &'static str,
  pub search: &'static str,
  pub replace: &'static str,
}

/// Edits applied to every magnum-plugins checkout before configuring.
pub const SOURCE_SUBSTITUTIONS: &[Substitution] = &[
  // Let find_package honor <Package>_ROOT variables.
  Substitution {
    file: "CMakeLists.txt",
    search: "find_package(Magnum REQUIRED)",
    replace: "cmake_policy(SET CMP0074 NEW)\nfind_package(Magnum REQUIRED)",
  },
  Substitution {
    file: "src/MagnumPlugins/AssimpImporter/CMakeLists.txt",
    search: "assimp::assimp",
    replace: "Assimp::Assimp",
  },
];

/// Outcome of one substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
  pub file: String,
  pub search: String,
  pub applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
  pub outcomes: Vec<PatchOutcome>,
}

impl PatchReport {
  pub fn applied(&self) -> usize {
    self.outcomes.iter().filter(|o| o.applied).count()
  }

  pub fn missed(&self) -> impl Iterator<Item = &PatchOutcome> {
    self.outcomes.iter().filter(|o| !o.applied)
  }
}

/// Replace every occurrence of `search` in `input`.
///
/// Returns `None`, and leaves the caller's text alone, when `search` does not
/// occur.
pub fn replace_in_str(input: &str, search: &str, replace: &str) -> Option<String> {
  if search.is_empty() || !input.contains(search) {
    return None;
  }
  Some(input.replace(search, replace))
}

/// Apply a replacement to the file at `path`.
///
/// Returns whether the file changed. The file is not rewritten when the search
/// text is absent.
pub fn replace_in_file(path: &Path, search: &str, replace: &str) -> Result<bool, PatchError> {
  let content = fs::read_to_string(path).map_err(|e| PatchError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;

  match replace_in_str(&content, search, replace) {
    Some(patched) => {
      fs::write(path, patched).map_err(|e| PatchError::Write {
        path: path.to_path_buf(),
        source: e,
      })?;
      debug!(path = %path.display(), search, "substitution applied");
      Ok(true)
    }
    None => {
      warn!(path = %path.display(), search, "substitution target not found, file left unchanged");
      Ok(false)
    }
  }
}

/// Apply `substitutions` below `root` in order.
///
/// A missing file is an error; a missing search string is not.
pub fn apply_substitutions(root: &Path, substitutions: &[Substitution]) -> Result<PatchReport, PatchError> {
  let mut report = PatchReport::default();
  for sub in substitutions {
    let applied = replace_in_file(&root.join(sub.file), sub.search, sub.replace)?;
    report.outcomes.push(PatchOutcome {
      file: sub.file.to_string(),
      search: sub.search.to_string(),
      applied,
    });
  }
  Ok(report)
}
