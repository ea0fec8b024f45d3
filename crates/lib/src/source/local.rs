//! Local source trees, copied into the work folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::FetchError;

/// Copy the tree at `src` into `dest`, skipping version-control metadata.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize, FetchError> {
  let src = dunce::canonicalize(src).map_err(|e| {
    if e.kind() == std::io::ErrorKind::NotFound {
      FetchError::PathNotFound(src.to_path_buf())
    } else {
      FetchError::Io {
        path: src.to_path_buf(),
        source: e,
      }
    }
  })?;
  let resolved = resolve_dest(dest).map_err(|e| FetchError::Io {
    path: dest.to_path_buf(),
    source: e,
  })?;
  if resolved.starts_with(&src) || src.starts_with(&resolved) {
    return Err(FetchError::Overlap {
      src,
      dest: dest.to_path_buf(),
    });
  }
  super::reset_dir(dest)?;

  info!(from = %src.display(), to = %dest.display(), "copying local source tree");

  let mut copied = 0;
  let walker = WalkDir::new(&src)
    .min_depth(1)
    .into_iter()
    .filter_entry(|e| e.file_name() != ".git");

  for entry in walker {
    let entry = entry.map_err(|e| FetchError::Io {
      path: e.path().map(Path::to_path_buf).unwrap_or_else(|| src.clone()),
      source: e.into(),
    })?;
    let relative = entry.path().strip_prefix(&src).unwrap_or(entry.path());
    let target = dest.join(relative);

    let result = if entry.file_type().is_dir() {
      fs::create_dir_all(&target)
    } else {
      fs::copy(entry.path(), &target).map(|_| {
        copied += 1;
      })
    };
    result.map_err(|e| FetchError::Io {
      path: target.clone(),
      source: e,
    })?;
  }

  debug!(files = copied, "local source copied");
  Ok(copied)
}

/// Canonical form of `path`, which may not exist yet.
fn resolve_dest(path: &Path) -> std::io::Result<PathBuf> {
  if path.exists() {
    return dunce::canonicalize(path);
  }
  let absolute = std::path::absolute(path)?;
  match (absolute.parent(), absolute.file_name()) {
    (Some(parent), Some(name)) => Ok(resolve_dest(parent)?.join(name)),
    _ => Ok(absolute),
  }
}
