//! Git checkouts of a pinned revision.

use std::path::Path;

use tracing::{debug, info};

use super::FetchError;

/// Clone `url` into `dest` with `rev` checked out.
///
/// `rev` must name a tag or branch; the returned string is the commit it
/// resolved to. Any existing `dest` is replaced so every checkout starts from
/// a pristine tree.
pub fn fetch_git(url: &str, rev: &str, dest: &Path) -> Result<String, FetchError> {
  super::reset_dir(dest)?;

  info!(url, rev, path = %dest.display(), "cloning repository");
  let repo = clone_repo(url, rev, dest)?;

  let commit = resolve_revision(&repo, rev)?;
  debug!(rev, commit = %commit, "resolved revision");
  Ok(commit)
}

fn clone_repo(url: &str, rev: &str, dest: &Path) -> Result<gix::Repository, FetchError> {
  let prepared = gix::prepare_clone(url, dest).map_err(|e| FetchError::Clone {
    url: url.to_string(),
    source: Box::new(e),
  })?;

  let mut prepared = prepared.with_ref_name(Some(rev)).map_err(|e| FetchError::Checkout {
    rev: rev.to_string(),
    source: Box::new(e),
  })?;

  let (mut checkout, _outcome) = prepared
    .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| FetchError::Clone {
      url: url.to_string(),
      source: Box::new(e),
    })?;

  let (repo, _outcome) = checkout
    .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| FetchError::Checkout {
      rev: rev.to_string(),
      source: Box::new(e),
    })?;

  Ok(repo)
}

/// Resolve a revision spec to a commit hash.
fn resolve_revision(repo: &gix::Repository, rev: &str) -> Result<String, FetchError> {
  let spec = repo.rev_parse(rev).map_err(|_| FetchError::RevisionNotFound { rev: rev.to_string() })?;

  let object_id = spec.single().ok_or_else(|| FetchError::RevisionNotFound {
    rev: format!("{} (ambiguous)", rev),
  })?;

  let object = object_id.object().map_err(|e| FetchError::RevisionNotFound {
    rev: format!("{}: {}", rev, e),
  })?;

  let commit = object.peel_to_commit().map_err(|e| FetchError::RevisionNotFound {
    rev: format!("{}: {}", rev, e),
  })?;

  Ok(commit.id.to_string())
}

// Clone tests need network access; acquisition is covered through path
// sources in the library tests.
