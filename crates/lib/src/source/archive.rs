//! Source archives downloaded over HTTP.
//!
//! The archive is verified against its SHA256 before extraction. Upstream
//! release tarballs wrap everything in a single top-level folder
//! (`magnum-plugins-2020.06/`), which is stripped on extraction.

use std::fs::File;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::FetchError;

/// Download `url`, verify it, and extract it into `dest`.
pub async fn fetch_archive(url: &str, expected_sha256: &str, dest: &Path, download_dir: &Path) -> Result<(), FetchError> {
  super::reset_dir(dest)?;
  tokio::fs::create_dir_all(download_dir)
    .await
    .map_err(|e| FetchError::Io {
      path: download_dir.to_path_buf(),
      source: e,
    })?;

  let archive_path = download_dir.join(url_to_filename(url));
  download(url, expected_sha256, &archive_path).await?;
  extract_tar_gz(&archive_path, dest)?;

  info!(url, path = %dest.display(), "archive extracted");
  Ok(())
}

async fn download(url: &str, expected_sha256: &str, dest: &Path) -> Result<(), FetchError> {
  if dest.exists() {
    match hash_file(dest).await {
      Ok(actual) if actual.eq_ignore_ascii_case(expected_sha256) => {
        info!(path = %dest.display(), "using previously downloaded archive");
        return Ok(());
      }
      Ok(actual) => debug!(expected = %expected_sha256, actual = %actual, "stale download, fetching again"),
      Err(e) => debug!(error = %e, "unreadable download, fetching again"),
    }
  }

  info!(url, "downloading source archive");
  let response = reqwest::get(url).await.map_err(|e| FetchError::Download {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  if !response.status().is_success() {
    return Err(FetchError::Download {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }

  let bytes = response.bytes().await.map_err(|e| FetchError::Download {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  verify_sha256(url, &bytes, expected_sha256)?;

  tokio::fs::write(dest, &bytes).await.map_err(|e| FetchError::Io {
    path: dest.to_path_buf(),
    source: e,
  })?;
  debug!(path = %dest.display(), size = bytes.len(), "download complete");
  Ok(())
}

/// Check `bytes` against the expected lowercase hex SHA256.
pub fn verify_sha256(url: &str, bytes: &[u8], expected: &str) -> Result<(), FetchError> {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  let actual = hex::encode(hasher.finalize());

  if !actual.eq_ignore_ascii_case(expected) {
    return Err(FetchError::HashMismatch {
      url: url.to_string(),
      expected: expected.to_string(),
      actual,
    });
  }
  Ok(())
}

async fn hash_file(path: &Path) -> Result<String, std::io::Error> {
  let bytes = tokio::fs::read(path).await?;
  let mut hasher = Sha256::new();
  hasher.update(&bytes);
  Ok(hex::encode(hasher.finalize()))
}

/// Extract a `.tar.gz` into `dest`, dropping the first path component.
///
/// Entries that would land outside `dest` are skipped.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<(), FetchError> {
  let io_err = |e: std::io::Error| FetchError::Extract {
    path: archive.to_path_buf(),
    source: e,
  };

  let file = File::open(archive).map_err(io_err)?;
  let mut tar = tar::Archive::new(GzDecoder::new(file));

  for entry in tar.entries().map_err(io_err)? {
    let mut entry = entry.map_err(io_err)?;
    let path = entry.path().map_err(io_err)?.into_owned();

    let Some(relative) = strip_first_component(&path) else {
      continue;
    };
    if relative.as_os_str().is_empty() {
      continue;
    }

    let target = dest.join(&relative);
    if let Some(parent) = target.parent() {
      std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    entry.unpack(&target).map_err(io_err)?;
  }
  Ok(())
}

fn strip_first_component(path: &Path) -> Option<PathBuf> {
  let mut components = path.components();
  components.next()?;

  let rest: PathBuf = components.collect();
  if rest
    .components()
    .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
  {
    warn!(path = %path.display(), "skipping archive entry outside the source root");
    return None;
  }
  Some(rest)
}

/// Convert a URL to a safe filename.
fn url_to_filename(url: &str) -> String {
  if let Some(filename) = url.rsplit('/').next() {
    let filename = filename.split('?').next().unwrap_or(filename);
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  let mut hasher = Sha256::new();
  hasher.update(url.as_bytes());
  format!("download_{}", &hex::encode(hasher.finalize())[..16])
}

#[cfg(test)]
mod tests {
  use super::*;
  use flate2::Compression;
  use flate2::write::GzEncoder;
  use tempfile::TempDir;

  fn write_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, content) in entries {
      let mut header = tar::Header::new_gnu();
      header.set_size(content.len() as u64);
      header.set_mode(0o644);
      header.set_cksum();
      builder.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
  }

  #[test]
  fn url_to_filename_uses_last_segment() {
    assert_eq!(
      url_to_filename("https://github.com/mosra/magnum-plugins/archive/v2020.06.tar.gz"),
      "v2020.06.tar.gz"
    );
    assert_eq!(url_to_filename("https://example.com/a b.tgz?x=1"), "a_b.tgz");
    assert!(url_to_filename("https://example.com/").starts_with("download_"));
  }

  #[test]
  fn verify_sha256_detects_mismatch() {
    // sha256("hello")
    let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
    assert!(verify_sha256("u", b"hello", expected).is_ok());
    assert!(verify_sha256("u", b"hello", &expected.to_uppercase()).is_ok());
    assert!(matches!(
      verify_sha256("u", b"hello!", expected),
      Err(FetchError::HashMismatch { .. })
    ));
  }

  #[test]
  fn extract_strips_top_level_folder() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("src.tar.gz");
    write_archive(
      &archive,
      &[
        ("magnum-plugins-2020.06/CMakeLists.txt", "find_package(Magnum REQUIRED)\n"),
        ("magnum-plugins-2020.06/src/MagnumPlugins/README", "plugins\n"),
      ],
    );

    let dest = temp.path().join("out");
    extract_tar_gz(&archive, &dest).unwrap();

    assert_eq!(
      std::fs::read_to_string(dest.join("CMakeLists.txt")).unwrap(),
      "find_package(Magnum REQUIRED)\n"
    );
    assert!(dest.join("src/MagnumPlugins/README").exists());
  }

  #[test]
  fn strip_rejects_parent_components() {
    assert_eq!(strip_first_component(Path::new("top/../../etc/passwd")), None);
    assert_eq!(strip_first_component(Path::new("top/a/b")), Some(PathBuf::from("a/b")));
  }
}
