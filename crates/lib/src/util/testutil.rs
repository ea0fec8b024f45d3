//! Test utilities for magnum-recipe-lib.
//!
//! Cross-platform helpers for tests that run external commands, plus a stub
//! `cmake` that records its arguments and fakes an install.

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Returns the command and args to echo a message.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}

/// Returns a command that exits with `code`.
#[cfg(unix)]
pub fn failing_cmd(code: i32) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), format!("echo boom >&2; exit {}", code)])
}

#[cfg(windows)]
pub fn failing_cmd(code: i32) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("exit {}", code)])
}

/// Write an executable stub standing in for `cmake`.
///
/// Each invocation appends its arguments as one line to `cmake.log` next to
/// the script. `--install ... --prefix <dir>` creates `<dir>/lib` with the
/// given library files and `<dir>/include/Magnum`.
#[cfg(unix)]
pub fn fake_cmake(dir: &Path, libs: &[&str]) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let log = dir.join("cmake.log");
  let touches: String = libs
    .iter()
    .map(|lib| format!("  touch \"$prefix/lib/{}\"\n", lib))
    .collect();
  let script = format!(
    r#"#!/bin/sh
echo "$@" >> "{log}"
if [ "$1" = "--install" ]; then
  prefix=""
  while [ $# -gt 0 ]; do
    if [ "$1" = "--prefix" ]; then
      prefix="$2"
    fi
    shift
  done
  mkdir -p "$prefix/lib" "$prefix/include/Magnum"
{touches}fi
exit 0
"#,
    log = log.display(),
    touches = touches,
  );

  let path = dir.join("cmake");
  std::fs::write(&path, script).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
