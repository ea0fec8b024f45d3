//! External build tool invocation.
//!
//! Every step shells out to CMake once, waits for it, and fails on a non-zero
//! exit. Nothing is retried.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::platform::BuildType;
use crate::platform::paths::cmake_program;

/// Errors from running external tools.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The program could not be started at all.
  #[error("failed to run '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}\n{stderr}")]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// Run `program` with `args` in `cwd`, returning trimmed stdout.
///
/// The environment is inherited; build tools need the caller's `PATH` and
/// compiler setup.
pub async fn run_command(program: &str, args: &[String], cwd: Option<&Path>) -> Result<String, ExecuteError> {
  let cmd = format!("{} {}", program, args.join(" "));
  info!(cmd = %cmd, "executing command");

  let mut command = Command::new(program);
  command.args(args);
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }

  let output = command.output().await.map_err(|e| ExecuteError::Spawn {
    program: program.to_string(),
    source: e,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    return Err(ExecuteError::CmdFailed {
      cmd,
      code: output.status.code(),
      stderr,
    });
  }

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }
  if !stderr.is_empty() {
    debug!(stderr = %stderr, "command stderr");
  }
  Ok(stdout)
}

/// Thin wrapper over the CMake command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmake {
  program: String,
}

impl Default for Cmake {
  fn default() -> Self {
    Self::new(cmake_program())
  }
}

impl Cmake {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }

  /// `cmake -S <source> -B <build> -C <cache script>`
  pub fn configure_args(source_dir: &Path, build_dir: &Path, cache_script: &Path) -> Vec<String> {
    vec![
      "-S".to_string(),
      path_arg(source_dir),
      "-B".to_string(),
      path_arg(build_dir),
      "-C".to_string(),
      path_arg(cache_script),
    ]
  }

  /// `cmake --build <build> --config <type>`
  pub fn build_args(build_dir: &Path, build_type: BuildType) -> Vec<String> {
    vec![
      "--build".to_string(),
      path_arg(build_dir),
      "--config".to_string(),
      build_type.as_str().to_string(),
    ]
  }

  /// `cmake --install <build> --config <type> --prefix <prefix>`
  pub fn install_args(build_dir: &Path, build_type: BuildType, prefix: &Path) -> Vec<String> {
    vec![
      "--install".to_string(),
      path_arg(build_dir),
      "--config".to_string(),
      build_type.as_str().to_string(),
      "--prefix".to_string(),
      path_arg(prefix),
    ]
  }

  pub async fn configure(&self, source_dir: &Path, build_dir: &Path, cache_script: &Path) -> Result<(), ExecuteError> {
    run_command(
      &self.program,
      &Self::configure_args(source_dir, build_dir, cache_script),
      None,
    )
    .await
    .map(|_| ())
  }

  pub async fn build(&self, build_dir: &Path, build_type: BuildType) -> Result<(), ExecuteError> {
    run_command(&self.program, &Self::build_args(build_dir, build_type), None)
      .await
      .map(|_| ())
  }

  pub async fn install(&self, build_dir: &Path, build_type: BuildType, prefix: &Path) -> Result<PathBuf, ExecuteError> {
    run_command(&self.program, &Self::install_args(build_dir, build_type, prefix), None).await?;
    Ok(prefix.to_path_buf())
  }
}

fn path_arg(path: &Path) -> String {
  path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{echo_msg, failing_cmd};

  #[tokio::test]
  async fn run_command_returns_stdout() {
    let (program, args) = echo_msg("hello");
    let out = run_command(program, &args, None).await.unwrap();
    assert_eq!(out, "hello");
  }

  #[tokio::test]
  async fn non_zero_exit_is_an_error() {
    let (program, args) = failing_cmd(3);
    let result = run_command(program, &args, None).await;
    assert!(matches!(result, Err(ExecuteError::CmdFailed { code: Some(3), .. })));
  }

  #[tokio::test]
  async fn missing_program_fails_to_spawn() {
    let result = run_command("definitely-not-a-cmake-binary", &[], None).await;
    assert!(matches!(result, Err(ExecuteError::Spawn { .. })));
  }

  #[test]
  fn command_lines() {
    let build = Path::new("/w/build/Release");
    assert_eq!(
      Cmake::configure_args(Path::new("/w/src"), build, Path::new("/w/gen/t.cmake")),
      vec!["-S", "/w/src", "-B", "/w/build/Release", "-C", "/w/gen/t.cmake"]
    );
    assert_eq!(
      Cmake::build_args(build, BuildType::Release),
      vec!["--build", "/w/build/Release", "--config", "Release"]
    );
    assert_eq!(
      Cmake::install_args(build, BuildType::Debug, Path::new("/p")),
      vec!["--install", "/w/build/Release", "--config", "Debug", "--prefix", "/p"]
    );
  }
}
