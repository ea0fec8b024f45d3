//! Shared helpers for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use magnum_recipe_lib::execute::Cmake;
use magnum_recipe_lib::platform::{Arch, Os, Settings};
use magnum_recipe_lib::profile::Profile;
use magnum_recipe_lib::recipe::{Layout, Overrides, RecipeProcessor};
use tempfile::TempDir;

/// Top-level CMakeLists.txt of the 2020.06 release, trimmed to the lines the
/// recipe patches.
pub const ROOT_CMAKELISTS: &str = "cmake_minimum_required(VERSION 3.4)\n\
project(MagnumPlugins CXX)\n\
find_package(Magnum REQUIRED)\n";

pub const ASSIMP_CMAKELISTS: &str = "find_package(Assimp REQUIRED)\n\
target_link_libraries(AssimpImporter PUBLIC Magnum::Trade assimp::assimp)\n";

/// Isolated work folder, store and upstream tree.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_upstream("CMakeLists.txt", ROOT_CMAKELISTS);
    env.write_upstream("src/MagnumPlugins/AssimpImporter/CMakeLists.txt", ASSIMP_CMAKELISTS);
    env.write_upstream("COPYING", "Copyright (c) Vladimír Vondruš\n");
    env
  }

  pub fn upstream(&self) -> PathBuf {
    self.temp.path().join("upstream")
  }

  pub fn write_upstream(&self, relative: &str, content: &str) {
    let path = self.upstream().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  pub fn layout(&self) -> Layout {
    Layout::new(self.temp.path().join("work"), self.temp.path().join("store"))
  }

  /// A profile sourcing the local upstream tree, followed by `extra`.
  pub fn profile(&self, extra: &str) -> Profile {
    let content = format!(
      "{}\n[source]\nkind = \"path\"\npath = \"{}\"\n",
      extra,
      self.upstream().display().to_string().replace('\\', "/")
    );
    Profile::from_toml(&content).unwrap()
  }

  pub fn processor(&self, os: Os, extra: &str, overrides: &Overrides) -> RecipeProcessor {
    RecipeProcessor::new(
      &self.profile(extra),
      Settings::for_os(os, Arch::X86_64),
      overrides,
      self.layout(),
    )
    .unwrap()
  }

  pub fn cmake_log(&self) -> Vec<String> {
    fs::read_to_string(self.temp.path().join("cmake.log"))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// A stub `cmake` that installs `libs` into `<prefix>/lib`.
  #[cfg(unix)]
  pub fn fake_cmake(&self, libs: &[&str]) -> Cmake {
    Cmake::new(write_fake_cmake(self.temp.path(), libs).to_string_lossy().to_string())
  }
}

/// Write an executable stub standing in for `cmake`, logging its arguments.
#[cfg(unix)]
pub fn write_fake_cmake(dir: &Path, libs: &[&str]) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let mut script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\n", dir.join("cmake.log").display());
  script.push_str("if [ \"$1\" = \"--install\" ]; then\n");
  script.push_str("  prefix=\"\"\n");
  script.push_str("  while [ $# -gt 0 ]; do\n");
  script.push_str("    if [ \"$1\" = \"--prefix\" ]; then prefix=\"$2\"; fi\n");
  script.push_str("    shift\n");
  script.push_str("  done\n");
  script.push_str("  mkdir -p \"$prefix/lib\" \"$prefix/include/MagnumPlugins\"\n");
  for lib in libs {
    script.push_str(&format!("  touch \"$prefix/lib/{}\"\n", lib));
  }
  script.push_str("fi\nexit 0\n");

  let path = dir.join("cmake");
  fs::write(&path, script).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A stub `cmake` that fails the build step.
#[cfg(unix)]
pub fn write_failing_cmake(dir: &Path) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let script = "#!/bin/sh\nif [ \"$1\" = \"--build\" ]; then\n  echo \"error: no rule to make target\" >&2\n  exit 2\nfi\nexit 0\n";
  let path = dir.join("cmake-failing");
  fs::write(&path, script).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}
