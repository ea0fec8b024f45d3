//! End-to-end tests of the recipe phases.

use std::fs;

use magnum_recipe_lib::deps::{ANY_IMAGE_IMPORTER, ASSIMP, MAGNUM};
use magnum_recipe_lib::options::OptionValue;
use magnum_recipe_lib::platform::Os;
use magnum_recipe_lib::recipe::{Overrides, RecipeError};

use super::common::{ASSIMP_CMAKELISTS, TestEnv};

mod resolution {
  use super::*;

  #[test]
  fn windows_drops_fpic_and_static_pic() {
    let env = TestEnv::new();
    let recipe = env.processor(Os::Windows, "", &Overrides::default());
    assert!(!recipe.options().contains("fPIC"));

    let config = recipe.build_config();
    assert_eq!(config.get("BUILD_STATIC"), Some("ON"));
    assert_eq!(config.get("BUILD_STATIC_PIC"), Some("OFF"));
  }

  #[test]
  fn disabling_assimp_drops_the_dependency() {
    let env = TestEnv::new();
    let overrides = Overrides {
      options: vec!["with_assimpimporter=False".to_string()],
      ..Overrides::default()
    };
    let recipe = env.processor(Os::Linux, "", &overrides);
    assert!(recipe.dependencies().get(ASSIMP).is_none());
    assert_eq!(recipe.dependencies().references(), vec!["magnum/2020.06@camposs/stable"]);
  }

  #[test]
  fn forced_dependency_option_wins_over_profile() {
    let env = TestEnv::new();
    let recipe = env.processor(
      Os::Linux,
      "[options.magnum]\nwith_anyimageimporter = false\n",
      &Overrides::default(),
    );
    let magnum = recipe.dependencies().get(MAGNUM).unwrap();
    assert_eq!(magnum.options.get(ANY_IMAGE_IMPORTER), Some(&OptionValue::Bool(true)));
  }

  #[test]
  fn package_id_differs_per_platform() {
    let env = TestEnv::new();
    let linux = env.processor(Os::Linux, "", &Overrides::default());
    let macos = env.processor(Os::Macos, "", &Overrides::default());
    assert_ne!(linux.package_id().unwrap(), macos.package_id().unwrap());
  }
}

mod source {
  use super::*;

  #[tokio::test]
  async fn patches_are_applied_to_the_copy() {
    let env = TestEnv::new();
    let recipe = env.processor(Os::Linux, "", &Overrides::default());
    let report = recipe.acquire_source().await.unwrap();

    assert_eq!(report.patches.applied(), 2);
    let root = fs::read_to_string(report.source_dir.join("CMakeLists.txt")).unwrap();
    assert!(root.contains("cmake_policy(SET CMP0074 NEW)\nfind_package(Magnum REQUIRED)"));
    let assimp = fs::read_to_string(report.source_dir.join("src/MagnumPlugins/AssimpImporter/CMakeLists.txt")).unwrap();
    assert!(assimp.contains("Assimp::Assimp"));
    assert!(!assimp.contains("assimp::assimp"));
  }

  #[tokio::test]
  async fn drifted_upstream_is_left_unchanged() {
    let env = TestEnv::new();
    let drifted = ASSIMP_CMAKELISTS.replace("assimp::assimp", "assimp");
    env.write_upstream("src/MagnumPlugins/AssimpImporter/CMakeLists.txt", &drifted);

    let recipe = env.processor(Os::Linux, "", &Overrides::default());
    let report = recipe.acquire_source().await.unwrap();

    assert_eq!(report.patches.applied(), 1);
    assert_eq!(report.patches.missed().count(), 1);
    assert_eq!(
      fs::read_to_string(report.source_dir.join("src/MagnumPlugins/AssimpImporter/CMakeLists.txt")).unwrap(),
      drifted
    );
  }

  #[tokio::test]
  async fn missing_path_source_fails() {
    let env = TestEnv::new();
    fs::remove_dir_all(env.upstream()).unwrap();
    let recipe = env.processor(Os::Linux, "", &Overrides::default());
    assert!(matches!(recipe.acquire_source().await, Err(RecipeError::Fetch(_))));
  }
}

#[cfg(unix)]
mod create {
  use super::*;
  use super::super::common::write_failing_cmake;
  use magnum_recipe_lib::execute::{Cmake, ExecuteError};
  use magnum_recipe_lib::package::PackageInfo;

  #[tokio::test]
  async fn full_run_produces_package() {
    let env = TestEnv::new();
    let recipe = env
      .processor(Os::Linux, "[dependencies]\nmagnum = \"/pkgs/magnum\"\n", &Overrides::default())
      .with_cmake(env.fake_cmake(&["libMagnumAssimpImporter.a", "libMagnumOpenDdl.a"]));

    let outcome = recipe.create().await.unwrap();
    let package_dir = recipe.package_dir().unwrap();

    assert_eq!(
      outcome.package.libs,
      vec!["MagnumAssimpImporter", "MagnumOpenDdl", "GL"]
    );
    assert!(package_dir.join("licenses/COPYING").exists());
    assert_eq!(PackageInfo::load(&package_dir).unwrap(), outcome.package);

    let script = fs::read_to_string(&outcome.generated.cache_script).unwrap();
    assert!(script.contains("set(Magnum_ROOT \"/pkgs/magnum\" CACHE STRING \"\" FORCE)"));

    let log = env.cmake_log();
    assert_eq!(log.len(), 3);
    assert!(log[0].contains(&format!("-C {}", outcome.generated.cache_script.display())));
    assert!(log[1].ends_with("--config Release"));
    assert!(log[2].contains(&format!("--prefix {}", package_dir.display())));
  }

  #[tokio::test]
  async fn shared_macos_package_uses_framework_flag() {
    let env = TestEnv::new();
    let overrides = Overrides {
      options: vec!["shared=True".to_string()],
      ..Overrides::default()
    };
    let recipe = env
      .processor(Os::Macos, "", &overrides)
      .with_cmake(env.fake_cmake(&["libMagnumOpenDdl.dylib"]));

    let outcome = recipe.create().await.unwrap();
    assert_eq!(outcome.package.libs, vec!["MagnumOpenDdl"]);
    assert_eq!(outcome.package.exelinkflags, vec!["-framework OpenGL"]);
  }

  #[tokio::test]
  async fn failed_build_stops_before_packaging() {
    let env = TestEnv::new();
    let cmake = write_failing_cmake(env.temp.path());
    let recipe = env
      .processor(Os::Linux, "", &Overrides::default())
      .with_cmake(Cmake::new(cmake.to_string_lossy().to_string()));

    let result = recipe.create().await;
    assert!(matches!(
      result,
      Err(RecipeError::Execute(ExecuteError::CmdFailed { code: Some(2), .. }))
    ));
    assert!(!recipe.package_dir().unwrap().exists());
  }
}
