//! Tests for library discovery and link requirements of installed packages.

use std::fs;

use magnum_recipe_lib::package::{Linkage, collect_libs, link_arg, system_links};
use magnum_recipe_lib::platform::{Compiler, Os};
use tempfile::TempDir;

#[test]
fn decision_table_covers_every_pair() {
  let cases = [
    (Os::Windows, Linkage::Static, vec!["OpenGL32"], vec![]),
    (Os::Windows, Linkage::Shared, vec!["opengl32"], vec![]),
    (Os::Macos, Linkage::Static, vec![], vec!["-framework OpenGL"]),
    (Os::Macos, Linkage::Shared, vec![], vec!["-framework OpenGL"]),
    (Os::Linux, Linkage::Static, vec!["GL"], vec![]),
    (Os::Linux, Linkage::Shared, vec![], vec![]),
  ];

  for (os, linkage, libs, flags) in cases {
    let links = system_links(os, linkage);
    assert_eq!(links.system_libs, libs, "{} {:?}", os, linkage);
    assert_eq!(links.exelinkflags, flags, "{} {:?}", os, linkage);
  }
}

#[test]
fn msvc_renders_lib_files() {
  let links = system_links(Os::Windows, Linkage::Static);
  let args: Vec<String> = links.system_libs.iter().map(|l| link_arg(l, Compiler::Msvc)).collect();
  assert_eq!(args, vec!["OpenGL32.lib"]);
  assert_eq!(link_arg("opengl32", Compiler::Gcc), "-lopengl32");
}

#[test]
fn collect_libs_ignores_plugin_subfolders() {
  let temp = TempDir::new().unwrap();
  let lib = temp.path().join("lib");
  fs::create_dir_all(lib.join("magnum/importers")).unwrap();
  fs::write(lib.join("libMagnumOpenDdl.a"), "").unwrap();
  fs::write(lib.join("magnum/importers/StlImporter.so"), "").unwrap();
  fs::write(lib.join("magnum/importers/StlImporter.conf"), "").unwrap();

  assert_eq!(collect_libs(&lib).unwrap(), vec!["MagnumOpenDdl"]);
}
