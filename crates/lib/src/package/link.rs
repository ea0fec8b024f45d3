//! System link requirements of the packaged libraries.
//!
//! Magnum's GL code needs the platform OpenGL library. Which entry to add is
//! looked up in [`LINK_TABLE`]; the first matching row wins.

use serde::{Deserialize, Serialize};

use crate::platform::{Compiler, Os};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
  Static,
  Shared,
}

impl Linkage {
  pub fn from_shared(shared: bool) -> Self {
    if shared { Self::Shared } else { Self::Static }
  }
}

/// One row of the decision table. `None` matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRule {
  pub os: Option<Os>,
  pub linkage: Option<Linkage>,
  pub system_libs: &'static [&'static str],
  pub exelinkflags: &'static [&'static str],
}

impl LinkRule {
  fn matches(&self, os: Os, linkage: Linkage) -> bool {
    self.os.is_none_or(|o| o == os) && self.linkage.is_none_or(|l| l == linkage)
  }
}

pub const LINK_TABLE: &[LinkRule] = &[
  LinkRule {
    os: Some(Os::Windows),
    linkage: Some(Linkage::Static),
    system_libs: &["OpenGL32"],
    exelinkflags: &[],
  },
  LinkRule {
    os: Some(Os::Windows),
    linkage: Some(Linkage::Shared),
    system_libs: &["opengl32"],
    exelinkflags: &[],
  },
  LinkRule {
    os: Some(Os::Macos),
    linkage: None,
    system_libs: &[],
    exelinkflags: &["-framework OpenGL"],
  },
  LinkRule {
    os: None,
    linkage: Some(Linkage::Static),
    system_libs: &["GL"],
    exelinkflags: &[],
  },
  LinkRule {
    os: None,
    linkage: Some(Linkage::Shared),
    system_libs: &[],
    exelinkflags: &[],
  },
];

/// Entries a consumer must add to its link line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLinks {
  pub system_libs: Vec<String>,
  pub exelinkflags: Vec<String>,
}

/// Look up the system link entries for `os` and `linkage`.
pub fn system_links(os: Os, linkage: Linkage) -> SystemLinks {
  LINK_TABLE
    .iter()
    .find(|rule| rule.matches(os, linkage))
    .map(|rule| SystemLinks {
      system_libs: rule.system_libs.iter().map(|s| s.to_string()).collect(),
      exelinkflags: rule.exelinkflags.iter().map(|s| s.to_string()).collect(),
    })
    .unwrap_or_default()
}

/// Render a library name as a linker argument for `compiler`.
///
/// MSVC's linker takes `name.lib`, everything else `-lname`.
pub fn link_arg(lib: &str, compiler: Compiler) -> String {
  if compiler.is_msvc() {
    format!("{}.lib", lib)
  } else {
    format!("-l{}", lib)
  }
}
