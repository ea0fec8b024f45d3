//! Upstream dependency declaration.
//!
//! The package always requires `magnum`; `assimp` is required only when the
//! assimp importer plugin is enabled. Options requested for a dependency by the
//! orchestrator are carried on its [`Requirement`], and the recipe may force
//! some of them on top. Whether the dependency actually declares a propagated
//! option is checked by the dependency's own configuration, not here.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::options::catalog::WITH_ASSIMPIMPORTER;
use crate::options::{OptionValue, Options};

pub const MAGNUM: &str = "magnum";
pub const CORRADE: &str = "corrade";
pub const ASSIMP: &str = "assimp";

/// Option forced on `magnum` when the assimp importer is built.
///
/// AssimpImporter delegates texture loading to AnyImageImporter, so it has to
/// exist in the magnum build.
pub const ANY_IMAGE_IMPORTER: &str = "with_anyimageimporter";

/// Option values requested per dependency, keyed by package name.
pub type DependencyOptions = BTreeMap<String, BTreeMap<String, OptionValue>>;

/// An exact package reference, e.g. `magnum/2020.06@camposs/stable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
  pub name: String,
  pub version: String,
  pub user: Option<String>,
  pub channel: Option<String>,
}

impl Reference {
  pub fn new(name: &str, version: &str) -> Self {
    Self {
      name: name.to_string(),
      version: version.to_string(),
      user: None,
      channel: None,
    }
  }

  pub fn with_channel(mut self, user: &str, channel: &str) -> Self {
    self.user = Some(user.to_string());
    self.channel = Some(channel.to_string());
    self
  }
}

impl fmt::Display for Reference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.name, self.version)?;
    if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
      write!(f, "@{}/{}", user, channel)?;
    }
    Ok(())
  }
}

impl Serialize for Reference {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// A single required package with the options it is asked to build with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
  pub reference: Reference,
  pub options: BTreeMap<String, OptionValue>,
}

impl Requirement {
  pub fn new(reference: Reference) -> Self {
    Self {
      reference,
      options: BTreeMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.reference.name
  }
}

/// Ordered set of requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dependencies {
  requirements: Vec<Requirement>,
}

impl Dependencies {
  pub fn get(&self, name: &str) -> Option<&Requirement> {
    self.requirements.iter().find(|r| r.name() == name)
  }

  fn get_mut(&mut self, name: &str) -> Option<&mut Requirement> {
    self.requirements.iter_mut().find(|r| r.name() == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
    self.requirements.iter()
  }

  pub fn len(&self) -> usize {
    self.requirements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.requirements.is_empty()
  }

  /// References in declaration order.
  pub fn references(&self) -> Vec<String> {
    self.requirements.iter().map(|r| r.reference.to_string()).collect()
  }

  fn push(&mut self, reference: Reference, requested: &DependencyOptions) {
    let mut requirement = Requirement::new(reference);
    if let Some(options) = requested.get(requirement.name()) {
      requirement.options = options.clone();
    }
    self.requirements.push(requirement);
  }
}

pub fn magnum_reference() -> Reference {
  Reference::new(MAGNUM, "2020.06").with_channel("camposs", "stable")
}

pub fn assimp_reference() -> Reference {
  Reference::new(ASSIMP, "5.2.2")
}

/// Declare requirements for `options` with no orchestrator-requested
/// dependency options.
pub fn declare_dependencies(options: &Options) -> Dependencies {
  declare_dependencies_with(options, &DependencyOptions::new())
}

/// Declare requirements for `options`.
///
/// `requested` carries option values the orchestrator asked for on each
/// dependency. Values forced by the recipe win over requested ones.
pub fn declare_dependencies_with(options: &Options, requested: &DependencyOptions) -> Dependencies {
  let mut deps = Dependencies::default();

  deps.push(magnum_reference(), requested);
  if options.is_enabled(WITH_ASSIMPIMPORTER) {
    deps.push(assimp_reference(), requested);
  }

  for (name, values) in requested {
    if deps.get(name).is_none() {
      debug!(dependency = %name, count = values.len(), "options requested for undeclared dependency");
    }
  }

  if options.is_enabled(WITH_ASSIMPIMPORTER) {
    if let Some(magnum) = deps.get_mut(MAGNUM) {
      let previous = magnum
        .options
        .insert(ANY_IMAGE_IMPORTER.to_string(), OptionValue::Bool(true));
      if previous.is_some_and(|v| v != OptionValue::Bool(true)) {
        info!(
          dependency = MAGNUM,
          option = ANY_IMAGE_IMPORTER,
          "overriding requested option, required by the assimp importer"
        );
      }
    }
  }

  deps
}
