//! The fixed catalog of options the recipe exposes.

use crate::platform::Os;

use super::value::OptionValue;

/// Allowed values and default of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
  Bool { default: bool },
  Choice { choices: &'static [&'static str], default: &'static str },
}

/// Platforms an option exists on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
  Everywhere,
  /// Removed from the catalog entirely when targeting Windows.
  NotOnWindows,
}

impl Availability {
  pub fn includes(&self, os: Os) -> bool {
    match self {
      Self::Everywhere => true,
      Self::NotOnWindows => !os.is_windows(),
    }
  }
}

/// A single option declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
  pub name: &'static str,
  pub kind: OptionKind,
  pub availability: Availability,
  pub description: &'static str,
}

impl OptionDecl {
  const fn flag(name: &'static str, default: bool, description: &'static str) -> Self {
    Self {
      name,
      kind: OptionKind::Bool { default },
      availability: Availability::Everywhere,
      description,
    }
  }

  pub fn default_value(&self) -> OptionValue {
    match self.kind {
      OptionKind::Bool { default } => OptionValue::Bool(default),
      OptionKind::Choice { default, .. } => OptionValue::Choice(default.to_string()),
    }
  }

  /// Human readable form of the value domain.
  pub fn domain(&self) -> String {
    match self.kind {
      OptionKind::Bool { .. } => "[True, False]".to_string(),
      OptionKind::Choice { choices, .. } => format!("[{}]", choices.join(", ")),
    }
  }
}

pub const SHARED: &str = "shared";
pub const FPIC: &str = "fPIC";
pub const WITH_ASSIMPIMPORTER: &str = "with_assimpimporter";

/// Every option of the magnum-plugins package.
pub const CATALOG: &[OptionDecl] = &[
  OptionDecl::flag(SHARED, false, "Build shared instead of static libraries"),
  OptionDecl::flag("build_plugins_static", false, "Build plugins as static libraries"),
  OptionDecl {
    name: FPIC,
    kind: OptionKind::Bool { default: true },
    availability: Availability::NotOnWindows,
    description: "Build position-independent code",
  },
  OptionDecl::flag(WITH_ASSIMPIMPORTER, true, "AssimpImporter plugin (pulls in assimp)"),
  OptionDecl::flag("with_ddsimporter", false, "DdsImporter plugin"),
  OptionDecl::flag("with_devilimageimporter", false, "DevIlImageImporter plugin"),
  OptionDecl::flag("with_drflacaudioimporter", false, "DrFlacAudioImporter plugin"),
  OptionDecl::flag("with_drwavaudioimporter", false, "DrWavAudioImporter plugin"),
  OptionDecl::flag("with_faad2audioimporter", false, "Faad2AudioImporter plugin"),
  OptionDecl::flag("with_freetypefont", false, "FreeTypeFont plugin"),
  OptionDecl::flag("with_harfbuzzfont", false, "HarfBuzzFont plugin"),
  OptionDecl::flag("with_jpegimageconverter", false, "JpegImageConverter plugin"),
  OptionDecl::flag("with_jpegimporter", false, "JpegImporter plugin"),
  OptionDecl::flag("with_miniexrimageconverter", false, "MiniExrImageConverter plugin"),
  OptionDecl::flag("with_openddl", false, "OpenDdl library"),
  OptionDecl::flag("with_opengeximporter", false, "OpenGexImporter plugin"),
  OptionDecl::flag("with_pngimageconverter", false, "PngImageConverter plugin"),
  OptionDecl::flag("with_pngimporter", false, "PngImporter plugin"),
  OptionDecl::flag("with_stanfordimporter", false, "StanfordImporter plugin"),
  OptionDecl::flag("with_stbimageconverter", false, "StbImageConverter plugin"),
  OptionDecl::flag("with_stbimageimporter", false, "StbImageImporter plugin"),
  OptionDecl::flag("with_stbtruetypefont", false, "StbTrueTypeFont plugin"),
  OptionDecl::flag("with_stbvorbisaudioimporter", false, "StbVorbisAudioImporter plugin"),
  OptionDecl::flag("with_stlimporter", false, "StlImporter plugin"),
  OptionDecl::flag("with_tinygltfimporter", false, "TinyGltfImporter plugin"),
];

/// Look up a declaration by name.
pub fn find(catalog: &[OptionDecl], name: &str) -> Option<OptionDecl> {
  catalog.iter().find(|decl| decl.name == name).copied()
}
