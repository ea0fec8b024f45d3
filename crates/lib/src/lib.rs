//! magnum-recipe-lib: packaging recipe for Magnum-Plugins
//!
//! The recipe maps a declared option set to a CMake build and an installable
//! package:
//! - `options`: the option catalog and its per-platform resolution
//! - `deps`: upstream dependency declarations and option propagation
//! - `source`: fetching the pinned source and patching its build files
//! - `toolchain`: the CMake configuration map
//! - `execute`: running CMake
//! - `package`: installing, library discovery and system link requirements
//! - `recipe`: the processor driving all of the above

pub mod consts;
pub mod deps;
pub mod execute;
pub mod options;
pub mod package;
pub mod platform;
pub mod profile;
pub mod recipe;
pub mod source;
pub mod toolchain;
pub mod util;
