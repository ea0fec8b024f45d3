//! Constants shared across the recipe processor.

/// Application name used for data, cache and store directories.
pub const APP_NAME: &str = "magnum-recipe";

/// Name of the packaged library.
pub const PACKAGE_NAME: &str = "magnum-plugins";

/// Upstream version this recipe packages.
pub const PACKAGE_VERSION: &str = "2020.06";

/// Upstream git repository.
pub const UPSTREAM_URL: &str = "https://github.com/mosra/magnum-plugins.git";

/// Length of the package id prefix used for package folders.
pub const PACKAGE_ID_LEN: usize = 20;

/// Folder (relative to the work dir) the upstream source is placed in.
pub const SOURCE_SUBFOLDER: &str = "source_subfolder";

/// File name of the generated CMake initial-cache script.
pub const TOOLCHAIN_FILE: &str = "recipe_toolchain.cmake";

/// File name of the exported package description.
pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// Environment variable overriding the CMake executable.
pub const CMAKE_ENV: &str = "MAGNUM_RECIPE_CMAKE";

/// Environment variable overriding the package store directory.
pub const STORE_ENV: &str = "MAGNUM_RECIPE_STORE";
