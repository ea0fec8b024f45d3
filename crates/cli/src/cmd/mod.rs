mod configure;
mod create;
mod deps;
mod info;
mod options;
mod source;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use magnum_recipe_lib::platform::paths::{store_dir, work_dir};
use magnum_recipe_lib::profile::Profile;
use magnum_recipe_lib::recipe::{Layout, Overrides, RecipeProcessor, host_settings};

pub use configure::cmd_configure;
pub use create::cmd_create;
pub use deps::cmd_deps;
pub use info::cmd_info;
pub use options::cmd_options;
pub use source::cmd_source;

/// Inputs shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct RecipeArgs {
  /// TOML profile with settings, options, dependency roots and source
  #[arg(long, global = true, value_name = "FILE")]
  profile: Option<PathBuf>,

  /// Override a setting (os, arch, compiler, build_type)
  #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
  settings: Vec<String>,

  /// Override an option
  #[arg(short = 'o', long = "option", global = true, value_name = "NAME=VALUE")]
  options: Vec<String>,

  /// Folder sources are fetched and built in
  #[arg(long, global = true, value_name = "DIR")]
  work_dir: Option<PathBuf>,

  /// Folder packages are installed into
  #[arg(long, global = true, value_name = "DIR")]
  store: Option<PathBuf>,
}

impl RecipeArgs {
  fn profile(&self) -> Result<Profile> {
    match &self.profile {
      Some(path) => Profile::load(path).with_context(|| format!("Failed to load profile {}", path.display())),
      None => Ok(Profile::default()),
    }
  }

  fn layout(&self) -> Layout {
    Layout::new(
      self.work_dir.clone().unwrap_or_else(work_dir),
      self.store.clone().unwrap_or_else(store_dir),
    )
  }

  /// Resolve settings, options and dependencies for the host platform.
  pub fn processor(&self) -> Result<RecipeProcessor> {
    let profile = self.profile()?;
    let overrides = Overrides {
      settings: self.settings.clone(),
      options: self.options.clone(),
    };
    let host = host_settings(&profile, &overrides).context("Failed to detect host platform")?;
    RecipeProcessor::new(&profile, host, &overrides, self.layout()).context("Invalid recipe configuration")
  }
}

/// Run `future` to completion on a single-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;
  Ok(rt.block_on(future))
}
