//! Implementation of the `create` command.
//!
//! Runs every recipe phase in order and stops at the first failure.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use super::{RecipeArgs, block_on};
use crate::output::{OutputFormat, format_elapsed, print_json, print_stat, print_success, print_warning, symbols};

pub fn cmd_create(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let recipe = args.processor()?;
  info!(package_id = %recipe.package_id()?, "creating package");

  let outcome = block_on(recipe.create())?.context("Create failed")?;
  let package = &outcome.package;

  if output.is_json() {
    return print_json(package);
  }

  for missed in outcome.source.patches.missed() {
    print_warning(&format!("{}: '{}' not found, file left unchanged", missed.file, missed.search));
  }

  println!();
  print_success(&format!("Created {}/{}", package.name, package.version));
  print_stat("Package id", &package.package_id.to_string());
  print_stat("Folder", &package.package_folder.display().to_string());
  print_stat("Settings", &recipe.settings().to_string());
  print_stat("Requires", &package.requires.join(", "));
  print_stat("Libraries", &package.libs.join(", "));
  if !package.exelinkflags.is_empty() {
    print_stat("Exe link flags", &package.exelinkflags.join(" "));
  }
  print_stat(
    "Link",
    &format!("{} {}", symbols::ARROW, package.link_args().join(" ")),
  );
  print_stat("Duration", &format_elapsed(start.elapsed()));

  Ok(())
}
