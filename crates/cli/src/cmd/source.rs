use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use super::{RecipeArgs, block_on};
use crate::output::{OutputFormat, format_elapsed, print_json, print_stat, print_success, print_warning};

pub fn cmd_source(args: &RecipeArgs, dest: Option<PathBuf>, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let recipe = args.processor()?;
  let dest = dest.unwrap_or_else(|| recipe.layout().source_dir());

  let report = block_on(recipe.acquire_source_into(&dest))?.context("Failed to acquire source")?;

  if output.is_json() {
    return print_json(&report);
  }

  for missed in report.patches.missed() {
    print_warning(&format!("{}: '{}' not found, file left unchanged", missed.file, missed.search));
  }
  print_success(&format!("Source ready in {}", report.source_dir.display()));
  print_stat("Source", &recipe.source().describe());
  if let Some(commit) = &report.commit {
    print_stat("Commit", commit);
  }
  print_stat(
    "Patches",
    &format!("{}/{} applied", report.patches.applied(), report.patches.outcomes.len()),
  );
  print_stat("Duration", &format_elapsed(start.elapsed()));

  Ok(())
}
