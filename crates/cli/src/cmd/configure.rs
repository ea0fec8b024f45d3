use anyhow::{Context, Result};

use super::RecipeArgs;
use crate::output::{OutputFormat, print_json, print_success};

pub fn cmd_configure(args: &RecipeArgs, write: bool, output: OutputFormat) -> Result<()> {
  let recipe = args.processor()?;

  let (config, script) = if write {
    let generated = recipe.generate().context("Failed to write build configuration")?;
    (generated.config, Some(generated.cache_script))
  } else {
    (recipe.build_config(), None)
  };

  if output.is_json() {
    return print_json(&config);
  }

  for (name, value) in config.iter() {
    println!("{}={}", name, value);
  }
  if let Some(path) = script {
    print_success(&format!("Wrote {}", path.display()));
  }

  Ok(())
}
