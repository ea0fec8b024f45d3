use anyhow::Result;

use super::RecipeArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_deps(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = args.processor()?;
  let dependencies = recipe.dependencies();

  if output.is_json() {
    return print_json(dependencies);
  }

  for requirement in dependencies.iter() {
    print_info(&requirement.reference.to_string());
    for (name, value) in &requirement.options {
      print_stat(name, &value.to_string());
    }
    if let Some(root) = recipe.dependency_roots().get(requirement.name()) {
      print_stat("root", &root.display().to_string());
    }
  }

  Ok(())
}
