use anyhow::Result;

use magnum_recipe_lib::platform::paths::cmake_program;
use magnum_recipe_lib::recipe::RECIPE;

use super::RecipeArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = args.processor()?;
  let settings = recipe.settings();
  let layout = recipe.layout();

  if output.is_json() {
    let json = serde_json::json!({
      "recipe": RECIPE,
      "settings": settings,
      "source": recipe.source(),
      "work_dir": layout.work_dir,
      "store_dir": layout.store_dir,
      "cmake": cmake_program(),
    });
    return print_json(&json);
  }

  print_info(&format!("{} {}", RECIPE.name, RECIPE.version));
  print_stat("Description", RECIPE.description);
  print_stat("License", RECIPE.license);
  print_stat("Homepage", RECIPE.homepage);
  print_stat("Recipe", RECIPE.url);
  print_stat("Topics", &RECIPE.topics.join(", "));
  println!();
  print_info("Target");
  print_stat("Platform", &settings.triple());
  print_stat("Build type", settings.build_type.as_str());
  println!();
  print_info("Paths");
  print_stat("Source", &recipe.source().describe());
  print_stat("Work", &layout.work_dir.display().to_string());
  print_stat("Store", &layout.store_dir.display().to_string());
  print_stat("CMake", &cmake_program());

  Ok(())
}
