use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use super::RecipeArgs;
use crate::output::{OutputFormat, print_info, print_json, symbols};

#[derive(Serialize)]
struct OptionRow<'a> {
  name: &'a str,
  value: String,
  default: String,
  domain: String,
  description: &'a str,
}

pub fn cmd_options(args: &RecipeArgs, output: OutputFormat) -> Result<()> {
  let recipe = args.processor()?;
  let options = recipe.options();

  let rows: Vec<OptionRow> = options
    .iter()
    .filter_map(|(name, value)| {
      let decl = options.declaration(name)?;
      Some(OptionRow {
        name: decl.name,
        value: value.to_string(),
        default: decl.default_value().to_string(),
        domain: decl.domain(),
        description: decl.description,
      })
    })
    .collect();

  if output.is_json() {
    return print_json(&rows);
  }

  print_info(&format!("Options for {}", recipe.settings()));
  let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
  for row in &rows {
    let marker = if row.value != row.default { symbols::MODIFY } else { " " };
    println!(
      "  {} {:width$} = {:5}  {}",
      marker.if_supports_color(Stream::Stdout, |s| s.yellow()),
      row.name,
      row.value,
      row.description.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      width = width
    );
  }

  Ok(())
}
