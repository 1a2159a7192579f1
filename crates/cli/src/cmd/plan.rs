//! Implementation of the `mmpack plan` command.
//!
//! This command loads the target manifest, assembles the package plan, writes
//! the descriptors and the plan file into the build root, and prints a summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use mmpack_lib::assemble::PackageAssembler;
use mmpack_lib::consts::PLAN_FILE;
use mmpack_lib::layout::LayoutMode;
use mmpack_lib::manifest::TargetManifest;

use super::assemble_options;
use crate::PlanArgs;
use crate::output::{OutputFormat, print_info, print_json, print_operation, print_stat, print_success, print_warning};

pub fn cmd_plan(args: &PlanArgs, format: OutputFormat, verbose: bool) -> Result<()> {
  let mut options = assemble_options(&args.build_root, args.package_root.as_deref(), args.mode)?;
  let build_root = options.build_root.clone();

  let manifest = TargetManifest::load(&args.targets)
    .with_context(|| format!("Failed to load targets: {}", args.targets.display()))?;
  let targets = manifest.build_targets().context("Invalid target manifest")?;

  match &args.config_file {
    Some(config_file) => options = options.with_config_file(absolute(config_file)?),
    None if args.mode == LayoutMode::Full && !format.is_json() => {
      print_warning("No --config-file given; the configs folder will be left empty");
    }
    None => {}
  }

  let plan = PackageAssembler::new(options).assemble(&targets).context("Packaging failed")?;

  let plan_path = build_root.join(PLAN_FILE);
  let plan_json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
  fs::write(&plan_path, &plan_json).with_context(|| format!("Failed to write plan: {}", plan_path.display()))?;
  info!(path = %plan_path.display(), "plan written");

  if format.is_json() {
    return print_json(&plan);
  }

  if plan.packages.is_empty() {
    print_info("No targets in manifest; nothing to package.");
    return Ok(());
  }

  print_success(&format!("Planned {} package(s)", plan.packages.len()));
  print_stat("Mode", plan.mode.as_str());
  print_stat("Package root", &plan.package_root.display().to_string());
  print_stat("Folders", &plan.folder_count().to_string());
  print_stat("Copies", &plan.copy_count().to_string());
  print_stat("Plan", &plan_path.display().to_string());

  println!();
  for package in &plan.packages {
    println!("{} ({})", package.names.binary_alias, package.platform);
    print_stat("Binary", &package.layout.binary_path.display().to_string());
    print_stat("Descriptor", &package.descriptor_path.display().to_string());
  }

  if verbose {
    let graph = plan.graph().context("Invalid operation order")?;
    for (wave, indices) in graph.waves()?.iter().enumerate() {
      println!();
      println!("Wave {}:", wave);
      for &index in indices {
        print_operation(&plan.operations[index]);
      }
    }
  }

  Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
  std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}
