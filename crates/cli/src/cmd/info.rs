use anyhow::Result;

use mmpack_lib::layout::LayoutRules;
use mmpack_lib::platform::Platform;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let rules = LayoutRules::default();
  let platform = Platform::current();
  let subdir = platform.and_then(|p| rules.binary_subdir(p));
  let nested: Vec<_> = rules
    .iter()
    .map(|(p, dir)| serde_json::json!({ "platform": p.triple(), "binary_subdir": dir }))
    .collect();

  if format.is_json() {
    return print_json(&serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": platform.map(|p| p.triple()),
      "binary_subdir": subdir,
      "nested_layouts": nested,
    }));
  }

  println!("System:");
  match platform {
    Some(p) => print_stat("Platform", &p.triple()),
    None => println!("Could not detect platform."),
  }
  match subdir {
    Some(dir) => print_stat("Binary layout", &format!("addons/<alias>/{}", dir.display())),
    None => print_stat("Binary layout", "flat"),
  }
  Ok(())
}
