/// Name of the tool, used for the log filter environment variable and output files.
pub const APP_NAME: &str = "mmpack";

/// Package root folder, relative to the package output directory.
pub const ADDONS_DIR: &str = "addons";

/// Folder under `addons/` the host loader scans for plugin descriptors.
pub const METAMOD_DIR: &str = "metamod";

pub const CONFIGS_DIR: &str = "configs";
pub const LOGS_DIR: &str = "logs";
pub const DATA_DIR: &str = "data";

/// Descriptor file extension.
pub const DESCRIPTOR_EXT: &str = "vdf";

/// Output folder, under the build root, that holds the package tree.
pub const PACKAGE_DIR: &str = "package";

/// File the CLI writes the assembled plan to, under the build root.
pub const PLAN_FILE: &str = "plan.json";
