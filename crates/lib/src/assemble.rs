//! Package assembly.
//!
//! The assembler turns a batch of build targets into a [`Plan`]: for each
//! target it resolves names, plans the layout, writes the descriptor into the
//! build root and records the folder creations and copies needed to lay the
//! package out. Nothing except the descriptor files is written here; the
//! operations are materialized by whoever consumes the plan.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::PACKAGE_DIR;
use crate::descriptor::{Descriptor, DescriptorError};
use crate::layout::{self, LayoutMode, LayoutRules, PackageLayout};
use crate::operation::{GraphError, Operation, OperationGraph};
use crate::resolve::{ResolveError, ResolvedNames, resolve};
use crate::target::{BuildTarget, normalize};

/// Errors that abort a packaging run.
#[derive(Debug, Error)]
pub enum AssembleError {
  /// A supplied input file does not exist.
  #[error("configuration file not found: {}", .path.display())]
  Configuration { path: PathBuf },

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  /// Two targets would write the same descriptor file.
  #[error("targets {} and {} both produce descriptor {file}", .first.display(), .second.display())]
  DuplicateDescriptor {
    file: String,
    first: PathBuf,
    second: PathBuf,
  },

  #[error("invalid operation order: {0}")]
  Graph(#[from] GraphError),

  /// A build or package root that cannot be made absolute.
  #[error("invalid root {}: {source}", .path.display())]
  InvalidRoot {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Inputs shared by every target of one packaging run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
  /// Build output root. Relative binary paths resolve against it and
  /// descriptor files are written into it. Relative roots are taken from the
  /// current directory when assembling.
  pub build_root: PathBuf,
  /// Root of the package tree. Folder operations are relative to it.
  pub package_root: PathBuf,
  pub mode: LayoutMode,
  /// File copied into `configs/` in full mode.
  pub config_file: Option<PathBuf>,
  pub rules: LayoutRules,
}

impl AssembleOptions {
  /// Options with the package tree under `<build_root>/package`.
  pub fn new(build_root: impl Into<PathBuf>) -> Self {
    let build_root = build_root.into();
    Self {
      package_root: build_root.join(PACKAGE_DIR),
      build_root,
      mode: LayoutMode::default(),
      config_file: None,
      rules: LayoutRules::default(),
    }
  }

  pub fn with_package_root(mut self, package_root: impl Into<PathBuf>) -> Self {
    self.package_root = package_root.into();
    self
  }

  pub fn with_mode(mut self, mode: LayoutMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
    self.config_file = Some(config_file.into());
    self
  }

  pub fn with_rules(mut self, rules: LayoutRules) -> Self {
    self.rules = rules;
    self
  }
}

/// Everything produced for one target.
#[derive(Debug, Clone, Serialize)]
pub struct PackagedTarget {
  pub names: ResolvedNames,
  pub platform: String,
  pub layout: PackageLayout,
  pub descriptor: Descriptor,
  /// Where the descriptor text was written before being copied.
  pub descriptor_path: PathBuf,
}

/// Names, layout and descriptor of one target, before anything is written.
#[derive(Debug, Clone)]
pub struct DescribedTarget {
  pub names: ResolvedNames,
  pub layout: PackageLayout,
  pub descriptor: Descriptor,
}

/// The result of a packaging run.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
  pub package_root: PathBuf,
  pub mode: LayoutMode,
  /// Operations in dependency order.
  pub operations: Vec<Operation>,
  /// One entry per target, in input order.
  pub packages: Vec<PackagedTarget>,
}

impl Plan {
  /// Build the operation graph, failing if a copy precedes its folder.
  pub fn graph(&self) -> Result<OperationGraph, GraphError> {
    OperationGraph::from_operations(&self.operations)
  }

  /// Check that every copy has its destination folder created first and the
  /// operations form an acyclic graph.
  pub fn validate(&self) -> Result<(), GraphError> {
    self.graph().map(|_| ())
  }

  pub fn folder_count(&self) -> usize {
    self
      .operations
      .iter()
      .filter(|op| matches!(op, Operation::CreateFolder { .. }))
      .count()
  }

  pub fn copy_count(&self) -> usize {
    self.operations.len() - self.folder_count()
  }
}

/// Orchestrates name resolution, layout planning and descriptor generation.
pub struct PackageAssembler {
  options: AssembleOptions,
}

impl PackageAssembler {
  pub fn new(options: AssembleOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &AssembleOptions {
    &self.options
  }

  /// Assemble the package plan for `targets`.
  ///
  /// Targets are processed in order and the first failure aborts the run.
  /// Folder creations are shared between targets: a folder planned by an
  /// earlier target is not scheduled again.
  ///
  /// # Errors
  ///
  /// - [`AssembleError::Configuration`] if the config file is missing in full mode.
  /// - [`AssembleError::Resolve`] if a binary path is too shallow for an alias.
  /// - [`AssembleError::DuplicateDescriptor`] if two binaries share a stem.
  /// - [`AssembleError::Descriptor`] if a descriptor cannot be rendered or written.
  pub fn assemble(&self, targets: &[BuildTarget]) -> Result<Plan, AssembleError> {
    let (build_root, package_root) = self.roots()?;
    let mut operations = Vec::new();
    let mut packages = Vec::with_capacity(targets.len());
    let mut scheduled: HashSet<PathBuf> = HashSet::new();
    let mut descriptor_owners: HashMap<String, PathBuf> = HashMap::new();

    for target in targets {
      let config_file = self.verified_config_file()?;

      let DescribedTarget {
        names,
        layout,
        descriptor,
      } = self.describe_in(target, &build_root, &package_root)?;

      let file_name = Descriptor::file_name(&names.binary_stem);
      if let Some(first) = descriptor_owners.get(&file_name) {
        return Err(AssembleError::DuplicateDescriptor {
          file: file_name,
          first: first.clone(),
          second: names.binary_path.clone(),
        });
      }
      descriptor_owners.insert(file_name, names.binary_path.clone());

      let descriptor_path = descriptor.write(&build_root, &names.binary_stem)?;

      info!(
        alias = %names.binary_alias,
        platform = %target.platform,
        binary_root = %layout.binary_root.display(),
        "packaging target"
      );

      let first_op = operations.len();
      for folder in &layout.folders {
        if scheduled.insert(folder.clone()) {
          operations.push(Operation::create_folder(folder));
        }
      }

      operations.push(Operation::copy(&names.binary_path, &layout.binary_root));
      operations.push(Operation::copy(&descriptor_path, &layout.metamod_folder));
      if let (Some(config), Some(aux)) = (config_file, &layout.aux) {
        operations.push(Operation::copy(config, &aux.configs));
      }

      for op in &operations[first_op..] {
        debug!(alias = %names.binary_alias, "{}", op);
      }

      packages.push(PackagedTarget {
        names,
        platform: target.platform.triple(),
        layout,
        descriptor,
        descriptor_path,
      });
    }

    let plan = Plan {
      package_root,
      mode: self.options.mode,
      operations,
      packages,
    };
    plan.validate()?;

    Ok(plan)
  }

  /// Resolve, lay out and describe a single target without writing anything.
  ///
  /// This is the descriptor [`assemble`](Self::assemble) writes for the same
  /// target and options.
  pub fn describe(&self, target: &BuildTarget) -> Result<DescribedTarget, AssembleError> {
    let (build_root, package_root) = self.roots()?;
    self.describe_in(target, &build_root, &package_root)
  }

  fn describe_in(
    &self,
    target: &BuildTarget,
    build_root: &Path,
    package_root: &Path,
  ) -> Result<DescribedTarget, AssembleError> {
    let names = resolve(&target.binary, build_root)?;
    let layout = layout::plan(&names, target.platform, self.options.mode, &self.options.rules);
    let packaged_binary = package_root.join(&layout.binary_path);
    let descriptor = Descriptor::for_binary(&names.binary_alias, &packaged_binary)?;
    Ok(DescribedTarget {
      names,
      layout,
      descriptor,
    })
  }

  /// Build and package roots as absolute, normalized paths.
  fn roots(&self) -> Result<(PathBuf, PathBuf), AssembleError> {
    let absolute = |path: &Path| {
      std::path::absolute(path)
        .map(|abs| normalize(&abs))
        .map_err(|source| AssembleError::InvalidRoot {
          path: path.to_path_buf(),
          source,
        })
    };
    Ok((absolute(&self.options.build_root)?, absolute(&self.options.package_root)?))
  }

  /// The config file to copy, if this run copies one, after checking it exists.
  fn verified_config_file(&self) -> Result<Option<&Path>, AssembleError> {
    if self.options.mode != LayoutMode::Full {
      return Ok(None);
    }
    let Some(path) = self.options.config_file.as_deref() else {
      return Ok(None);
    };
    if !path.is_file() {
      return Err(AssembleError::Configuration { path: path.to_path_buf() });
    }
    Ok(Some(path))
  }
}
