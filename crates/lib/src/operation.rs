//! Planned filesystem operations and their dependency graph.
//!
//! The assembler only describes what has to happen on disk. An external
//! engine materializes the operations and may run independent ones in
//! parallel, as long as every folder exists before something is copied into
//! it. [`OperationGraph`] makes those edges explicit and groups operations
//! into execution waves.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single planned filesystem action.
///
/// Folder paths are relative to the package root; copy sources are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
  /// Create a folder and any missing parents. Creating an existing folder is a no-op.
  CreateFolder { path: PathBuf },
  /// Copy `source` into the folder `destination`, keeping its file name.
  Copy { source: PathBuf, destination: PathBuf },
}

impl Operation {
  pub fn create_folder(path: impl Into<PathBuf>) -> Self {
    Self::CreateFolder { path: path.into() }
  }

  pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
    Self::Copy {
      source: source.into(),
      destination: destination.into(),
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::CreateFolder { path } => write!(f, "mkdir {}", path.display()),
      Self::Copy { source, destination } => write!(f, "copy {} -> {}", source.display(), destination.display()),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  /// A copy targets a folder that is never created.
  #[error("copy of {} targets folder {} that is never created", .file.display(), .destination.display())]
  MissingFolder { file: PathBuf, destination: PathBuf },

  /// A folder is only created after something is copied into it.
  #[error("folder {} is created after operation {copy_index} copies into it", .destination.display())]
  OrderingViolation { destination: PathBuf, copy_index: usize },

  #[error("dependency cycle detected")]
  CycleDetected,
}

/// Dependency graph over an ordered operation list.
///
/// Nodes are indices into the list the graph was built from. Each
/// `CreateFolder(p)` has an edge to every `Copy` whose destination is `p`.
pub struct OperationGraph {
  graph: DiGraph<usize, ()>,
  nodes: Vec<NodeIndex>,
}

impl OperationGraph {
  /// Build the graph and check that the list order already respects it.
  ///
  /// # Errors
  ///
  /// - [`GraphError::MissingFolder`] when a copy has no matching folder creation.
  /// - [`GraphError::OrderingViolation`] when the folder is created after the copy.
  pub fn from_operations(operations: &[Operation]) -> Result<Self, GraphError> {
    let mut graph = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..operations.len()).map(|i| graph.add_node(i)).collect();

    let mut folders: HashMap<&PathBuf, usize> = HashMap::new();
    for (index, op) in operations.iter().enumerate() {
      if let Operation::CreateFolder { path } = op {
        folders.entry(path).or_insert(index);
      }
    }

    for (index, op) in operations.iter().enumerate() {
      let Operation::Copy { source, destination } = op else {
        continue;
      };
      let Some(&folder_index) = folders.get(destination) else {
        return Err(GraphError::MissingFolder {
          file: source.clone(),
          destination: destination.clone(),
        });
      };
      if folder_index > index {
        return Err(GraphError::OrderingViolation {
          destination: destination.clone(),
          copy_index: index,
        });
      }
      graph.add_edge(nodes[folder_index], nodes[index], ());
    }

    let dag = Self { graph, nodes };
    toposort(&dag.graph, None).map_err(|_| GraphError::CycleDetected)?;
    Ok(dag)
  }

  /// Number of operations in the graph.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Indices of the operations that must complete before `index`.
  pub fn dependencies(&self, index: usize) -> Vec<usize> {
    let Some(&idx) = self.nodes.get(index) else {
      return Vec::new();
    };

    let mut deps: Vec<usize> = self
      .graph
      .neighbors_directed(idx, Direction::Incoming)
      .map(|dep| self.graph[dep])
      .collect();
    deps.sort_unstable();
    deps
  }

  /// Group operation indices into parallel execution waves.
  ///
  /// Every operation in a wave only depends on operations in earlier waves.
  /// Indices within a wave keep list order.
  pub fn waves(&self) -> Result<Vec<Vec<usize>>, GraphError> {
    // Kahn's algorithm, one level at a time
    let mut in_degree: HashMap<NodeIndex, usize> = HashMap::new();
    for idx in self.graph.node_indices() {
      in_degree.insert(idx, self.graph.neighbors_directed(idx, Direction::Incoming).count());
    }

    let mut remaining: HashSet<NodeIndex> = self.graph.node_indices().collect();
    let mut waves = Vec::new();

    while !remaining.is_empty() {
      let mut ready: Vec<NodeIndex> = remaining.iter().filter(|&&idx| in_degree[&idx] == 0).copied().collect();

      if ready.is_empty() {
        return Err(GraphError::CycleDetected);
      }

      ready.sort_by_key(|&idx| self.graph[idx]);
      for &idx in &ready {
        remaining.remove(&idx);
        for neighbor in self.graph.neighbors_directed(idx, Direction::Outgoing) {
          if let Some(deg) = in_degree.get_mut(&neighbor) {
            *deg = deg.saturating_sub(1);
          }
        }
      }

      waves.push(ready.into_iter().map(|idx| self.graph[idx]).collect());
    }

    Ok(waves)
  }
}
