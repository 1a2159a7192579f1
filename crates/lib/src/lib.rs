//! mmpack-lib: packaging logic for Metamod:Source plugins
//!
//! This crate turns compiled plugin binaries into a package tree the host
//! loader can discover:
//! - `resolve`: derive binary name, stem and alias from a binary's path
//! - `layout`: plan the platform-dependent folder tree for a package
//! - `descriptor`: render and write the `.vdf` plugin descriptor
//! - `assemble`: orchestrate the above and emit an ordered operation list
//! - `operation`: the operations and their folder-before-copy dependency graph

pub mod assemble;
pub mod consts;
pub mod descriptor;
pub mod layout;
pub mod manifest;
pub mod operation;
pub mod platform;
pub mod resolve;
pub mod target;

pub use assemble::{AssembleError, AssembleOptions, DescribedTarget, PackageAssembler, PackagedTarget, Plan};
pub use descriptor::Descriptor;
pub use layout::{LayoutMode, LayoutRules, PackageLayout};
pub use operation::{Operation, OperationGraph};
pub use platform::{Arch, Os, Platform};
pub use resolve::{ResolvedNames, resolve};
pub use target::{BinaryHandle, BuildTarget};
