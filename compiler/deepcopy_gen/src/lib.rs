//! Deep-copy method generator.
//!
//! Given a [`Universe`](deepcopy_ir::Universe) of Go packages, emits one Go
//! file per target package containing `DeepCopyInto`, `DeepCopy` and
//! `DeepCopy<Interface>` methods for every type whose directives enable
//! generation.
//!
//! # Pipeline
//!
//! ```text
//! directives (tags) -> policies -> dependency graph -> strategies -> Go text
//! ```
//!
//! - [`tags`]: `+k8s:deepcopy-gen` directive interpretation
//! - [`graph`]: type dependencies, value-cycle detection, emission order
//! - [`strategy`]: one copy strategy per field, decided once
//! - [`emit`]: Go source rendering
//! - [`output`]: generated units and write planning
//!
//! The engine is pure: it never reads or writes files. See
//! [`generate`] for the entry point.

mod config;
pub mod context;
mod error;
pub mod emit;
pub mod graph;
pub mod output;
mod pipeline;
mod stack;
pub mod strategy;
pub mod tags;

pub use config::{CloneFunc, GenConfig, DEFAULT_BUILD_TAG, DEFAULT_OUTPUT_FILE_BASE};
pub use error::{GenError, PackageFailure};
pub use output::{is_generated_file, plan_write, PackageOutput, RunReport, WriteAction};
pub use pipeline::{default_targets, generate, generate_paths};
pub use strategy::{CopyStrategy, StrategyKind};
