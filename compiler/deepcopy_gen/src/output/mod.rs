//! Generated units and write planning.
//!
//! The engine never touches the filesystem. It hands back one
//! [`PackageOutput`] per package together with the failures, and the caller
//! decides what to write, using [`plan_write`] to skip files whose content
//! is already current.

use deepcopy_ir::PackageId;

use crate::emit::GENERATED_MARKER;
use crate::PackageFailure;

/// The generated file of one package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageOutput {
    pub package: PackageId,
    /// Import path of the package.
    pub path: String,
    /// Source directory, when the model supplied one.
    pub dir: Option<String>,
    pub file_name: String,
    pub contents: String,
    /// Qualified names of the types that received methods, in emission order.
    pub types: Vec<String>,
}

/// Everything a run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Generated files, sorted by package path.
    pub outputs: Vec<PackageOutput>,
    /// Packages that failed; none of them has an output.
    pub failures: Vec<PackageFailure>,
    /// Target packages with nothing to emit.
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn output(&self, path: &str) -> Option<&PackageOutput> {
        self.outputs.iter().find(|output| output.path == path)
    }
}

/// What to do with a generated file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteAction {
    Write,
    Unchanged,
}

/// Compare generated contents with what is already on disk.
pub fn plan_write(existing: Option<&str>, contents: &str) -> WriteAction {
    match existing {
        Some(current) if current == contents => WriteAction::Unchanged,
        _ => WriteAction::Write,
    }
}

/// Whether `file_name` is the generated unit for output base `base`.
pub fn is_generated_file(file_name: &str, base: &str) -> bool {
    file_name
        .strip_suffix(".go")
        .is_some_and(|stem| stem == base)
}

/// Whether `contents` carries the generated-code marker, so it may be
/// overwritten.
pub fn has_generated_marker(contents: &str) -> bool {
    contents.lines().any(|line| line.trim_end() == GENERATED_MARKER)
}
