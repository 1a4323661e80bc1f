//! Run configuration.

use deepcopy_ir::QualifiedName;

/// File name (without `.go`) of the generated unit in each package.
pub const DEFAULT_OUTPUT_FILE_BASE: &str = "zz_generated.deepcopy";

/// Build tag that excludes generated files when set.
pub const DEFAULT_BUILD_TAG: &str = "ignore_autogenerated";

/// Generic structural clone function used as the last-resort strategy.
///
/// Must have the shape `func(interface{}) interface{}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloneFunc {
    /// Import path of the support package.
    pub package: String,
    /// Exported function name.
    pub name: String,
}

impl CloneFunc {
    /// Parse `<import path>.<Func>`.
    pub fn parse(text: &str) -> Option<Self> {
        let QualifiedName { package, name } = QualifiedName::parse(text)?;
        Some(Self { package, name })
    }
}

impl Default for CloneFunc {
    fn default() -> Self {
        Self {
            package: "github.com/mohae/deepcopy".to_string(),
            name: "Copy".to_string(),
        }
    }
}

/// Configuration for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenConfig {
    /// Output file name without extension.
    pub output_file_base: String,
    /// Boilerplate placed above the generated-code marker, verbatim.
    pub header: String,
    /// Build tag that excludes the generated file (`//go:build !<tag>`).
    pub build_tag: Option<String>,
    /// Package path prefixes, beyond the target packages, whose types are
    /// assumed to carry deep-copy methods. Empty means only the targets.
    pub bounding_dirs: Vec<String>,
    /// Fallback for types no other strategy covers; `None` turns such
    /// types into errors.
    pub reflective_clone: Option<CloneFunc>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            output_file_base: DEFAULT_OUTPUT_FILE_BASE.to_string(),
            header: String::new(),
            build_tag: Some(DEFAULT_BUILD_TAG.to_string()),
            bounding_dirs: Vec::new(),
            reflective_clone: Some(CloneFunc::default()),
        }
    }
}

impl GenConfig {
    #[must_use]
    pub fn with_bounding_dirs(mut self, dirs: Vec<String>) -> Self {
        self.bounding_dirs = dirs;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    #[must_use]
    pub fn without_reflective_clone(mut self) -> Self {
        self.reflective_clone = None;
        self
    }

    /// Full output file name, `zz_generated.deepcopy.go` by default.
    pub fn output_file_name(&self) -> String {
        format!("{}.go", self.output_file_base)
    }

    /// Whether `package` lies under one of the bounding dirs.
    pub fn in_bounds(&self, package: &str) -> bool {
        self.bounding_dirs.iter().any(|dir| {
            let dir = dir.trim_end_matches('/');
            package == dir
                || package
                    .strip_prefix(dir)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
