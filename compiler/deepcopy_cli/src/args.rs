//! Command-line argument parsing.

use std::path::PathBuf;

use deepcopy_gen::{CloneFunc, DEFAULT_OUTPUT_FILE_BASE};

use crate::CliError;

pub const USAGE: &str = "\
Usage: deepcopy-gen <model.json> [options]

Options:
  --package <path>          Generate for this package (repeatable; default: every
                            package carrying a deepcopy-gen directive)
  --output-file <base>      Output file name without .go (default: zz_generated.deepcopy)
  --go-header-file <path>   Boilerplate placed at the top of each generated file
  --bounding-dirs <a,b>     Package prefixes, beyond the target packages, whose
                            types are assumed to carry deep-copy methods
  --clone-func <path.Func>  Structural clone function for the last-resort strategy
                            (default: github.com/mohae/deepcopy.Copy)
  --no-reflective-fallback  Fail instead of using the structural clone function
  --out-dir <dir>           Root directory for output (default: the model's directory)
  --verify-only             Fail if any generated file is missing or out of date
  -v, --verbose             Debug logging
  -h, --help                Show this help";

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub model: PathBuf,
    pub packages: Vec<String>,
    pub output_file_base: String,
    pub header_file: Option<PathBuf>,
    pub bounding_dirs: Vec<String>,
    pub clone_func: Option<CloneFunc>,
    pub reflective_fallback: bool,
    pub out_dir: Option<PathBuf>,
    pub verify_only: bool,
    pub verbose: bool,
}

impl CliOptions {
    fn new(model: PathBuf) -> Self {
        Self {
            model,
            packages: Vec::new(),
            output_file_base: DEFAULT_OUTPUT_FILE_BASE.to_string(),
            header_file: None,
            bounding_dirs: Vec::new(),
            clone_func: None,
            reflective_fallback: true,
            out_dir: None,
            verify_only: false,
            verbose: false,
        }
    }
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Generate(CliOptions),
    Help,
}

/// Parse arguments, excluding the program name.
///
/// Value options accept both `--flag value` and `--flag=value`.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut model = None;
    let mut packages = Vec::new();
    let mut output_file_base = None;
    let mut header_file = None;
    let mut bounding_dirs = Vec::new();
    let mut clone_func = None;
    let mut reflective_fallback = true;
    let mut out_dir = None;
    let mut verify_only = false;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };
        let mut value = |name: &str| -> Result<String, CliError> {
            if let Some(value) = inline.clone() {
                return Ok(value);
            }
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| CliError::Usage(format!("{name} needs a value")))
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--verbose" => verbose = true,
            "--verify-only" => verify_only = true,
            "--no-reflective-fallback" => reflective_fallback = false,
            "--package" => packages.push(value(flag)?),
            "--output-file" => output_file_base = Some(value(flag)?),
            "--go-header-file" => header_file = Some(PathBuf::from(value(flag)?)),
            "--out-dir" => out_dir = Some(PathBuf::from(value(flag)?)),
            "--bounding-dirs" => bounding_dirs.extend(
                value(flag)?
                    .split(',')
                    .map(str::trim)
                    .filter(|dir| !dir.is_empty())
                    .map(str::to_string),
            ),
            "--clone-func" => {
                let text = value(flag)?;
                let parsed = CloneFunc::parse(&text).ok_or_else(|| {
                    CliError::Usage(format!(
                        "--clone-func expects <import path>.<Func>, got {text:?}"
                    ))
                })?;
                clone_func = Some(parsed);
            }
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option {other}")));
            }
            path => {
                if model.is_some() {
                    return Err(CliError::Usage(format!("unexpected argument {path}")));
                }
                model = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let model = model.ok_or_else(|| CliError::Usage("missing model file".to_string()))?;
    let mut options = CliOptions::new(model);
    options.packages = packages;
    if let Some(base) = output_file_base {
        options.output_file_base = base.trim_end_matches(".go").to_string();
    }
    options.header_file = header_file;
    options.bounding_dirs = bounding_dirs;
    options.clone_func = clone_func;
    options.reflective_fallback = reflective_fallback;
    options.out_dir = out_dir;
    options.verify_only = verify_only;
    options.verbose = verbose;
    Ok(Command::Generate(options))
}
