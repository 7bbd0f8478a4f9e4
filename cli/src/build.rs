use std::fmt;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

/// Output path used when a compilation names no destination.
pub const DEFAULT_OUTPUT: &str = "output.html";

/// Errors from the build collaborators. The compiler core itself never
/// fails; these cover the I/O boundary around it.
#[derive(Debug)]
pub enum BuildError {
    MissingBuildFile(String),
    UnknownTarget(String),
    ReadInput(String, std::io::Error),
    WriteOutput(String, std::io::Error),
    Shell(String, std::io::Error),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingBuildFile(path) => write!(f, "no build file at '{}'", path),
            BuildError::UnknownTarget(name) => write!(f, "unknown target: {}", name),
            BuildError::ReadInput(path, e) => write!(f, "cannot read '{}': {}", path, e),
            BuildError::WriteOutput(path, e) => write!(f, "cannot write '{}': {}", path, e),
            BuildError::Shell(command, e) => write!(f, "cannot run '{}': {}", command, e),
        }
    }
}

impl std::error::Error for BuildError {}

/// Compile one source file to one output file.
pub fn compile_file(input: &Path, output: &Path, verbose: bool) -> Result<(), BuildError> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| BuildError::ReadInput(input.display().to_string(), e))?;

    let program = sprig::parser::Parser::new(source, verbose).parse();
    let html = compiler::compile_document(&program);

    std::fs::write(output, html)
        .map_err(|e| BuildError::WriteOutput(output.display().to_string(), e))?;

    debug!(input = %input.display(), output = %output.display(), "compiled");
    Ok(())
}

/// Run one target from a Sprigfile-style build file.
///
/// A target is a line `name:`; its commands are the following lines up to
/// the first blank line. `#` lines are comments, `$` lines run in the
/// system shell, anything else is `input [output]`, a compilation of one
/// source file.
pub fn run_target(build_file: &Path, target: &str, verbose: bool) -> Result<(), BuildError> {
    let raw = std::fs::read_to_string(build_file)
        .map_err(|_| BuildError::MissingBuildFile(build_file.display().to_string()))?;
    let lines: Vec<&str> = raw.lines().map(str::trim).collect();

    let header = format!("{}:", target);
    let start = lines
        .iter()
        .position(|line| *line == header)
        .ok_or_else(|| BuildError::UnknownTarget(target.to_string()))?;

    for line in lines[start + 1..].iter().take_while(|line| !line.is_empty()) {
        if line.starts_with('#') {
            continue;
        }
        if let Some(command) = line.strip_prefix('$') {
            run_shell(command.trim())?;
        } else {
            let mut parts = line.split_whitespace();
            let Some(input) = parts.next() else { continue };
            let output = parts.next().unwrap_or(DEFAULT_OUTPUT);
            info!(input, output, "compile");
            compile_file(Path::new(input), Path::new(output), verbose)?;
        }
    }

    Ok(())
}

/// Run a shell command line. The exit status is logged but not treated as
/// a build failure, matching the permissive dispatch semantics of the
/// build file format.
fn run_shell(command: &str) -> Result<(), BuildError> {
    info!(command, "shell");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|e| BuildError::Shell(command.to_string(), e))?;
    if !status.success() {
        debug!(%status, "shell command exited nonzero");
    }
    Ok(())
}
