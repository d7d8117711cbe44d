use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::PreviewError;

/// Lines of build stderr kept for the failure report.
const STDERR_TAIL_LINES: usize = 5;

/// External command that builds the site into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for BuildCommand {
    /// The site scaffold script shipped with linkyee.
    fn default() -> Self {
        BuildCommand::new("ruby", ["scaffold.rb"])
    }
}

impl BuildCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BuildCommand {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run the build in `root`.
    ///
    /// Build output goes straight to the terminal; stderr is captured so the
    /// last lines can be reported if the build fails.
    pub async fn run(&self, root: &Path) -> Result<(), PreviewError> {
        info!("Building site with `{}`...", self);

        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PreviewError::MissingDependency {
                    program: self.program.clone(),
                    source: e,
                },
                _ => PreviewError::Io(e),
            })?;

        let output = child.wait_with_output().await?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(PreviewError::BuildFailed {
                status: output.status,
                stderr_tail: tail_lines(&stderr, STDERR_TAIL_LINES),
            });
        }

        if !stderr.trim().is_empty() {
            debug!("Build stderr:\n{}", stderr.trim_end());
        }
        info!("Site built");
        Ok(())
    }
}

/// Splits a command line on whitespace. Blank input is rejected.
impl FromStr for BuildCommand {
    type Err = String;

    fn from_str(command_line: &str) -> Result<Self, Self::Err> {
        let mut words = command_line.split_whitespace();
        match words.next() {
            Some(program) => Ok(BuildCommand::new(program, words)),
            None => Err("build command must not be empty".to_string()),
        }
    }
}

impl std::fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The last `n` non-empty lines of `text`.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
