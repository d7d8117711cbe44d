use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures that stop a preview run. Each one maps to a non-zero exit.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The build program could not be started.
    #[error("missing dependency: could not run `{program}` ({source}). Make sure it is installed")]
    MissingDependency {
        program: String,
        source: std::io::Error,
    },

    #[error("build failed ({status}){}", format_tail(.stderr_tail))]
    BuildFailed {
        status: ExitStatus,
        stderr_tail: String,
    },

    #[error("{} directory not found. Build failed?", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_tail(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!("\n{}", tail)
    }
}
