//! Local preview for linkyee sites: build the site, then serve the output
//! directory on the loopback interface until interrupted.

pub mod build;
pub mod error;
pub mod server;

pub use build::BuildCommand;
pub use error::PreviewError;
pub use server::{DEFAULT_PORT, check_output_dir, router, serve, shutdown_signal};

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::info;

/// Everything a preview run needs.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Site root; the build runs here and `output` is resolved against it.
    pub root: PathBuf,
    pub output: PathBuf,
    pub port: u16,
    /// `None` skips the build step.
    pub build: Option<BuildCommand>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        PreviewOptions {
            root: PathBuf::from("."),
            output: PathBuf::from("_output"),
            port: DEFAULT_PORT,
            build: Some(BuildCommand::default()),
        }
    }
}

impl PreviewOptions {
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

/// Build (unless skipped) and serve until `shutdown` resolves.
pub async fn run<F>(options: &PreviewOptions, shutdown: F) -> Result<(), PreviewError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    match &options.build {
        Some(build) => build.run(&options.root).await?,
        None => info!("Skipping build step"),
    }

    serve(&options.output_dir(), options.addr(), shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = PreviewOptions::default();
        assert_eq!(options.port, 4000);
        assert_eq!(options.addr().to_string(), "127.0.0.1:4000");
        assert_eq!(options.output_dir(), PathBuf::from("./_output"));
    }

    #[tokio::test]
    async fn test_run_refuses_missing_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let options = PreviewOptions {
            root: root.path().to_path_buf(),
            build: None,
            ..PreviewOptions::default()
        };

        let result = run(&options, std::future::pending()).await;
        assert!(matches!(result, Err(PreviewError::OutputDirMissing(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_builds_then_serves() {
        let root = tempfile::tempdir().unwrap();
        let options = PreviewOptions {
            root: root.path().to_path_buf(),
            port: 0,
            build: Some(BuildCommand::new("sh", ["-c", "mkdir -p _output && echo hi > _output/index.html"])),
            ..PreviewOptions::default()
        };

        run(&options, async {}).await.unwrap();
        assert!(root.path().join("_output/index.html").is_file());
    }
}
