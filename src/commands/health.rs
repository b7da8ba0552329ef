use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::HealthArgs;
use crate::commands::capture::default_capture_path;
use crate::model::HealthStatus;
use crate::util::write_json_stdout;

pub fn run(args: HealthArgs) -> Result<()> {
    let status = health_status(&args.capture_root);
    write_json_stdout(&status)?;

    match status.error {
        None => {
            info!(capture_root = %args.capture_root.display(), "capture source healthy");
            Ok(())
        }
        Some(error) => {
            warn!(capture_root = %args.capture_root.display(), "capture source unhealthy");
            bail!("health check failed: {error}")
        }
    }
}

fn health_status(capture_root: &Path) -> HealthStatus {
    match check_captures(capture_root) {
        Ok(()) => HealthStatus {
            status: "healthy".to_string(),
            captures: Some("available".to_string()),
            error: None,
        },
        Err(err) => HealthStatus {
            status: "unhealthy".to_string(),
            captures: None,
            error: Some(format!("{err:#}")),
        },
    }
}

fn check_captures(capture_root: &Path) -> Result<()> {
    fs::read_dir(capture_root)
        .with_context(|| format!("failed to read capture root {}", capture_root.display()))?;

    let baseline_path = default_capture_path(capture_root, None);
    if !baseline_path.is_file() {
        bail!("baseline capture missing: {}", baseline_path.display());
    }

    Ok(())
}
