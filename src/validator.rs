//! External validator invocation (A6): a best-effort `cwltool --validate`
//! call against a freshly written compiled document. Never blocks
//! compilation and never turns a validator failure into a `CompileError` -
//! the compiled output is already on disk by the time this runs.
//!
//! # Binary resolution priority
//!
//! 1. `WIC_CWLTOOL_PATH` environment variable, if set
//! 2. `cwltool` resolved from system `PATH` via `which`
//! 3. The bare name `cwltool`, left for `Command` to fail on naturally

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};
use once_cell::sync::Lazy;

static CWLTOOL_PATH: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(path) = std::env::var("WIC_CWLTOOL_PATH") {
        return PathBuf::from(path);
    }

    if let Ok(output) = Command::new("which").arg("cwltool").output() {
        if output.status.success() {
            let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !found.is_empty() {
                return PathBuf::from(found);
            }
        }
    }

    warn!("cwltool not found on PATH; set WIC_CWLTOOL_PATH or install it for --cwl-validate to work");
    PathBuf::from("cwltool")
});

/// Spawns `cwltool --validate <path>` and logs its outcome. Fire-and-forget:
/// the child runs to completion but its exit status only ever produces a
/// log line, never an error returned to the caller.
pub fn validate(path: &Path) {
    info!("validating {} with {}", path.display(), CWLTOOL_PATH.display());
    let result = Command::new(&*CWLTOOL_PATH).arg("--validate").arg(path).output();

    match result {
        Ok(output) if output.status.success() => {
            info!("{} is valid CWL", path.display());
        }
        Ok(output) => {
            warn!(
                "{} failed cwltool validation: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Err(source) => {
            warn!("could not run {}: {source}", CWLTOOL_PATH.display());
        }
    }
}
