//! dpkg collaborators: the installed-package lister and the batched
//! status query, both thin subprocess wrappers behind
//! [`PackageSource`].
//!
//! The lister is the classic shell pipeline (`dpkg-query -l`, keep the
//! `ii` rows, print the name column). The status query passes one
//! batch of names straight to `dpkg-query --status` — batching happens
//! upstream in the driver, so the argument list stays short.

use std::process::Command;

use debdu_core::{PackageSource, SourceError};
use tracing::{debug, warn};

/// Shell pipeline producing one installed package name per line.
const LIST_INSTALLED_CMD: &str = "dpkg-query -l | grep '^ii' | awk '{print $2}'";

/// Package source backed by the host's dpkg database via `dpkg-query`.
#[derive(Debug, Default)]
pub struct DpkgSource;

impl PackageSource for DpkgSource {
    fn list_installed(&self) -> Result<Vec<String>, SourceError> {
        let output = Command::new("/bin/sh")
            .args(["-c", LIST_INSTALLED_CMD])
            .output()?;

        if !output.status.success() {
            return Err(SourceError::Command {
                command: LIST_INSTALLED_CMD.to_string(),
                details: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let names: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();
        debug!(count = names.len(), "dpkg listed installed packages");
        Ok(names)
    }

    fn query_status(&self, names: &[String]) -> Result<String, SourceError> {
        let output = Command::new("dpkg-query")
            .arg("--status")
            .args(names)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        // dpkg-query exits nonzero when any requested name is unknown
        // but still prints the stanzas it does have. Those names simply
        // stay absent from the catalog; only a fully empty answer is a
        // hard failure.
        if !output.status.success() {
            if stdout.trim().is_empty() {
                return Err(SourceError::Command {
                    command: "dpkg-query --status".to_string(),
                    details: format!(
                        "{}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                });
            }
            warn!(
                status = %output.status,
                "dpkg-query --status reported failure; using partial stanzas"
            );
        }

        Ok(stdout)
    }
}
