//! Host package-manager adapters.
//!
//! The supported tools form a closed set. One is picked at start-up by
//! probing `PATH` in priority order, and the only capability exposed is
//! [`PackageManager::list_installed`]. Each adapter shells out and hands the
//! captured text to a pure parser in its submodule.

mod apt;
mod dpkg;
mod pacman;
mod pamac;

use crate::error::{Result, SnapshellError};
use crate::inventory::PackageRecord;
use crate::utils::path_utils;
use log::{debug, info};
use std::ffi::OsStr;
use std::fmt;
use std::process::Command;

pub use apt::parse_apt_list;
pub use dpkg::parse_dpkg_query;
pub use pacman::parse_info_blocks;
pub use pamac::parse_pamac_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Dpkg,
    Apt,
    Pacman,
    Pamac,
}

/// Probe order. The first tool found on `PATH` wins.
const PRIORITY: [PackageManager; 4] = [
    PackageManager::Dpkg,
    PackageManager::Apt,
    PackageManager::Pacman,
    PackageManager::Pamac,
];

impl PackageManager {
    pub fn detect() -> Result<Self> {
        let found = PRIORITY
            .into_iter()
            .find(|pm| path_utils::find_executable(pm.probe_binary()).is_some())
            .ok_or(SnapshellError::PackageManagerNotFound)?;
        info!("Detected package manager: {}", found);
        Ok(found)
    }

    /// Like [`PackageManager::detect`] but against an explicit search path.
    pub fn detect_in(search_path: &OsStr) -> Result<Self> {
        PRIORITY
            .into_iter()
            .find(|pm| path_utils::find_executable_in(pm.probe_binary(), Some(search_path)).is_some())
            .ok_or(SnapshellError::PackageManagerNotFound)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Dpkg => "dpkg",
            PackageManager::Apt => "apt",
            PackageManager::Pacman => "pacman",
            PackageManager::Pamac => "pamac",
        }
    }

    fn probe_binary(&self) -> &'static str {
        match self {
            PackageManager::Dpkg => "dpkg-query",
            other => other.name(),
        }
    }

    /// Enumerate every installed package.
    pub fn list_installed(&self) -> Result<Vec<PackageRecord>> {
        let packages = match self {
            PackageManager::Dpkg => {
                let output = run_tool("dpkg-query", &["-W", dpkg::QUERY_FORMAT])?;
                parse_dpkg_query(&output)
            }
            PackageManager::Apt => {
                let output = run_tool("apt", &["list", "--installed"])?;
                parse_apt_list(&output)
            }
            PackageManager::Pacman => {
                let output = run_tool("pacman", &["-Qi"])?;
                parse_info_blocks(&output)
            }
            PackageManager::Pamac => {
                let listing = run_tool("pamac", &["list", "--installed"])?;
                let names = parse_pamac_list(&listing);
                if names.is_empty() {
                    Vec::new()
                } else {
                    let mut args = vec!["info"];
                    args.extend(names.iter().map(String::as_str));
                    let output = run_tool("pamac", &args)?;
                    parse_info_blocks(&output)
                }
            }
        };

        debug!("{} reported {} installed packages", self, packages.len());
        Ok(packages)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn run_tool(program: &str, args: &[&str]) -> Result<String> {
    debug!("Running {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .env("LC_ALL", "C")
        .output()
        .map_err(|e| SnapshellError::PackageManager(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SnapshellError::PackageManager(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    fn fake_tool(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_detect_prefers_dpkg_over_apt() {
        let dir = tempdir().unwrap();
        fake_tool(dir.path(), "apt");
        fake_tool(dir.path(), "dpkg-query");
        assert_eq!(
            PackageManager::detect_in(dir.path().as_os_str()).unwrap(),
            PackageManager::Dpkg
        );
    }

    #[test]
    fn test_detect_prefers_pacman_over_pamac() {
        let dir = tempdir().unwrap();
        fake_tool(dir.path(), "pamac");
        fake_tool(dir.path(), "pacman");
        assert_eq!(
            PackageManager::detect_in(dir.path().as_os_str()).unwrap(),
            PackageManager::Pacman
        );
    }

    #[test]
    fn test_detect_without_any_tool_fails() {
        let dir = tempdir().unwrap();
        fake_tool(dir.path(), "brew");
        assert!(matches!(
            PackageManager::detect_in(dir.path().as_os_str()),
            Err(SnapshellError::PackageManagerNotFound)
        ));
    }

    #[test]
    fn test_display_is_tool_name() {
        assert_eq!(PackageManager::Pamac.to_string(), "pamac");
        assert_eq!(PackageManager::Dpkg.to_string(), "dpkg");
    }

    #[test]
    fn test_run_tool_reports_missing_binary() {
        let err = run_tool("snapshell-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, SnapshellError::PackageManager(_)));
    }
}
