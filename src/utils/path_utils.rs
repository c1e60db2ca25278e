// src/utils/path_utils.rs
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Locate `command` on the current `PATH`.
pub fn find_executable(command: &str) -> Option<PathBuf> {
    find_executable_in(command, env::var_os("PATH").as_deref())
}

/// Same as [`find_executable`] but against an explicit search path, so
/// callers (and tests) can probe a controlled set of directories.
pub fn find_executable_in(command: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    // If the command contains a path separator, check it directly
    if command.contains('/') {
        let path = Path::new(command);
        return (path.is_file() && is_executable(path)).then(|| path.to_path_buf());
    }

    let search_path = search_path?;
    env::split_paths(search_path)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = fs::metadata(path) {
        return metadata.permissions().mode() & 0o111 != 0;
    }
    false
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}
