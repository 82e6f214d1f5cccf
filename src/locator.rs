//! Executable discovery over the search path.

use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

/// Extensions Windows will run directly.
const WINDOWS_EXTENSIONS: &[&str] = &["exe", "com", "bat", "cmd", "ps1"];

/// Find `name` on `PATH`. Returns the first candidate that is a regular,
/// executable file.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    find_executable_in(name, &path)
}

/// Same as [`find_executable`] but scans an explicit search-path value.
pub fn find_executable_in(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    for dir in env::split_paths(search_path) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = candidate_path(&dir, name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Resolve the program of `command`, keeping its fixed arguments.
///
/// `None` means no binary was found; an empty command never resolves.
pub fn which(command: &[String]) -> Option<Vec<String>> {
    resolve_command(command, find_executable)
}

pub(crate) fn which_in(command: &[String], search_path: &OsStr) -> Option<Vec<String>> {
    resolve_command(command, |name| find_executable_in(name, search_path))
}

fn resolve_command<F>(command: &[String], find: F) -> Option<Vec<String>>
where
    F: FnOnce(&str) -> Option<PathBuf>,
{
    let (program, args) = command.split_first()?;
    let path = find(program)?;
    let mut binary = Vec::with_capacity(command.len());
    binary.push(path.to_string_lossy().into_owned());
    binary.extend(args.iter().cloned());
    Some(binary)
}

fn candidate_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if cfg!(windows) && !has_windows_extension(&candidate) {
        let mut with_ext = candidate.into_os_string();
        with_ext.push(".exe");
        return PathBuf::from(with_ext);
    }
    candidate
}

fn has_windows_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            WINDOWS_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        has_windows_extension(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[cfg(unix)]
    fn write_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt as _;
        let p = dir.join(name);
        fs::write(&p, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(mode)).unwrap();
        p
    }

    fn join(dirs: &[&Path]) -> OsString {
        env::join_paths(dirs).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_skips_non_executable_match() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_file(first.path(), "node", 0o644);
        let want = write_file(second.path(), "node", 0o755);

        let found = find_executable_in("node", &join(&[first.path(), second.path()]));
        assert_eq!(found, Some(want));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_match_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let want = write_file(first.path(), "node", 0o700);
        write_file(second.path(), "node", 0o755);

        let found = find_executable_in("node", &join(&[first.path(), second.path()]));
        assert_eq!(found, Some(want));
    }

    #[cfg(unix)]
    #[test]
    fn test_directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("node")).unwrap();
        assert_eq!(find_executable_in("node", &join(&[dir.path()])), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_segments_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let want = write_file(dir.path(), "node", 0o755);
        let mut path = OsString::from(":");
        path.push(dir.path());
        path.push(":");
        assert_eq!(find_executable_in("node", &path), Some(want));
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_executable_in("node", &join(&[dir.path()])), None);
        assert_eq!(find_executable_in("", &join(&[dir.path()])), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_which_replaces_only_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "d8", 0o755);
        let command = vec!["d8".to_string(), "--harmony".to_string()];

        let binary = which_in(&command, &join(&[dir.path()])).unwrap();
        assert_eq!(
            binary,
            vec![path.to_string_lossy().into_owned(), "--harmony".to_string()]
        );
    }

    #[test]
    fn test_which_no_binary() {
        let dir = tempfile::tempdir().unwrap();
        let command = vec!["missing-runtime".to_string()];
        assert_eq!(which_in(&command, &join(&[dir.path()])), None);
        assert_eq!(which_in(&[], &join(&[dir.path()])), None);
    }
}
