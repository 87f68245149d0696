pub mod config;
pub mod job;
pub mod log;

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::Colorize;

/// Convert `OsStr` to String with invalid Unicode handling.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().to_string().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to filename string with invalid Unicode handling.
#[must_use]
pub fn path_to_filename_string(path: &Path) -> String {
    os_str_to_string(path.file_name().unwrap_or_default())
}

/// Resolve the provided path to an absolute directory path.
///
/// If `path` is `None` or blank, the current working directory is used.
/// Returns an error if the path does not exist or is not a directory.
pub fn resolve_directory_path(path: Option<&Path>) -> Result<PathBuf> {
    let input_path = path.map(path_to_string).unwrap_or_default().trim().to_string();

    let directory = if input_path.is_empty() {
        env::current_dir().context("Failed to get current working directory")?
    } else {
        PathBuf::from(input_path)
    };
    if !directory.is_dir() {
        anyhow::bail!(
            "Input path does not exist or is not a directory: '{}'",
            directory.display()
        );
    }

    let absolute_path = dunce::canonicalize(&directory)?;

    // Canonicalize fails for network drives on Windows :(
    if path_to_string(&absolute_path).starts_with(r"\\?") && !path_to_string(&directory).starts_with(r"\\?") {
        Ok(directory)
    } else {
        Ok(absolute_path)
    }
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Write a shell completion script for the given command to stdout.
pub fn generate_shell_completion(shell: Shell, mut command: Command, command_name: &str) {
    clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;

    #[test]
    fn test_resolve_directory_path_valid() {
        let dir = tempdir().unwrap();
        let resolved = resolve_directory_path(Some(dir.path()));
        assert!(resolved.is_ok());
    }

    #[test]
    fn test_resolve_directory_path_nonexistent() {
        let resolved = resolve_directory_path(Some(Path::new("nonexistent")));
        assert!(resolved.is_err());
    }

    #[test]
    fn test_resolve_directory_path_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        File::create(&file_path).unwrap();

        let resolved = resolve_directory_path(Some(&file_path));
        assert!(resolved.is_err());
    }

    #[test]
    fn test_resolve_directory_path_blank_uses_current_dir() {
        let resolved = resolve_directory_path(Some(Path::new("  \n")));
        assert!(resolved.is_ok());
        assert_eq!(resolved.unwrap(), env::current_dir().unwrap());
    }

    #[test]
    fn test_resolve_directory_path_default() {
        let resolved = resolve_directory_path(None);
        assert!(resolved.is_ok());
        assert_eq!(resolved.unwrap(), env::current_dir().unwrap());
    }

    #[test]
    fn test_path_to_filename_string() {
        assert_eq!(path_to_filename_string(Path::new("/some/dir/movie.mp4")), "movie.mp4");
        assert_eq!(path_to_filename_string(Path::new("relative/sub.srt")), "sub.srt");
        assert_eq!(path_to_filename_string(Path::new("/")), "");
    }
}
