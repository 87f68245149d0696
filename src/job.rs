use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use itertools::Itertools;
use thiserror::Error;
use walkdir::WalkDir;

use crate::log::LogSink;

/// Name prefix for created destination directories.
pub const DESTINATION_PREFIX: &str = "selected_";

/// Timestamp format used in destination directory names, local time with second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Not an existing directory: '{}'", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Missing {0} file extension")]
    MissingExtension(&'static str),
    #[error("Unexpected failure while {context}: {source}")]
    Unexpected {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// A matched file that could not be relocated.
///
/// Per-file failures do not abort the remaining moves.
#[derive(Debug, Error)]
#[error("Failed to move '{}': {reason}", .path.display())]
pub struct MoveFailure {
    pub path: PathBuf,
    #[source]
    pub reason: io::Error,
}

/// Terminal classification for a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// The destination directory was created and the matched files were
    /// moved, possibly with per-file failures.
    Completed,
    /// Matching produced an empty set; nothing was created or moved.
    NoMatches,
    /// The generated destination name was already taken; nothing was moved.
    DestinationExists,
}

/// Counts and per-file outcomes from one job run.
#[derive(Debug)]
pub struct JobReport {
    pub status: JobStatus,
    pub matched_count: usize,
    /// Created destination directory, present only when matches were found
    /// and the directory was created.
    pub destination: Option<PathBuf>,
    pub moved_count: usize,
    pub failures: Vec<MoveFailure>,
}

/// A validated match-and-relocate job between two directories.
///
/// Reference-directory entries with the reference extension supply the
/// basenames to look for; target-directory files named
/// `{basename}.{target_ext}` are moved into a timestamped destination
/// directory created under the target directory.
#[derive(Debug, Clone)]
pub struct Job {
    reference_dir: PathBuf,
    target_dir: PathBuf,
    reference_ext: String,
    target_ext: String,
}

impl Job {
    /// Create a job from raw inputs.
    ///
    /// Extensions are trimmed and lowercased. Both paths must name
    /// existing directories.
    ///
    /// # Errors
    /// Returns an error if either extension is empty after normalization
    /// or either path is not an existing directory.
    pub fn new(
        reference_dir: PathBuf,
        target_dir: PathBuf,
        reference_ext: &str,
        target_ext: &str,
    ) -> Result<Self, JobError> {
        let reference_ext = normalize_extension(reference_ext).ok_or(JobError::MissingExtension("reference"))?;
        let target_ext = normalize_extension(target_ext).ok_or(JobError::MissingExtension("target"))?;
        if !reference_dir.is_dir() {
            return Err(JobError::MissingDirectory(reference_dir));
        }
        if !target_dir.is_dir() {
            return Err(JobError::MissingDirectory(target_dir));
        }
        Ok(Self {
            reference_dir,
            target_dir,
            reference_ext,
            target_ext,
        })
    }

    #[must_use]
    pub fn reference_ext(&self) -> &str {
        &self.reference_ext
    }

    #[must_use]
    pub fn target_ext(&self) -> &str {
        &self.target_ext
    }

    /// Compute the matched target files without modifying anything.
    ///
    /// # Errors
    /// Returns an error if the reference directory cannot be listed.
    pub fn matches(&self) -> Result<Vec<PathBuf>, JobError> {
        Ok(self.match_target_files(&self.reference_base_names()?))
    }

    /// Run the full job: enumerate, match, create the destination
    /// directory and move the matched files into it.
    ///
    /// # Errors
    /// Returns an error for unexpected filesystem failures during
    /// enumeration or destination creation. Per-file move failures are
    /// collected in the report instead.
    pub fn execute(&self, log: &mut dyn LogSink) -> Result<JobReport, JobError> {
        self.execute_at(Local::now(), log)
    }

    /// Run the job using the given timestamp for the destination name.
    ///
    /// # Errors
    /// Same as [`Job::execute`].
    pub fn execute_at(&self, timestamp: DateTime<Local>, log: &mut dyn LogSink) -> Result<JobReport, JobError> {
        log.info(format!(
            "Searching for .{} files in '{}'",
            self.reference_ext,
            self.reference_dir.display()
        ));
        let base_names = match self.reference_base_names() {
            Ok(names) => names,
            Err(error) => {
                log.error(error.to_string());
                return Err(error);
            }
        };
        log.info(format!("Found {} .{} file(s)", base_names.len(), self.reference_ext));

        log.info(format!(
            "Matching .{} files in '{}'",
            self.target_ext,
            self.target_dir.display()
        ));
        let matches = self.match_target_files(&base_names);
        log.info(format!("Matched {} .{} file(s)", matches.len(), self.target_ext));

        if matches.is_empty() {
            log.warn("No matching files found".to_string());
            return Ok(JobReport {
                status: JobStatus::NoMatches,
                matched_count: 0,
                destination: None,
                moved_count: 0,
                failures: Vec::new(),
            });
        }

        let destination = self.target_dir.join(destination_name(timestamp));
        if let Err(error) = fs::create_dir(&destination) {
            if error.kind() == io::ErrorKind::AlreadyExists {
                log.error(format!(
                    "'{}' already exists in the target directory",
                    crate::path_to_filename_string(&destination)
                ));
                return Ok(JobReport {
                    status: JobStatus::DestinationExists,
                    matched_count: matches.len(),
                    destination: None,
                    moved_count: 0,
                    failures: Vec::new(),
                });
            }
            let unexpected = JobError::Unexpected {
                context: format!("creating destination directory '{}'", destination.display()),
                source: error,
            };
            log.error(unexpected.to_string());
            return Err(unexpected);
        }

        let mut moved_count = 0;
        let mut failures = Vec::new();
        for path in &matches {
            let new_path = destination.join(crate::path_to_filename_string(path));
            match fs::rename(path, &new_path) {
                Ok(()) => moved_count += 1,
                Err(reason) => {
                    log.error(format!("Failed to move '{}': {reason}", path.display()));
                    failures.push(MoveFailure {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        log.success(format!(
            "Moved {moved_count} of {} matched file(s) to '{}'",
            matches.len(),
            destination.display()
        ));
        Ok(JobReport {
            status: JobStatus::Completed,
            matched_count: matches.len(),
            destination: Some(destination),
            moved_count,
            failures,
        })
    }

    /// List reference directory entries with the reference extension and
    /// return their basenames, sorted and deduplicated.
    fn reference_base_names(&self) -> Result<Vec<String>, JobError> {
        let mut names: Vec<String> = Vec::new();
        for entry in WalkDir::new(&self.reference_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|error| JobError::Unexpected {
                context: format!("listing '{}'", self.reference_dir.display()),
                source: io::Error::from(error),
            })?;
            let name = crate::os_str_to_string(entry.file_name());
            if let Some(base) = base_name(&name, &self.reference_ext) {
                names.push(base.to_string());
            }
        }
        names.sort_unstable();
        Ok(names.into_iter().dedup().collect())
    }

    /// Target files named `{base}.{target_ext}`, in basename order.
    fn match_target_files(&self, base_names: &[String]) -> Vec<PathBuf> {
        base_names
            .iter()
            .map(|base| self.target_dir.join(format!("{base}.{}", self.target_ext)))
            .filter(|candidate| candidate.is_file())
            .collect()
    }
}

/// Destination directory name for the given timestamp.
#[must_use]
pub fn destination_name(timestamp: DateTime<Local>) -> String {
    format!("{DESTINATION_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Lowercased and trimmed extension, or `None` when empty.
fn normalize_extension(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// Basename for a filename whose final extension segment matches
/// `extension`, compared ASCII case-insensitively.
fn base_name<'a>(filename: &'a str, extension: &str) -> Option<&'a str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    (!stem.is_empty() && ext.eq_ignore_ascii_case(extension)).then_some(stem)
}

#[cfg(test)]
mod job_tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn test_base_name_matches_extension() {
        assert_eq!(base_name("movie.mp4", "mp4"), Some("movie"));
        assert_eq!(base_name("episode.one.srt", "srt"), Some("episode.one"));
    }

    #[test]
    fn test_base_name_is_case_insensitive() {
        assert_eq!(base_name("Movie.MP4", "mp4"), Some("Movie"));
        assert_eq!(base_name("sub.Srt", "srt"), Some("sub"));
    }

    #[test]
    fn test_base_name_rejects_other_extensions() {
        assert_eq!(base_name("movie.mp4", "srt"), None);
        assert_eq!(base_name("notes.txt", "mp4"), None);
    }

    #[test]
    fn test_base_name_requires_extension_segment() {
        assert_eq!(base_name("README", "srt"), None);
        assert_eq!(base_name(".srt", "srt"), None);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(" MP4 "), Some("mp4".to_string()));
        assert_eq!(normalize_extension("srt"), Some("srt".to_string()));
        assert_eq!(normalize_extension("   "), None);
        assert_eq!(normalize_extension(""), None);
    }

    #[test]
    fn test_destination_name_format() {
        let timestamp = Local.with_ymd_and_hms(2025, 3, 1, 12, 30, 5).single().unwrap();
        assert_eq!(destination_name(timestamp), "selected_2025-03-01_12-30-05");
    }

    #[test]
    fn test_job_new_normalizes_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let job = Job::new(dir.path().to_path_buf(), dir.path().to_path_buf(), " SRT ", "Mp4").unwrap();
        assert_eq!(job.reference_ext(), "srt");
        assert_eq!(job.target_ext(), "mp4");
    }

    #[test]
    fn test_job_new_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = Job::new(missing.clone(), dir.path().to_path_buf(), "srt", "mp4");
        assert!(matches!(result, Err(JobError::MissingDirectory(path)) if path == missing));

        let result = Job::new(dir.path().to_path_buf(), missing.clone(), "srt", "mp4");
        assert!(matches!(result, Err(JobError::MissingDirectory(path)) if path == missing));
    }

    #[test]
    fn test_job_new_rejects_blank_extension() {
        let dir = tempfile::tempdir().unwrap();

        let result = Job::new(dir.path().to_path_buf(), dir.path().to_path_buf(), "  ", "mp4");
        assert!(matches!(result, Err(JobError::MissingExtension("reference"))));

        let result = Job::new(dir.path().to_path_buf(), dir.path().to_path_buf(), "srt", "");
        assert!(matches!(result, Err(JobError::MissingExtension("target"))));
    }
}
