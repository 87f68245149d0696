use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use file_picker::job::{Job, JobStatus};
use file_picker::log::ConsoleLog;
use file_picker::{path_to_filename_string, print_warning};

use crate::Args;
use crate::config::Config;

#[derive(Debug)]
pub struct Picker {
    reference_dir: PathBuf,
    target_dir: PathBuf,
    config: Config,
}

impl Picker {
    pub fn new(args: Args) -> Result<Self> {
        let reference_dir = file_picker::resolve_directory_path(args.reference.as_deref())?;
        let target_dir = file_picker::resolve_directory_path(args.target.as_deref())?;
        let config = Config::from_args(args)?;
        Ok(Self {
            reference_dir,
            target_dir,
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        if self.config.verbose {
            println!("Reference: {}", self.reference_dir.display());
            println!("Target: {}", self.target_dir.display());
        }

        let job = Job::new(
            self.reference_dir.clone(),
            self.target_dir.clone(),
            &self.config.reference_ext,
            &self.config.target_ext,
        )?;

        if self.config.dryrun {
            Self::print_matches(&job)
        } else {
            Self::relocate(&job)
        }
    }

    /// List the files a real run would move.
    fn print_matches(job: &Job) -> Result<()> {
        let matches = job.matches()?;
        if matches.is_empty() {
            print_warning!("No matching files found");
            return Ok(());
        }

        println!("{}", format!("Would move {} file(s):", matches.len()).cyan().bold());
        for path in &matches {
            println!("  {}", path_to_filename_string(path));
        }
        Ok(())
    }

    fn relocate(job: &Job) -> Result<()> {
        let mut log = ConsoleLog;
        let report = job.execute(&mut log)?;
        match report.status {
            JobStatus::DestinationExists => {
                anyhow::bail!("Destination directory already exists, no files were moved")
            }
            JobStatus::Completed if !report.failures.is_empty() => {
                anyhow::bail!(
                    "Failed to move {} of {} matched file(s)",
                    report.failures.len(),
                    report.matched_count
                )
            }
            JobStatus::Completed | JobStatus::NoMatches => Ok(()),
        }
    }
}
