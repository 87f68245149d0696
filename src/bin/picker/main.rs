mod config;
mod picker;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::picker::Picker;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Match files between two directories by basename and relocate them"
)]
pub struct Args {
    /// Reference directory to read basenames from
    #[arg(value_hint = clap::ValueHint::DirPath)]
    reference: Option<PathBuf>,

    /// Target directory to pick matching files from
    #[arg(value_hint = clap::ValueHint::DirPath)]
    target: Option<PathBuf>,

    /// File extension of the reference files
    #[arg(short, long, value_name = "EXTENSION")]
    reference_ext: Option<String>,

    /// File extension of the target files
    #[arg(short, long, value_name = "EXTENSION")]
    target_ext: Option<String>,

    /// Only print matching files without moving them
    #[arg(short, long)]
    print: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        file_picker::generate_shell_completion(*shell, Args::command(), env!("CARGO_BIN_NAME"));
        Ok(())
    } else {
        Picker::new(args)?.run()
    }
}
