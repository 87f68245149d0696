use std::path::PathBuf;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Path to the user config file: `$HOME/.config/file-picker.toml`
///
/// Returns `None` if the home directory cannot be determined.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
}
