use crate::errors::{FsError, FsErrorType, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

pub(crate) fn get_main_dir() -> Result<PathBuf> {
    let base_dir = BaseDirs::new().ok_or_else(|| {
        FsError::new(
            FsErrorType::IOError,
            "Could not determine the user's home directory".to_string(),
        )
    })?;
    let user_data_dir: &Path = base_dir.data_dir();
    let package_root: PathBuf = user_data_dir.join("deskfs");
    if !package_root.exists() {
        std::fs::create_dir_all(&package_root)?;
    }
    Ok(package_root)
}

pub(crate) fn get_log_dir(base: Option<&Path>) -> Result<PathBuf> {
    let log_dir = match base {
        Some(dir) => dir.to_path_buf(),
        None => get_main_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}
