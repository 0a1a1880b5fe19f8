use crate::error::{ErrorType, IntoResult};
use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents)
        .context(format!("Unable to write to {}", path.to_string_lossy()))
        .pub_result(ErrorType::Io)
}

/// Read a file to a `String`.
pub fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
        .pub_result(ErrorType::Io)
}

/// Copies `from` to `to`, replacing `to` if it exists.
pub(crate) fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::copy(from, to)
        .with_context(|| {
            format!(
                "Unable to copy file from '{}' to '{}'",
                from.to_string_lossy(),
                to.to_string_lossy()
            )
        })
        .pub_result(ErrorType::Io)?;
    Ok(())
}

pub(crate) fn make_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p)
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
        .pub_result(ErrorType::Io)
}

pub(crate) fn canonicalize(p: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(p)
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
        .pub_result(ErrorType::Io)
}
