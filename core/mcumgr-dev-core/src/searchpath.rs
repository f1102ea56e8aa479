//! Module-search path helpers

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use anyhow::{anyhow, Result};

/// Separator between entries of a search-path variable on this platform.
#[cfg(windows)]
pub const SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const SEPARATOR: &str = ":";

/// Put `dir` in front of `prior`, keeping the prior value byte-for-byte.
///
/// An unset or empty prior value yields just `dir`, so the interpreter never
/// sees a trailing empty entry (which it would read as the current directory).
pub fn prepend(dir: &Path, prior: Option<&OsStr>) -> Result<OsString> {
    let mut joined = env::join_paths([dir])
        .map_err(|_| anyhow!("path contains a search-path separator: {}", dir.display()))?;

    if let Some(prior) = prior.filter(|p| !p.is_empty()) {
        joined.push(SEPARATOR);
        joined.push(prior);
    }

    Ok(joined)
}

/// First entry of a search-path value, if any.
pub fn first_entry(value: &OsStr) -> Option<std::path::PathBuf> {
    env::split_paths(value).next()
}
