//! Launcher and packaging configuration

use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Result};

/// Interpreter override.
pub const PYTHON_ENV: &str = "MCUMGR_DEV_PYTHON";
/// Package-manager override.
pub const PIP_ENV: &str = "MCUMGR_DEV_PIP";
/// Entry-point override, relative to the launch root.
pub const ENTRY_ENV: &str = "MCUMGR_DEV_ENTRY";

pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_PIP: &str = "pip3";
pub const DEFAULT_ENTRY: &str = "mcumgr/cli.py";
pub const SEARCH_PATH_VAR: &str = "PYTHONPATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevConfig {
    pub python: OsString,
    pub pip: OsString,
    /// Entry point relative to the launch root.
    pub entry_point: PathBuf,
    pub search_path_var: String,
    /// Pass `--user` to the package manager.
    pub user_install: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            python: OsString::from(DEFAULT_PYTHON),
            pip: OsString::from(DEFAULT_PIP),
            entry_point: PathBuf::from(DEFAULT_ENTRY),
            search_path_var: SEARCH_PATH_VAR.to_string(),
            user_install: false,
        }
    }
}

impl DevConfig {
    /// Defaults with `MCUMGR_DEV_*` overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Same as [`DevConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(python) = non_empty(PYTHON_ENV) {
            config.python = python;
        }
        if let Some(pip) = non_empty(PIP_ENV) {
            config.pip = pip;
        }
        if let Some(entry) = non_empty(ENTRY_ENV) {
            config.entry_point = validate_entry(PathBuf::from(entry))?;
        }

        Ok(config)
    }

    pub fn with_python(mut self, python: impl Into<OsString>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_pip(mut self, pip: impl Into<OsString>) -> Self {
        self.pip = pip.into();
        self
    }

    pub fn with_user_install(mut self, yes: bool) -> Self {
        self.user_install = yes;
        self
    }

    /// Package directory holding `__version__.py`: the entry point's first component.
    pub fn package_dir(&self) -> Option<&Path> {
        match self.entry_point.components().next() {
            Some(Component::Normal(first)) if self.entry_point.components().count() > 1 => {
                Some(Path::new(first))
            }
            _ => None,
        }
    }
}

fn validate_entry(entry: PathBuf) -> Result<PathBuf> {
    if entry.is_absolute() || entry.has_root() {
        return Err(anyhow!(
            "{ENTRY_ENV} must be relative to the launcher directory: {}",
            entry.display()
        ));
    }
    Ok(entry)
}
