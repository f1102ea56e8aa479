//! Project name and version as declared by the Python package

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

pub const SETUP_SCRIPT: &str = "setup.py";
pub const VERSION_FILE: &str = "__version__.py";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl ProjectMetadata {
    /// Read `setup.py` and `<package_dir>/__version__.py` below `root`.
    ///
    /// Missing or unreadable files leave the corresponding field empty;
    /// sources that are not UTF-8 are decoded lossily.
    pub fn load(root: &Path, package_dir: Option<&Path>) -> Result<Self> {
        let parser = MetadataParser::new()?;

        let name = read_optional(&root.join(SETUP_SCRIPT))
            .as_deref()
            .and_then(|src| parser.setup_name(src));

        let version = package_dir
            .and_then(|dir| read_optional(&root.join(dir).join(VERSION_FILE)))
            .as_deref()
            .and_then(|src| parser.version(src));

        Ok(Self { name, version })
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable metadata source");
            None
        }
    }
}

/// Pulls literal assignments out of Python sources without running them.
#[derive(Debug, Clone)]
pub struct MetadataParser {
    setup_name: Regex,
    version: Regex,
}

impl MetadataParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            setup_name: compile(r#"(?m)^\s*name\s*=\s*["']([^"']+)["']"#)?,
            version: compile(r#"(?m)^\s*__version__\s*=\s*["']([^"']+)["']"#)?,
        })
    }

    /// `name="..."` keyword inside the `setup()` call.
    pub fn setup_name(&self, source: &str) -> Option<String> {
        first_capture(&self.setup_name, source)
    }

    /// `__version__ = "..."` assignment.
    pub fn version(&self, source: &str) -> Option<String> {
        first_capture(&self.version, source)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))
}

fn first_capture(re: &Regex, source: &str) -> Option<String> {
    re.captures(source)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Normalised distribution name as used in archive file names (PEP 503 style).
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_sep = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !last_sep {
                out.push('-');
            }
            last_sep = true;
        } else {
            out.push(ch.to_ascii_lowercase());
            last_sep = false;
        }
    }
    out
}
