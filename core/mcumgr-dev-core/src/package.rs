//! Clean, build an sdist and a wheel, install the archive with pip

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::clean::{clean, CleanOptions, CleanReport};
use crate::config::DevConfig;
use crate::metadata::{normalize_name, ProjectMetadata, SETUP_SCRIPT};

pub const DIST_DIR: &str = "dist";
pub const SDIST_SUFFIX: &str = ".tar.gz";

#[derive(Debug, Clone)]
pub struct InstallReport {
    pub cleaned: CleanReport,
    pub metadata: ProjectMetadata,
    pub archive: PathBuf,
}

/// `<python> setup.py sdist bdist_wheel`, run from the project root.
pub fn build_command(root: &Path, config: &DevConfig) -> Command {
    let mut cmd = Command::new(&config.python);
    cmd.current_dir(root)
        .arg(SETUP_SCRIPT)
        .arg("sdist")
        .arg("bdist_wheel");
    cmd
}

/// `<pip> install [--user] <archive>`, run from the project root.
pub fn install_command(root: &Path, config: &DevConfig, archive: &Path) -> Command {
    let mut cmd = Command::new(&config.pip);
    cmd.current_dir(root).arg("install");
    if config.user_install {
        cmd.arg("--user");
    }
    cmd.arg(archive);
    cmd
}

/// Clean the tree, build both distributions and install the source archive.
///
/// The clean step always completes before the build starts; any failing
/// step aborts the rest.
pub fn install(root: &Path, config: &DevConfig) -> Result<InstallReport> {
    // children run from the root; keep every path we hand them absolute
    let root = &fs::canonicalize(root)
        .with_context(|| format!("resolving project root {}", root.display()))?;
    let cleaned = clean(root, &CleanOptions::default())?;

    let metadata = ProjectMetadata::load(root, config.package_dir())?;
    info!(
        name = metadata.name.as_deref().unwrap_or("<unknown>"),
        version = metadata.version.as_deref().unwrap_or("<unknown>"),
        "building distributions"
    );

    run_step("build", build_command(root, config))?;

    let archive = locate_archive(&root.join(DIST_DIR), &metadata)?;
    info!(archive = %archive.display(), "installing");

    run_step("install", install_command(root, config, &archive))?;

    Ok(InstallReport {
        cleaned,
        metadata,
        archive,
    })
}

fn run_step(step: &str, mut command: Command) -> Result<()> {
    info!(
        step,
        "running: {} {}",
        command.get_program().to_string_lossy(),
        command
            .get_args()
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    );

    let status = command
        .status()
        .with_context(|| format!("failed to spawn {step} step"))?;

    if !status.success() {
        bail!("{step} step failed: {status}");
    }

    Ok(())
}

/// Pick the source archive to install from `dist`.
///
/// With a known version the archive named `<name>-<version>.tar.gz` wins
/// (either name spelling); otherwise exactly one `*.tar.gz` must be present.
pub fn locate_archive(dist: &Path, metadata: &ProjectMetadata) -> Result<PathBuf> {
    let mut archives = Vec::new();
    let entries = fs::read_dir(dist).with_context(|| format!("reading {}", dist.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(SDIST_SUFFIX) && entry.file_type()?.is_file() {
            archives.push(entry.path());
        }
    }
    archives.sort();

    if archives.is_empty() {
        bail!(
            "no source archive (*{SDIST_SUFFIX}) found in {}",
            dist.display()
        );
    }

    if let Some(version) = &metadata.version {
        let wanted: Vec<&PathBuf> = archives
            .iter()
            .filter(|path| archive_matches(path, metadata.name.as_deref(), version))
            .collect();
        if let [only] = wanted.as_slice() {
            return Ok((*only).clone());
        }
    }

    if let [only] = archives.as_slice() {
        return Ok(only.clone());
    }

    bail!(
        "found {} source archives in {}, cannot pick one",
        archives.len(),
        dist.display()
    )
}

fn archive_matches(path: &Path, name: Option<&str>, version: &str) -> bool {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    let suffix = format!("-{version}{SDIST_SUFFIX}");
    let stem = match file_name.strip_suffix(&suffix) {
        Some(stem) => stem,
        None => return false,
    };

    match name {
        Some(name) => normalize_name(stem) == normalize_name(name),
        None => true,
    }
}
