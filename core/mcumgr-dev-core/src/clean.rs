//! Remove build output and caches from a project tree

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::discovery::{Artifact, ArtifactDiscovery, ArtifactKind, ProjectScan};

#[derive(Debug, Default, Clone)]
pub struct CleanOptions {
    /// List what would be removed without touching the filesystem.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub root: PathBuf,
    pub removed: Vec<Artifact>,
    pub dry_run: bool,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Clean `root` with the default artifact rules.
pub fn clean(root: &Path, opts: &CleanOptions) -> Result<CleanReport> {
    let scan = ProjectScan::new(root)?;
    clean_with(&scan, opts)
}

/// Remove everything `discovery` reports. Entries already gone count as removed.
pub fn clean_with(discovery: &impl ArtifactDiscovery, opts: &CleanOptions) -> Result<CleanReport> {
    let artifacts = discovery.discover()?;

    if !opts.dry_run {
        for artifact in &artifacts {
            remove(artifact)?;
        }
    }

    info!(
        root = %discovery.root().display(),
        count = artifacts.len(),
        dry_run = opts.dry_run,
        "clean finished"
    );

    Ok(CleanReport {
        root: discovery.root().to_path_buf(),
        removed: artifacts,
        dry_run: opts.dry_run,
    })
}

fn remove(artifact: &Artifact) -> Result<()> {
    debug!(path = %artifact.path.display(), rule = %artifact.rule, "removing");

    let result = match artifact.kind {
        ArtifactKind::Dir => fs::remove_dir_all(&artifact.path),
        ArtifactKind::File => fs::remove_file(&artifact.path),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("removing {}", artifact.path.display())),
    }
}
