//! Build-artifact discovery

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Dir,
    /// Regular files and symlinks; links are never followed.
    File,
}

/// One entry the clean step removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    /// Pattern that selected this entry.
    pub rule: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Direct children of the project root only.
    TopLevel,
    /// Anywhere below the project root.
    Recursive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Any,
    File,
    Dir,
}

/// A name pattern plus where and what it may match.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    scope: Scope,
    target: Target,
}

impl Rule {
    pub fn new(pattern: &str, scope: Scope, target: Target) -> Result<Self> {
        let pattern =
            Pattern::new(pattern).with_context(|| format!("invalid artifact pattern: {pattern}"))?;
        Ok(Self {
            pattern,
            scope,
            target,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn matches(&self, name: &str, depth: usize, kind: ArtifactKind) -> bool {
        if self.scope == Scope::TopLevel && depth != 1 {
            return false;
        }

        let kind_ok = match self.target {
            Target::Any => true,
            Target::File => kind == ArtifactKind::File,
            Target::Dir => kind == ArtifactKind::Dir,
        };

        kind_ok && self.pattern.matches(name)
    }
}

/// Build output, packaging metadata, bytecode, editor backups and interpreter caches.
pub fn default_rules() -> Result<Vec<Rule>> {
    let table = [
        ("build", Scope::TopLevel, Target::Dir),
        ("dist", Scope::TopLevel, Target::Dir),
        (".eggs", Scope::TopLevel, Target::Dir),
        ("*.egg-info", Scope::Recursive, Target::Any),
        ("*.egg", Scope::Recursive, Target::Any),
        ("*.pyc", Scope::Recursive, Target::File),
        ("*.pyo", Scope::Recursive, Target::File),
        ("*~", Scope::Recursive, Target::Any),
        ("__pycache__", Scope::Recursive, Target::Dir),
    ];

    table
        .into_iter()
        .map(|(pattern, scope, target)| Rule::new(pattern, scope, target))
        .collect()
}

/// Trait for enumerating removable artifacts (filesystem walk, fixed list, etc.).
pub trait ArtifactDiscovery {
    fn root(&self) -> &Path;
    fn discover(&self) -> Result<Vec<Artifact>>;
}

/// Walks a project tree and collects entries matching the rules.
#[derive(Debug, Clone)]
pub struct ProjectScan {
    root: PathBuf,
    rules: Vec<Rule>,
}

impl ProjectScan {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_rules(root, default_rules()?))
    }

    pub fn with_rules(root: impl Into<PathBuf>, rules: Vec<Rule>) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    fn match_rule(&self, name: &str, depth: usize, kind: ArtifactKind) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(name, depth, kind))
    }
}

impl ArtifactDiscovery for ProjectScan {
    fn root(&self) -> &Path {
        &self.root
    }

    fn discover(&self) -> Result<Vec<Artifact>> {
        if !self.root.is_dir() {
            return Err(anyhow!(
                "project root is not a directory: {}",
                self.root.display()
            ));
        }

        let mut found = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if vanished(&err) => continue,
                Err(err) => {
                    // same as find(1): report and keep going
                    warn!(
                        path = %err.path().unwrap_or(&self.root).display(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };

            let kind = if entry.file_type().is_dir() {
                ArtifactKind::Dir
            } else {
                ArtifactKind::File
            };
            let name = entry.file_name().to_string_lossy();

            if let Some(rule) = self.match_rule(&name, entry.depth(), kind) {
                found.push(Artifact {
                    path: entry.path().to_path_buf(),
                    kind,
                    rule: rule.pattern().to_string(),
                });
                if kind == ArtifactKind::Dir {
                    walker.skip_current_dir();
                }
            }
        }

        Ok(found)
    }
}

fn vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}
