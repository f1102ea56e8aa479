//! mcumgr-dev-core: run and package the in-tree mcumgr client
//!
//! Two small jobs live here, shared by the `mcumgr-dev` and `mcumgr-pkg`
//! binaries.
//!
//! **Launching**: resolve where the launcher really lives, put that directory
//! at the front of `PYTHONPATH` and hand the arguments to the in-tree
//! `mcumgr/cli.py` untouched.
//!
//! **Packaging**: sweep build output and interpreter caches out of the
//! project tree, then build an sdist and a wheel and install the archive with
//! pip.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mcumgr_dev_core::clean::{clean, CleanOptions};
//!
//! let report = clean(Path::new("."), &CleanOptions::default())?;
//! for artifact in &report.removed {
//!     println!("removed {}", artifact.path.display());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod clean;
pub mod config;
pub mod discovery;
pub mod launcher;
pub mod metadata;
pub mod output;
pub mod package;
pub mod searchpath;
