//! Run the in-tree mcumgr client without installing it

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::config::DevConfig;
use crate::searchpath;

/// Exit code when the interpreter cannot be found (shell convention).
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code when the interpreter exists but cannot be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Resolve the launcher's own invocation path to an absolute, symlink-free path.
///
/// `argv0` with a directory component is taken relative to the current
/// directory; a bare name was found through `PATH`, so the running executable
/// stands in for it.
pub fn resolve_self(argv0: &OsStr) -> Result<PathBuf> {
    let invoked = Path::new(argv0);
    let has_dir = invoked
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());

    let target = if has_dir {
        invoked.to_path_buf()
    } else {
        env::current_exe().context("locating the running executable")?
    };

    fs::canonicalize(&target).with_context(|| format!("resolving {}", target.display()))
}

/// Directory the in-tree tool is resolved against.
pub fn launch_root(resolved: &Path) -> Result<PathBuf> {
    resolved
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("{} has no parent directory", resolved.display()))
}

/// A fully prepared child invocation.
#[derive(Debug, Clone)]
pub struct Launch {
    program: OsString,
    entry: PathBuf,
    args: Vec<OsString>,
    search_path_var: String,
    search_path: OsString,
}

impl Launch {
    /// Prepare `<python> <root>/<entry> <args...>` with `root` prepended to `prior`.
    pub fn new(
        config: &DevConfig,
        root: &Path,
        args: Vec<OsString>,
        prior: Option<&OsStr>,
    ) -> Result<Self> {
        Ok(Self {
            program: config.python.clone(),
            entry: root.join(&config.entry_point),
            args,
            search_path_var: config.search_path_var.clone(),
            search_path: searchpath::prepend(root, prior)?,
        })
    }

    pub fn search_path(&self) -> &OsStr {
        &self.search_path
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.program.clone());
        argv.push(self.entry.clone().into_os_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// The diagnostic line reporting the effective search path.
    pub fn describe(&self) -> String {
        format!(
            "{}={}",
            self.search_path_var,
            self.search_path.to_string_lossy()
        )
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.entry)
            .args(&self.args)
            .env(&self.search_path_var, &self.search_path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Spawn the tool, wait for it and return its exit code.
    pub fn run(&self) -> io::Result<i32> {
        debug!(argv = ?self.argv(), "spawning in-tree tool");
        let status = self.command().status()?;
        Ok(exit_code(status))
    }
}

/// Resolve, prepare and run; returns the code the launcher should exit with.
pub fn run<I>(config: &DevConfig, args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let argv0 = args.next().unwrap_or_default();
    let forwarded: Vec<OsString> = args.collect();

    let prior = env::var_os(&config.search_path_var);
    let launch = match prepare(config, &argv0, forwarded, prior.as_deref()) {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("error: {err:#}");
            return 1;
        }
    };

    eprintln!("{}", launch.describe());

    match launch.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: running {}: {err}", config.python.to_string_lossy());
            spawn_failure_code(&err)
        }
    }
}

/// Resolve `argv0` and prepare the invocation for its directory.
pub fn prepare(
    config: &DevConfig,
    argv0: &OsStr,
    args: Vec<OsString>,
    prior: Option<&OsStr>,
) -> Result<Launch> {
    let resolved = resolve_self(argv0)?;
    let root = launch_root(&resolved)?;
    debug!(resolved = %resolved.display(), root = %root.display(), "resolved launcher");
    Launch::new(config, &root, args, prior)
}

fn spawn_failure_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        _ => EXIT_NOT_EXECUTABLE,
    }
}

/// Map a child status to an exit code; signal deaths become `128 + signo`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
