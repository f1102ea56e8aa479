//! mcumgr-pkg and mcumgr-dev command line front ends

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use mcumgr_dev_core::clean::{clean, CleanOptions};
use mcumgr_dev_core::config::DevConfig;
use mcumgr_dev_core::launcher;
use mcumgr_dev_core::output::{write_json_pretty, write_ndjson, write_plain};
use mcumgr_dev_core::package::install;

pub mod logging;

/// CLI entrypoint for mcumgr-pkg.
#[derive(Debug, Parser)]
#[command(
    name = "mcumgr-pkg",
    version,
    about = "Clean, build and install the mcumgr client package"
)]
pub struct Cli {
    /// Verbose output (-vvv for more verbosity)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Project root (defaults to the current directory)
    #[arg(long = "root", value_hint = ValueHint::DirPath, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Remove build output, egg metadata, bytecode, backups and caches
    Clean(CleanArgs),
    /// Clean, build an sdist and a wheel, then install with pip
    Install(InstallArgs),
}

#[derive(Debug, Args)]
struct CleanArgs {
    /// List what would be removed without deleting anything
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Emit the report as a JSON object
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit one JSON object per removed entry
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct InstallArgs {
    /// Install into the user site directory
    #[arg(long = "user", action = ArgAction::SetTrue)]
    user: bool,

    /// Interpreter used to run setup.py
    #[arg(long = "python", value_hint = ValueHint::CommandName)]
    python: Option<OsString>,

    /// Package manager used to install the archive
    #[arg(long = "pip", value_hint = ValueHint::CommandName)]
    pip: Option<OsString>,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let root = project_root(cli.root)?;

    match cli.command {
        Command::Clean(args) => run_clean(root, args),
        Command::Install(args) => {
            let config = DevConfig::from_env()?;
            run_install(root, apply_install_args(config, args))
        }
    }
}

/// Launcher entrypoint; returns the exit code of the in-tree tool.
pub fn launch<I>(args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    logging::init_tracing(0);

    match DevConfig::from_env() {
        Ok(config) => launcher::run(&config, args),
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn project_root(raw: Option<PathBuf>) -> Result<PathBuf> {
    match raw {
        Some(root) => Ok(root),
        None => env::current_dir().context("reading current directory"),
    }
}

fn apply_install_args(mut config: DevConfig, args: InstallArgs) -> DevConfig {
    if let Some(python) = args.python {
        config = config.with_python(python);
    }
    if let Some(pip) = args.pip {
        config = config.with_pip(pip);
    }
    config.with_user_install(args.user)
}

fn run_clean(root: PathBuf, args: CleanArgs) -> Result<()> {
    let opts = CleanOptions {
        dry_run: args.dry_run,
    };
    let report = clean(&root, &opts)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.ndjson {
        write_ndjson(&report, &mut handle)?;
    } else if args.json {
        write_json_pretty(&report, &mut handle)?;
    } else {
        write_plain(&report, &mut handle)?;
    }

    Ok(())
}

fn run_install(root: PathBuf, config: DevConfig) -> Result<()> {
    let report = install(&root, &config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "installed {}", report.archive.display())?;

    Ok(())
}
