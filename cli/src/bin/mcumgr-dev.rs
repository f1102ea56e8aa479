//! Run the in-tree mcumgr client as if it were installed.
//!
//! Every argument is forwarded untouched, so this binary takes no flags of
//! its own; logging is controlled through `MCUMGR_DEV_LOG` only.

fn main() {
    std::process::exit(mcumgr_dev_cli::launch(std::env::args_os()));
}
