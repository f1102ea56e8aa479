//! Binary entrypoint for mcumgr-pkg

fn main() {
    if let Err(err) = mcumgr_dev_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
