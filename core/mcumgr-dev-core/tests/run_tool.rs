//! Launcher and install flows against stub tools. The stubs are shell
//! scripts run through `sh`, so nothing freshly written is exec'd directly.
#![cfg(unix)]

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use mcumgr_dev_core::config::DevConfig;
use mcumgr_dev_core::launcher::prepare;
use mcumgr_dev_core::package::install;

fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

#[test]
fn runs_entry_point_with_prepended_search_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let tree = temp.path().join("tree");
    let out = temp.path().join("out.txt");
    write(&tree.join("mcumgr-dev"), "");
    write(
        &tree.join("mcumgr/cli.py"),
        &format!(
            "printf '%s\\n' \"$PYTHONPATH\" \"$@\" > '{}'\nexit 4\n",
            out.display()
        ),
    );

    let config = DevConfig::default().with_python("sh");
    let args = vec![
        OsString::from("status"),
        OsString::from("--mgmt-op"),
        OsString::from("read"),
        OsString::from("two words"),
    ];
    let launch = prepare(
        &config,
        tree.join("mcumgr-dev").as_os_str(),
        args,
        Some(OsStr::new("/site/extra")),
    )
    .expect("prepare");

    let code = launch.run().expect("run");
    assert_eq!(code, 4);

    let canonical = fs::canonicalize(&tree).expect("canon");
    let recorded = fs::read_to_string(&out).expect("output");
    let lines: Vec<&str> = recorded.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("{}:/site/extra", canonical.display()).as_str(),
            "status",
            "--mgmt-op",
            "read",
            "two words",
        ]
    );
    assert_eq!(
        launch.describe(),
        format!("PYTHONPATH={}:/site/extra", canonical.display())
    );
}

#[test]
fn missing_entry_point_surfaces_interpreter_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    write(&temp.path().join("mcumgr-dev"), "");

    let config = DevConfig::default().with_python("sh");
    let launch = prepare(
        &config,
        temp.path().join("mcumgr-dev").as_os_str(),
        Vec::new(),
        None,
    )
    .expect("prepare");

    let code = launch.run().expect("run");
    assert_ne!(code, 0);
}

/// A project whose `setup.py` is a shell stub: it fails if stale output is
/// still around, then drops an sdist and a wheel into `dist/`. `install` in
/// the root plays pip and records its arguments.
fn stub_project(root: &Path) {
    write(
        &root.join("setup.py"),
        "if [ -e build ] || [ -e dist ] || [ -e mcumgr/__pycache__ ]; then\n\
         \techo stale >&2; exit 9\n\
         fi\n\
         echo \"$@\" > build-args.txt\n\
         mkdir -p build dist\n\
         : > dist/lohmega_python_mcumgr-0.2.0.tar.gz\n\
         : > dist/lohmega_python_mcumgr-0.2.0-py3-none-any.whl\n",
    );
    write(&root.join("install"), "echo \"$@\" > pip-args.txt\n");
    write(&root.join("mcumgr/__version__.py"), "__version__ = \"0.2.0\"\n");
    write(&root.join("mcumgr/cli.py"), "");
    write(&root.join("mcumgr/__pycache__/cli.cpython-311.pyc"), "");
    write(&root.join("build/lib/mcumgr/cli.py"), "");
    write(&root.join("dist/lohmega_python_mcumgr-0.1.0.tar.gz"), "");
}

fn stub_config() -> DevConfig {
    // `sh install <archive>` runs the root's `install` stub
    DevConfig::default().with_python("sh").with_pip("sh")
}

#[test]
fn install_cleans_before_building_then_installs_new_archive() {
    let temp = tempfile::tempdir().expect("tempdir");
    stub_project(temp.path());
    let root = &fs::canonicalize(temp.path()).expect("canon");

    let report = install(root, &stub_config().with_user_install(true)).expect("install");

    assert!(report
        .cleaned
        .removed
        .iter()
        .any(|a| a.path == root.join("dist")));
    assert_eq!(report.metadata.version.as_deref(), Some("0.2.0"));
    assert_eq!(
        report.archive,
        root.join("dist/lohmega_python_mcumgr-0.2.0.tar.gz")
    );

    let build_args = fs::read_to_string(root.join("build-args.txt")).expect("build ran");
    assert_eq!(build_args.trim(), "sdist bdist_wheel");

    let pip_args = fs::read_to_string(root.join("pip-args.txt")).expect("pip ran");
    assert_eq!(
        pip_args.trim(),
        format!("--user {}", report.archive.display())
    );
}

#[test]
fn failed_build_aborts_before_install() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    stub_project(root);
    write(&root.join("setup.py"), "exit 3\n");

    let result = install(root, &stub_config());

    assert!(result.is_err());
    assert!(!root.join("pip-args.txt").exists());
    assert!(!root.join("build").exists(), "clean still ran first");
}

#[test]
fn install_builds_a_project_whose_setup_script_is_not_utf8() {
    let temp = tempfile::tempdir().expect("tempdir");
    stub_project(temp.path());
    let root = &fs::canonicalize(temp.path()).expect("canon");

    let mut setup = fs::read(root.join("setup.py")).expect("read stub");
    setup.extend_from_slice(b"# author: J\xf6rg\n");
    fs::write(root.join("setup.py"), setup).expect("write latin-1 stub");

    let report = install(root, &stub_config()).expect("install");

    assert_eq!(report.metadata.version.as_deref(), Some("0.2.0"));
    assert!(root.join("build-args.txt").exists(), "build ran");
    assert!(root.join("pip-args.txt").exists(), "pip ran");
}
