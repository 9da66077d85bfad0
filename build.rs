use std::env;
use std::process::Command;

fn main() {
    let pkg_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    // CLI version string: prefer `git describe`, fall back to the package version
    let git_describe = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| pkg_version.clone());
    println!("cargo:rustc-env=GIT_DESCRIBE={}", git_describe);

    // Version of the agent package this installer ships
    let agent_version = ["DD_AGENT_VERSION", "PACKAGE_VERSION"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or(pkg_version);
    println!("cargo:rustc-env=DD_AGENT_VERSION={}", agent_version.trim());

    println!("cargo:rerun-if-env-changed=DD_AGENT_VERSION");
    println!("cargo:rerun-if-env-changed=PACKAGE_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
