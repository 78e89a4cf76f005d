use std::env;
use std::process::Command;

const GIT_REVISION: &str = "GIT_REVISION";

fn main() {
    println!("cargo:rerun-if-env-changed={GIT_REVISION}");

    if env::var(GIT_REVISION).is_ok() {
        println!("Environment variable {GIT_REVISION} is set. Not setting.");
        return;
    }

    println!("cargo:rustc-env={GIT_REVISION}={}", git_revision());
}

/// Outside of a git checkout (e.g. a crates.io tarball) we fall back to `unknown`.
fn git_revision() -> String {
    let git_status = match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() => output,
        _ => return "unknown".to_string(),
    };

    if !git_status.stdout.is_empty() {
        return "dirty".to_string();
    }

    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
